//! Property tests for the cell boundary index.
//!
//! Every operation sequence is mirrored on a plain per-cell model
//! (`Vec<Vec<String>>`); after each step the page's boundary table must be
//! well formed and its slices must match the model cell for cell.

use proptest::prelude::*;
use taskboard::model::page::{Group, Page, ProgressStatus};
use taskboard::model::task::Task;
use taskboard::ops::grid;

#[derive(Debug, Clone)]
enum Op {
    Move(usize, usize, usize, usize),
    Insert(usize),
    Remove(usize),
    RemoveMissing,
    Reconcile(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..10usize, 0..5usize, 0..10usize, 0..6usize)
            .prop_map(|(a, b, c, d)| Op::Move(a, b, c, d)),
        2 => (0..10usize).prop_map(Op::Insert),
        2 => (0..20usize).prop_map(Op::Remove),
        1 => Just(Op::RemoveMissing),
        1 => (0..20usize).prop_map(Op::Reconcile),
    ]
}

/// (groups, statuses, per-cell sizes)
fn layout_strategy() -> impl Strategy<Value = (usize, usize, Vec<usize>)> {
    (1..4usize, 1..4usize).prop_flat_map(|(g, s)| {
        (Just(g), Just(s), prop::collection::vec(0..4usize, g * s))
    })
}

fn build_page(groups: usize, statuses: usize, sizes: &[usize]) -> (Page, Vec<Vec<String>>) {
    let mut page = Page::with_layout(
        (0..groups).map(|g| Group::new(format!("g{g}"), format!("Group {g}"))).collect(),
        (0..statuses)
            .map(|s| ProgressStatus::new(format!("s{s}"), format!("Status {s}")))
            .collect(),
    );
    let mut model = Vec::new();
    let mut next = 0;
    for (cell, &size) in sizes.iter().enumerate() {
        let mut ids = Vec::new();
        for _ in 0..size {
            let id = format!("t{next}");
            next += 1;
            page.tasks.push(Task::new(id.clone(), "task"));
            ids.push(id);
        }
        page.task_boundaries[cell] = page.tasks.len();
        model.push(ids);
    }
    (page, model)
}

fn assert_matches_model(page: &Page, model: &[Vec<String>]) -> Result<(), TestCaseError> {
    // Boundaries never decrease and end at the task count
    prop_assert!(grid::ensure_consistent(page).is_ok());
    prop_assert!(page.task_boundaries.windows(2).all(|w| w[0] <= w[1]));
    prop_assert_eq!(page.task_boundaries.last().copied(), Some(page.tasks.len()));

    // Each cell's slice holds exactly the model's tasks, in order
    for (cell, expected) in model.iter().enumerate() {
        let actual: Vec<&str> = grid::cell_tasks(page, cell).iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(&actual, expected, "cell {} differs", cell);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 16384, ..ProptestConfig::default() })]

    #[test]
    fn prop_operations_preserve_partition(
        (groups, statuses, sizes) in layout_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let (mut page, mut model) = build_page(groups, statuses, &sizes);
        let cells = model.len();
        let mut confirmed = 0;
        assert_matches_model(&page, &model)?;

        for op in ops {
            match op {
                Op::Move(sc, si, dc, di) => {
                    let valid = sc < cells && dc < cells && si < model[sc].len() && {
                        let post_len = model[dc].len() - usize::from(sc == dc);
                        di <= post_len
                    };
                    let before = page.clone();
                    let result = grid::move_within_grid(&mut page, sc, si, dc, di);
                    if valid {
                        prop_assert!(result.is_ok());
                        let id = model[sc].remove(si);
                        model[dc].insert(di, id);
                    } else {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(&page, &before);
                    }
                }
                Op::Insert(cell) => {
                    let result = grid::insert_provisional(&mut page, cell, "pending", "new");
                    if cell < cells {
                        let p = result.unwrap();
                        prop_assert_eq!(page.tasks[p.index].id.as_str(), p.id.as_str());
                        model[cell].push(p.id);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Remove(k) => {
                    let all: Vec<String> = model.iter().flatten().cloned().collect();
                    if all.is_empty() {
                        continue;
                    }
                    let id = all[k % all.len()].clone();
                    prop_assert!(grid::remove_task(&mut page, &id).is_some());
                    for cell in model.iter_mut() {
                        cell.retain(|t| *t != id);
                    }
                    // A second remove changes nothing
                    let once = page.clone();
                    prop_assert!(grid::remove_task(&mut page, &id).is_none());
                    prop_assert_eq!(&page, &once);
                }
                Op::RemoveMissing => {
                    let before = page.clone();
                    prop_assert!(grid::remove_task(&mut page, "no-such-task").is_none());
                    prop_assert_eq!(&page, &before);
                }
                Op::Reconcile(k) => {
                    let pending: Vec<String> = page
                        .tasks
                        .iter()
                        .filter(|t| t.is_new)
                        .map(|t| t.id.clone())
                        .collect();
                    if pending.is_empty() {
                        continue;
                    }
                    let pid = pending[k % pending.len()].clone();
                    confirmed += 1;
                    let cid = format!("c{confirmed}");
                    let boundaries = page.task_boundaries.clone();
                    prop_assert!(grid::reconcile_provisional(&mut page, &pid, &cid));
                    prop_assert_eq!(&page.task_boundaries, &boundaries);
                    for cell in model.iter_mut() {
                        for t in cell.iter_mut() {
                            if *t == pid {
                                *t = cid.clone();
                            }
                        }
                    }
                }
            }
            assert_matches_model(&page, &model)?;
        }
    }

    #[test]
    fn prop_move_to_same_slot_is_noop(
        (groups, statuses, sizes) in layout_strategy(),
        cell in 0..9usize,
        index in 0..4usize,
    ) {
        let (mut page, model) = build_page(groups, statuses, &sizes);
        prop_assume!(cell < model.len() && index < model[cell].len());
        let before = page.clone();
        prop_assert_eq!(grid::move_within_grid(&mut page, cell, index, cell, index), Ok(false));
        prop_assert_eq!(page, before);
    }

    #[test]
    fn prop_reconcile_after_remove_is_noop(
        (groups, statuses, sizes) in layout_strategy(),
        cell in 0..9usize,
    ) {
        let (mut page, model) = build_page(groups, statuses, &sizes);
        prop_assume!(cell < model.len());
        let p = grid::insert_provisional(&mut page, cell, "pending", "new").unwrap();
        grid::remove_task(&mut page, &p.id);
        let before = page.clone();
        prop_assert!(!grid::reconcile_provisional(&mut page, &p.id, "confirmed"));
        prop_assert_eq!(page, before);
    }
}

// ===========================================================================
// Worked examples on a 2 × 3 board
// ===========================================================================

fn two_by_three() -> Page {
    let (page, _) = build_page(2, 3, &[1, 1, 0, 1, 1, 2]);
    assert_eq!(page.task_boundaries, vec![1, 2, 2, 3, 4, 6]);
    page
}

#[test]
fn move_head_of_first_cell_to_head_of_last_cell() {
    let mut page = two_by_three();
    let moved = page.tasks[0].id.clone();
    grid::move_within_grid(&mut page, 0, 0, 5, 0).unwrap();
    assert_eq!(page.task_boundaries, vec![0, 1, 1, 2, 3, 6]);
    assert_eq!(grid::cell_tasks(&page, 5)[0].id, moved);
}

#[test]
fn insert_provisional_into_empty_middle_cell() {
    let mut page = two_by_three();
    let p = grid::insert_provisional(&mut page, 2, "pending", "new").unwrap();
    assert_eq!(p.index, 2);
    assert_eq!(page.task_boundaries, vec![1, 2, 3, 4, 5, 7]);
}

#[test]
fn remove_only_shifts_later_boundaries() {
    let mut page = two_by_three();
    grid::insert_provisional(&mut page, 2, "pending", "new").unwrap();
    let id = page.tasks[3].id.clone();
    grid::remove_task(&mut page, &id).unwrap();
    assert_eq!(page.task_boundaries, vec![1, 2, 3, 3, 4, 6]);
}
