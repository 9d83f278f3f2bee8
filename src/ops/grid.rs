//! Cell bookkeeping over a page's flat task list.
//!
//! A page stores its tasks as one ordered `Vec` and a boundary table with
//! one entry per (group × status) cell. Every operation here keeps the
//! table non-decreasing, keeps its last entry equal to `tasks.len()`, and
//! leaves tasks it does not move in their relative order.

use std::ops::Range;

use tracing::debug;

use crate::model::page::Page;
use crate::model::task::Task;

/// Error type for grid operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {cell} out of range (board has {cells} cells)")]
    InvalidCell { cell: usize, cells: usize },
    #[error("position {index} out of range for cell {cell} (holds {len} tasks)")]
    InvalidPosition { cell: usize, index: usize, len: usize },
    #[error("inconsistent task boundaries: {0}")]
    Inconsistent(String),
}

/// A freshly inserted provisional task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisional {
    /// Flat index in `tasks` at the time of insertion
    pub index: usize,
    /// Placeholder id to reconcile later
    pub id: String,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Flat index where `cell` begins.
pub fn cell_start(page: &Page, cell: usize) -> usize {
    if cell == 0 {
        0
    } else {
        page.task_boundaries[cell - 1]
    }
}

/// Flat range of `cell` in `tasks`.
pub fn cell_range(page: &Page, cell: usize) -> Range<usize> {
    cell_start(page, cell)..page.task_boundaries[cell]
}

/// Tasks in `cell`, in order.
pub fn cell_tasks(page: &Page, cell: usize) -> &[Task] {
    &page.tasks[cell_range(page, cell)]
}

/// The cell holding flat index `flat`, if any.
pub fn cell_of(page: &Page, flat: usize) -> Option<usize> {
    let cell = page.task_boundaries.partition_point(|&b| b <= flat);
    (cell < page.task_boundaries.len()).then_some(cell)
}

/// Flat index of the task with `id` (linear scan).
pub fn position_of(page: &Page, id: &str) -> Option<usize> {
    page.tasks.iter().position(|t| t.id == id)
}

/// `(cell, index_in_cell)` of the task with `id`.
pub fn locate(page: &Page, id: &str) -> Option<(usize, usize)> {
    let flat = position_of(page, id)?;
    let cell = cell_of(page, flat)?;
    Some((cell, flat - cell_start(page, cell)))
}

/// Verify the boundary table against the task list.
pub fn ensure_consistent(page: &Page) -> Result<(), GridError> {
    let expected = page.num_cells();
    if page.task_boundaries.len() != expected {
        return Err(GridError::Inconsistent(format!(
            "{} boundaries for {} cells",
            page.task_boundaries.len(),
            expected
        )));
    }
    if let Some(i) = page.task_boundaries.windows(2).position(|w| w[1] < w[0]) {
        return Err(GridError::Inconsistent(format!(
            "boundary {} decreases ({} -> {})",
            i + 1,
            page.task_boundaries[i],
            page.task_boundaries[i + 1]
        )));
    }
    let total = page.task_boundaries.last().copied().unwrap_or(0);
    if total != page.tasks.len() {
        return Err(GridError::Inconsistent(format!(
            "boundaries cover {} tasks, page holds {}",
            total,
            page.tasks.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Move the task at `source_index` of `source_cell` so that it ends up at
/// `dest_index` of `dest_cell`.
///
/// `dest_index` is the position in the destination cell after the task has
/// left its source: at most the cell's length for a different cell, at most
/// `len - 1` for a reorder inside one cell. Returns whether anything moved.
pub fn move_within_grid(
    page: &mut Page,
    source_cell: usize,
    source_index: usize,
    dest_cell: usize,
    dest_index: usize,
) -> Result<bool, GridError> {
    check_cell(page, source_cell)?;
    check_cell(page, dest_cell)?;

    let source_len = cell_range(page, source_cell).len();
    if source_index >= source_len {
        return Err(GridError::InvalidPosition {
            cell: source_cell,
            index: source_index,
            len: source_len,
        });
    }
    let dest_len = cell_range(page, dest_cell).len();
    let dest_max = if dest_cell == source_cell {
        dest_len - 1
    } else {
        dest_len
    };
    if dest_index > dest_max {
        return Err(GridError::InvalidPosition {
            cell: dest_cell,
            index: dest_index,
            len: dest_len,
        });
    }

    if source_cell == dest_cell && source_index == dest_index {
        return Ok(false);
    }

    let source_flat = cell_start(page, source_cell) + source_index;
    let mut dest_flat = cell_start(page, dest_cell) + dest_index;
    // Every cell after the source shifts left once the task is taken out
    if dest_cell > source_cell {
        dest_flat -= 1;
    }

    let task = page.tasks.remove(source_flat);
    debug!(
        task = %task.id,
        source_cell, source_index, dest_cell, dest_index,
        "move task"
    );
    page.tasks.insert(dest_flat, task);

    if dest_cell < source_cell {
        for b in &mut page.task_boundaries[dest_cell..source_cell] {
            *b += 1;
        }
    } else if dest_cell > source_cell {
        for b in &mut page.task_boundaries[source_cell..dest_cell] {
            *b -= 1;
        }
    }
    Ok(true)
}

/// Append `task` to the end of `cell`. Returns its flat index.
pub fn insert_at_end(page: &mut Page, cell: usize, task: Task) -> Result<usize, GridError> {
    check_cell(page, cell)?;
    let flat = page.task_boundaries[cell];
    debug!(task = %task.id, cell, flat, "insert task");
    page.tasks.insert(flat, task);
    for b in &mut page.task_boundaries[cell..] {
        *b += 1;
    }
    Ok(flat)
}

/// Insert a new provisional task at the end of `cell`.
///
/// The placeholder id is `<prefix>-<n>`, one past the highest such id on
/// the page, so several pending creates can coexist.
pub fn insert_provisional(
    page: &mut Page,
    cell: usize,
    prefix: &str,
    title: &str,
) -> Result<Provisional, GridError> {
    let id = next_provisional_id(page, prefix);
    let index = insert_at_end(page, cell, Task::provisional(id.clone(), title))?;
    Ok(Provisional { index, id })
}

/// Swap a provisional id for the confirmed one.
///
/// Returns false when no task carries `provisional_id` any more, which
/// happens when it was removed before the confirmation arrived.
pub fn reconcile_provisional(page: &mut Page, provisional_id: &str, confirmed_id: &str) -> bool {
    match page.tasks.iter_mut().find(|t| t.id == provisional_id) {
        Some(task) => {
            debug!(provisional_id, confirmed_id, "reconcile task");
            task.confirm(confirmed_id);
            true
        }
        None => {
            debug!(provisional_id, "reconcile superseded, task gone");
            false
        }
    }
}

/// Remove the task with `id`. Removing a missing task is a no-op.
pub fn remove_task(page: &mut Page, id: &str) -> Option<Task> {
    let Some(flat) = position_of(page, id) else {
        debug!(task = id, "remove skipped, task not found");
        return None;
    };
    let task = page.tasks.remove(flat);
    for b in page.task_boundaries.iter_mut().filter(|b| **b > flat) {
        *b -= 1;
    }
    debug!(task = id, flat, "remove task");
    Some(task)
}

// ---------------------------------------------------------------------------
// Cell decomposition
// ---------------------------------------------------------------------------

/// Take every task out of the page as one `Vec` per cell. Leaves the page
/// with no tasks and no boundaries; pair with `put_cells`.
pub fn take_cells(page: &mut Page) -> Vec<Vec<Task>> {
    let mut tasks = std::mem::take(&mut page.tasks).into_iter();
    let mut start = 0;
    let cells = page
        .task_boundaries
        .iter()
        .map(|&end| {
            let cell: Vec<Task> = tasks.by_ref().take(end.saturating_sub(start)).collect();
            start = end;
            cell
        })
        .collect();
    page.task_boundaries.clear();
    cells
}

/// Rebuild `tasks` and the boundary table from per-cell lists.
pub fn put_cells(page: &mut Page, cells: Vec<Vec<Task>>) {
    page.tasks.clear();
    page.task_boundaries.clear();
    for cell in cells {
        page.tasks.extend(cell);
        page.task_boundaries.push(page.tasks.len());
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_cell(page: &Page, cell: usize) -> Result<(), GridError> {
    let cells = page.task_boundaries.len();
    if cell >= cells {
        return Err(GridError::InvalidCell { cell, cells });
    }
    Ok(())
}

/// Next free placeholder id for `prefix`.
pub fn next_provisional_id(page: &Page, prefix: &str) -> String {
    let prefix_dash = format!("{}-", prefix);
    let max = page
        .tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix(&prefix_dash))
        .filter_map(|n| n.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", prefix_dash, max + 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
