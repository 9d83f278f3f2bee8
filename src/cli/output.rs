use serde::Serialize;

use crate::model::page::Page;
use crate::model::task::{EventRef, ScheduleSlot, Task};
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::ops::grid;
use crate::util::unicode::{fit_to_width, truncate_to_width};

/// Width of the task ID column in text output
const ID_WIDTH: usize = 12;
/// Maximum title width in text output
const TITLE_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson {
    pub name: String,
    pub groups: Vec<GroupJson>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub id: String,
    pub title: String,
    pub cells: Vec<CellJson>,
}

#[derive(Serialize)]
pub struct CellJson {
    pub status: String,
    pub title: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<ScheduleSlot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRef>,
    pub pending: bool,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
    pub index: usize,
}

/// Outcome of a `tb group` / `tb status` edit
#[derive(Serialize)]
pub struct LayoutJson {
    pub action: &'static str,
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_tasks: Option<usize>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        content: task.content.clone(),
        schedules: task.schedules.clone(),
        events: task.events.clone(),
        pending: task.is_new,
    }
}

/// Group-by-group view of the page; `only` restricts it to one group index.
pub fn board_to_json(name: &str, page: &Page, only: Option<usize>) -> BoardJson {
    let groups = page
        .groups
        .iter()
        .enumerate()
        .filter(|(g, _)| only.is_none_or(|o| o == *g))
        .map(|(g, group)| GroupJson {
            id: group.id.clone(),
            title: group.title.clone(),
            cells: page
                .progress_statuses
                .iter()
                .enumerate()
                .map(|(s, status)| CellJson {
                    status: status.id.clone(),
                    title: status.title.clone(),
                    tasks: grid::cell_tasks(page, page.cell_index(g, s))
                        .iter()
                        .map(task_to_json)
                        .collect(),
                })
                .collect(),
        })
        .collect();
    BoardJson {
        name: name.to_string(),
        groups,
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One line per task: position, id, title. Pending tasks are marked `*`.
pub fn format_task_line(index: usize, task: &Task) -> String {
    let marker = if task.is_new { " *" } else { "" };
    format!(
        "    {:>3}  {}  {}{}",
        index,
        fit_to_width(&task.id, ID_WIDTH),
        truncate_to_width(&task.title, TITLE_WIDTH),
        marker
    )
}

pub fn format_board(name: &str, page: &Page, only: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(name);
    out.push('\n');
    for (g, group) in page.groups.iter().enumerate() {
        if only.is_some_and(|o| o != g) {
            continue;
        }
        out.push_str(&format!("\n== {} ==\n", group.title));
        for (s, status) in page.progress_statuses.iter().enumerate() {
            let tasks = grid::cell_tasks(page, page.cell_index(g, s));
            out.push_str(&format!("  {} ({})\n", status.title, tasks.len()));
            for (i, task) in tasks.iter().enumerate() {
                out.push_str(&format_task_line(i, task));
                out.push('\n');
            }
        }
    }
    out
}

/// `kind` is "group" or "status". Adds print only the new ID so scripts
/// can capture it.
pub fn format_layout_change(kind: &str, change: &LayoutJson) -> String {
    match (change.position, change.removed_tasks) {
        (_, Some(removed)) => format!("Removed {} {} ({} tasks)", kind, change.title, removed),
        (Some(position), None) => format!("Moved {} {} to {}", kind, change.title, position),
        (None, None) => change.id.clone(),
    }
}

pub fn format_check(result: &CheckResult) -> String {
    let mut out = String::new();
    if !result.errors.is_empty() {
        out.push_str("Errors:\n");
        for err in &result.errors {
            out.push_str(&format!("  {}\n", format_check_error(err)));
        }
    }
    if !result.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for warning in &result.warnings {
            out.push_str(&format!("  {}\n", format_check_warning(warning)));
        }
    }
    if result.valid && result.warnings.is_empty() {
        out.push_str("OK\n");
    }
    out
}

fn format_check_error(err: &CheckError) -> String {
    match err {
        CheckError::BoundaryCountMismatch { expected, found } => {
            format!("{} boundaries for {} cells", found, expected)
        }
        CheckError::BoundaryDecreasing {
            cell,
            previous,
            value,
        } => format!("boundary of cell {} decreases: {} -> {}", cell, previous, value),
        CheckError::BoundaryTotalMismatch { boundary, tasks } => {
            format!("boundaries cover {} tasks, page holds {}", boundary, tasks)
        }
        CheckError::DuplicateTaskId { task_id } => format!("duplicate task ID: {}", task_id),
        CheckError::DuplicateGroupId { group_id } => format!("duplicate group ID: {}", group_id),
        CheckError::DuplicateStatusId { status_id } => {
            format!("duplicate status ID: {}", status_id)
        }
    }
}

fn format_check_warning(warning: &CheckWarning) -> String {
    match warning {
        CheckWarning::PendingTask { task_id } => format!("{} was never confirmed", task_id),
        CheckWarning::EmptyTitle { task_id } => format!("{} has an empty title", task_id),
        CheckWarning::InvertedSchedule { task_id, slot } => {
            format!("{} schedule slot {} ends before it starts", task_id, slot)
        }
    }
}
