use chrono::{DateTime, Utc};

use crate::model::page::Page;
use crate::model::task::{EventRef, ScheduleSlot, Task};
use crate::ops::grid::{self, GridError, Provisional};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("schedule ends before it starts")]
    InvertedSchedule,
    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// Create / confirm / delete
// ---------------------------------------------------------------------------

/// Optimistically add a task to the end of the (group, status) cell.
/// The task stays provisional until `confirm_task` is called.
pub fn add_task(
    page: &mut Page,
    group: usize,
    status: usize,
    title: &str,
    prefix: &str,
) -> Result<Provisional, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let cell = checked_cell(page, group, status)?;
    Ok(grid::insert_provisional(page, cell, prefix, title)?)
}

/// Apply the store's confirmation of a create. Returns false if the
/// provisional task is gone.
pub fn confirm_task(page: &mut Page, provisional_id: &str, confirmed_id: &str) -> bool {
    grid::reconcile_provisional(page, provisional_id, confirmed_id)
}

/// Delete a task. Deleting a missing task is a no-op returning None.
pub fn delete_task(page: &mut Page, task_id: &str) -> Option<Task> {
    grid::remove_task(page, task_id)
}

/// Move a task by id to `index` within the (group, status) cell.
pub fn move_task(
    page: &mut Page,
    task_id: &str,
    group: usize,
    status: usize,
    index: usize,
) -> Result<bool, TaskError> {
    let (cell, pos) =
        grid::locate(page, task_id).ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let dest = checked_cell(page, group, status)?;
    Ok(grid::move_within_grid(page, cell, pos, dest, index)?)
}

// ---------------------------------------------------------------------------
// Field edits
// ---------------------------------------------------------------------------

pub fn edit_title(page: &mut Page, task_id: &str, title: &str) -> Result<(), TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    find_task_mut(page, task_id)?.title = title.to_string();
    Ok(())
}

pub fn set_content(page: &mut Page, task_id: &str, content: String) -> Result<(), TaskError> {
    find_task_mut(page, task_id)?.content = content;
    Ok(())
}

/// Append a schedule slot. Either end may be open.
pub fn add_schedule(
    page: &mut Page,
    task_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), TaskError> {
    let slot = ScheduleSlot::new(start, end);
    if slot.is_inverted() {
        return Err(TaskError::InvertedSchedule);
    }
    find_task_mut(page, task_id)?.schedules.push(slot);
    Ok(())
}

pub fn clear_schedules(page: &mut Page, task_id: &str) -> Result<(), TaskError> {
    find_task_mut(page, task_id)?.schedules.clear();
    Ok(())
}

/// Link a calendar event. Linking the same event twice is a no-op.
pub fn link_event(
    page: &mut Page,
    task_id: &str,
    calendar_id: &str,
    event_id: &str,
) -> Result<(), TaskError> {
    let task = find_task_mut(page, task_id)?;
    let event = EventRef {
        calendar_id: calendar_id.to_string(),
        event_id: event_id.to_string(),
    };
    if !task.events.contains(&event) {
        task.events.push(event);
    }
    Ok(())
}

/// Unlink a calendar event. Returns whether a link was removed.
pub fn unlink_event(
    page: &mut Page,
    task_id: &str,
    calendar_id: &str,
    event_id: &str,
) -> Result<bool, TaskError> {
    let task = find_task_mut(page, task_id)?;
    let before = task.events.len();
    task.events
        .retain(|e| !(e.calendar_id == calendar_id && e.event_id == event_id));
    Ok(task.events.len() != before)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Cell index for (group, status); a status past the last column would
/// otherwise alias the next row.
fn checked_cell(page: &Page, group: usize, status: usize) -> Result<usize, GridError> {
    if group >= page.groups.len() || status >= page.num_statuses() {
        return Err(GridError::InvalidCell {
            cell: group * page.num_statuses() + status,
            cells: page.num_cells(),
        });
    }
    Ok(page.cell_index(group, status))
}

fn find_task_mut<'a>(page: &'a mut Page, task_id: &str) -> Result<&'a mut Task, TaskError> {
    page.find_task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
