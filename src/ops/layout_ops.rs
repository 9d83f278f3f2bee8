use tracing::debug;

use crate::model::page::{Group, Page, ProgressStatus};
use crate::model::task::Task;
use crate::ops::grid::{self, GridError};

/// Error type for group/status layout operations
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("progress status not found: {0}")]
    StatusNotFound(String),
    #[error("ID already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid position: {0}")]
    InvalidPosition(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// Groups (rows)
// ---------------------------------------------------------------------------

/// Append a group as a new row of empty cells.
pub fn add_group(page: &mut Page, group: Group) -> Result<(), LayoutError> {
    grid::ensure_consistent(page)?;
    if page.groups.iter().any(|g| g.id == group.id) {
        return Err(LayoutError::AlreadyExists(group.id));
    }
    let end = page.tasks.len();
    let statuses = page.num_statuses();
    page.task_boundaries
        .extend(std::iter::repeat_n(end, statuses));
    debug!(group = %group.id, "add group");
    page.groups.push(group);
    Ok(())
}

/// Remove a group and every task in its row. Returns both.
pub fn remove_group(page: &mut Page, key: &str) -> Result<(Group, Vec<Task>), LayoutError> {
    grid::ensure_consistent(page)?;
    let index = page
        .find_group(key)
        .ok_or_else(|| LayoutError::GroupNotFound(key.to_string()))?;

    let mut rows = take_rows(page);
    let removed: Vec<Task> = rows.remove(index).into_iter().flatten().collect();
    let group = page.groups.remove(index);
    put_rows(page, rows);

    debug!(group = %group.id, tasks = removed.len(), "remove group");
    Ok((group, removed))
}

/// Move a group (with its tasks) to row `to`.
pub fn move_group(page: &mut Page, key: &str, to: usize) -> Result<(), LayoutError> {
    grid::ensure_consistent(page)?;
    let from = page
        .find_group(key)
        .ok_or_else(|| LayoutError::GroupNotFound(key.to_string()))?;
    if to >= page.groups.len() {
        return Err(LayoutError::InvalidPosition(format!(
            "row {} (board has {} groups)",
            to,
            page.groups.len()
        )));
    }
    if from == to {
        return Ok(());
    }

    let mut rows = take_rows(page);
    let row = rows.remove(from);
    rows.insert(to, row);
    let group = page.groups.remove(from);
    page.groups.insert(to, group);
    put_rows(page, rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress statuses (columns)
// ---------------------------------------------------------------------------

/// Append a status as a new empty column in every row.
pub fn add_status(page: &mut Page, status: ProgressStatus) -> Result<(), LayoutError> {
    grid::ensure_consistent(page)?;
    if page.progress_statuses.iter().any(|s| s.id == status.id) {
        return Err(LayoutError::AlreadyExists(status.id));
    }
    let mut rows = take_rows(page);
    for row in &mut rows {
        row.push(Vec::new());
    }
    debug!(status = %status.id, "add progress status");
    page.progress_statuses.push(status);
    put_rows(page, rows);
    Ok(())
}

/// Remove a status and every task in its column. Returns both.
pub fn remove_status(
    page: &mut Page,
    key: &str,
) -> Result<(ProgressStatus, Vec<Task>), LayoutError> {
    grid::ensure_consistent(page)?;
    let index = page
        .find_status(key)
        .ok_or_else(|| LayoutError::StatusNotFound(key.to_string()))?;

    let mut rows = take_rows(page);
    let mut removed = Vec::new();
    for row in &mut rows {
        removed.extend(row.remove(index));
    }
    let status = page.progress_statuses.remove(index);
    put_rows(page, rows);

    debug!(status = %status.id, tasks = removed.len(), "remove progress status");
    Ok((status, removed))
}

/// Move a status (with its tasks in every row) to column `to`.
pub fn move_status(page: &mut Page, key: &str, to: usize) -> Result<(), LayoutError> {
    grid::ensure_consistent(page)?;
    let from = page
        .find_status(key)
        .ok_or_else(|| LayoutError::StatusNotFound(key.to_string()))?;
    if to >= page.progress_statuses.len() {
        return Err(LayoutError::InvalidPosition(format!(
            "column {} (board has {} statuses)",
            to,
            page.progress_statuses.len()
        )));
    }
    if from == to {
        return Ok(());
    }

    let mut rows = take_rows(page);
    for row in &mut rows {
        let cell = row.remove(from);
        row.insert(to, cell);
    }
    let status = page.progress_statuses.remove(from);
    page.progress_statuses.insert(to, status);
    put_rows(page, rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive a slug ID from a title, suffixed `-2`, `-3`… to avoid `existing`.
pub fn generate_id<'a>(title: &str, existing: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut base = String::new();
    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            base.extend(c.to_lowercase());
        } else if !base.is_empty() && !base.ends_with('-') {
            base.push('-');
        }
    }
    while base.ends_with('-') {
        base.pop();
    }
    if base.is_empty() {
        base.push_str("untitled");
    }

    let taken = |id: &str| existing.clone().any(|e| e == id);
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let id = format!("{}-{}", base, n);
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

/// Split the page into rows of cells, one row per group.
fn take_rows(page: &mut Page) -> Vec<Vec<Vec<Task>>> {
    let statuses = page.num_statuses();
    let mut cells = grid::take_cells(page).into_iter();
    (0..page.groups.len())
        .map(|_| cells.by_ref().take(statuses).collect())
        .collect()
}

fn put_rows(page: &mut Page, rows: Vec<Vec<Vec<Task>>>) {
    grid::put_cells(page, rows.into_iter().flatten().collect());
}
