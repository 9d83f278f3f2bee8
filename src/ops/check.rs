use std::collections::HashSet;

use serde::Serialize;

use crate::model::page::Page;

/// Structured result from `tb check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (the page cannot be used as-is).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// One boundary per (group × status) cell is required
    #[serde(rename = "boundary_count_mismatch")]
    BoundaryCountMismatch { expected: usize, found: usize },
    /// Boundaries must never decrease
    #[serde(rename = "boundary_decreasing")]
    BoundaryDecreasing {
        cell: usize,
        previous: usize,
        value: usize,
    },
    /// The last boundary must equal the number of tasks
    #[serde(rename = "boundary_total_mismatch")]
    BoundaryTotalMismatch { boundary: usize, tasks: usize },
    #[serde(rename = "duplicate_task_id")]
    DuplicateTaskId { task_id: String },
    #[serde(rename = "duplicate_group_id")]
    DuplicateGroupId { group_id: String },
    #[serde(rename = "duplicate_status_id")]
    DuplicateStatusId { status_id: String },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A create was never confirmed
    #[serde(rename = "pending_task")]
    PendingTask { task_id: String },
    #[serde(rename = "empty_title")]
    EmptyTitle { task_id: String },
    /// A schedule slot ends before it starts
    #[serde(rename = "inverted_schedule")]
    InvertedSchedule { task_id: String, slot: usize },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a page document and return structured results.
///
/// Checks performed:
/// 1. Boundary table length matches the layout
/// 2. Boundaries are non-decreasing and end at the task count
/// 3. No duplicate task, group or status IDs
/// 4. Warnings for pending tasks, empty titles, inverted schedules
pub fn check_page(page: &Page) -> CheckResult {
    let mut result = CheckResult::default();

    check_boundaries(page, &mut result);
    check_duplicates(page, &mut result);

    for task in &page.tasks {
        if task.is_new {
            result.warnings.push(CheckWarning::PendingTask {
                task_id: task.id.clone(),
            });
        }
        if task.title.trim().is_empty() {
            result.warnings.push(CheckWarning::EmptyTitle {
                task_id: task.id.clone(),
            });
        }
        for (slot, s) in task.schedules.iter().enumerate() {
            if s.is_inverted() {
                result.warnings.push(CheckWarning::InvertedSchedule {
                    task_id: task.id.clone(),
                    slot,
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_boundaries(page: &Page, result: &mut CheckResult) {
    let expected = page.num_cells();
    let found = page.task_boundaries.len();
    if found != expected {
        result
            .errors
            .push(CheckError::BoundaryCountMismatch { expected, found });
    }

    for (i, w) in page.task_boundaries.windows(2).enumerate() {
        if w[1] < w[0] {
            result.errors.push(CheckError::BoundaryDecreasing {
                cell: i + 1,
                previous: w[0],
                value: w[1],
            });
        }
    }

    let boundary = page.task_boundaries.last().copied().unwrap_or(0);
    if boundary != page.tasks.len() {
        result.errors.push(CheckError::BoundaryTotalMismatch {
            boundary,
            tasks: page.tasks.len(),
        });
    }
}

fn check_duplicates(page: &Page, result: &mut CheckResult) {
    for id in duplicates(page.tasks.iter().map(|t| t.id.as_str())) {
        result.errors.push(CheckError::DuplicateTaskId { task_id: id });
    }
    for id in duplicates(page.groups.iter().map(|g| g.id.as_str())) {
        result.errors.push(CheckError::DuplicateGroupId { group_id: id });
    }
    for id in duplicates(page.progress_statuses.iter().map(|s| s.id.as_str())) {
        result
            .errors
            .push(CheckError::DuplicateStatusId { status_id: id });
    }
}

/// IDs seen more than once, each reported once, in first-repeat order.
fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            out.push(id.to_string());
        }
    }
    out
}
