use serde::{Deserialize, Serialize};

use super::task::Task;

/// A board row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStatus {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            title: title.into(),
            color: None,
        }
    }
}

impl ProgressStatus {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ProgressStatus {
            id: id.into(),
            title: title.into(),
            color: None,
        }
    }
}

/// One user's board: the layout plus a flat task list partitioned into
/// (group × status) cells by `task_boundaries`.
///
/// Cells are numbered row-major, `group * statuses + status`. Entry `i` of
/// `task_boundaries` is the exclusive end of cell `i` in `tasks`; cell `i`
/// starts where cell `i - 1` ends (cell 0 starts at 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub progress_statuses: Vec<ProgressStatus>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub task_boundaries: Vec<usize>,
}

impl Page {
    /// An empty page with the given layout; every cell starts empty.
    pub fn with_layout(groups: Vec<Group>, progress_statuses: Vec<ProgressStatus>) -> Self {
        let cells = groups.len() * progress_statuses.len();
        Page {
            groups,
            progress_statuses,
            tasks: Vec::new(),
            task_boundaries: vec![0; cells],
        }
    }

    pub fn num_statuses(&self) -> usize {
        self.progress_statuses.len()
    }

    pub fn num_cells(&self) -> usize {
        self.groups.len() * self.progress_statuses.len()
    }

    /// Row-major cell index for a (group, status) pair
    pub fn cell_index(&self, group: usize, status: usize) -> usize {
        group * self.num_statuses() + status
    }

    /// Inverse of `cell_index`. None when there are no statuses.
    pub fn cell_coords(&self, cell: usize) -> Option<(usize, usize)> {
        let statuses = self.num_statuses();
        if statuses == 0 {
            return None;
        }
        Some((cell / statuses, cell % statuses))
    }

    /// Look up a group by id, falling back to a case-insensitive title match
    pub fn find_group(&self, key: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == key).or_else(|| {
            self.groups
                .iter()
                .position(|g| g.title.eq_ignore_ascii_case(key))
        })
    }

    /// Look up a status by id, falling back to a case-insensitive title match
    pub fn find_status(&self, key: &str) -> Option<usize> {
        self.progress_statuses
            .iter()
            .position(|s| s.id == key)
            .or_else(|| {
                self.progress_statuses
                    .iter()
                    .position(|s| s.title.eq_ignore_ascii_case(key))
            })
    }

    /// Find a task by id
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find a task by id, mutable
    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}
