use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled time slot on a task. Either end may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl ScheduleSlot {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        ScheduleSlot { start, end }
    }

    /// True when both ends are set and the end comes before the start
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }
}

/// Reference to an event on an external calendar. Stored opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
    pub calendar_id: String,
    pub event_id: String,
}

/// A unit of work on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier, or a provisional placeholder while `is_new` is set
    pub id: String,
    pub title: String,
    /// Free-text body
    #[serde(default)]
    pub content: String,
    /// Schedule slots in order
    #[serde(default)]
    pub schedules: Vec<ScheduleSlot>,
    /// Linked calendar events in order
    #[serde(default)]
    pub events: Vec<EventRef>,
    /// Created locally, not yet confirmed by the store
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_new: bool,
}

impl Task {
    /// Create a confirmed task with the given id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            schedules: Vec::new(),
            events: Vec::new(),
            is_new: false,
        }
    }

    /// Create a provisional task awaiting confirmation
    pub fn provisional(id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut task = Task::new(id, title);
        task.is_new = true;
        task
    }

    /// Replace the provisional id with the confirmed one and clear the flag
    pub fn confirm(&mut self, confirmed_id: impl Into<String>) {
        self.id = confirmed_id.into();
        self.is_new = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_provisional_then_confirm() {
        let mut task = Task::provisional("pending-1", "Write report");
        assert!(task.is_new);
        task.confirm("t-42");
        assert_eq!(task.id, "t-42");
        assert!(!task.is_new);
    }

    #[test]
    fn test_inverted_slot() {
        let a = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        assert!(!ScheduleSlot::new(Some(a), Some(b)).is_inverted());
        assert!(ScheduleSlot::new(Some(b), Some(a)).is_inverted());
        assert!(!ScheduleSlot::new(None, Some(a)).is_inverted());
    }

    #[test]
    fn test_json_shape() {
        let mut task = Task::new("t-1", "Plan");
        task.events.push(EventRef {
            calendar_id: "primary".into(),
            event_id: "ev1".into(),
        });
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["events"][0]["calendarId"], "primary");
        // is_new is omitted once confirmed
        assert!(json.get("isNew").is_none());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let task: Task = serde_json::from_str(r#"{"id":"t-1","title":"Plan"}"#).unwrap();
        assert!(task.content.is_empty());
        assert!(task.schedules.is_empty());
        assert!(!task.is_new);
    }
}
