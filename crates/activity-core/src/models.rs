use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of event recorded on a single log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Login,
    Logout,
    SubmitAssignment,
}

impl ActivityType {
    /// Every recognised activity, in wire order.
    pub const ALL: [ActivityType; 3] = [
        ActivityType::Login,
        ActivityType::Logout,
        ActivityType::SubmitAssignment,
    ];

    /// The exact token used for this activity in the log format.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Login => "LOGIN",
            ActivityType::Logout => "LOGOUT",
            ActivityType::SubmitAssignment => "SUBMIT_ASSIGNMENT",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not one of the recognised activity names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown activity type: {0}")]
pub struct UnknownActivityType(pub String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    /// Matching is exact and case-sensitive: `login` is not `LOGIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|activity| activity.as_str() == s)
            .ok_or_else(|| UnknownActivityType(s.to_string()))
    }
}

/// Returns `true` when `id` is an `S` followed by one or more digits, with
/// nothing before or after.
///
/// # Examples
///
/// ```
/// use activity_core::models::is_valid_student_id;
///
/// assert!(is_valid_student_id("S1024"));
/// assert!(!is_valid_student_id("S"));
/// assert!(!is_valid_student_id("S12a"));
/// assert!(!is_valid_student_id("xS12"));
/// ```
pub fn is_valid_student_id(id: &str) -> bool {
    static STUDENT_ID: OnceLock<Regex> = OnceLock::new();
    STUDENT_ID
        .get_or_init(|| Regex::new(r"^S\d+$").expect("regex is valid"))
        .is_match(id)
}

/// One validated line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Identifier matching `S<digits>`.
    pub student_id: String,
    /// Free-text display name as written on this line.
    pub student_name: String,
    pub activity: ActivityType,
    /// Opaque day key; not parsed as a calendar date.
    pub date: String,
    /// Opaque time-of-day string, stored but never interpreted.
    pub time: String,
}

/// A single entry in a student's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub activity: ActivityType,
    pub date: String,
    pub time: String,
}

/// Login and submission totals for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub logins: u64,
    pub submissions: u64,
}

/// A distinct student seen in the log together with its full history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    /// Name from the first line seen for this id; later lines never change it.
    pub name: String,
    /// Every accepted event for this student, in arrival order.
    pub activities: Vec<ActivityEvent>,
}

impl Student {
    /// Create a student with an empty history.
    pub fn new(student_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            activities: Vec::new(),
        }
    }

    /// Append an event to the end of the history.
    pub fn add_activity(
        &mut self,
        activity: ActivityType,
        date: impl Into<String>,
        time: impl Into<String>,
    ) {
        self.activities.push(ActivityEvent {
            activity,
            date: date.into(),
            time: time.into(),
        });
    }

    /// Count logins and submissions by scanning the whole history.
    pub fn activity_summary(&self) -> ActivitySummary {
        self.activities
            .iter()
            .fold(ActivitySummary::default(), |mut summary, event| {
                match event.activity {
                    ActivityType::Login => summary.logins += 1,
                    ActivityType::SubmitAssignment => summary.submissions += 1,
                    ActivityType::Logout => {}
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ActivityType ───────────────────────────────────────────────────────

    #[test]
    fn test_activity_type_from_str_known() {
        assert_eq!("LOGIN".parse::<ActivityType>(), Ok(ActivityType::Login));
        assert_eq!("LOGOUT".parse::<ActivityType>(), Ok(ActivityType::Logout));
        assert_eq!(
            "SUBMIT_ASSIGNMENT".parse::<ActivityType>(),
            Ok(ActivityType::SubmitAssignment)
        );
    }

    #[test]
    fn test_activity_type_from_str_is_case_sensitive() {
        let err = "login".parse::<ActivityType>().unwrap_err();
        assert_eq!(err, UnknownActivityType("login".to_string()));
        assert_eq!(err.to_string(), "Unknown activity type: login");
    }

    #[test]
    fn test_activity_type_display_round_trips_wire_name() {
        for activity in ActivityType::ALL {
            assert_eq!(activity.to_string().parse::<ActivityType>(), Ok(activity));
        }
    }

    #[test]
    fn test_activity_type_serde_uses_wire_names() {
        let json = serde_json::to_string(&ActivityType::SubmitAssignment).unwrap();
        assert_eq!(json, "\"SUBMIT_ASSIGNMENT\"");
    }

    // ── is_valid_student_id ────────────────────────────────────────────────

    #[test]
    fn test_student_id_accepts_s_with_digits() {
        assert!(is_valid_student_id("S1"));
        assert!(is_valid_student_id("S000123"));
    }

    #[test]
    fn test_student_id_requires_full_match() {
        assert!(!is_valid_student_id(""));
        assert!(!is_valid_student_id("S"));
        assert!(!is_valid_student_id("s1"));
        assert!(!is_valid_student_id("S1x"));
        assert!(!is_valid_student_id("AS1"));
        assert!(!is_valid_student_id("S1 2"));
    }

    // ── Student ────────────────────────────────────────────────────────────

    #[test]
    fn test_student_new_has_empty_history() {
        let student = Student::new("S1", "Alice");
        assert!(student.activities.is_empty());
        assert_eq!(student.activity_summary(), ActivitySummary::default());
    }

    #[test]
    fn test_student_add_activity_keeps_arrival_order() {
        let mut student = Student::new("S1", "Alice");
        student.add_activity(ActivityType::Login, "2024-01-01", "09:00");
        student.add_activity(ActivityType::Logout, "2024-01-01", "10:00");

        assert_eq!(student.activities.len(), 2);
        assert_eq!(student.activities[0].activity, ActivityType::Login);
        assert_eq!(student.activities[1].time, "10:00");
    }

    #[test]
    fn test_student_activity_summary_ignores_logouts() {
        let mut student = Student::new("S7", "Bo");
        student.add_activity(ActivityType::Login, "d1", "t");
        student.add_activity(ActivityType::Login, "d1", "t");
        student.add_activity(ActivityType::Logout, "d1", "t");
        student.add_activity(ActivityType::SubmitAssignment, "d2", "t");

        let summary = student.activity_summary();
        assert_eq!(summary.logins, 2);
        assert_eq!(summary.submissions, 1);
    }
}
