//! Per-student activity histories keyed by student id.

use activity_core::models::{ActivitySummary, ActivityType, Student};

use crate::ordered::InsertionOrdered;

/// Owns every [`Student`] seen during a run, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    students: InsertionOrdered<Student>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the student for `student_id`, creating it with `name` when the
    /// id has not been seen. An existing student keeps its original name.
    pub fn get_or_insert(&mut self, student_id: &str, name: &str) -> &mut Student {
        self.students
            .entry_or_insert_with(student_id, || Student::new(student_id, name))
    }

    /// Append one event to the student's history, creating the student first
    /// if needed.
    pub fn upsert(
        &mut self,
        student_id: &str,
        name: &str,
        activity: ActivityType,
        date: &str,
        time: &str,
    ) {
        self.get_or_insert(student_id, name)
            .add_activity(activity, date, time);
    }

    pub fn get(&self, student_id: &str) -> Option<&Student> {
        self.students.get(student_id)
    }

    /// Login and submission counts, recomputed from the full history.
    pub fn summarize(&self, student_id: &str) -> Option<ActivitySummary> {
        self.get(student_id).map(Student::activity_summary)
    }

    /// Students in the order they first appeared.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
