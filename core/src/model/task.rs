use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub const VALUES: [&'static str; 3] = ["high", "medium", "low"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank, high first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Lenient construction-time normalization: unknown or missing values
    /// fall back to `Medium`. The strict counterpart is [`FromStr`].
    pub fn normalize(raw: Option<&str>) -> Priority {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub const VALUES: [&'static str; 3] = ["daily", "weekly", "monthly"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    /// Lenient construction-time normalization: unknown values are dropped
    /// to `None`. The strict counterpart is [`FromStr`].
    pub fn normalize(raw: Option<&str>) -> Option<Recurrence> {
        raw.and_then(|s| s.parse().ok())
    }
}

impl FromStr for Recurrence {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(TaskError::InvalidRecurrence(s.to_string())),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single todo item.
///
/// Fields are private so the invariants hold at all times: the description is
/// never empty or whitespace-only, priority and recurrence are always members
/// of their allowed sets, and the id never changes after construction.
///
/// Construction is lenient about priority/recurrence strings (unknown values
/// are normalized away) while the setters are strict and reject them. Both
/// paths are deliberate; callers wanting strict recurrence validation on
/// create should go through [`crate::TaskManager::add`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    id: u32,
    description: String,
    completed: bool,
    priority: Priority,
    tags: Vec<String>,
    due_date: Option<NaiveDateTime>,
    recurrence: Option<Recurrence>,
}

impl Task {
    /// Create a task with defaults: incomplete, medium priority, no tags,
    /// no due date, no recurrence.
    pub fn new(id: u32, description: &str) -> Result<Self, TaskError> {
        Self::with_details(id, description, false, None, Vec::new(), None, None)
    }

    /// Create a task with every field specified.
    ///
    /// Unknown priority strings silently become `Medium` and unknown
    /// recurrence strings silently become absent.
    pub fn with_details(
        id: u32,
        description: &str,
        completed: bool,
        priority: Option<&str>,
        tags: Vec<String>,
        due_date: Option<NaiveDateTime>,
        recurrence: Option<&str>,
    ) -> Result<Self, TaskError> {
        if description.trim().is_empty() {
            return Err(TaskError::InvalidDescription);
        }
        Ok(Self {
            id,
            description: description.to_string(),
            completed,
            priority: Priority::normalize(priority),
            tags,
            due_date,
            recurrence: Recurrence::normalize(recurrence),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, value: &str) -> Result<(), TaskError> {
        if value.trim().is_empty() {
            return Err(TaskError::InvalidDescription);
        }
        self.description = value.to_string();
        Ok(())
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn mark_incomplete(&mut self) {
        self.completed = false;
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Strict assignment: rejects anything outside high/medium/low.
    pub fn set_priority(&mut self, value: &str) -> Result<(), TaskError> {
        self.priority = value.parse()?;
        Ok(())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replaces the tag list wholesale; `None` clears it.
    ///
    /// Tags are expected to be non-empty and comma-free; callers feeding
    /// user input should split and trim first (the CLI's comma-separated
    /// tag parsing does this).
    pub fn set_tags(&mut self, tags: Option<Vec<String>>) {
        self.tags = tags.unwrap_or_default();
    }

    pub fn due_date(&self) -> Option<NaiveDateTime> {
        self.due_date
    }

    pub fn set_due_date(&mut self, value: Option<NaiveDateTime>) {
        self.due_date = value;
    }

    pub fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence
    }

    /// Strict assignment: rejects any non-null value outside
    /// daily/weekly/monthly. `None` clears the rule.
    pub fn set_recurrence(&mut self, value: Option<&str>) -> Result<(), TaskError> {
        self.recurrence = match value {
            Some(s) => Some(s.parse()?),
            None => None,
        };
        Ok(())
    }

    /// True iff the due date's calendar day is strictly in the past.
    /// Time of day is ignored.
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => due.date() < Local::now().date_naive(),
            None => false,
        }
    }

    /// True iff the due date's calendar day is today. A task due yesterday
    /// is overdue, not upcoming; a task due the day after tomorrow is
    /// neither.
    pub fn is_upcoming(&self) -> bool {
        match self.due_date {
            Some(due) => {
                let today = Local::now().date_naive();
                let tomorrow = today + Duration::days(1);
                today <= due.date() && due.date() < tomorrow
            }
            None => false,
        }
    }

    /// Plain serializable snapshot, with the due date rendered ISO-8601.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            description: self.description.clone(),
            completed: self.completed,
            priority: self.priority.as_str().to_string(),
            tags: self.tags.clone(),
            due_date: self.due_date.map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            recurrence: self.recurrence.map(|r| r.as_str().to_string()),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "✓" } else { "○" };
        write!(f, "[{}] {}: {}", status, self.id, self.description)
    }
}

/// Flat, string-typed view of a [`Task`] for serialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: u32,
    pub description: String,
    pub completed: bool,
    pub priority: String,
    pub tags: Vec<String>,
    pub due_date: Option<String>,
    pub recurrence: Option<String>,
}
