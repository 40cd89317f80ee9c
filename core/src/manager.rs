use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::TaskError;
use crate::model::task::{Priority, Recurrence, Task};
use crate::time;

/// Filter criteria for [`TaskManager::filter`]. All present criteria are
/// ANDed together; absent criteria do not narrow the result.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// "complete"/"completed" select completed tasks, "incomplete"/"pending"
    /// select the rest. Unrecognized values do not narrow.
    pub status: Option<String>,
    /// Must be one of high/medium/low to narrow; unrecognized values are
    /// ignored.
    pub priority: Option<String>,
    /// Calendar-date comparison; tasks without a due date never match.
    pub due_date: Option<NaiveDate>,
}

/// Owns every task in the session, assigns identity, and answers queries.
///
/// Ids are handed out sequentially starting at 1 and are never reused while
/// the manager is alive, even after deletions. Insertion order is preserved
/// and is the tie-break order for stable sorts.
#[derive(Debug)]
pub struct TaskManager {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManager {
    pub fn new() -> Self {
        Self { tasks: Vec::new(), next_id: 1 }
    }

    /// Add a new task and return a copy of it.
    ///
    /// The description rule matches the entity's. Recurrence is validated
    /// strictly here, unlike the entity constructor which silently drops
    /// unknown values; priority stays lenient on this path and falls back
    /// to medium. Nothing is appended and the id counter does not move when
    /// validation fails.
    pub fn add(
        &mut self,
        description: &str,
        priority: Option<&str>,
        tags: Option<Vec<String>>,
        due_date: Option<NaiveDateTime>,
        recurrence: Option<&str>,
    ) -> Result<Task, TaskError> {
        if let Some(r) = recurrence {
            r.parse::<Recurrence>()?;
        }
        let task = Task::with_details(
            self.next_id,
            description,
            false,
            priority,
            tags.unwrap_or_default(),
            due_date,
            recurrence,
        )?;
        self.tasks.push(task.clone());
        self.next_id += 1;
        Ok(task)
    }

    /// All tasks in insertion order, as a defensive copy.
    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn get_by_id_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    pub fn get_by_id_or_err(&self, id: u32) -> Result<&Task, TaskError> {
        self.get_by_id(id).ok_or(TaskError::NotFound(id))
    }

    /// Replace a task's description. The new description is validated before
    /// the lookup, so an invalid description errors even for a missing id.
    /// Returns `false` when no task has the id.
    pub fn update(&mut self, id: u32, new_description: &str) -> Result<bool, TaskError> {
        if new_description.trim().is_empty() {
            return Err(TaskError::InvalidDescription);
        }
        match self.get_by_id_mut(id) {
            Some(task) => {
                task.set_description(new_description)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a task. Freed ids are never reassigned.
    pub fn delete(&mut self, id: u32) -> bool {
        match self.tasks.iter().position(|t| t.id() == id) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Mark a task complete. A recurring task additionally spawns its next
    /// occurrence; a failure computing that occurrence is swallowed so that
    /// completion itself never fails.
    pub fn mark_complete(&mut self, id: u32) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.tasks[pos].mark_completed();
        if self.tasks[pos].recurrence().is_some() {
            let source = self.tasks[pos].clone();
            let _ = self.reschedule(&source);
        }
        true
    }

    pub fn mark_incomplete(&mut self, id: u32) -> bool {
        match self.get_by_id_mut(id) {
            Some(task) => {
                task.mark_incomplete();
                true
            }
            None => false,
        }
    }

    /// Case-insensitive substring search over descriptions, tags, and the
    /// due date rendered `YYYY-MM-DD`. An empty keyword matches nothing.
    /// Each task appears at most once regardless of how many fields match.
    pub fn search(&self, keyword: &str) -> Vec<Task> {
        if keyword.is_empty() {
            return Vec::new();
        }
        let keyword = keyword.to_lowercase();
        let mut matched_ids = HashSet::new();
        let mut results = Vec::new();

        for task in &self.tasks {
            let mut matched = task.description().to_lowercase().contains(&keyword);
            if !matched {
                matched = task.tags().iter().any(|tag| tag.to_lowercase().contains(&keyword));
            }
            if !matched {
                if let Some(due) = task.due_date() {
                    matched = due.format("%Y-%m-%d").to_string().contains(&keyword);
                }
            }
            if matched && matched_ids.insert(task.id()) {
                results.push(task.clone());
            }
        }
        results
    }

    /// Filter by ANDed criteria. See [`FilterCriteria`] for the narrowing
    /// rules; unrecognized status or priority values are no-ops rather than
    /// errors.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Task> {
        let mut filtered = self.tasks.clone();

        if let Some(status) = criteria.status.as_deref() {
            match status {
                "complete" | "completed" => filtered.retain(|t| t.completed()),
                "incomplete" | "pending" => filtered.retain(|t| !t.completed()),
                _ => {}
            }
        }

        if let Some(priority) = criteria.priority.as_deref() {
            if let Ok(priority) = priority.parse::<Priority>() {
                filtered.retain(|t| t.priority() == priority);
            }
        }

        if let Some(date) = criteria.due_date {
            filtered.retain(|t| t.due_date().map(|d| d.date() == date).unwrap_or(false));
        }

        filtered
    }

    /// Return a sorted copy; the stored order is untouched.
    ///
    /// `by` is one of "priority" (high first), "due_date" (undated tasks
    /// sort ahead of all dated ones ascending, behind them descending), or
    /// "title" (case-insensitive). `reverse` flips the comparator rather
    /// than the result, so equal keys keep their insertion order either way.
    pub fn sort(&self, by: &str, reverse: bool) -> Result<Vec<Task>, TaskError> {
        let flip = |ord: Ordering| if reverse { ord.reverse() } else { ord };
        let mut tasks = self.tasks.clone();
        match by {
            "priority" => {
                tasks.sort_by(|a, b| flip(a.priority().rank().cmp(&b.priority().rank())));
            }
            "due_date" => {
                tasks.sort_by(|a, b| {
                    let key_a = (a.due_date().is_some(), a.due_date());
                    let key_b = (b.due_date().is_some(), b.due_date());
                    flip(key_a.cmp(&key_b))
                });
            }
            "title" => {
                tasks.sort_by(|a, b| {
                    flip(a.description().to_lowercase().cmp(&b.description().to_lowercase()))
                });
            }
            _ => return Err(TaskError::InvalidSortCriteria(by.to_string())),
        }
        Ok(tasks)
    }

    /// Tasks whose due date is strictly in the past, in insertion order.
    pub fn get_overdue(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_overdue()).cloned().collect()
    }

    /// Tasks due today, in insertion order.
    pub fn get_upcoming(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_upcoming()).cloned().collect()
    }

    /// Append the next occurrence of a recurring task and return it.
    ///
    /// The clone keeps the description, priority, tags, and recurrence rule,
    /// is not completed, and gets a fresh id plus a due date advanced by the
    /// recurrence period from the source's due date (or from now when the
    /// source has none). Returns `None` for non-recurring tasks or when the
    /// next date cannot be computed.
    pub fn reschedule(&mut self, task: &Task) -> Option<Task> {
        let recurrence = task.recurrence()?;
        let base = task.due_date().unwrap_or_else(|| Local::now().naive_local());
        let next_due = time::next_occurrence(base, recurrence)?;

        let clone = Task::with_details(
            self.next_id,
            task.description(),
            false,
            Some(task.priority().as_str()),
            task.tags().to_vec(),
            Some(next_due),
            Some(recurrence.as_str()),
        )
        .ok()?;

        self.tasks.push(clone.clone());
        self.next_id += 1;
        Some(clone)
    }

    /// The id the next added task will receive.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Drop every task and restart the id sequence.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn manager_with(descriptions: &[&str]) -> TaskManager {
        let mut manager = TaskManager::new();
        for d in descriptions {
            manager.add(d, None, None, None, None).unwrap();
        }
        manager
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut manager = TaskManager::new();
        let first = manager.add("First", None, None, None, None).unwrap();
        let second = manager.add("Second", None, None, None, None).unwrap();
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert_eq!(manager.next_id(), 3);
    }

    #[test]
    fn test_add_rejects_blank_description_without_consuming_id() {
        let mut manager = TaskManager::new();
        assert_eq!(
            manager.add("", None, None, None, None).unwrap_err(),
            TaskError::InvalidDescription
        );
        assert_eq!(
            manager.add("   ", None, None, None, None).unwrap_err(),
            TaskError::InvalidDescription
        );
        assert!(manager.is_empty());
        assert_eq!(manager.next_id(), 1);
    }

    #[test]
    fn test_add_is_strict_about_recurrence_but_lenient_about_priority() {
        let mut manager = TaskManager::new();
        assert_eq!(
            manager.add("Task", None, None, None, Some("yearly")).unwrap_err(),
            TaskError::InvalidRecurrence("yearly".to_string())
        );
        assert!(manager.is_empty());

        let task = manager.add("Task", Some("urgent"), None, None, None).unwrap();
        assert_eq!(task.priority(), Priority::Medium);
    }

    #[test]
    fn test_get_all_is_a_defensive_copy() {
        let manager = manager_with(&["One", "Two"]);
        let mut copy = manager.get_all();
        copy.clear();
        assert_eq!(manager.len(), 2);

        let mut copy = manager.get_all();
        copy[0].mark_completed();
        assert!(!manager.get_by_id(1).unwrap().completed());
    }

    #[test]
    fn test_get_by_id() {
        let manager = manager_with(&["One", "Two"]);
        assert_eq!(manager.get_by_id(2).unwrap().description(), "Two");
        assert!(manager.get_by_id(99).is_none());
        assert_eq!(manager.get_by_id_or_err(99).unwrap_err(), TaskError::NotFound(99));
    }

    #[test]
    fn test_update() {
        let mut manager = manager_with(&["Old"]);
        assert!(manager.update(1, "New").unwrap());
        assert_eq!(manager.get_by_id(1).unwrap().description(), "New");
        assert!(!manager.update(42, "Whatever").unwrap());
        // Validation happens before the lookup.
        assert_eq!(manager.update(42, "  ").unwrap_err(), TaskError::InvalidDescription);
    }

    #[test]
    fn test_delete_never_reuses_ids() {
        let mut manager = manager_with(&["One", "Two", "Three"]);
        assert!(manager.delete(2));
        assert!(!manager.delete(2));
        assert!(manager.get_by_id(2).is_none());
        assert_eq!(manager.len(), 2);

        let new_task = manager.add("Four", None, None, None, None).unwrap();
        assert_eq!(new_task.id(), 4);
    }

    #[test]
    fn test_mark_complete_and_incomplete() {
        let mut manager = manager_with(&["Task"]);
        assert!(manager.mark_complete(1));
        assert!(manager.get_by_id(1).unwrap().completed());
        assert!(manager.mark_incomplete(1));
        assert!(!manager.get_by_id(1).unwrap().completed());
        assert!(!manager.mark_complete(9));
        assert!(!manager.mark_incomplete(9));
    }

    #[test]
    fn test_mark_complete_spawns_next_daily_occurrence() {
        let mut manager = TaskManager::new();
        let due = datetime(2023, 12, 25);
        manager
            .add(
                "Water plants",
                Some("high"),
                Some(vec!["home".to_string()]),
                Some(due),
                Some("daily"),
            )
            .unwrap();

        assert!(manager.mark_complete(1));
        assert_eq!(manager.len(), 2);

        let spawned = manager.get_by_id(2).unwrap();
        assert_eq!(spawned.description(), "Water plants");
        assert_eq!(spawned.priority(), Priority::High);
        assert_eq!(spawned.tags(), ["home"]);
        assert_eq!(spawned.recurrence(), Some(Recurrence::Daily));
        assert!(!spawned.completed());
        assert_eq!(spawned.due_date(), Some(datetime(2023, 12, 26)));
    }

    #[test]
    fn test_mark_complete_survives_uncomputable_next_occurrence() {
        let mut manager = TaskManager::new();
        manager.add("Edge of time", None, None, None, Some("daily")).unwrap();
        // Push the due date to the end of the representable range so the
        // +1 day arithmetic has nowhere to go.
        manager.get_by_id_mut(1).unwrap().set_due_date(Some(NaiveDateTime::MAX));

        assert!(manager.mark_complete(1));
        assert!(manager.get_by_id(1).unwrap().completed());
        // The failed reschedule is swallowed: no new task appears.
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_mark_complete_non_recurring_leaves_size_unchanged() {
        let mut manager = manager_with(&["One-off"]);
        assert!(manager.mark_complete(1));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_monthly_reschedule_clamps_end_of_month() {
        let mut manager = TaskManager::new();
        manager
            .add("Pay rent", None, None, Some(datetime(2023, 1, 31)), Some("monthly"))
            .unwrap();
        assert!(manager.mark_complete(1));
        assert_eq!(manager.get_by_id(2).unwrap().due_date(), Some(datetime(2023, 2, 28)));
    }

    #[test]
    fn test_reschedule_without_due_date_uses_now() {
        let mut manager = TaskManager::new();
        manager.add("Standup notes", None, None, None, Some("weekly")).unwrap();
        let source = manager.get_by_id(1).unwrap().clone();
        let spawned = manager.reschedule(&source).unwrap();

        let expected = (Local::now() + Duration::weeks(1)).date_naive();
        assert_eq!(spawned.due_date().unwrap().date(), expected);
    }

    #[test]
    fn test_reschedule_non_recurring_is_none() {
        let mut manager = manager_with(&["Plain"]);
        let source = manager.get_by_id(1).unwrap().clone();
        assert!(manager.reschedule(&source).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_search_empty_keyword_matches_nothing() {
        let manager = manager_with(&["Buy groceries"]);
        assert!(manager.search("").is_empty());
    }

    #[test]
    fn test_search_description_case_insensitive() {
        let manager = manager_with(&["Buy groceries", "Buy milk", "Call doctor"]);
        let results = manager.search("buy");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].description(), "Buy groceries");
        assert_eq!(results[1].description(), "Buy milk");
    }

    #[test]
    fn test_search_matches_tags_and_due_date() {
        let mut manager = TaskManager::new();
        manager
            .add("Report", None, Some(vec!["work".to_string()]), None, None)
            .unwrap();
        manager
            .add("Dentist", None, None, Some(datetime(2023, 11, 5)), None)
            .unwrap();

        assert_eq!(manager.search("WORK").len(), 1);
        assert_eq!(manager.search("2023-11").len(), 1);
        assert!(manager.search("2024").is_empty());
    }

    #[test]
    fn test_search_returns_each_task_once() {
        let mut manager = TaskManager::new();
        // Keyword hits the description, a tag, and the formatted due date.
        manager
            .add(
                "2023 retrospective",
                None,
                Some(vec!["2023".to_string()]),
                Some(datetime(2023, 12, 31)),
                None,
            )
            .unwrap();
        assert_eq!(manager.search("2023").len(), 1);
    }

    #[test]
    fn test_filter_by_status_with_synonyms() {
        let mut manager = manager_with(&["One", "Two", "Three"]);
        manager.mark_complete(2);

        for status in ["complete", "completed"] {
            let criteria =
                FilterCriteria { status: Some(status.to_string()), ..Default::default() };
            let results = manager.filter(&criteria);
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].id(), 2);
        }
        for status in ["incomplete", "pending"] {
            let criteria =
                FilterCriteria { status: Some(status.to_string()), ..Default::default() };
            assert_eq!(manager.filter(&criteria).len(), 2);
        }
    }

    #[test]
    fn test_filter_unrecognized_values_do_not_narrow() {
        let mut manager = manager_with(&["One", "Two"]);
        manager.mark_complete(1);
        let criteria = FilterCriteria {
            status: Some("done".to_string()),
            priority: Some("urgent".to_string()),
            ..Default::default()
        };
        assert_eq!(manager.filter(&criteria).len(), 2);
    }

    #[test]
    fn test_filter_by_priority() {
        let mut manager = TaskManager::new();
        manager.add("A", Some("high"), None, None, None).unwrap();
        manager.add("B", Some("low"), None, None, None).unwrap();
        manager.add("C", Some("high"), None, None, None).unwrap();

        let criteria =
            FilterCriteria { priority: Some("high".to_string()), ..Default::default() };
        let results = manager.filter(&criteria);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|t| t.priority() == Priority::High));
    }

    #[test]
    fn test_filter_by_due_date_ignores_time_and_undated() {
        let mut manager = TaskManager::new();
        manager.add("Morning", None, None, Some(datetime(2023, 12, 25)), None).unwrap();
        let evening = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap().and_hms_opt(18, 0, 0).unwrap();
        manager.add("Evening", None, None, Some(evening), None).unwrap();
        manager.add("Undated", None, None, None, None).unwrap();

        let criteria = FilterCriteria {
            due_date: NaiveDate::from_ymd_opt(2023, 12, 25),
            ..Default::default()
        };
        assert_eq!(manager.filter(&criteria).len(), 2);
    }

    #[test]
    fn test_filter_criteria_are_anded() {
        let mut manager = TaskManager::new();
        manager.add("A", Some("high"), None, None, None).unwrap();
        manager.add("B", Some("high"), None, None, None).unwrap();
        manager.mark_complete(1);

        let criteria = FilterCriteria {
            status: Some("complete".to_string()),
            priority: Some("high".to_string()),
            ..Default::default()
        };
        let results = manager.filter(&criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), 1);
    }

    #[test]
    fn test_sort_by_priority_is_stable() {
        let mut manager = TaskManager::new();
        manager.add("M", Some("medium"), None, None, None).unwrap();
        manager.add("H1", Some("high"), None, None, None).unwrap();
        manager.add("L", Some("low"), None, None, None).unwrap();
        manager.add("H2", Some("high"), None, None, None).unwrap();

        let sorted = manager.sort("priority", false).unwrap();
        let names: Vec<&str> = sorted.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["H1", "H2", "M", "L"]);

        let reversed = manager.sort("priority", true).unwrap();
        let names: Vec<&str> = reversed.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["L", "M", "H1", "H2"]);

        // The stored order is untouched.
        assert_eq!(manager.get_by_id(1).unwrap().description(), "M");
    }

    #[test]
    fn test_sort_by_due_date_keeps_undated_at_the_boundary() {
        let mut manager = TaskManager::new();
        manager.add("D1", None, None, Some(datetime(2023, 12, 25)), None).unwrap();
        manager.add("D2", None, None, Some(datetime(2023, 12, 24)), None).unwrap();
        manager.add("D3", None, None, Some(datetime(2023, 12, 26)), None).unwrap();
        manager.add("Undated", None, None, None, None).unwrap();

        let ascending = manager.sort("due_date", false).unwrap();
        let names: Vec<&str> = ascending.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["Undated", "D2", "D1", "D3"]);

        let descending = manager.sort("due_date", true).unwrap();
        let names: Vec<&str> = descending.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["D3", "D1", "D2", "Undated"]);
    }

    #[test]
    fn test_sort_by_title_case_insensitive() {
        let manager = manager_with(&["banana", "Apple", "cherry"]);
        let sorted = manager.sort("title", false).unwrap();
        let names: Vec<&str> = sorted.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_rejects_unknown_criteria() {
        let manager = manager_with(&["Task"]);
        assert_eq!(
            manager.sort("created", false).unwrap_err(),
            TaskError::InvalidSortCriteria("created".to_string())
        );
    }

    #[test]
    fn test_get_overdue_and_upcoming() {
        let today = Local::now().date_naive();
        let mut manager = TaskManager::new();
        manager
            .add("Late", None, None, Some((today - Duration::days(1)).and_hms_opt(9, 0, 0).unwrap()), None)
            .unwrap();
        manager
            .add("Today", None, None, Some(today.and_hms_opt(9, 0, 0).unwrap()), None)
            .unwrap();
        manager
            .add("Later", None, None, Some((today + Duration::days(3)).and_hms_opt(9, 0, 0).unwrap()), None)
            .unwrap();
        manager.add("Undated", None, None, None, None).unwrap();

        let overdue = manager.get_overdue();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].description(), "Late");

        let upcoming = manager.get_upcoming();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].description(), "Today");
    }

    #[test]
    fn test_clear_resets_the_id_sequence() {
        let mut manager = manager_with(&["One", "Two"]);
        manager.clear();
        assert!(manager.is_empty());
        assert_eq!(manager.next_id(), 1);
        let task = manager.add("Fresh", None, None, None, None).unwrap();
        assert_eq!(task.id(), 1);
    }
}
