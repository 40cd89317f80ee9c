//! Command handlers shared by the argument-mode dispatcher and the
//! interactive prompt. Each handler validates user-facing syntax, calls into
//! the engine, and prints the outcome; the engine itself never prints.

use todo_core::{parse_date, FilterCriteria, Priority, Recurrence, TaskManager};

/// Split a comma-separated tag string, dropping empty segments.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

pub fn add(
    manager: &mut TaskManager,
    description: &str,
    priority: Option<&str>,
    tags: Option<&str>,
    due_date: Option<&str>,
    recurrence: Option<&str>,
) {
    if let Some(p) = priority {
        if !Priority::VALUES.contains(&p) {
            println!("Error: Priority must be one of: {}", Priority::VALUES.join(", "));
            return;
        }
    }
    if let Some(r) = recurrence {
        if !Recurrence::VALUES.contains(&r) {
            println!("Error: Recurrence must be one of: {}", Recurrence::VALUES.join(", "));
            return;
        }
    }
    let parsed_due = match due_date {
        Some(raw) => match parse_date(raw) {
            Some(d) => Some(d),
            None => {
                println!("Error: Invalid date format: {}. Use YYYY-MM-DD format.", raw);
                return;
            }
        },
        None => None,
    };

    let tags = tags.map(split_tags);
    match manager.add(description, priority, tags, parsed_due, recurrence) {
        Ok(task) => println!("Added task #{}: {}", task.id(), task.description()),
        Err(e) => println!("Error: {}", e),
    }
}

pub fn view(manager: &TaskManager) {
    let tasks = manager.get_all();
    if tasks.is_empty() {
        println!("No tasks in the list");
    } else {
        println!("{}", crate::format::render_tasks(&tasks));
    }
}

pub fn complete(manager: &mut TaskManager, task_id: u32) {
    if manager.mark_complete(task_id) {
        println!("Task #{} marked as complete", task_id);
    } else {
        println!("Error: Task with ID {} does not exist", task_id);
    }
}

pub fn incomplete(manager: &mut TaskManager, task_id: u32) {
    if manager.mark_incomplete(task_id) {
        println!("Task #{} marked as incomplete", task_id);
    } else {
        println!("Error: Task with ID {} does not exist", task_id);
    }
}

pub fn update(manager: &mut TaskManager, task_id: u32, new_description: &str) {
    match manager.update(task_id, new_description) {
        Ok(true) => println!("Task #{} updated to: {}", task_id, new_description),
        Ok(false) => println!("Error: Task with ID {} does not exist", task_id),
        Err(e) => println!("Error: {}", e),
    }
}

pub fn delete(manager: &mut TaskManager, task_id: u32) {
    if manager.delete(task_id) {
        println!("Task #{} deleted", task_id);
    } else {
        println!("Error: Task with ID {} does not exist", task_id);
    }
}

pub fn set_priority(manager: &mut TaskManager, task_id: u32, priority: &str) {
    match manager.get_by_id_mut(task_id) {
        Some(task) => match task.set_priority(priority) {
            Ok(()) => println!("Task #{} priority set to {}", task_id, priority),
            Err(e) => println!("Error: {}", e),
        },
        None => println!("Error: Task with ID {} does not exist", task_id),
    }
}

pub fn tag_add(manager: &mut TaskManager, task_id: u32, tag: &str) {
    match manager.get_by_id_mut(task_id) {
        Some(task) => {
            if task.tags().iter().any(|t| t == tag) {
                println!("Tag '{}' already exists on task #{}", tag, task_id);
            } else {
                let mut tags = task.tags().to_vec();
                tags.push(tag.to_string());
                task.set_tags(Some(tags));
                println!("Tag '{}' added to task #{}", tag, task_id);
            }
        }
        None => println!("Error: Task with ID {} does not exist", task_id),
    }
}

pub fn tag_remove(manager: &mut TaskManager, task_id: u32, tag: &str) {
    match manager.get_by_id_mut(task_id) {
        Some(task) => {
            if task.tags().iter().any(|t| t == tag) {
                let tags: Vec<String> =
                    task.tags().iter().filter(|t| *t != tag).cloned().collect();
                task.set_tags(Some(tags));
                println!("Tag '{}' removed from task #{}", tag, task_id);
            } else {
                println!("Tag '{}' does not exist on task #{}", tag, task_id);
            }
        }
        None => println!("Error: Task with ID {} does not exist", task_id),
    }
}

pub fn search(manager: &TaskManager, keyword: &str) {
    let results = manager.search(keyword);
    if results.is_empty() {
        println!("No tasks found containing '{}'", keyword);
    } else {
        println!("{}", crate::format::render_tasks(&results));
    }
}

pub fn filter(
    manager: &TaskManager,
    status: Option<&str>,
    priority: Option<&str>,
    due_date: Option<&str>,
) {
    let parsed_due = match due_date {
        Some(raw) => match parse_date(raw) {
            Some(d) => Some(d.date()),
            None => {
                println!("Error: Invalid date format: {}. Use YYYY-MM-DD format.", raw);
                return;
            }
        },
        None => None,
    };

    let criteria = FilterCriteria {
        status: status.map(|s| s.to_string()),
        priority: priority.map(|p| p.to_string()),
        due_date: parsed_due,
    };
    let results = manager.filter(&criteria);
    if results.is_empty() {
        println!("No tasks match the filter criteria");
    } else {
        println!("{}", crate::format::render_tasks(&results));
    }
}

pub fn sort(manager: &TaskManager, by: &str, reverse: bool) {
    match manager.sort(by, reverse) {
        Ok(results) => {
            if results.is_empty() {
                println!("No tasks to sort");
            } else {
                println!("{}", crate::format::render_tasks(&results));
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

pub fn overdue(manager: &TaskManager) {
    let results = manager.get_overdue();
    if results.is_empty() {
        println!("No overdue tasks");
    } else {
        println!("{}", crate::format::render_tasks(&results));
    }
}

pub fn upcoming(manager: &TaskManager) {
    let results = manager.get_upcoming();
    if results.is_empty() {
        println!("No upcoming tasks");
    } else {
        println!("{}", crate::format::render_tasks(&results));
    }
}
