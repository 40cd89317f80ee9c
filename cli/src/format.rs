use tabled::settings::Style;
use tabled::{Table, Tabled};
use todo_core::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Recurrence")]
    recurrence: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Render tasks as a table. Overdue and due-today tasks get a marker in
/// front of the description so they stand out without a dedicated column.
pub fn render_tasks(tasks: &[Task]) -> String {
    let rows: Vec<TaskRow> = tasks.iter().map(row_for).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn row_for(task: &Task) -> TaskRow {
    let description = if task.is_overdue() {
        format!("[OVERDUE] {}", task.description())
    } else if task.is_upcoming() {
        format!("[DUE SOON] {}", task.description())
    } else {
        task.description().to_string()
    };

    TaskRow {
        id: task.id(),
        status: if task.completed() { "Complete" } else { "Incomplete" },
        priority: task.priority().to_string(),
        tags: task.tags().join(","),
        due: task
            .due_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        recurrence: task
            .recurrence()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string()),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use todo_core::TaskManager;

    #[test]
    fn test_render_includes_fields() {
        let mut manager = TaskManager::new();
        manager
            .add(
                "Write report",
                Some("high"),
                Some(vec!["work".to_string(), "urgent".to_string()]),
                None,
                Some("weekly"),
            )
            .unwrap();

        let rendered = render_tasks(&manager.get_all());
        assert!(rendered.contains("Write report"));
        assert!(rendered.contains("high"));
        assert!(rendered.contains("work,urgent"));
        assert!(rendered.contains("weekly"));
        assert!(rendered.contains("Incomplete"));
    }

    #[test]
    fn test_render_marks_overdue() {
        let yesterday = (Local::now().date_naive() - Duration::days(1))
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut manager = TaskManager::new();
        manager.add("Late thing", None, None, Some(yesterday), None).unwrap();

        let rendered = render_tasks(&manager.get_all());
        assert!(rendered.contains("[OVERDUE] Late thing"));
    }

    #[test]
    fn test_render_marks_due_today() {
        let today = Local::now().date_naive().and_hms_opt(23, 0, 0).unwrap();
        let mut manager = TaskManager::new();
        manager.add("Today thing", None, None, Some(today), None).unwrap();

        let rendered = render_tasks(&manager.get_all());
        assert!(rendered.contains("[DUE SOON] Today thing"));
    }
}
