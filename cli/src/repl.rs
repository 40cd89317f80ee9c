//! Interactive prompt loop, used when the binary is started without a
//! subcommand. Commands mirror the argument-mode surface plus a few that
//! only make sense in a live session (priority, tag add/remove).

use std::io::{self, BufRead, Write};

use anyhow::Result;
use todo_core::{Priority, TaskManager};

use crate::commands;

const HELP: &str = "Available commands:
  add [task description]     - Add a new task
  view                       - View all tasks
  complete [task_id]         - Mark a task as complete
  incomplete [task_id]       - Mark a task as incomplete
  update [task_id] [new description] - Update task description
  delete [task_id]           - Delete a task
  priority [task_id] [low|medium|high] - Set task priority
  tag add [task_id] [tag]    - Add tag to task
  tag remove [task_id] [tag] - Remove tag from task
  search [keyword]           - Search tasks by keyword
  filter [options]           - Filter tasks (use --status or --priority)
  sort [priority|alpha]      - Sort tasks by priority or alphabetically
  overdue                    - Show overdue tasks
  upcoming                   - Show tasks due today
  help                       - Show this help message
  exit or quit               - Exit the application
";

pub fn run(manager: &mut TaskManager) -> Result<()> {
    println!("Welcome to the Todo App!");
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("todo> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!("\nGoodbye!");
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !dispatch(manager, line) {
            println!("Goodbye!");
            break;
        }
    }
    Ok(())
}

/// Execute one interactive command. Returns `false` when the session should
/// end.
fn dispatch(manager: &mut TaskManager, line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = parts[0].to_lowercase();

    match command.as_str() {
        "exit" | "quit" => return false,
        "help" => println!("{}", HELP),
        "add" => {
            if parts.len() < 2 {
                println!("Error: Please provide a task description. Usage: add [task description]");
            } else {
                let description = parts[1..].join(" ");
                commands::add(manager, &description, None, None, None, None);
            }
        }
        "view" => commands::view(manager),
        "complete" => {
            if let Some(id) = parse_id(&parts, "complete [task_id]") {
                commands::complete(manager, id);
            }
        }
        "incomplete" => {
            if let Some(id) = parse_id(&parts, "incomplete [task_id]") {
                commands::incomplete(manager, id);
            }
        }
        "update" => {
            if parts.len() < 3 {
                println!("Error: Please provide a task ID and new description. Usage: update [task_id] [new description]");
            } else if let Some(id) = parse_id_str(parts[1]) {
                let description = parts[2..].join(" ");
                commands::update(manager, id, &description);
            }
        }
        "delete" => {
            if let Some(id) = parse_id(&parts, "delete [task_id]") {
                commands::delete(manager, id);
            }
        }
        "priority" => {
            if parts.len() != 3 {
                println!("Error: Please provide task ID and priority. Usage: priority [task_id] [low|medium|high]");
            } else if let Some(id) = parse_id_str(parts[1]) {
                let priority = parts[2].to_lowercase();
                if !Priority::VALUES.contains(&priority.as_str()) {
                    println!("Error: Priority must be one of: low, medium, high");
                } else {
                    commands::set_priority(manager, id, &priority);
                }
            }
        }
        "tag" => {
            if parts.len() < 4 {
                println!("Error: Please provide tag action, task ID, and tag. Usage: tag add [task_id] [tag] or tag remove [task_id] [tag]");
            } else {
                let action = parts[1].to_lowercase();
                if action != "add" && action != "remove" {
                    println!("Error: Tag action must be 'add' or 'remove'");
                } else if let Some(id) = parse_id_str(parts[2]) {
                    if action == "add" {
                        commands::tag_add(manager, id, parts[3]);
                    } else {
                        commands::tag_remove(manager, id, parts[3]);
                    }
                }
            }
        }
        "search" => {
            if parts.len() < 2 {
                println!("Error: Please provide a keyword to search for. Usage: search [keyword]");
            } else {
                let keyword = parts[1..].join(" ");
                commands::search(manager, &keyword);
            }
        }
        "filter" => {
            if let Some((status, priority)) = parse_filter_options(&parts[1..]) {
                commands::filter(manager, status.as_deref(), priority.as_deref(), None);
            }
        }
        "sort" => {
            if parts.len() < 2 {
                println!("Error: Please provide sort criteria. Usage: sort [priority|alpha]");
            } else {
                match parts[1].to_lowercase().as_str() {
                    "priority" => commands::sort(manager, "priority", false),
                    "alpha" => commands::sort(manager, "title", false),
                    _ => println!("Error: Sort criteria must be 'priority' or 'alpha'"),
                }
            }
        }
        "overdue" => commands::overdue(manager),
        "upcoming" => commands::upcoming(manager),
        _ => println!("Error: Unknown command '{}'. Type 'help' for available commands.", command),
    }
    true
}

fn parse_id(parts: &[&str], usage: &str) -> Option<u32> {
    if parts.len() != 2 {
        println!("Error: Please provide a task ID. Usage: {}", usage);
        return None;
    }
    parse_id_str(parts[1])
}

fn parse_id_str(raw: &str) -> Option<u32> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            println!("Error: Task ID must be a number");
            None
        }
    }
}

/// Parse `--status X` / `--priority Y` pairs, validating the values the way
/// the prompt documents them. Returns `None` after printing an error.
fn parse_filter_options(args: &[&str]) -> Option<(Option<String>, Option<String>)> {
    let mut status = None;
    let mut priority = None;
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--status" if i + 1 < args.len() => {
                let value = args[i + 1].to_lowercase();
                if !["complete", "incomplete", "completed", "pending"].contains(&value.as_str()) {
                    println!("Error: Status must be one of: complete, incomplete, completed, pending");
                    return None;
                }
                status = Some(value);
                i += 2;
            }
            "--priority" if i + 1 < args.len() => {
                let value = args[i + 1].to_lowercase();
                if !Priority::VALUES.contains(&value.as_str()) {
                    println!("Error: Priority must be one of: low, medium, high");
                    return None;
                }
                priority = Some(value);
                i += 2;
            }
            _ => {
                println!("Error: Unknown filter option. Use --status or --priority");
                return None;
            }
        }
    }
    Some((status, priority))
}
