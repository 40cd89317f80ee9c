mod commands;
mod format;
mod repl;

use anyhow::Result;
use clap::Parser;
use todo_core::TaskManager;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "A command-line todo list manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description
        #[arg(required = true)]
        description: Vec<String>,
        /// Task priority (high/medium/low)
        #[arg(long)]
        priority: Option<String>,
        /// Comma-separated tags (e.g., work,urgent)
        #[arg(long)]
        tags: Option<String>,
        /// Due date in YYYY-MM-DD format
        #[arg(long = "due-date")]
        due_date: Option<String>,
        /// Recurrence pattern (daily/weekly/monthly)
        #[arg(long)]
        recurrence: Option<String>,
    },
    /// View all tasks
    View,
    /// Mark a task as complete
    Complete { task_id: u32 },
    /// Mark a task as incomplete
    Incomplete { task_id: u32 },
    /// Update a task description
    Update {
        task_id: u32,
        /// New task description
        #[arg(required = true)]
        new_description: Vec<String>,
    },
    /// Delete a task
    Delete { task_id: u32 },
    /// Search tasks by keyword
    Search { keyword: String },
    /// Filter tasks by criteria
    Filter {
        /// Filter by completion status (complete/incomplete/completed/pending)
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority level (high/medium/low)
        #[arg(long)]
        priority: Option<String>,
        /// Filter by due date in YYYY-MM-DD format
        #[arg(long = "due-date")]
        due_date: Option<String>,
    },
    /// Sort tasks by criteria
    Sort {
        /// Sort by criteria: priority, due_date, or title
        #[arg(long)]
        by: String,
        /// Reverse sort order
        #[arg(long)]
        reverse: bool,
    },
    /// Show overdue tasks
    Overdue,
    /// Show tasks due today
    Upcoming,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut manager = TaskManager::new();

    match cli.command {
        Some(command) => {
            tracing::debug!(?command, "dispatching");
            run_command(&mut manager, command);
        }
        None => {
            // No subcommand: drop into the interactive session.
            repl::run(&mut manager)?;
        }
    }
    Ok(())
}

fn run_command(manager: &mut TaskManager, command: Commands) {
    match command {
        Commands::Add { description, priority, tags, due_date, recurrence } => {
            commands::add(
                manager,
                &description.join(" "),
                priority.as_deref(),
                tags.as_deref(),
                due_date.as_deref(),
                recurrence.as_deref(),
            );
        }
        Commands::View => commands::view(manager),
        Commands::Complete { task_id } => commands::complete(manager, task_id),
        Commands::Incomplete { task_id } => commands::incomplete(manager, task_id),
        Commands::Update { task_id, new_description } => {
            commands::update(manager, task_id, &new_description.join(" "));
        }
        Commands::Delete { task_id } => commands::delete(manager, task_id),
        Commands::Search { keyword } => commands::search(manager, &keyword),
        Commands::Filter { status, priority, due_date } => {
            commands::filter(manager, status.as_deref(), priority.as_deref(), due_date.as_deref());
        }
        Commands::Sort { by, reverse } => commands::sort(manager, &by, reverse),
        Commands::Overdue => commands::overdue(manager),
        Commands::Upcoming => commands::upcoming(manager),
    }
}
