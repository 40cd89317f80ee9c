use thiserror::Error;

/// Error taxonomy for the task model and collection engine.
///
/// Validation errors are returned before any mutation takes place. Lookups
/// addressed by id report a missing task as `false`/`None` on the primary
/// path; `NotFound` only surfaces from the `get_by_id_or_err` convenience.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task description cannot be empty or contain only whitespace")]
    InvalidDescription,

    #[error("priority must be one of: high, medium, low (got '{0}')")]
    InvalidPriority(String),

    #[error("recurrence must be one of: daily, weekly, monthly (got '{0}')")]
    InvalidRecurrence(String),

    #[error("invalid sort criteria '{0}': valid options are 'priority', 'due_date', 'title'")]
    InvalidSortCriteria(String),

    #[error("task with ID {0} does not exist")]
    NotFound(u32),
}
