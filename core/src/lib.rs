pub mod error;
pub mod manager;
pub mod model;
pub mod time;

pub use error::TaskError;
pub use manager::{FilterCriteria, TaskManager};
pub use model::task::{Priority, Recurrence, Task, TaskRecord};
pub use time::{next_occurrence, parse_date};
