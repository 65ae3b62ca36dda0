//! Domain model: task entity, history entries, recorder and errors.

pub mod errors;
pub mod history;
pub mod ids;
pub mod priority;
pub mod recorder;
pub mod status;
pub mod task;

pub use errors::{Operation, StoreError, TaskError, ValidationError};
pub use history::{FieldChange, HistoryEntry};
pub use ids::{ParseTaskIdError, TaskId};
pub use priority::{ParsePriorityError, Priority};
pub use recorder::{ProposedChanges, record_changes};
pub use status::TaskStatus;
pub use task::{NewTask, Task, normalize_description, validate_title};
