//! Search filter.

use crate::domain::Task;

/// Case-insensitive substring match on title, or on description when present.
/// An empty needle matches everything.
pub fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}
