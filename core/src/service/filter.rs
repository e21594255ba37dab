use crate::domain::Task;

/// Case-insensitive substring match over title and description.
///
/// `needle_lower` must already be lowercased.
pub fn matches_search(task: &Task, needle_lower: &str) -> bool {
    task.title.to_lowercase().contains(needle_lower)
        || task.description.to_lowercase().contains(needle_lower)
}

/// Keep only tasks matching `search`. An empty term keeps everything.
pub fn filter_tasks(tasks: Vec<Task>, search: &str) -> Vec<Task> {
    if search.is_empty() {
        return tasks;
    }
    let needle = search.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| matches_search(t, &needle))
        .collect()
}
