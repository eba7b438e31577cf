//! Task matching
//!
//! Decides, for one cluster, whether its running tasks were built from the
//! repository named in a push event.
//!
//! Only the first running task's first container is ever inspected. A cluster
//! whose second task matches while the first does not is left alone, and a
//! first task that could not be described is never replaced by another one.

use super::event::PushEvent;
use super::image::{ImageReference, ImageReferenceError};
use super::task::Task;

/// Finds the details of the first running task among the described tasks
///
/// Descriptions may come back partial (a task that stopped in the meantime is
/// reported as a failure), so the lookup is by id rather than by position.
pub fn inspected_task<'a>(details: &'a [Task], first_task_id: &str) -> Option<&'a Task> {
    details.iter().find(|task| task.id == first_task_id)
}

/// Image reference the match decision is based on: the task's first container image
pub fn inspected_image(task: &Task) -> Option<&str> {
    task.container_images().next()
}

/// Parses the inspected image of the first running task
///
/// # Errors
/// - [`ImageReferenceError::Missing`] if the task was not described or has no containers
/// - [`ImageReferenceError::Malformed`] if the inspected image cannot be parsed
pub fn inspect(task: Option<&Task>) -> Result<ImageReference, ImageReferenceError> {
    let task = task.ok_or(ImageReferenceError::Missing(
        "first running task was not described",
    ))?;
    let image = inspected_image(task).ok_or(ImageReferenceError::Missing(
        "first running task has no containers",
    ))?;

    image.parse()
}

/// Exact, case-sensitive comparison against the pushed repository
pub fn repository_matches(repository_name: &str, event: &PushEvent) -> bool {
    repository_name == event.repository_name
}
