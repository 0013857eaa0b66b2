use patch_helper::Patch;
use rocket::serde::{Deserialize, Serialize};

/// A single unit of work. `id` and `create_time` are assigned by the
/// store and excluded from the patch path, so updates can never touch
/// them.
#[derive(Patch, Deserialize, Serialize, Debug, Clone)]
#[patch_attrs(#[derive(Deserialize, Serialize, Debug, Default, Clone)])]
pub struct Task {
    #[no_patch]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub done: bool,
    #[no_patch]
    pub create_time: String,
}

/// Creation request body. `title` is optional at the parsing layer and
/// validated by the store; `description` defaults to empty.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Externally visible form of a task: the internal `id` is replaced by
/// the resource `uri`.
#[derive(Serialize, Debug, Clone)]
pub struct PublicTask {
    pub title: String,
    pub description: String,
    pub done: bool,
    pub create_time: String,
    pub uri: String,
}

impl From<&Task> for PublicTask {
    fn from(task: &Task) -> Self {
        PublicTask {
            title: task.title.clone(),
            description: task.description.clone(),
            done: task.done,
            create_time: task.create_time.clone(),
            uri: format!("/tasks/{}", task.id),
        }
    }
}
