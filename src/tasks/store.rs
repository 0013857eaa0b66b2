use chrono::Local;
use rocket::serde::{Deserialize, Serialize};

use super::models::{Task, TaskDraft, TaskPatch};
use crate::error::ApiError;

/// `create_time` format: date, time, UTC-offset.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// The single source of truth for tasks. Rows keep insertion order;
/// `next_id` is persisted alongside them so ids stay monotonic and are
/// never reused, not even after a delete.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct TaskTable {
    next_id: i32,
    tasks: Vec<Task>,
}

impl TaskTable {
    /// Validates before persisting: a draft without a non-empty title is
    /// rejected and leaves the table untouched.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, ApiError> {
        let title = match draft.title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ApiError::Validation("title")),
        };

        self.next_id += 1;
        let task = Task {
            id: self.next_id,
            title,
            description: draft.description.unwrap_or_default(),
            done: false,
            create_time: Local::now().format(TIME_FORMAT).to_string(),
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: i32) -> Result<&Task, ApiError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound)
    }

    /// Applies only the fields present in the patch; `id` and
    /// `create_time` are not reachable through this path.
    pub fn update(&mut self, id: i32, patch: TaskPatch) -> Result<Task, ApiError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound)?;
        task.update(patch);
        Ok(task.clone())
    }

    /// Deleting an absent id fails, also on the second delete of an id
    /// that existed before.
    pub fn delete(&mut self, id: i32) -> Result<(), ApiError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            Err(ApiError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_fills_defaults() {
        let mut table = TaskTable::default();
        let task = table.create(draft("Buy milk")).unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert!(!task.done);
        assert!(!task.create_time.is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn create_rejects_missing_or_empty_title() {
        let mut table = TaskTable::default();

        assert_matches!(
            table.create(TaskDraft::default()),
            Err(ApiError::Validation("title"))
        );
        assert_matches!(table.create(draft("")), Err(ApiError::Validation("title")));
        assert!(table.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut table = TaskTable::default();
        table.create(draft("a")).unwrap();
        let second = table.create(draft("b")).unwrap();
        assert_eq!(second.id, 2);

        table.delete(2).unwrap();
        let third = table.create(draft("c")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn get_is_a_direct_lookup() {
        let mut table = TaskTable::default();
        table.create(draft("a")).unwrap();
        table.create(draft("b")).unwrap();

        assert_eq!(table.get(2).unwrap().title, "b");
        assert_matches!(table.get(99), Err(ApiError::NotFound));
    }

    #[test]
    fn update_touches_only_present_fields() {
        let mut table = TaskTable::default();
        let created = table.create(draft("a")).unwrap();

        let updated = table.update(1, Task::patch().with_done(true)).unwrap();
        assert!(updated.done);
        assert_eq!(updated.title, "a");
        assert_eq!(updated.description, "");
        assert_eq!(updated.create_time, created.create_time);

        assert_matches!(
            table.update(99, TaskPatch::new()),
            Err(ApiError::NotFound)
        );
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut table = TaskTable::default();
        let created = table.create(draft("a")).unwrap();

        let updated = table.update(1, TaskPatch::new()).unwrap();
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.done, created.done);
        assert_eq!(updated.create_time, created.create_time);
    }

    #[test]
    fn delete_twice_fails_the_second_time() {
        let mut table = TaskTable::default();
        table.create(draft("a")).unwrap();

        assert!(table.delete(1).is_ok());
        assert_matches!(table.delete(1), Err(ApiError::NotFound));
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut table = TaskTable::default();
        table.create(draft("first")).unwrap();
        table.create(draft("second")).unwrap();
        table.create(draft("third")).unwrap();
        table.delete(2).unwrap();

        let titles: Vec<_> = table.list_all().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "third"]);
    }
}
