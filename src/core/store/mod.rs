//! Task and staff records, held in memory and mirrored to two JSON files.
//!
//! Every mutation rewrites the whole owning collection while holding the
//! store lock, so the file on disk always matches the in-memory state after a
//! successful call.

mod error;
pub mod types;

pub use error::{RecordKind, StoreError};
pub use types::{
    Priority, Staff, StaffCreate, StaffUpdate, Task, TaskCreate, TaskQuadrantUpdate, TaskStatus,
    TaskUpdate, Tristate,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const TASKS_FILE: &str = "tasks.json";
pub const STAFF_FILE: &str = "staff.json";

struct Collections {
    tasks: Vec<Task>,
    staff: Vec<Staff>,
    next_task_id: i64,
    next_staff_id: i64,
}

pub struct RecordStore {
    tasks_file: PathBuf,
    staff_file: PathBuf,
    inner: Mutex<Collections>,
}

impl RecordStore {
    /// Loads both collections from `data_dir`, creating the directory if needed.
    /// A missing file is an empty collection.
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|source| StoreError::PersistenceFailure {
                path: data_dir.to_path_buf(),
                source,
            })?;

        let tasks_file = data_dir.join(TASKS_FILE);
        let staff_file = data_dir.join(STAFF_FILE);
        let tasks: Vec<Task> = load_collection(&tasks_file).await?;
        let staff: Vec<Staff> = load_collection(&staff_file).await?;
        let next_task_id = next_id(tasks.iter().map(|t| t.id));
        let next_staff_id = next_id(staff.iter().map(|s| s.id));

        info!(
            "Record store loaded from {}: {} tasks, {} staff",
            data_dir.display(),
            tasks.len(),
            staff.len()
        );

        Ok(Self {
            tasks_file,
            staff_file,
            inner: Mutex::new(Collections {
                tasks,
                staff,
                next_task_id,
                next_staff_id,
            }),
        })
    }

    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    pub fn staff_file(&self) -> &Path {
        &self.staff_file
    }

    // --- Tasks ---

    pub async fn list_tasks(&self) -> Vec<Task> {
        self.inner.lock().await.tasks.clone()
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Task, id))
    }

    pub async fn create_task(&self, payload: TaskCreate) -> Result<Task, StoreError> {
        payload.validate()?;
        let mut inner = self.inner.lock().await;
        let id = inner.next_task_id;
        inner.next_task_id += 1;
        let task = payload.into_task(id);
        inner.tasks.push(task.clone());
        write_collection(&self.tasks_file, &inner.tasks).await?;
        debug!("Created task {} in quadrant {}", id, task.quadrant);
        Ok(task)
    }

    /// Applies only the fields present in `patch`.
    pub async fn update_task(&self, id: i64, patch: TaskUpdate) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().await;
        let index = task_index(&inner.tasks, id)?;
        patch.validate()?;
        patch.apply_to(&mut inner.tasks[index]);
        let updated = inner.tasks[index].clone();
        write_collection(&self.tasks_file, &inner.tasks).await?;
        debug!("Updated task {}", id);
        Ok(updated)
    }

    /// Moves a task to another board quadrant, leaving every other field alone.
    pub async fn move_task(&self, id: i64, quadrant: u8) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().await;
        let index = task_index(&inner.tasks, id)?;
        types::check_quadrant(quadrant)?;
        inner.tasks[index].quadrant = quadrant;
        let moved = inner.tasks[index].clone();
        write_collection(&self.tasks_file, &inner.tasks).await?;
        debug!("Moved task {} to quadrant {}", id, quadrant);
        Ok(moved)
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let index = task_index(&inner.tasks, id)?;
        inner.tasks.remove(index);
        write_collection(&self.tasks_file, &inner.tasks).await?;
        debug!("Deleted task {}", id);
        Ok(())
    }

    // --- Staff ---

    pub async fn list_staff(&self) -> Vec<Staff> {
        self.inner.lock().await.staff.clone()
    }

    /// Staff keyed by id, rebuilt on every call.
    pub async fn staff_by_id(&self) -> HashMap<i64, Staff> {
        let inner = self.inner.lock().await;
        inner.staff.iter().map(|s| (s.id, s.clone())).collect()
    }

    pub async fn get_staff(&self, id: i64) -> Result<Staff, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .staff
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Staff, id))
    }

    pub async fn create_staff(&self, payload: StaffCreate) -> Result<Staff, StoreError> {
        payload.validate()?;
        let mut inner = self.inner.lock().await;
        let id = inner.next_staff_id;
        inner.next_staff_id += 1;
        let staff = payload.into_staff(id);
        inner.staff.push(staff.clone());
        write_collection(&self.staff_file, &inner.staff).await?;
        debug!("Created staff {} ({})", id, staff.name);
        Ok(staff)
    }

    /// Merges `patch` into the record. Unset fields, photo references
    /// included, are preserved; `Null` clears.
    pub async fn update_staff(&self, id: i64, patch: StaffUpdate) -> Result<Staff, StoreError> {
        self.replace_staff(id, patch)
            .await
            .map(|(_, updated)| updated)
    }

    /// Like `update_staff`, but also returns the record as it was right
    /// before this merge. Concurrent updates each see their own predecessor.
    pub async fn replace_staff(
        &self,
        id: i64,
        patch: StaffUpdate,
    ) -> Result<(Staff, Staff), StoreError> {
        let mut inner = self.inner.lock().await;
        let index = staff_index(&inner.staff, id)?;
        patch.validate()?;
        let previous = inner.staff[index].clone();
        patch.apply_to(&mut inner.staff[index]);
        let updated = inner.staff[index].clone();
        write_collection(&self.staff_file, &inner.staff).await?;
        debug!("Updated staff {}", id);
        Ok((previous, updated))
    }

    /// Removes the record and returns it so the caller can clean up the
    /// photo files it referenced. Tasks owned by it are left untouched.
    pub async fn delete_staff(&self, id: i64) -> Result<Staff, StoreError> {
        let mut inner = self.inner.lock().await;
        let index = staff_index(&inner.staff, id)?;
        let removed = inner.staff.remove(index);
        write_collection(&self.staff_file, &inner.staff).await?;
        debug!("Deleted staff {}", id);
        Ok(removed)
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}

fn task_index(tasks: &[Task], id: i64) -> Result<usize, StoreError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| StoreError::not_found(RecordKind::Task, id))
}

fn staff_index(staff: &[Staff], id: i64) -> Result<usize, StoreError> {
    staff
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| StoreError::not_found(RecordKind::Staff, id))
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed UTF-8, non-ASCII written as-is. Plain overwrite.
async fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(records).map_err(|e| {
        StoreError::PersistenceFailure {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        }
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| StoreError::PersistenceFailure {
            path: path.to_path_buf(),
            source,
        })
}

/// Store backed by a fresh temporary directory. Keep the returned guard alive
/// for the duration of the test.
#[cfg(test)]
pub async fn test_store() -> (RecordStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = RecordStore::open(dir.path()).await.expect("open store");
    (store, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projection;

    async fn reload(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::open(dir.path()).await.expect("reopen store")
    }

    fn full_task(owner_id: i64) -> TaskCreate {
        TaskCreate {
            title: "Quarterly plan".into(),
            description: Some("Outline and budget".into()),
            owner_id,
            created_by: Some("Kato".into()),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 4, 1),
            status: TaskStatus::InProgress,
            department: Some("Ops".into()),
            priority: Priority::High,
            quadrant: 2,
        }
    }

    // --- Id allocation ---

    #[tokio::test]
    async fn ids_are_strictly_increasing_and_unique() {
        let (store, _dir) = test_store().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.create_task(TaskCreate::new(format!("t{i}"), 1)).await.unwrap().id);
        }
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        store.delete_task(5).await.unwrap();
        store.delete_task(2).await.unwrap();
        let next = store.create_task(TaskCreate::new("after", 1)).await.unwrap();
        assert_eq!(next.id, 6);

        let a = store.create_staff(StaffCreate::new("A")).await.unwrap();
        let b = store.create_staff(StaffCreate::new("B")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn counter_is_seeded_from_loaded_max() {
        let (store, dir) = test_store().await;
        for i in 0..3 {
            store.create_task(TaskCreate::new(format!("t{i}"), 1)).await.unwrap();
        }
        store.delete_task(3).await.unwrap();
        drop(store);

        // The deleted max id is handed out again after a restart.
        let store = reload(&dir).await;
        let task = store.create_task(TaskCreate::new("again", 1)).await.unwrap();
        assert_eq!(task.id, 3);
    }

    // --- Tasks ---

    #[tokio::test]
    async fn create_task_persists_and_returns_copy() {
        let (store, dir) = test_store().await;
        let created = store.create_task(full_task(1)).await.unwrap();
        assert_eq!(created.due_date.as_deref(), Some("2025-04-01"));
        assert_eq!(store.get_task(created.id).await.unwrap(), created);

        let reloaded = reload(&dir).await;
        assert_eq!(reloaded.list_tasks().await, vec![created]);
    }

    #[tokio::test]
    async fn create_task_rejects_invalid_payload_without_consuming_id() {
        let (store, _dir) = test_store().await;
        let mut bad = TaskCreate::new("t", 1);
        bad.quadrant = 0;
        assert!(matches!(
            store.create_task(bad).await,
            Err(StoreError::ValidationFailed(_))
        ));
        assert!(store.list_tasks().await.is_empty());
        let ok = store.create_task(TaskCreate::new("t", 1)).await.unwrap();
        assert_eq!(ok.id, 1);
    }

    #[tokio::test]
    async fn update_task_merges_present_fields_only() {
        let (store, _dir) = test_store().await;
        let created = store.create_task(full_task(1)).await.unwrap();

        let patch: TaskUpdate =
            serde_json::from_str(r#"{"title": "Renamed", "description": null, "due_date": "2025-05-02"}"#)
                .unwrap();
        let updated = store.update_task(created.id, patch).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.due_date.as_deref(), Some("2025-05-02"));
        assert_eq!(updated.created_by, created.created_by);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.priority, created.priority);
        assert_eq!(updated.quadrant, created.quadrant);
        assert_eq!(updated.department, created.department);
    }

    #[tokio::test]
    async fn empty_update_is_a_noop() {
        let (store, _dir) = test_store().await;
        let task = store.create_task(full_task(1)).await.unwrap();
        let staff = store.create_staff(StaffCreate::new("Sato")).await.unwrap();

        let after = store.update_task(task.id, TaskUpdate::default()).await.unwrap();
        assert_eq!(after, task);
        let after = store.update_staff(staff.id, StaffUpdate::default()).await.unwrap();
        assert_eq!(after, staff);
    }

    #[tokio::test]
    async fn move_task_changes_only_quadrant() {
        let (store, dir) = test_store().await;
        let before = store.create_task(full_task(1)).await.unwrap();
        let moved = store.move_task(before.id, 4).await.unwrap();

        assert_eq!(moved.quadrant, 4);
        assert_eq!(Task { quadrant: before.quadrant, ..moved.clone() }, before);
        assert_eq!(reload(&dir).await.get_task(before.id).await.unwrap(), moved);
    }

    #[tokio::test]
    async fn move_task_out_of_range_is_rejected() {
        let (store, _dir) = test_store().await;
        let task = store.create_task(full_task(1)).await.unwrap();
        for quadrant in [0, 5] {
            assert!(matches!(
                store.move_task(task.id, quadrant).await,
                Err(StoreError::ValidationFailed(_))
            ));
        }
        assert_eq!(store.get_task(task.id).await.unwrap().quadrant, 2);
    }

    #[tokio::test]
    async fn unknown_ids_fail_with_not_found_and_change_nothing() {
        let (store, dir) = test_store().await;
        store.create_task(full_task(1)).await.unwrap();
        store.create_staff(StaffCreate::new("Sato")).await.unwrap();
        let tasks = store.list_tasks().await;
        let staff = store.list_staff().await;

        assert!(store.get_task(99).await.unwrap_err().is_not_found());
        assert!(store.get_staff(99).await.unwrap_err().is_not_found());
        assert!(store.update_task(99, TaskUpdate::default()).await.unwrap_err().is_not_found());
        assert!(store.update_staff(99, StaffUpdate::default()).await.unwrap_err().is_not_found());
        assert!(store.move_task(99, 3).await.unwrap_err().is_not_found());
        assert!(store.delete_task(99).await.unwrap_err().is_not_found());
        assert!(store.delete_staff(99).await.unwrap_err().is_not_found());

        assert_eq!(store.list_tasks().await, tasks);
        assert_eq!(store.list_staff().await, staff);
        let reloaded = reload(&dir).await;
        assert_eq!(reloaded.list_tasks().await, tasks);
        assert_eq!(reloaded.list_staff().await, staff);
    }

    #[tokio::test]
    async fn delete_task_persists_removal() {
        let (store, dir) = test_store().await;
        let a = store.create_task(TaskCreate::new("a", 1)).await.unwrap();
        let b = store.create_task(TaskCreate::new("b", 1)).await.unwrap();
        store.delete_task(a.id).await.unwrap();
        assert_eq!(reload(&dir).await.list_tasks().await, vec![b]);
    }

    // --- Staff ---

    #[tokio::test]
    async fn create_staff_omits_unset_fields_on_disk() {
        let (store, dir) = test_store().await;
        let mut payload = StaffCreate::new("Sato");
        payload.photo = Tristate::Set("sato.png".into());
        store.create_staff(payload).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(STAFF_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": 1, "name": "Sato", "photo": "sato.png"}])
        );
    }

    #[tokio::test]
    async fn update_staff_without_photo_fields_preserves_photos() {
        let (store, dir) = test_store().await;
        let payload = StaffCreate {
            name: "Sato".into(),
            department: Tristate::Set("Sales".into()),
            photo: Tristate::Set("base.png".into()),
            photo_q1: Tristate::Set("q1.png".into()),
            photo_q2: Tristate::Set("q2.png".into()),
            photo_q3: Tristate::Set("q3.png".into()),
            photo_q4: Tristate::Set("q4.png".into()),
        };
        let created = store.create_staff(payload).await.unwrap();

        let patch = StaffUpdate {
            name: Tristate::Set("Sato Y.".into()),
            department: Tristate::Null,
            ..StaffUpdate::default()
        };
        let updated = store.update_staff(created.id, patch).await.unwrap();

        assert_eq!(updated.name, "Sato Y.");
        assert_eq!(updated.department, Tristate::Null);
        assert_eq!(updated.photo_files(), created.photo_files());
        assert_eq!(reload(&dir).await.get_staff(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn explicit_null_clears_a_photo() {
        let (store, _dir) = test_store().await;
        let mut payload = StaffCreate::new("Sato");
        payload.photo = Tristate::Set("base.png".into());
        let created = store.create_staff(payload).await.unwrap();

        let patch = StaffUpdate {
            photo: Tristate::Null,
            ..StaffUpdate::default()
        };
        let updated = store.update_staff(created.id, patch).await.unwrap();
        assert_eq!(updated.photo, Tristate::Null);
        assert!(updated.photo_files().is_empty());
    }

    #[tokio::test]
    async fn delete_staff_returns_record_and_leaves_tasks() {
        let (store, _dir) = test_store().await;
        let staff = store.create_staff(StaffCreate::new("Sato")).await.unwrap();
        let task = store.create_task(TaskCreate::new("owned", staff.id)).await.unwrap();

        let removed = store.delete_staff(staff.id).await.unwrap();
        assert_eq!(removed, staff);
        assert_eq!(store.list_tasks().await, vec![task]);
    }

    #[tokio::test]
    async fn reload_round_trips_both_collections() {
        let (store, dir) = test_store().await;
        let mut staff = StaffCreate::new("渡辺");
        staff.department = Tristate::Set("営業".into());
        store.create_staff(staff).await.unwrap();
        store.create_task(full_task(1)).await.unwrap();
        store.create_task(TaskCreate::new("締め切り", 1)).await.unwrap();
        store.move_task(2, 3).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(STAFF_FILE)).unwrap();
        assert!(raw.contains("渡辺"));

        let reloaded = reload(&dir).await;
        assert_eq!(reloaded.list_tasks().await, store.list_tasks().await);
        assert_eq!(reloaded.list_staff().await, store.list_staff().await);
    }

    #[tokio::test]
    async fn loads_records_with_missing_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TASKS_FILE),
            r#"[{"id": 7, "title": "legacy", "owner_id": 2}]"#,
        )
        .unwrap();
        let store = RecordStore::open(dir.path()).await.unwrap();
        let task = store.get_task(7).await.unwrap();
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.quadrant, 1);
        assert_eq!(task.due_date, None);
        assert_eq!(store.create_task(TaskCreate::new("n", 2)).await.unwrap().id, 8);
    }

    #[tokio::test]
    async fn corrupt_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STAFF_FILE), "{not json").unwrap();
        assert!(matches!(
            RecordStore::open(dir.path()).await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn replace_staff_returns_the_immediate_predecessor() {
        let (store, _dir) = test_store().await;
        let mut payload = StaffCreate::new("Sato");
        payload.photo = Tristate::Set("v0.png".into());
        store.create_staff(payload).await.unwrap();

        for (from, to) in [("v0.png", "v1.png"), ("v1.png", "v2.png")] {
            let patch = StaffUpdate {
                photo: Tristate::Set(to.into()),
                ..StaffUpdate::default()
            };
            let (previous, updated) = store.replace_staff(1, patch).await.unwrap();
            assert_eq!(previous.photo, Tristate::Set(from.to_string()));
            assert_eq!(updated.photo, Tristate::Set(to.to_string()));
        }
    }

    // --- Concurrency and persistence ---

    #[tokio::test]
    async fn concurrent_mutations_never_interleave() {
        let (store, dir) = test_store().await;
        let store = std::sync::Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..24 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_task(TaskCreate::new(format!("task {i}"), 1))
                    .await
                    .unwrap()
                    .id
            }));
        }
        let mut staff_handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            staff_handles.push(tokio::spawn(async move {
                store
                    .create_staff(StaffCreate::new(format!("staff {i}")))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut task_ids = Vec::new();
        for handle in handles {
            task_ids.push(handle.await.unwrap());
        }
        let mut staff_ids = Vec::new();
        for handle in staff_handles {
            staff_ids.push(handle.await.unwrap());
        }
        task_ids.sort_unstable();
        staff_ids.sort_unstable();
        assert_eq!(task_ids, (1..=24).collect::<Vec<i64>>());
        assert_eq!(staff_ids, (1..=8).collect::<Vec<i64>>());

        // Moves racing with more creates.
        let mut handles = Vec::new();
        for id in 1..=24i64 {
            let mover = store.clone();
            handles.push(tokio::spawn(async move {
                mover.move_task(id, (id % 4 + 1) as u8).await.unwrap();
            }));
            let creator = store.clone();
            handles.push(tokio::spawn(async move {
                creator.create_task(TaskCreate::new("late", 2)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let tasks = store.list_tasks().await;
        let mut ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=48).collect::<Vec<i64>>());
        for task in tasks.iter().filter(|t| t.id <= 24) {
            assert_eq!(task.quadrant, (task.id % 4 + 1) as u8);
        }

        let reloaded = reload(&dir).await;
        assert_eq!(reloaded.list_tasks().await, tasks);
        assert_eq!(reloaded.list_staff().await, store.list_staff().await);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_ahead_until_next_write() {
        let (store, dir) = test_store().await;
        store.create_task(TaskCreate::new("first", 1)).await.unwrap();

        // A directory in place of the file makes the next write fail.
        let tasks_path = dir.path().join(TASKS_FILE);
        std::fs::remove_file(&tasks_path).unwrap();
        std::fs::create_dir(&tasks_path).unwrap();

        let err = store
            .create_task(TaskCreate::new("second", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PersistenceFailure { .. }));
        let titles: Vec<String> = store.list_tasks().await.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert!(tasks_path.is_dir());

        std::fs::remove_dir(&tasks_path).unwrap();
        let third = store.create_task(TaskCreate::new("third", 1)).await.unwrap();
        assert_eq!(third.id, 3);

        let reloaded = reload(&dir).await;
        let titles: Vec<String> = reloaded
            .list_tasks()
            .await
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn sato_draft_review_scenario() {
        let (store, _dir) = test_store().await;
        let sato = store.create_staff(StaffCreate::new("Sato")).await.unwrap();
        assert_eq!(sato.id, 1);

        let mut payload = TaskCreate::new("Draft review", 1);
        payload.quadrant = 2;
        let task = store.create_task(payload).await.unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.priority, Priority::Medium);

        let moved = store.move_task(1, 1).await.unwrap();
        assert_eq!(moved.quadrant, 1);
        assert_eq!(moved.title, "Draft review");

        store.delete_staff(1).await.unwrap();
        let views =
            projection::project_tasks(store.list_tasks().await, &store.staff_by_id().await);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].task.id, 1);
        assert!(views[0].owner.is_none());
    }
}
