use chrono::{DateTime, Utc};

use crate::errors::AppError;

pub trait Entity: Clone {
    fn id(&self) -> &str;
}

/// Records that can sit in a trash bin.
pub trait SoftDelete {
    fn mark_deleted(&mut self, at: DateTime<Utc>);
    fn clear_deleted(&mut self);
}

/// Ordered id -> entity collection. Listing order is newest first.
#[derive(Debug, Clone)]
pub struct Repository<T> {
    items: Vec<T>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Repository<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces a record in place, or inserts it at the head when the id is new.
    pub fn upsert(&mut self, entity: T) {
        match self.items.iter().position(|item| item.id() == entity.id()) {
            Some(index) => self.items[index] = entity,
            None => self.items.insert(0, entity),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A live repository paired with its trash bin. Records keep their id and
/// every field while trashed.
#[derive(Debug, Clone)]
pub struct TrashableRepository<T> {
    live: Repository<T>,
    trash: Repository<T>,
}

impl<T> Default for TrashableRepository<T> {
    fn default() -> Self {
        Self {
            live: Repository::default(),
            trash: Repository::default(),
        }
    }
}

impl<T: Entity + SoftDelete> TrashableRepository<T> {
    pub fn new(live: Vec<T>, trash: Vec<T>) -> Self {
        Self {
            live: Repository::from_vec(live),
            trash: Repository::from_vec(trash),
        }
    }

    pub fn live(&self) -> &Repository<T> {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut Repository<T> {
        &mut self.live
    }

    pub fn trash(&self) -> &Repository<T> {
        &self.trash
    }

    /// True while the id is held by a live or a trashed record.
    pub fn id_in_use(&self, id: &str) -> bool {
        self.live.contains(id) || self.trash.contains(id)
    }

    /// Moves every listed live record to the trash. Unknown ids are skipped.
    /// Nothing moves when a listed live id is already held by a trashed
    /// record.
    pub fn move_to_trash(&mut self, ids: &[String], at: DateTime<Utc>) -> Result<Vec<T>, AppError> {
        if let Some(id) = ids
            .iter()
            .find(|id| self.live.contains(id.as_str()) && self.trash.contains(id.as_str()))
        {
            return Err(AppError::Conflict(format!(
                "A trashed record with id {} already exists",
                id
            )));
        }

        let mut moved = Vec::new();
        for id in ids {
            if let Some(mut record) = self.live.remove(id) {
                record.mark_deleted(at);
                self.trash.upsert(record.clone());
                moved.push(record);
            }
        }
        Ok(moved)
    }

    /// First id in `ids` that is held by a trashed record.
    pub fn first_trashed<'a, I>(&self, ids: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().find(|id| self.trash.contains(id))
    }

    /// Moves a trashed record back to the live set after applying `edit`.
    /// Returns `Ok(None)` when the id is not in the trash.
    pub fn restore<F>(&mut self, id: &str, edit: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut T),
    {
        if !self.trash.contains(id) {
            return Ok(None);
        }
        if self.live.contains(id) {
            return Err(AppError::Conflict(format!(
                "A live record with id {} already exists",
                id
            )));
        }
        let Some(mut record) = self.trash.remove(id) else {
            return Ok(None);
        };
        edit(&mut record);
        record.clear_deleted();
        self.live.upsert(record.clone());
        Ok(Some(record))
    }

    pub fn purge(&mut self, id: &str) -> bool {
        self.trash.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: String,
        deleted_at: Option<DateTime<Utc>>,
    }

    impl Entity for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    impl SoftDelete for Item {
        fn mark_deleted(&mut self, at: DateTime<Utc>) {
            self.deleted_at = Some(at);
        }

        fn clear_deleted(&mut self) {
            self.deleted_at = None;
        }
    }

    fn item(id: &str, label: &str) -> Item {
        Item {
            id: id.to_string(),
            label: label.to_string(),
            deleted_at: None,
        }
    }

    #[test]
    fn upsert_inserts_at_head_and_replaces_in_place() {
        let mut repo = Repository::default();
        repo.upsert(item("a", "first"));
        repo.upsert(item("b", "second"));
        repo.upsert(item("a", "renamed"));

        let ids: Vec<&str> = repo.list().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(repo.get("a").map(|i| i.label.as_str()), Some("renamed"));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn remove_missing_id_is_none() {
        let mut repo: Repository<Item> = Repository::default();
        assert!(repo.remove("ghost").is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn trash_and_restore_cycle() {
        let mut repo = TrashableRepository::new(vec![item("a", "x"), item("b", "y")], vec![]);
        let moved = repo
            .move_to_trash(&["a".to_string(), "zzz".to_string()], Utc::now())
            .expect("no collision");
        assert_eq!(moved.len(), 1);
        assert!(!repo.live().contains("a"));
        assert!(repo.trash().get("a").and_then(|i| i.deleted_at).is_some());
        assert!(repo.id_in_use("a"));

        let restored = repo
            .restore("a", |i| i.label = "edited".to_string())
            .expect("no conflict")
            .expect("was trashed");
        assert_eq!(restored.label, "edited");
        assert!(restored.deleted_at.is_none());
        assert!(repo.trash().is_empty());
        assert_eq!(repo.live().list()[0].id, "a");
    }

    #[test]
    fn restore_conflict_leaves_trash_untouched() {
        let mut repo = TrashableRepository::new(vec![], vec![item("a", "old")]);
        repo.live_mut().upsert(item("a", "new"));

        let result = repo.restore("a", |_| {});
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.trash().get("a").map(|i| i.label.as_str()), Some("old"));
        assert_eq!(repo.live().get("a").map(|i| i.label.as_str()), Some("new"));
    }

    #[test]
    fn trashing_onto_a_trashed_id_moves_nothing() {
        let mut repo = TrashableRepository::new(
            vec![item("a", "new"), item("b", "other")],
            vec![item("a", "old")],
        );

        let result = repo.move_to_trash(&["b".to_string(), "a".to_string()], Utc::now());
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.trash().len(), 1);
        assert_eq!(repo.trash().get("a").map(|i| i.label.as_str()), Some("old"));
        assert_eq!(repo.live().len(), 2);
        assert_eq!(repo.first_trashed(["b", "a"]), Some("a"));
        assert_eq!(repo.first_trashed(["b"]), None);
    }

    #[test]
    fn purge_is_idempotent() {
        let mut repo = TrashableRepository::new(vec![], vec![item("a", "x")]);
        assert!(repo.purge("a"));
        assert!(!repo.purge("a"));
        assert!(!repo.id_in_use("a"));
    }
}
