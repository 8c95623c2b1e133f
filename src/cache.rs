//! In-memory entity caches keyed by record id.
//!
//! A cache lives as long as the [`ClientState`](crate::state::ClientState)
//! that owns it. It has no TTL and no eviction: it only grows through
//! [`EntityCache::set_one`] / [`EntityCache::add`] or is replaced wholesale by
//! [`EntityCache::set_all`]. Lookups hand back the whole last-known record.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::models::{Project, Student};

pub trait Keyed {
    type Id: Eq + Hash + Clone + Send + Sync;

    fn id(&self) -> Self::Id;
}

impl Keyed for Student {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Keyed for Project {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

pub struct EntityCache<T: Keyed> {
    entries: RwLock<HashMap<T::Id, T>>,
}

pub type StudentCache = EntityCache<Student>;
pub type ProjectCache = EntityCache<Project>;

impl<T: Keyed + Clone> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.entries.read().get(id).cloned()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn set_all(&self, records: impl IntoIterator<Item = T>) {
        let fresh: HashMap<T::Id, T> = records.into_iter().map(|r| (r.id(), r)).collect();
        *self.entries.write() = fresh;
    }

    pub fn set_one(&self, id: T::Id, record: T) {
        self.entries.write().insert(id, record);
    }

    pub fn add(&self, record: T) {
        self.set_one(record.id(), record);
    }

    /// Replaces one cached record with an edited copy. Returns `false` when
    /// nothing is cached under `id`.
    pub fn update(&self, id: &T::Id, edit: impl FnOnce(&mut T)) -> bool {
        let Some(mut record) = self.get(id) else {
            return false;
        };
        edit(&mut record);
        self.set_one(id.clone(), record);
        true
    }

    pub fn values(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<T: Keyed + Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;

    fn project(id: i64, title: &str) -> Project {
        Project {
            id,
            title: title.to_string(),
            description: format!("{} description", title),
            author_name: Some("ada".to_string()),
            views: id * 3,
            status: ProjectStatus::Ready,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            url: format!("https://play.example/{}", id),
        }
    }

    #[test]
    fn set_all_then_get_returns_supplied_records() {
        let cache = ProjectCache::new();
        let records = vec![project(1, "Pong"), project(2, "Snake"), project(9, "Tetris")];
        cache.set_all(records.clone());

        for record in &records {
            assert_eq!(cache.get(&record.id).as_ref(), Some(record));
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn never_inserted_id_is_absent() {
        let cache = ProjectCache::new();
        assert_eq!(cache.get(&404), None);

        cache.set_all(vec![project(1, "Pong")]);
        assert_eq!(cache.get(&404), None);
        assert!(!cache.contains(&404));
    }

    #[test]
    fn set_one_leaves_other_entries_untouched() {
        let cache = ProjectCache::new();
        cache.set_all(vec![project(1, "Pong"), project(2, "Snake")]);

        let extra = project(3, "Breakout");
        cache.set_one(3, extra.clone());

        assert_eq!(cache.get(&3), Some(extra));
        assert_eq!(cache.get(&1), Some(project(1, "Pong")));
        assert_eq!(cache.get(&2), Some(project(2, "Snake")));
    }

    #[test]
    fn set_all_replaces_previous_contents() {
        let cache = ProjectCache::new();
        cache.set_all(vec![project(1, "Pong"), project(2, "Snake")]);
        cache.set_all(vec![project(5, "Asteroids")]);

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), None);
        assert!(cache.contains(&5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn add_overwrites_by_id() {
        let cache = ProjectCache::new();
        cache.add(project(1, "Pong"));
        cache.add(project(1, "Pong 2"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1).map(|p| p.title), Some("Pong 2".to_string()));
    }

    #[test]
    fn update_replaces_whole_record() {
        let cache = ProjectCache::new();
        assert!(!cache.update(&1, |p| p.views += 1));

        cache.add(project(1, "Pong"));
        assert!(cache.update(&1, |p| p.views += 1));
        assert_eq!(cache.get(&1).map(|p| p.views), Some(4));
    }
}
