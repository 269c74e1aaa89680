//! Process-local store used when no database is configured, and by tests.

use super::TurkeyStore;
use crate::error::StoreError;
use crate::model::{parse_id, NewTurkey, Turkey, TurkeyPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Documents are kept in insertion order so "first document" is well defined.
#[derive(Default)]
pub struct MemoryTurkeyStore {
    turkeys: RwLock<Vec<Turkey>>,
}

impl MemoryTurkeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Turkey>>, StoreError> {
        self.turkeys
            .read()
            .map_err(|_| StoreError::Unavailable("turkey store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Turkey>>, StoreError> {
        self.turkeys
            .write()
            .map_err(|_| StoreError::Unavailable("turkey store lock poisoned".into()))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.read().map(|turkeys| turkeys.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

fn ensure_unique_species(turkeys: &[Turkey], species: &str, except: Option<Uuid>) -> Result<(), StoreError> {
    let taken = turkeys
        .iter()
        .any(|t| t.species == species && Some(t.id) != except);
    if taken {
        return Err(StoreError::DuplicateKey(format!("species \"{}\" already exists", species)));
    }
    Ok(())
}

#[async_trait]
impl TurkeyStore for MemoryTurkeyStore {
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save(&self, draft: NewTurkey) -> Result<Turkey, StoreError> {
        draft.validate()?;
        let mut turkeys = self.write()?;
        ensure_unique_species(&turkeys, &draft.species, None)?;
        let now = Utc::now();
        let turkey = Turkey {
            id: Uuid::new_v4(),
            species: draft.species,
            location: draft.location,
            created_at: now,
            updated_at: now,
        };
        turkeys.push(turkey.clone());
        Ok(turkey)
    }

    async fn find_one(&self, id: Option<&str>) -> Result<Option<Turkey>, StoreError> {
        let turkeys = self.read()?;
        let found = match id {
            Some(id) => {
                let id = parse_id(id)?;
                turkeys.iter().find(|t| t.id == id)
            }
            None => turkeys.first(),
        };
        Ok(found.cloned())
    }

    async fn update_by_id(&self, id: &str, patch: TurkeyPatch) -> Result<Option<Turkey>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let mut turkeys = self.write()?;
        let Some(index) = turkeys.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(species) = &patch.species {
            ensure_unique_species(&turkeys, species, Some(id))?;
        }
        let turkey = &mut turkeys[index];
        patch.apply(turkey);
        turkey.updated_at = Utc::now();
        Ok(Some(turkey.clone()))
    }

    async fn remove_by_id(&self, id: &str) -> Result<Option<Turkey>, StoreError> {
        let id = parse_id(id)?;
        let mut turkeys = self.write()?;
        let removed = turkeys
            .iter()
            .position(|t| t.id == id)
            .map(|index| turkeys.remove(index));
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(species: &str) -> NewTurkey {
        NewTurkey {
            species: species.into(),
            location: None,
        }
    }

    #[tokio::test]
    async fn save_assigns_id_and_find_returns_it() {
        let store = MemoryTurkeyStore::new();
        let saved = store.save(draft("wild")).await.unwrap();
        let found = store.find_one(Some(&saved.id.to_string())).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn find_without_id_returns_oldest() {
        let store = MemoryTurkeyStore::new();
        assert_eq!(store.find_one(None).await.unwrap(), None);
        let first = store.save(draft("wild")).await.unwrap();
        store.save(draft("ocellated")).await.unwrap();
        assert_eq!(store.find_one(None).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn duplicate_species_is_duplicate_key() {
        let store = MemoryTurkeyStore::new();
        store.save(draft("wild")).await.unwrap();
        let err = store.save(draft("wild")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn update_keeps_id_and_revalidates() {
        let store = MemoryTurkeyStore::new();
        let saved = store.save(draft("wild")).await.unwrap();
        let id = saved.id.to_string();

        let patch = TurkeyPatch {
            species: Some("ocellated".into()),
            location: Some("Yucatan".into()),
        };
        let updated = store.update_by_id(&id, patch).await.unwrap().unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.species, "ocellated");
        assert_eq!(updated.created_at, saved.created_at);

        let blank = TurkeyPatch {
            species: Some(String::new()),
            location: None,
        };
        let err = store.update_by_id(&id, blank).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_to_own_species_is_not_a_duplicate() {
        let store = MemoryTurkeyStore::new();
        let saved = store.save(draft("wild")).await.unwrap();
        let patch = TurkeyPatch {
            species: Some("wild".into()),
            location: None,
        };
        assert!(store.update_by_id(&saved.id.to_string(), patch).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_ids_resolve_to_none() {
        let store = MemoryTurkeyStore::new();
        let id = Uuid::new_v4().to_string();
        assert_eq!(store.update_by_id(&id, TurkeyPatch::default()).await.unwrap(), None);
        assert_eq!(store.remove_by_id(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_ids_are_invalid() {
        let store = MemoryTurkeyStore::new();
        let err = store.find_one(Some("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
        let err = store.remove_by_id("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[test]
    fn poisoned_lock_reports_unavailable() {
        let store = std::sync::Arc::new(MemoryTurkeyStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.turkeys.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn remove_deletes_document() {
        let store = MemoryTurkeyStore::new();
        let saved = store.save(draft("wild")).await.unwrap();
        let removed = store.remove_by_id(&saved.id.to_string()).await.unwrap();
        assert_eq!(removed, Some(saved));
        assert!(store.is_empty().unwrap());
    }
}
