//! In-memory collections that fake entities are seeded into.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{FaketoryError, Result};
use crate::partial::{Entity, Partial, merge_partial};

/// Predicate used to select entities.
pub type Filter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

type Validator<T> = Box<dyn Fn(&T) -> std::result::Result<(), String> + Send + Sync>;

/// A store of entities of one type.
#[async_trait]
pub trait Collection<T: Entity>: Send + Sync {
    /// Collection name, used in errors and logs.
    fn name(&self) -> &str;

    /// Validate and insert an entity, returning the stored copy.
    async fn create(&self, entity: T) -> Result<T>;

    /// Every entity matching `filter`, in insertion order.
    async fn find_many(&self, filter: Filter<'_, T>) -> Vec<T>;

    /// The first entity matching `filter`.
    async fn find_first(&self, filter: Filter<'_, T>) -> Option<T>;

    /// Apply `patch` to every match and return the updated entities.
    async fn update(&self, filter: Filter<'_, T>, patch: &Partial) -> Result<Vec<T>>;

    /// Remove every match and return how many were removed.
    async fn delete(&self, filter: Filter<'_, T>) -> usize;

    /// Remove everything.
    async fn clear(&self);

    /// Number of stored entities.
    async fn count(&self) -> usize;
}

/// A [`Collection`] kept in memory behind an async lock.
pub struct InMemoryCollection<T> {
    name: String,
    entities: RwLock<Vec<T>>,
    validator: Option<Validator<T>>,
}

impl<T: Entity> InMemoryCollection<T> {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: RwLock::new(Vec::new()),
            validator: None,
        }
    }

    /// Reject entities for which `validator` returns an error.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Every stored entity.
    pub async fn all(&self) -> Vec<T> {
        self.entities.read().await.clone()
    }

    fn validate(&self, entity: &T) -> Result<()> {
        match &self.validator {
            Some(validate) => {
                validate(entity).map_err(|message| FaketoryError::validation(&self.name, message))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: Entity> Collection<T> for InMemoryCollection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create(&self, entity: T) -> Result<T> {
        self.validate(&entity)?;
        self.entities.write().await.push(entity.clone());
        debug!("Created entity in {}", self.name);
        Ok(entity)
    }

    async fn find_many(&self, filter: Filter<'_, T>) -> Vec<T> {
        self.entities
            .read()
            .await
            .iter()
            .filter(|&e| filter(e))
            .cloned()
            .collect()
    }

    async fn find_first(&self, filter: Filter<'_, T>) -> Option<T> {
        self.entities.read().await.iter().find(|&e| filter(e)).cloned()
    }

    async fn update(&self, filter: Filter<'_, T>, patch: &Partial) -> Result<Vec<T>> {
        let mut entities = self.entities.write().await;

        // Build every replacement first so a bad patch leaves nothing half-applied.
        let mut replacements = Vec::new();
        for (index, entity) in entities.iter().enumerate() {
            if filter(entity) {
                let updated = merge_partial(&self.name, entity.clone(), patch)?;
                self.validate(&updated)?;
                replacements.push((index, updated));
            }
        }

        let mut updated = Vec::with_capacity(replacements.len());
        for (index, entity) in replacements {
            entities[index] = entity.clone();
            updated.push(entity);
        }

        debug!("Updated {} entities in {}", updated.len(), self.name);
        Ok(updated)
    }

    async fn delete(&self, filter: Filter<'_, T>) -> usize {
        let mut entities = self.entities.write().await;
        let before = entities.len();
        entities.retain(|e| !filter(e));
        let removed = before - entities.len();
        debug!("Deleted {removed} entities from {}", self.name);
        removed
    }

    async fn clear(&self) {
        self.entities.write().await.clear();
        debug!("Cleared {}", self.name);
    }

    async fn count(&self) -> usize {
        self.entities.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial::partial;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Post {
        id: u32,
        title: String,
        published: bool,
    }

    fn post(id: u32, published: bool) -> Post {
        Post {
            id,
            title: format!("post {id}"),
            published,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let posts: InMemoryCollection<Post> = InMemoryCollection::new("posts");
        posts.create(post(1, true)).await.unwrap();
        posts.create(post(2, false)).await.unwrap();
        posts.create(post(3, true)).await.unwrap();

        let published = posts.find_many(&|p: &Post| p.published).await;
        assert_eq!(published, vec![post(1, true), post(3, true)]);
        assert_eq!(posts.find_first(&|p: &Post| !p.published).await, Some(post(2, false)));
        assert_eq!(posts.find_first(&|p: &Post| p.id == 9).await, None);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let posts: InMemoryCollection<Post> = InMemoryCollection::new("posts");
        for id in 1..=3 {
            posts.create(post(id, false)).await.unwrap();
        }

        let patch = partial(json!({ "published": true })).unwrap();
        let updated = posts.update(&|p: &Post| p.id >= 2, &patch).await.unwrap();
        assert_eq!(updated, vec![post(2, true), post(3, true)]);

        assert_eq!(posts.delete(&|p: &Post| p.published).await, 2);
        assert_eq!(posts.all().await, vec![post(1, false)]);

        posts.clear().await;
        assert_eq!(posts.count().await, 0);
    }

    #[tokio::test]
    async fn test_bad_patch_changes_nothing() {
        let posts: InMemoryCollection<Post> = InMemoryCollection::new("posts");
        posts.create(post(1, false)).await.unwrap();

        let patch = partial(json!({ "published": "yes" })).unwrap();
        assert!(posts.update(&|_: &Post| true, &patch).await.is_err());
        assert_eq!(posts.all().await, vec![post(1, false)]);
    }

    #[tokio::test]
    async fn test_validator_rejects() {
        let posts: InMemoryCollection<Post> = InMemoryCollection::new("posts").with_validator(|p: &Post| {
            if p.title.is_empty() {
                Err("title is required".to_string())
            } else {
                Ok(())
            }
        });

        let mut untitled = post(1, false);
        untitled.title.clear();

        let err = posts.create(untitled).await.unwrap_err();
        assert!(err.to_string().contains("title is required"));
        assert_eq!(posts.count().await, 0);
    }
}
