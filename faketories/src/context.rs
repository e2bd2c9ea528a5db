//! Caller-owned bookkeeping of the collections faketories seed into.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::collection::{Collection, InMemoryCollection};
use crate::faketory::Faketory;
use crate::partial::Entity;

#[async_trait]
trait Resettable: Send + Sync {
    fn name(&self) -> &str;

    async fn reset(&self);
}

struct CollectionReset<T: Entity>(Arc<dyn Collection<T>>);

#[async_trait]
impl<T: Entity> Resettable for CollectionReset<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn reset(&self) {
        self.0.clear().await;
    }
}

/// Remembers every faketory created through it so one call can wipe all
/// their collections, typically between tests.
#[derive(Default)]
pub struct FaketoryContext {
    collections: Vec<Box<dyn Resettable>>,
}

impl FaketoryContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a faketory backed by a fresh in-memory collection.
    pub fn faketory<T, F>(&mut self, name: &str, generator: F) -> Faketory<T>
    where
        T: Entity,
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        let collection: Arc<dyn Collection<T>> = Arc::new(InMemoryCollection::<T>::new(name));
        self.faketory_with(collection, generator)
    }

    /// Create a faketory backed by an existing collection.
    pub fn faketory_with<T, F>(&mut self, collection: Arc<dyn Collection<T>>, generator: F) -> Faketory<T>
    where
        T: Entity,
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        self.collections
            .push(Box::new(CollectionReset(collection.clone())));
        Faketory::new(collection, generator)
    }

    /// Names of every tracked collection, in creation order.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.as_ref().name()).collect()
    }

    /// Clear every tracked collection.
    pub async fn reset(&self) {
        for collection in &self.collections {
            collection.reset().await;
        }
        info!("Reset {} faketory collection(s)", self.collections.len());
    }
}
