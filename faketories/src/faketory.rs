//! Factories producing fake entities.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::Result;
use crate::partial::{Entity, Partial, merge_partial};

type Generator<T> = Box<dyn Fn(usize) -> T + Send + Sync>;

/// How many entities to produce and which overrides to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeInput {
    /// `n` entities with generated defaults only.
    Count(usize),

    /// One entity per partial.
    Partials(Vec<Partial>),

    /// `n` entities; partial `i` applies to entity `i`. Partials past `n`
    /// are ignored.
    CountWithPartials(usize, Vec<Partial>),
}

impl FakeInput {
    /// Number of entities this input produces.
    pub fn len(&self) -> usize {
        match self {
            Self::Count(n) | Self::CountWithPartials(n, _) => *n,
            Self::Partials(partials) => partials.len(),
        }
    }

    /// Whether nothing will be produced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn partial(&self, index: usize) -> Option<&Partial> {
        match self {
            Self::Count(_) => None,
            Self::Partials(partials) | Self::CountWithPartials(_, partials) => partials.get(index),
        }
    }
}

impl From<usize> for FakeInput {
    fn from(count: usize) -> Self {
        Self::Count(count)
    }
}

impl From<Vec<Partial>> for FakeInput {
    fn from(partials: Vec<Partial>) -> Self {
        Self::Partials(partials)
    }
}

impl From<(usize, Vec<Partial>)> for FakeInput {
    fn from((count, partials): (usize, Vec<Partial>)) -> Self {
        Self::CountWithPartials(count, partials)
    }
}

/// Generates entities from defaults and optionally stores them.
///
/// The generator receives the entity's index within the current call.
pub struct Faketory<T: Entity> {
    collection: Arc<dyn Collection<T>>,
    generator: Generator<T>,
}

impl<T: Entity> Faketory<T> {
    /// Create a faketory seeding into `collection`.
    pub fn new<F>(collection: Arc<dyn Collection<T>>, generator: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self {
            collection,
            generator: Box::new(generator),
        }
    }

    /// Name of the backing collection.
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// The backing collection.
    pub fn collection(&self) -> &Arc<dyn Collection<T>> {
        &self.collection
    }

    /// Generate entities without storing them.
    pub fn generate(&self, input: impl Into<FakeInput>) -> Result<Vec<T>> {
        let input = input.into();
        let entities = (0..input.len())
            .map(|index| self.make(index, input.partial(index)))
            .collect::<Result<Vec<_>>>()?;
        debug!("Generated {} {} entities", entities.len(), self.name());
        Ok(entities)
    }

    /// Generate a single entity without storing it.
    pub fn generate_one(&self, partial: Option<Partial>) -> Result<T> {
        self.make(0, partial.as_ref())
    }

    /// Generate entities and store them in the collection.
    ///
    /// Returns the stored entities in generation order. Stops at the first
    /// entity the collection rejects; earlier ones stay stored.
    pub async fn seed(&self, input: impl Into<FakeInput>) -> Result<Vec<T>> {
        let entities = self.generate(input)?;
        let mut stored = Vec::with_capacity(entities.len());
        for entity in entities {
            stored.push(self.collection.create(entity).await?);
        }
        debug!("Seeded {} {} entities", stored.len(), self.name());
        Ok(stored)
    }

    /// Generate one entity and store it.
    pub async fn seed_one(&self, partial: Option<Partial>) -> Result<T> {
        let entity = self.generate_one(partial)?;
        self.collection.create(entity).await
    }

    /// Old name of [`Faketory::generate`].
    #[deprecated(note = "use `generate`")]
    pub fn build(&self, input: impl Into<FakeInput>) -> Result<Vec<T>> {
        warn!("Faketory::build is deprecated; use generate");
        self.generate(input)
    }

    /// Old name of [`Faketory::seed`].
    #[deprecated(note = "use `seed`")]
    pub async fn create(&self, input: impl Into<FakeInput>) -> Result<Vec<T>> {
        warn!("Faketory::create is deprecated; use seed");
        self.seed(input).await
    }

    fn make(&self, index: usize, partial: Option<&Partial>) -> Result<T> {
        let defaults = (self.generator)(index);
        match partial {
            Some(partial) => merge_partial(self.name(), defaults, partial),
            None => Ok(defaults),
        }
    }
}
