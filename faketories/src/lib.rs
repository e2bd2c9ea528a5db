//! # Faketories
//!
//! Factories for fake entities. A [`Faketory`] generates entities from a
//! default generator, lays partial overrides over them (supplied keys win)
//! and can seed the results into a [`Collection`].
//!
//! ```rust,ignore
//! use faketories::{FakeInput, FaketoryContext, partial};
//! use serde_json::json;
//!
//! let mut context = FaketoryContext::new();
//! let users = context.faketory("users", |i| User::fake(i));
//!
//! let admins = users
//!     .seed(vec![partial(json!({ "role": "admin" }))?])
//!     .await?;
//! let drafts = users.generate(FakeInput::Count(10))?;
//!
//! context.reset().await;
//! ```

pub mod collection;
pub mod context;
pub mod error;
pub mod faketory;
pub mod partial;

pub use collection::{Collection, Filter, InMemoryCollection};
pub use context::FaketoryContext;
pub use error::{FaketoryError, Result};
pub use faketory::{FakeInput, Faketory};
pub use partial::{Entity, Partial, merge_partial, partial};
