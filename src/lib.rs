//! # keyed-order
//!
//! An in-memory, order-maintaining keyed collection.
//!
//! ## Overview
//!
//! [`KeyedCollection`] keeps its values sorted by a key extracted from each
//! value, while also indexing every value by a string identity:
//!
//! - **Ordered Search**: a generalized binary search returning either an exact
//!   match or an insertion point ([`search`]).
//! - **Key rules**: the key extraction, key comparison and identity extraction
//!   supplied at construction ([`rules`]).
//! - **Keyed Collection**: insert, upsert, delete, in-place update with
//!   repositioning, filter/slice derivation and iteration ([`collection`]).
//! - **Cursor Pagination**: forward and backward pages anchored on a key,
//!   optionally filtered by a predicate ([`KeyedCollection::paginated`]).
//!
//! Keys are exclusive: two members may never share a key, and two members may
//! never share an identity.
//!
//! ## Feature Flags
//!
//! - `serde`: serialize a collection as its ordered sequence of values, and
//!   read one back through [`collection::CollectionSeed`]
//! - `fxhash`: use `rustc-hash` for the identity index
//! - `ahash`: use `ahash` for the identity index
//! - `full`: enable all optional integrations
//!
//! ## Example
//!
//! ```rust
//! use keyed_order::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Task {
//!     id: String,
//!     due: u32,
//! }
//!
//! let rules = Rules::ordered(|task: &Task| task.due).with_identity(|task: &Task| task.id.clone());
//! let mut tasks = KeyedCollection::new(rules);
//!
//! tasks
//!     .insert([
//!         Task { id: "a".into(), due: 5 },
//!         Task { id: "b".into(), due: 1 },
//!         Task { id: "c".into(), due: 3 },
//!     ])
//!     .unwrap();
//!
//! let order: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
//! assert_eq!(order, vec!["b", "c", "a"]);
//!
//! let page = tasks.paginated(Some(&1), 1, PageMode::After);
//! assert_eq!(page[0].due, 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use keyed_order::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collection::{KeyedCollection, PageMode, Presence, Updated};
    pub use crate::error::{InvariantViolation, KeyedError, KeyedResult};
    pub use crate::rules::{KeyRules, Rules};
    pub use crate::search::{InsertionPoint, Located, RandomAccess, ordered_search};

    #[cfg(feature = "serde")]
    pub use crate::collection::CollectionSeed;
}

pub mod collection;
pub mod error;
pub mod rules;
pub mod search;

pub use collection::KeyedCollection;
pub use error::{KeyedError, KeyedResult};
pub use rules::{KeyRules, Rules};
