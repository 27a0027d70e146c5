//! The keyed collection.
//!
//! [`KeyedCollection`] keeps values in a vector sorted by key (the ordered
//! sequence) and maps every identity to its member's key (the identity index).
//! Every positional operation goes through [`ordered_search`], and every
//! mutation updates both structures before returning.
//!
//! # Time Complexity
//!
//! | Operation                      | Complexity            |
//! |--------------------------------|-----------------------|
//! | `get`, `position_of`           | O(1) + O(log n)       |
//! | `get_by_key`, `contains_key`   | O(log n)              |
//! | `insert`, `delete`, `update`   | O(log n) + shift O(n) |
//! | `paginated`                    | O(log n + page)       |
//! | `paginated_where`              | O(log n + scanned)    |
//! | `filter`, `slice`              | O(n)                  |
//!
//! # Examples
//!
//! ```rust
//! use keyed_order::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Entry {
//!     id: &'static str,
//!     key: i32,
//! }
//!
//! let rules = Rules::ordered(|entry: &Entry| entry.key).with_identity(|entry: &Entry| entry.id.to_string());
//! let mut collection = KeyedCollection::new(rules);
//! collection
//!     .insert([
//!         Entry { id: "a", key: 5 },
//!         Entry { id: "b", key: 1 },
//!         Entry { id: "c", key: 3 },
//!     ])
//!     .unwrap();
//!
//! let keys: Vec<i32> = collection.keys().collect();
//! assert_eq!(keys, vec![1, 3, 5]);
//!
//! // Keys are exclusive, whatever the identity.
//! let clash = collection.insert([Entry { id: "d", key: 3 }]);
//! assert!(matches!(clash, Err(KeyedError::DuplicateKey { .. })));
//!
//! // Freeing an identity lets it be reused.
//! collection.delete_by_id("a", Presence::Required).unwrap();
//! collection.insert([Entry { id: "a", key: 5 }]).unwrap();
//! assert_eq!(collection.len(), 3);
//! ```

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, error, trace, warn};

use crate::error::{InvariantViolation, KeyedError, KeyedResult};
use crate::rules::KeyRules;
use crate::search::{Located, ordered_search};

mod iter;
mod page;
#[cfg(feature = "serde")]
mod serialize;

pub use iter::{IntoIter, Iter};
pub use page::PageMode;
#[cfg(feature = "serde")]
pub use serialize::CollectionSeed;

#[cfg(feature = "fxhash")]
type IdentityHasher = rustc_hash::FxBuildHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type IdentityHasher = ahash::RandomState;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type IdentityHasher = std::hash::RandomState;

type IdentityIndex<K> = HashMap<String, K, IdentityHasher>;

/// Whether [`KeyedCollection::delete_by_id`] requires the identity to exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Presence {
    /// A missing identity is a [`KeyedError::NotFound`] error.
    #[default]
    Required,
    /// A missing identity yields `Ok(None)`.
    Optional,
}

/// The outcome of a successful [`KeyedCollection::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Updated {
    /// Key and identity were unchanged; the member kept its position.
    InPlace,
    /// The member was removed and re-inserted under its new key or identity.
    Repositioned {
        /// Position before the update.
        from: usize,
        /// Position after the update.
        to: usize,
    },
}

/// A collection kept sorted by key, with unique keys and unique identities.
///
/// The key, the key order and the identity come from the [`KeyRules`] given
/// at construction. Two members may never share a key, and two members may
/// never share an identity.
///
/// Values are read-only once inside the collection: the only way to change a
/// member is [`update`](Self::update), which repositions it when its key
/// changes. It is a logic error for a member's key or identity to change by
/// other means (interior mutability, global state); the collection will then
/// return incorrect results, though never undefined behavior.
///
/// The collection does no locking. Mutation requires `&mut self`, so sharing
/// one across threads needs an external lock.
///
/// Multi-value calls ([`insert`](Self::insert), [`upsert`](Self::upsert),
/// [`insert_if_absent`](Self::insert_if_absent)) apply values one at a time and
/// are not atomic: when a value is rejected, the values before it stay applied.
pub struct KeyedCollection<T, R: KeyRules<T>> {
    entries: Vec<T>,
    identities: IdentityIndex<R::Key>,
    rules: R,
}

impl<T, R: KeyRules<T>> KeyedCollection<T, R> {
    /// Creates an empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::{KeyedCollection, Rules};
    ///
    /// let collection = KeyedCollection::new(Rules::ordered(|value: &u32| *value));
    /// assert!(collection.is_empty());
    /// ```
    #[must_use]
    pub fn new(rules: R) -> Self {
        Self::with_capacity(rules, 0)
    }

    /// Creates an empty collection with room for `capacity` members.
    #[must_use]
    pub fn with_capacity(rules: R, capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            identities: HashMap::with_capacity_and_hasher(capacity, IdentityHasher::default()),
            rules,
        }
    }

    /// Creates a collection from `values`, failing on the first rejected value.
    ///
    /// # Errors
    ///
    /// Any error [`insert`](Self::insert) raises.
    pub fn try_from_iter<I>(rules: R, values: I) -> KeyedResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let mut collection = Self::with_capacity(rules, values.size_hint().0);
        collection.insert(values)?;
        Ok(collection)
    }

    /// Returns the rules this collection was built with.
    #[inline]
    pub const fn rules(&self) -> &R {
        &self.rules
    }

    /// Returns the number of members.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the collection has no members.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the members as a slice in ascending key order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    fn locate_key(&self, key: &R::Key) -> Located {
        ordered_search(&self.entries, |candidate| {
            self.rules.compare(key, &self.rules.key(candidate))
        })
    }

    /// Returns the position of the member with `identity`.
    ///
    /// # Complexity
    ///
    /// O(1) index lookup followed by an O(log n) search.
    pub fn position_of(&self, identity: &str) -> Option<usize> {
        let key = self.identities.get(identity)?;
        self.locate_key(key).found()
    }

    /// Returns the member with `identity`.
    pub fn get(&self, identity: &str) -> Option<&T> {
        self.position_of(identity).map(|position| &self.entries[position])
    }

    /// Returns the member whose key equals `key`.
    pub fn get_by_key(&self, key: &R::Key) -> Option<&T> {
        self.locate_key(key)
            .found()
            .map(|position| &self.entries[position])
    }

    /// Returns the member at `position` in key order.
    #[inline]
    pub fn get_at(&self, position: usize) -> Option<&T> {
        self.entries.get(position)
    }

    /// Returns the member with the smallest key.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    /// Returns the member with the largest key.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Returns `true` if a member has `identity`.
    #[inline]
    pub fn contains_id(&self, identity: &str) -> bool {
        self.identities.contains_key(identity)
    }

    /// Returns `true` if a member has a key equal to `key`.
    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.locate_key(key).is_found()
    }

    /// Returns the members' keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = R::Key> + '_ {
        self.entries.iter().map(|value| self.rules.key(value))
    }

    /// Returns an iterator over the members in ascending key order.
    ///
    /// Each call starts from the smallest key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.entries)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Places one value, handing it back alongside the error on rejection.
    fn try_place(&mut self, value: T) -> Result<usize, (KeyedError, T)> {
        let identity = self.rules.identity(&value);
        if identity.is_empty() {
            return Err((KeyedError::InvalidValue, value));
        }

        let key = self.rules.key(&value);
        let located = self.locate_key(&key);

        if self.identities.contains_key(&identity) {
            return Err((KeyedError::DuplicateIdentity { identity }, value));
        }

        match located {
            Located::Found(position) => {
                let existing = self.rules.identity(&self.entries[position]);
                Err((KeyedError::DuplicateKey { identity, existing }, value))
            }
            Located::Vacant(point) => {
                let position = point.splice_index();
                self.entries.insert(position, value);
                trace!(identity = %identity, position, "inserted member");
                self.identities.insert(identity, key);
                Ok(position)
            }
        }
    }

    /// Inserts `values` in order.
    ///
    /// # Errors
    ///
    /// - [`KeyedError::InvalidValue`] if a value's identity is empty
    /// - [`KeyedError::DuplicateIdentity`] if a value's identity is present
    /// - [`KeyedError::DuplicateKey`] if a value's key is present
    ///
    /// The identity check runs before the key check. Values preceding the
    /// rejected one remain inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::{KeyedCollection, KeyedError, Rules};
    ///
    /// let mut collection = KeyedCollection::new(Rules::ordered(|value: &u32| *value));
    /// let result = collection.insert([4, 2, 4, 9]);
    ///
    /// assert!(matches!(result, Err(KeyedError::DuplicateIdentity { .. })));
    /// assert_eq!(collection.as_slice(), &[2, 4]);
    /// ```
    pub fn insert<I>(&mut self, values: I) -> KeyedResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            if let Err((error, _)) = self.try_place(value) {
                warn!(%error, "insert rejected a value");
                return Err(error);
            }
        }
        Ok(())
    }

    /// Inserts `value`, first removing any member with the same identity.
    ///
    /// Returns the displaced member. When the new value is rejected, the
    /// displaced member is put back and the collection is unchanged.
    ///
    /// # Errors
    ///
    /// - [`KeyedError::InvalidValue`] if the identity is empty
    /// - [`KeyedError::DuplicateKey`] if another member holds the new key
    pub fn replace(&mut self, value: T) -> KeyedResult<Option<T>> {
        let identity = self.rules.identity(&value);
        if identity.is_empty() {
            return Err(KeyedError::InvalidValue);
        }

        let displaced = self.take_identity(&identity);
        match self.try_place(value) {
            Ok(_) => Ok(displaced),
            Err((failure, _)) => {
                if let Some(previous) = displaced
                    && let Err((restore, _)) = self.try_place(previous)
                {
                    error!(identity = %identity, %restore, "displaced member could not be restored");
                }
                Err(failure)
            }
        }
    }

    /// Inserts `values` in order, replacing members that share an identity.
    ///
    /// A replacement may carry a different key; the member moves accordingly.
    /// Returns the input values that replaced an existing member, in input
    /// order. Fresh insertions are not listed.
    ///
    /// # Errors
    ///
    /// As [`replace`](Self::replace). The rejected value has no effect: a
    /// member it would have replaced is put back. Values preceding it remain
    /// applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::{KeyedCollection, Rules};
    ///
    /// let rules = Rules::ordered(|pair: &(u32, char)| pair.0)
    ///     .with_identity(|pair: &(u32, char)| pair.1.to_string());
    /// let mut collection = KeyedCollection::try_from_iter(rules, [(1, 'a'), (2, 'b')]).unwrap();
    ///
    /// let replaced = collection.upsert([(9, 'a'), (5, 'c')]).unwrap();
    /// assert_eq!(replaced, vec![(9, 'a')]);
    /// assert_eq!(collection.as_slice(), &[(2, 'b'), (5, 'c'), (9, 'a')]);
    /// ```
    pub fn upsert<I>(&mut self, values: I) -> KeyedResult<Vec<T>>
    where
        T: Clone,
        I: IntoIterator<Item = T>,
    {
        let mut replaced = Vec::new();
        for value in values {
            let replacing = self.contains_id(&self.rules.identity(&value));
            let copy = replacing.then(|| value.clone());
            self.replace(value)
                .inspect_err(|error| warn!(%error, "upsert rejected a value"))?;
            replaced.extend(copy);
        }
        debug!(replaced = replaced.len(), "upsert applied");
        Ok(replaced)
    }

    /// Inserts each value whose identity and key are both absent, skipping
    /// the others.
    ///
    /// Returns the values actually inserted, in input order.
    ///
    /// # Errors
    ///
    /// [`KeyedError::InvalidValue`] if a value's identity is empty. Values
    /// preceding it remain inserted.
    pub fn insert_if_absent<I>(&mut self, values: I) -> KeyedResult<Vec<T>>
    where
        T: Clone,
        I: IntoIterator<Item = T>,
    {
        let mut inserted = Vec::new();
        for value in values {
            let identity = self.rules.identity(&value);
            if identity.is_empty() {
                warn!("insert_if_absent rejected a value with an empty identity");
                return Err(KeyedError::InvalidValue);
            }
            if self.identities.contains_key(&identity) || self.contains_key(&self.rules.key(&value))
            {
                trace!(identity = %identity, "skipped colliding value");
                continue;
            }
            let copy = value.clone();
            self.try_place(value).map_err(|(error, _)| error)?;
            inserted.push(copy);
        }
        debug!(inserted = inserted.len(), "insert_if_absent applied");
        Ok(inserted)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    fn remove_at(&mut self, position: usize) -> T {
        let value = self.entries.remove(position);
        let identity = self.rules.identity(&value);
        self.identities.remove(&identity);
        trace!(identity = %identity, position, "removed member");
        value
    }

    fn take_identity(&mut self, identity: &str) -> Option<T> {
        let position = self.position_of(identity)?;
        Some(self.remove_at(position))
    }

    /// Removes the member whose key equals the key of `value`.
    ///
    /// Returns `None` if no member holds that key.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let key = self.rules.key(value);
        self.delete_by_key(&key)
    }

    /// Removes the member whose key equals `key`.
    pub fn delete_by_key(&mut self, key: &R::Key) -> Option<T> {
        let position = self.locate_key(key).found()?;
        Some(self.remove_at(position))
    }

    /// Removes the member with `identity`.
    ///
    /// # Errors
    ///
    /// [`KeyedError::NotFound`] if the identity is unknown and `presence` is
    /// [`Presence::Required`]. With [`Presence::Optional`] an unknown identity
    /// yields `Ok(None)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::prelude::*;
    ///
    /// let mut collection = KeyedCollection::try_from_iter(Rules::ordered(|value: &u32| *value), [3, 1]).unwrap();
    ///
    /// assert_eq!(collection.delete_by_id("3", Presence::Required), Ok(Some(3)));
    /// assert_eq!(collection.delete_by_id("3", Presence::Optional), Ok(None));
    /// assert!(collection.delete_by_id("3", Presence::Required).is_err());
    /// ```
    pub fn delete_by_id(&mut self, identity: &str, presence: Presence) -> KeyedResult<Option<T>> {
        match self.take_identity(identity) {
            Some(value) => Ok(Some(value)),
            None if presence == Presence::Required => Err(KeyedError::NotFound {
                identity: identity.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Keeps only the members for which `predicate` returns `true`.
    pub fn retain<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&T) -> bool,
    {
        let rules = &self.rules;
        let identities = &mut self.identities;
        self.entries.retain(|value| {
            let keep = predicate(value);
            if !keep {
                identities.remove(&rules.identity(value));
            }
            keep
        });
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.identities.clear();
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Mutates the member with `identity` in place.
    ///
    /// The key is read before and after `mutate`. When neither key nor
    /// identity changed, the member stays where it is. Otherwise it is
    /// removed and re-inserted, which checks the new key and identity
    /// against the rest of the collection.
    ///
    /// Returns `Ok(None)` if the identity is unknown.
    ///
    /// # Errors
    ///
    /// Any error [`insert`](Self::insert) raises for the mutated value. The
    /// mutated member has then been removed from the collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::prelude::*;
    ///
    /// let rules = Rules::ordered(|pair: &(u32, char)| pair.0)
    ///     .with_identity(|pair: &(u32, char)| pair.1.to_string());
    /// let mut collection = KeyedCollection::try_from_iter(rules, [(1, 'a'), (2, 'b'), (3, 'c')]).unwrap();
    ///
    /// let moved = collection.update("a", |pair| pair.0 = 10).unwrap();
    /// assert_eq!(moved, Some(Updated::Repositioned { from: 0, to: 2 }));
    /// assert_eq!(collection.update("z", |pair| pair.0 = 0), Ok(None));
    /// ```
    pub fn update<F>(&mut self, identity: &str, mutate: F) -> KeyedResult<Option<Updated>>
    where
        F: FnOnce(&mut T),
    {
        let Some(position) = self.position_of(identity) else {
            return Ok(None);
        };
        if self.rules.identity(&self.entries[position]) != identity {
            error!(identity, position, "identity index points at a different member");
            return Ok(None);
        }

        let before = self.rules.key(&self.entries[position]);
        mutate(&mut self.entries[position]);
        let after = self.rules.key(&self.entries[position]);
        let renamed = self.rules.identity(&self.entries[position]) != identity;

        if !renamed && self.rules.compare(&before, &after) == Ordering::Equal {
            if let Some(indexed) = self.identities.get_mut(identity) {
                *indexed = after;
            }
            return Ok(Some(Updated::InPlace));
        }

        let value = self.entries.remove(position);
        self.identities.remove(identity);
        match self.try_place(value) {
            Ok(to) => {
                debug!(identity, from = position, to, "repositioned member");
                Ok(Some(Updated::Repositioned { from: position, to }))
            }
            Err((failure, _)) => {
                warn!(identity, %failure, "updated member collided and was evicted");
                Err(failure)
            }
        }
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    fn derive(&self, entries: Vec<T>) -> Self
    where
        R: Clone,
    {
        let identities = entries
            .iter()
            .map(|value| (self.rules.identity(value), self.rules.key(value)))
            .collect();
        debug!(members = entries.len(), "derived collection");
        Self {
            entries,
            identities,
            rules: self.rules.clone(),
        }
    }

    /// Returns a new collection holding the members matching `predicate`.
    ///
    /// The result shares the rules but no storage with `self`.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        T: Clone,
        R: Clone,
        P: FnMut(&T) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|value| predicate(*value))
            .cloned()
            .collect();
        self.derive(entries)
    }

    /// Returns a new collection holding the members at the positions in
    /// `range`.
    ///
    /// Bounds past the end are clamped to the length, and a range whose start
    /// exceeds its end yields an empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::{KeyedCollection, Rules};
    ///
    /// let collection = KeyedCollection::try_from_iter(Rules::ordered(|value: &u32| *value), [4, 1, 3, 2]).unwrap();
    ///
    /// assert_eq!(collection.slice(1..3).as_slice(), &[2, 3]);
    /// assert_eq!(collection.slice(2..).as_slice(), &[3, 4]);
    /// assert!(collection.slice(7..9).is_empty());
    /// ```
    pub fn slice<B>(&self, range: B) -> Self
    where
        T: Clone,
        R: Clone,
        B: RangeBounds<usize>,
    {
        let length = self.entries.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(length);
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => length,
        }
        .clamp(start, length);
        self.derive(self.entries[start..end].to_vec())
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Verifies that members are sorted with distinct keys, identities are
    /// distinct, and the identity index covers exactly the members.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.identities.len() != self.entries.len() {
            return Err(InvariantViolation::IndexSize {
                indexed: self.identities.len(),
                members: self.entries.len(),
            });
        }

        for (offset, pair) in self.entries.windows(2).enumerate() {
            let position = offset + 1;
            match self
                .rules
                .compare(&self.rules.key(&pair[0]), &self.rules.key(&pair[1]))
            {
                Ordering::Less => {}
                Ordering::Equal => return Err(InvariantViolation::SharedKey { position }),
                Ordering::Greater => return Err(InvariantViolation::Unsorted { position }),
            }
        }

        let mut seen: HashSet<String, IdentityHasher> =
            HashSet::with_capacity_and_hasher(self.entries.len(), IdentityHasher::default());
        for value in &self.entries {
            let identity = self.rules.identity(value);
            let indexed = self.identities.get(&identity).is_some_and(|key| {
                self.rules.compare(key, &self.rules.key(value)) == Ordering::Equal
            });
            if !indexed {
                return Err(InvariantViolation::Unindexed { identity });
            }
            if !seen.insert(identity.clone()) {
                return Err(InvariantViolation::SharedIdentity { identity });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: Clone, R: KeyRules<T> + Clone> Clone for KeyedCollection<T, R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            identities: self.identities.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<T: fmt::Debug, R: KeyRules<T>> fmt::Debug for KeyedCollection<T, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, R: KeyRules<T>> PartialEq for KeyedCollection<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq, R: KeyRules<T>> Eq for KeyedCollection<T, R> {}

impl<'a, T, R: KeyRules<T>> IntoIterator for &'a KeyedCollection<T, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, R: KeyRules<T>> IntoIterator for KeyedCollection<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.entries)
    }
}

// =============================================================================
// Tests
// =============================================================================
