//! Serde support.
//!
//! A collection serializes as its ordered sequence of values and nothing
//! else; the identity index and the rules are not written. Reading a sequence
//! back needs the rules, so deserialization goes through [`CollectionSeed`].

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeSeed, Error as _, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use serde::{Deserialize, Deserializer};

use super::KeyedCollection;
use crate::rules::KeyRules;

impl<T, R> Serialize for KeyedCollection<T, R>
where
    T: Serialize,
    R: KeyRules<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// Deserializes a sequence of values into a [`KeyedCollection`] built with
/// the given rules.
///
/// Values are inserted in the order read; a duplicate key or identity fails
/// the whole deserialization.
///
/// # Examples
///
/// ```rust
/// use keyed_order::prelude::*;
/// use serde::de::DeserializeSeed;
///
/// let mut deserializer = serde_json::Deserializer::from_str("[3, 1, 2]");
/// let collection = CollectionSeed::new(Rules::ordered(|value: &u8| *value))
///     .deserialize(&mut deserializer)
///     .unwrap();
///
/// assert_eq!(collection.as_slice(), &[1, 2, 3]);
/// assert_eq!(serde_json::to_string(&collection).unwrap(), "[1,2,3]");
/// ```
pub struct CollectionSeed<T, R> {
    rules: R,
    marker: PhantomData<fn() -> T>,
}

impl<T, R: KeyRules<T>> CollectionSeed<T, R> {
    /// Creates a seed that builds collections with `rules`.
    #[must_use]
    pub const fn new(rules: R) -> Self {
        Self {
            rules,
            marker: PhantomData,
        }
    }
}

impl<'de, T, R> DeserializeSeed<'de> for CollectionSeed<T, R>
where
    T: Deserialize<'de>,
    R: KeyRules<T>,
{
    type Value = KeyedCollection<T, R>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(CollectionVisitor {
            rules: self.rules,
            marker: PhantomData,
        })
    }
}

struct CollectionVisitor<T, R> {
    rules: R,
    marker: PhantomData<fn() -> T>,
}

impl<'de, T, R> Visitor<'de> for CollectionVisitor<T, R>
where
    T: Deserialize<'de>,
    R: KeyRules<T>,
{
    type Value = KeyedCollection<T, R>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of uniquely keyed values")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0);
        let mut collection = KeyedCollection::with_capacity(self.rules, capacity);
        while let Some(value) = access.next_element()? {
            collection.insert([value]).map_err(A::Error::custom)?;
        }
        Ok(collection)
    }
}

impl<T, R: KeyRules<T>> KeyedCollection<T, R> {
    /// Deserializes a sequence of values into a collection built with `rules`.
    ///
    /// # Errors
    ///
    /// The deserializer's error, including duplicate keys or identities
    /// reported through `serde::de::Error::custom`.
    pub fn deserialize_with<'de, D>(rules: R, deserializer: D) -> Result<Self, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        CollectionSeed::new(rules).deserialize(deserializer)
    }
}
