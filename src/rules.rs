//! Key and identity rules.
//!
//! A [`KeyedCollection`](crate::KeyedCollection) never inspects its values
//! directly. It relies on three capabilities fixed at construction:
//!
//! - `key(value)`: extracts the sort key
//! - `compare(a, b)`: a total order over keys
//! - `identity(value)`: a string uniquely naming the value
//!
//! [`KeyRules`] is the contract. [`Rules`] builds one from closures; any type
//! may implement the trait directly instead.
//!
//! # Examples
//!
//! ```rust
//! use keyed_order::rules::{KeyRules, Rules};
//! use std::cmp::Ordering;
//!
//! // Natural order, identity defaults to the key's text.
//! let by_length = Rules::ordered(|word: &&str| word.len());
//! assert_eq!(by_length.identity(&"four"), "4");
//!
//! // Reversed order with an explicit identity.
//! let descending = Rules::new(|pair: &(i32, char)| pair.0, |a: &i32, b: &i32| b.cmp(a))
//!     .with_identity(|pair: &(i32, char)| pair.1.to_string());
//! assert_eq!(descending.compare(&1, &2), Ordering::Greater);
//! assert_eq!(descending.identity(&(7, 'q')), "q");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// The key/compare/identity contract of a keyed collection.
///
/// Implementations must be deterministic and side-effect free, and `compare`
/// must be a total order. Identities must be unique per member; when the
/// identity is derived from the key, that follows from key uniqueness.
///
/// The empty string is reserved as an identity: a collection rejects any
/// value whose identity is empty with
/// [`KeyedError::InvalidValue`](crate::KeyedError::InvalidValue). Under the
/// default identity this covers keys whose `Display` text is empty, such as
/// an empty `String`.
pub trait KeyRules<T> {
    /// The sort key.
    type Key: Clone;

    /// Extracts the key of `value`.
    fn key(&self, value: &T) -> Self::Key;

    /// Compares two keys.
    fn compare(&self, left: &Self::Key, right: &Self::Key) -> Ordering;

    /// Extracts the identity of `value`.
    fn identity(&self, value: &T) -> String;
}

/// Produces an identity from a value and its key.
///
/// This is the identity half of [`Rules`]; it is rarely named directly.
pub trait Identify<T, K> {
    /// Returns the identity of `value`. `key` yields the value's key on demand.
    fn identify(&self, value: &T, key: impl FnOnce() -> K) -> String;
}

/// Default identity: the `Display` text of the key.
///
/// A key that displays as the empty string yields the reserved empty
/// identity, so such a value cannot be inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyText;

impl<T, K: fmt::Display> Identify<T, K> for KeyText {
    #[inline]
    fn identify(&self, _value: &T, key: impl FnOnce() -> K) -> String {
        key().to_string()
    }
}

/// Identity taken from a caller-supplied function.
#[derive(Clone, Copy)]
pub struct IdentityWith<F>(F);

impl<T, K, F> Identify<T, K> for IdentityWith<F>
where
    F: Fn(&T) -> String,
{
    #[inline]
    fn identify(&self, value: &T, _key: impl FnOnce() -> K) -> String {
        (self.0)(value)
    }
}

/// Natural ordering of a key type, as a function pointer.
pub type NaturalOrder<K> = fn(&K, &K) -> Ordering;

/// [`KeyRules`] assembled from closures.
///
/// `Rules` is fixed for a collection's lifetime and is cloned into every
/// derived collection, so the closures should be cheap to clone.
pub struct Rules<T, K, KeyFn, CompareFn, IdentityFn = KeyText> {
    key: KeyFn,
    compare: CompareFn,
    identity: IdentityFn,
    marker: PhantomData<fn(&T) -> K>,
}

impl<T, K, KeyFn, CompareFn> Rules<T, K, KeyFn, CompareFn>
where
    KeyFn: Fn(&T) -> K,
    CompareFn: Fn(&K, &K) -> Ordering,
{
    /// Creates rules from a key extractor and a key comparator.
    ///
    /// The identity defaults to the key's `Display` text; see
    /// [`with_identity`](Self::with_identity).
    #[must_use]
    pub const fn new(key: KeyFn, compare: CompareFn) -> Self {
        Self {
            key,
            compare,
            identity: KeyText,
            marker: PhantomData,
        }
    }
}

impl<T, K, KeyFn> Rules<T, K, KeyFn, NaturalOrder<K>>
where
    K: Ord,
    KeyFn: Fn(&T) -> K,
{
    /// Creates rules ordering keys by their `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::rules::{KeyRules, Rules};
    /// use std::cmp::Ordering;
    ///
    /// let rules = Rules::ordered(|value: &u8| *value);
    /// assert_eq!(rules.compare(&1, &9), Ordering::Less);
    /// ```
    #[must_use]
    pub fn ordered(key: KeyFn) -> Self {
        Self {
            key,
            compare: K::cmp,
            identity: KeyText,
            marker: PhantomData,
        }
    }
}

impl<T, K, KeyFn, CompareFn, IdentityFn> Rules<T, K, KeyFn, CompareFn, IdentityFn> {
    /// Replaces the identity extractor.
    #[must_use]
    pub fn with_identity<F>(self, identity: F) -> Rules<T, K, KeyFn, CompareFn, IdentityWith<F>>
    where
        F: Fn(&T) -> String,
    {
        Rules {
            key: self.key,
            compare: self.compare,
            identity: IdentityWith(identity),
            marker: PhantomData,
        }
    }
}

impl<T, K, KeyFn, CompareFn, IdentityFn> KeyRules<T> for Rules<T, K, KeyFn, CompareFn, IdentityFn>
where
    K: Clone,
    KeyFn: Fn(&T) -> K,
    CompareFn: Fn(&K, &K) -> Ordering,
    IdentityFn: Identify<T, K>,
{
    type Key = K;

    #[inline]
    fn key(&self, value: &T) -> K {
        (self.key)(value)
    }

    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (self.compare)(left, right)
    }

    #[inline]
    fn identity(&self, value: &T) -> String {
        self.identity.identify(value, || (self.key)(value))
    }
}

impl<T, K, KeyFn, CompareFn, IdentityFn> Clone for Rules<T, K, KeyFn, CompareFn, IdentityFn>
where
    KeyFn: Clone,
    CompareFn: Clone,
    IdentityFn: Clone,
{
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            compare: self.compare.clone(),
            identity: self.identity.clone(),
            marker: PhantomData,
        }
    }
}

impl<T, K, KeyFn, CompareFn, IdentityFn> fmt::Debug for Rules<T, K, KeyFn, CompareFn, IdentityFn> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Rules")
            .field("key", &std::any::type_name::<K>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone)]
    struct Account {
        handle: String,
        balance: i64,
    }

    #[rstest]
    fn test_default_identity_is_key_text() {
        let rules = Rules::ordered(|account: &Account| account.balance);
        let account = Account {
            handle: "eve".to_string(),
            balance: -40,
        };
        assert_eq!(rules.identity(&account), "-40");
        assert_eq!(rules.key(&account), -40);
    }

    #[rstest]
    fn test_custom_identity_ignores_key() {
        let rules = Rules::ordered(|account: &Account| account.balance)
            .with_identity(|account: &Account| account.handle.clone());
        let account = Account {
            handle: "eve".to_string(),
            balance: 12,
        };
        assert_eq!(rules.identity(&account), "eve");
    }

    #[rstest]
    #[case(1, 2, Ordering::Greater)]
    #[case(2, 1, Ordering::Less)]
    #[case(3, 3, Ordering::Equal)]
    fn test_custom_comparator(#[case] left: i64, #[case] right: i64, #[case] expected: Ordering) {
        let rules = Rules::new(|account: &Account| account.balance, |a: &i64, b: &i64| b.cmp(a));
        assert_eq!(rules.compare(&left, &right), expected);
    }

    #[rstest]
    fn test_rules_clone_and_debug() {
        let rules = Rules::ordered(|account: &Account| account.balance);
        let cloned = rules.clone();
        assert_eq!(cloned.compare(&1, &2), Ordering::Less);
        assert!(format!("{rules:?}").starts_with("Rules"));
    }
}
