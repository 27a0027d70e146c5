//! Error types for keyed collections.
//!
//! [`KeyedError`] covers the structurally impossible requests: a value without
//! an identity, or a value colliding with an existing member. Ordinary misses
//! (deleting or updating something that is not there) are reported as `None`
//! by the collection instead.
//!
//! [`InvariantViolation`] is reported by
//! [`KeyedCollection::check_invariants`](crate::KeyedCollection::check_invariants).

/// Errors raised by mutating operations on a
/// [`KeyedCollection`](crate::KeyedCollection).
///
/// Errors are raised at the point of violation and never retried. A
/// multi-value call that fails keeps the values it had already applied.
///
/// # Examples
///
/// ```rust
/// use keyed_order::KeyedError;
///
/// let error = KeyedError::DuplicateIdentity {
///     identity: "a".to_string(),
/// };
/// assert_eq!(format!("{error}"), "identity `a` is already present");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyedError {
    /// The value's identity is empty, which is reserved for absent values.
    #[error("value has an empty identity")]
    InvalidValue,

    /// A member with the same identity is already present.
    #[error("identity `{identity}` is already present")]
    DuplicateIdentity {
        /// The identity of the rejected value.
        identity: String,
    },

    /// A member with the same key is already present.
    #[error("value `{identity}` has the same key as member `{existing}`")]
    DuplicateKey {
        /// The identity of the rejected value.
        identity: String,
        /// The identity of the member already holding the key.
        existing: String,
    },

    /// No member has the requested identity.
    #[error("identity `{identity}` is not present")]
    NotFound {
        /// The identity that was looked up.
        identity: String,
    },
}

/// Result alias for fallible collection operations.
pub type KeyedResult<T> = Result<T, KeyedError>;

/// A broken collection invariant.
///
/// A collection built only through its own operations never reports one;
/// they indicate rules that disagree with themselves (a non-deterministic key
/// or a comparator that is not a total order).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The member at `position` does not sort after its predecessor.
    #[error("member at position {position} is ordered before its predecessor")]
    Unsorted {
        /// Position of the offending member.
        position: usize,
    },

    /// The member at `position` has the same key as its predecessor.
    #[error("member at position {position} shares its key with its predecessor")]
    SharedKey {
        /// Position of the offending member.
        position: usize,
    },

    /// Two members share an identity.
    #[error("identity `{identity}` is held by more than one member")]
    SharedIdentity {
        /// The repeated identity.
        identity: String,
    },

    /// A member is missing from the identity index, or indexed under a stale key.
    #[error("identity `{identity}` is not indexed under its current key")]
    Unindexed {
        /// The member's identity.
        identity: String,
    },

    /// The identity index and the ordered sequence differ in size.
    #[error("identity index holds {indexed} entries for {members} members")]
    IndexSize {
        /// Entries in the identity index.
        indexed: usize,
        /// Members in the ordered sequence.
        members: usize,
    },
}

static_assertions::assert_impl_all!(KeyedError: std::error::Error, Send, Sync, Clone);
static_assertions::assert_impl_all!(InvariantViolation: std::error::Error, Send, Sync, Clone);
