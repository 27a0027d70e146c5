//! Ordered Search.
//!
//! This module provides [`ordered_search`], a generalized binary search over any
//! [`RandomAccess`] sequence. Instead of comparing elements for equality, the
//! search is driven by a *probe*: a function reporting where the target sits
//! relative to a candidate element.
//!
//! The result is either an exact match ([`Located::Found`]) or an insertion
//! point ([`Located::Vacant`]) with explicit sentinels for "before the first
//! element" and "after the last element".
//!
//! # Probe Convention
//!
//! `probe(element)` returns the ordering of the *target* relative to `element`:
//!
//! - `Ordering::Less`: the target belongs before `element`
//! - `Ordering::Equal`: `element` is the target
//! - `Ordering::Greater`: the target belongs after `element`
//!
//! For a sequence sorted ascending by key, `|element| target.cmp(&key(element))`
//! is a valid probe. The probe must agree with the sequence's sort order;
//! the result is unspecified otherwise.
//!
//! # Examples
//!
//! ```rust
//! use keyed_order::search::{InsertionPoint, Located, ordered_search};
//!
//! let sequence = [1, 2, 3, 4, 5, 10, 16, 91, 240];
//!
//! assert_eq!(ordered_search(&sequence[..], |element| 16.cmp(element)), Located::Found(6));
//! assert_eq!(
//!     ordered_search(&sequence[..], |element| 70.cmp(element)),
//!     Located::Vacant(InsertionPoint::Before(7))
//! );
//! assert_eq!(ordered_search(&sequence[..], |element| 700.cmp(element)).to_signed(), 9);
//! assert_eq!(ordered_search(&sequence[..], |element| (-1).cmp(element)).to_signed(), -1);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;

/// A sequence whose elements can be read by position in constant time.
///
/// Implemented for slices, `Vec` and `VecDeque`.
pub trait RandomAccess {
    /// The element type.
    type Item;

    /// Returns the number of elements.
    fn length(&self) -> usize;

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// May panic if `index >= self.length()`.
    fn at(&self, index: usize) -> &Self::Item;
}

impl<T> RandomAccess for [T] {
    type Item = T;

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> RandomAccess for Vec<T> {
    type Item = T;

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> RandomAccess for VecDeque<T> {
    type Item = T;

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }
}

/// Where a missing target would be spliced in to preserve order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsertionPoint {
    /// The target precedes every element.
    BeforeFirst,
    /// The target belongs immediately before the element at this index.
    Before(usize),
    /// The target follows every element. Carries the sequence length.
    ///
    /// An empty sequence always reports `AfterLast(0)`.
    AfterLast(usize),
}

impl InsertionPoint {
    /// Returns the index at which the target must be inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::search::InsertionPoint;
    ///
    /// assert_eq!(InsertionPoint::BeforeFirst.splice_index(), 0);
    /// assert_eq!(InsertionPoint::Before(3).splice_index(), 3);
    /// assert_eq!(InsertionPoint::AfterLast(5).splice_index(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn splice_index(self) -> usize {
        match self {
            Self::BeforeFirst => 0,
            Self::Before(index) | Self::AfterLast(index) => index,
        }
    }

    /// Returns the signed form of the insertion point: `-1` before the first
    /// element, the sequence length after the last one, the splice index
    /// otherwise.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_signed(self) -> isize {
        match self {
            Self::BeforeFirst => -1,
            Self::Before(index) | Self::AfterLast(index) => index as isize,
        }
    }
}

/// The outcome of an [`ordered_search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Located {
    /// The element at this index probed `Equal`.
    Found(usize),
    /// No element probed `Equal`.
    Vacant(InsertionPoint),
}

impl Located {
    /// Returns the index of the match, if any.
    #[inline]
    #[must_use]
    pub const fn found(self) -> Option<usize> {
        match self {
            Self::Found(index) => Some(index),
            Self::Vacant(_) => None,
        }
    }

    /// Returns `true` if the search found a match.
    #[inline]
    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the match index, or the signed insertion point
    /// (see [`InsertionPoint::to_signed`]).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_signed(self) -> isize {
        match self {
            Self::Found(index) => index as isize,
            Self::Vacant(point) => point.to_signed(),
        }
    }
}

static_assertions::assert_impl_all!(Located: Copy, Eq, std::hash::Hash, Send, Sync);
static_assertions::assert_impl_all!(InsertionPoint: Copy, Eq, std::hash::Hash, Send, Sync);

/// Searches a sorted sequence using a probe function.
///
/// Boundary cases are settled before the general loop:
///
/// - an empty sequence yields `Vacant(AfterLast(0))`
/// - a target before the first element yields `Vacant(BeforeFirst)`
/// - a target after the last element yields `Vacant(AfterLast(len))`
/// - a match on the first or last element is returned directly
///
/// Otherwise the bounds are narrowed until they meet, returning the first
/// element ordered after the target as the insertion point.
///
/// # Complexity
///
/// O(log n) probes.
///
/// # Examples
///
/// ```rust
/// use keyed_order::search::{InsertionPoint, Located, ordered_search};
///
/// let names = vec!["ash", "birch", "elm"];
/// assert_eq!(ordered_search(&names, |name: &&str| "birch".cmp(*name)), Located::Found(1));
/// assert_eq!(
///     ordered_search(&names, |name: &&str| "cedar".cmp(*name)),
///     Located::Vacant(InsertionPoint::Before(2))
/// );
/// ```
pub fn ordered_search<S, F>(sequence: &S, mut probe: F) -> Located
where
    S: RandomAccess + ?Sized,
    F: FnMut(&S::Item) -> Ordering,
{
    let length = sequence.length();
    if length == 0 {
        return Located::Vacant(InsertionPoint::AfterLast(0));
    }

    match probe(sequence.at(0)) {
        Ordering::Less => return Located::Vacant(InsertionPoint::BeforeFirst),
        Ordering::Equal => return Located::Found(0),
        Ordering::Greater => {}
    }

    let last = length - 1;
    match probe(sequence.at(last)) {
        Ordering::Greater => return Located::Vacant(InsertionPoint::AfterLast(length)),
        Ordering::Equal => return Located::Found(last),
        Ordering::Less => {}
    }

    let mut low = 0;
    let mut high = length;
    while low < high {
        let middle = low + (high - low) / 2;
        match probe(sequence.at(middle)) {
            Ordering::Less => high = middle,
            Ordering::Greater => low = middle + 1,
            Ordering::Equal => return Located::Found(middle),
        }
    }

    Located::Vacant(InsertionPoint::Before(low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SEQUENCE: [i32; 9] = [1, 2, 3, 4, 5, 10, 16, 91, 240];

    fn search_for(target: i32) -> Located {
        ordered_search(&SEQUENCE[..], |element| target.cmp(element))
    }

    #[rstest]
    #[case(70, 7)]
    #[case(700, 9)]
    #[case(-1, -1)]
    #[case(0, -1)]
    #[case(6, 5)]
    #[case(100, 8)]
    fn test_insertion_points(#[case] target: i32, #[case] expected: isize) {
        let located = search_for(target);
        assert!(!located.is_found());
        assert_eq!(located.to_signed(), expected);
    }

    #[rstest]
    fn test_every_member_is_found() {
        for (index, element) in SEQUENCE.iter().enumerate() {
            assert_eq!(search_for(*element), Located::Found(index));
        }
    }

    #[rstest]
    fn test_empty_sequence() {
        let empty: [i32; 0] = [];
        let located = ordered_search(&empty[..], |element| 3.cmp(element));
        assert_eq!(located, Located::Vacant(InsertionPoint::AfterLast(0)));
        assert_eq!(located.to_signed(), 0);
    }

    #[rstest]
    #[case(4, Located::Vacant(InsertionPoint::BeforeFirst))]
    #[case(5, Located::Found(0))]
    #[case(6, Located::Vacant(InsertionPoint::AfterLast(1)))]
    fn test_single_element(#[case] target: i32, #[case] expected: Located) {
        assert_eq!(ordered_search(&[5][..], |element| target.cmp(element)), expected);
    }

    #[rstest]
    fn test_all_equal_probes_match_first() {
        let sequence = [7, 7, 7, 7];
        assert_eq!(
            ordered_search(&sequence[..], |_| Ordering::Equal),
            Located::Found(0)
        );
    }

    #[rstest]
    fn test_probe_always_greater_lands_after_last() {
        let sequence = [1, 2, 3];
        assert_eq!(
            ordered_search(&sequence[..], |_| Ordering::Greater),
            Located::Vacant(InsertionPoint::AfterLast(3))
        );
    }

    #[rstest]
    fn test_probe_always_less_lands_before_first() {
        let sequence = [1, 2, 3];
        assert_eq!(
            ordered_search(&sequence[..], |_| Ordering::Less),
            Located::Vacant(InsertionPoint::BeforeFirst)
        );
    }

    #[rstest]
    fn test_descending_sequence_with_reversed_probe() {
        let sequence = [50, 40, 30, 20, 10];
        let located = ordered_search(&sequence[..], |element: &i32| element.cmp(&25));
        assert_eq!(located, Located::Vacant(InsertionPoint::Before(3)));
    }

    #[rstest]
    fn test_vec_deque_is_searchable() {
        let sequence: VecDeque<i32> = SEQUENCE.iter().copied().collect();
        assert_eq!(
            ordered_search(&sequence, |element| 91.cmp(element)),
            Located::Found(7)
        );
    }

    #[rstest]
    fn test_probe_count_is_logarithmic() {
        let sequence: Vec<u32> = (0..1024).map(|value| value * 2).collect();
        let mut probes = 0;
        let located = ordered_search(&sequence, |element| {
            probes += 1;
            777.cmp(element)
        });
        assert_eq!(located, Located::Vacant(InsertionPoint::Before(389)));
        assert!(probes <= 2 + 11, "used {probes} probes");
    }
}
