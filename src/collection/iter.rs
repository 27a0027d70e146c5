use std::iter::FusedIterator;

/// Iterator over the members of a [`KeyedCollection`](super::KeyedCollection)
/// in ascending key order.
///
/// This `struct` is created by [`KeyedCollection::iter`](super::KeyedCollection::iter).
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(entries: &'a [T]) -> Self {
        Self {
            inner: entries.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator over the members of a
/// [`KeyedCollection`](super::KeyedCollection) in ascending key order.
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(entries: Vec<T>) -> Self {
        Self {
            inner: entries.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use crate::{KeyedCollection, Rules};
    use rstest::rstest;

    #[rstest]
    fn test_iteration_restarts_from_smallest_key() {
        let collection =
            KeyedCollection::try_from_iter(Rules::ordered(|value: &i32| *value), [3, 1, 2]).unwrap();

        let mut first_pass = collection.iter();
        assert_eq!(first_pass.next(), Some(&1));

        let second_pass: Vec<i32> = collection.iter().copied().collect();
        assert_eq!(second_pass, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_iteration_is_double_ended_and_exact() {
        let collection =
            KeyedCollection::try_from_iter(Rules::ordered(|value: &i32| *value), [3, 1, 2]).unwrap();

        let iterator = collection.iter();
        assert_eq!(iterator.len(), 3);
        let reversed: Vec<&i32> = iterator.rev().collect();
        assert_eq!(reversed, vec![&3, &2, &1]);
    }

    #[rstest]
    fn test_owned_iteration() {
        let collection =
            KeyedCollection::try_from_iter(Rules::ordered(|value: &i32| *value), [9, -4]).unwrap();

        let owned: Vec<i32> = collection.into_iter().collect();
        assert_eq!(owned, vec![-4, 9]);
    }
}
