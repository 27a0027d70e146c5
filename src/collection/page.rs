//! Cursor pagination.
//!
//! A page is anchored on a cursor key and walks away from it: forward for
//! [`PageMode::After`], backward for [`PageMode::Before`]. The cursor's own
//! member is never part of the page, and a cursor need not be a member at all,
//! so a caller can keep paging through a collection that changes between
//! calls using nothing but the key of the last item it saw.
//!
//! Pages are always returned in ascending key order.

use super::KeyedCollection;
use crate::rules::KeyRules;
use crate::search::Located;

/// Scan direction of a page, relative to its cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PageMode {
    /// Members with keys greater than the cursor.
    #[default]
    After,
    /// Members with keys less than the cursor.
    Before,
}

impl<T, R: KeyRules<T>> KeyedCollection<T, R> {
    /// Returns the position a page starts from.
    ///
    /// For `After` the page begins at this position; for `Before` it ends
    /// just before it.
    fn page_start(&self, cursor: Option<&R::Key>, mode: PageMode) -> usize {
        let Some(cursor) = cursor else {
            return match mode {
                PageMode::After => 0,
                PageMode::Before => self.entries.len(),
            };
        };
        match self.locate_key(cursor) {
            Located::Found(position) => match mode {
                PageMode::After => position + 1,
                PageMode::Before => position,
            },
            Located::Vacant(point) => point.splice_index(),
        }
    }

    /// Returns up to `limit` members on the `mode` side of `cursor`.
    ///
    /// Without a cursor, `After` pages from the smallest key and `Before`
    /// pages back from the largest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::prelude::*;
    ///
    /// let collection = KeyedCollection::try_from_iter(Rules::ordered(|value: &u32| *value), [5, 1, 3]).unwrap();
    ///
    /// assert_eq!(collection.paginated(Some(&1), 1, PageMode::After), vec![&3]);
    /// assert_eq!(collection.paginated(Some(&3), 10, PageMode::Before), vec![&1]);
    /// assert_eq!(collection.paginated(None, 2, PageMode::Before), vec![&3, &5]);
    /// assert_eq!(collection.paginated(Some(&4), 10, PageMode::After), vec![&5]);
    /// ```
    pub fn paginated(&self, cursor: Option<&R::Key>, limit: usize, mode: PageMode) -> Vec<&T> {
        let start = self.page_start(cursor, mode);
        match mode {
            PageMode::After => self.entries[start..].iter().take(limit).collect(),
            PageMode::Before => self.entries[start.saturating_sub(limit)..start]
                .iter()
                .collect(),
        }
    }

    /// Returns up to `limit` members matching `predicate` on the `mode` side
    /// of `cursor`.
    ///
    /// Members are tested one at a time while scanning away from the cursor;
    /// only matches count toward `limit`, and the scan stops as soon as the
    /// page is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_order::prelude::*;
    ///
    /// let collection = KeyedCollection::try_from_iter(Rules::ordered(|value: &u32| *value), 1..=10).unwrap();
    /// let even = |value: &u32| value % 2 == 0;
    ///
    /// assert_eq!(collection.paginated_where(Some(&3), 2, PageMode::After, even), vec![&4, &6]);
    /// assert_eq!(collection.paginated_where(Some(&9), 3, PageMode::Before, even), vec![&4, &6, &8]);
    /// ```
    pub fn paginated_where<P>(
        &self,
        cursor: Option<&R::Key>,
        limit: usize,
        mode: PageMode,
        mut predicate: P,
    ) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        let start = self.page_start(cursor, mode);
        match mode {
            PageMode::After => self.entries[start..]
                .iter()
                .filter(|value| predicate(*value))
                .take(limit)
                .collect(),
            PageMode::Before => {
                let mut page: Vec<&T> = self.entries[..start]
                    .iter()
                    .rev()
                    .filter(|value| predicate(*value))
                    .take(limit)
                    .collect();
                page.reverse();
                page
            }
        }
    }

    /// Pages relative to the key of `value`.
    ///
    /// `value` need not be a member.
    pub fn paginated_by_value(&self, value: &T, limit: usize, mode: PageMode) -> Vec<&T> {
        let cursor = self.rules.key(value);
        self.paginated(Some(&cursor), limit, mode)
    }

    /// Pages relative to the key of `value`, keeping only members matching
    /// `predicate`.
    pub fn paginated_by_value_where<P>(
        &self,
        value: &T,
        limit: usize,
        mode: PageMode,
        predicate: P,
    ) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        let cursor = self.rules.key(value);
        self.paginated_where(Some(&cursor), limit, mode, predicate)
    }
}
