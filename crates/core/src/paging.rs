//! Collection paging: the request-side window and the response-side metadata.
//!
//! `hasMoreItems` is always *derived* from `skipCount + count < totalItems`,
//! never copied from an externally supplied flag. Deriving it makes the
//! classic mis-reporting for non-zero `skipCount` windows unrepresentable.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Request-side paging window (`skipCount` / `maxItems`).
///
/// An absent `maxItems` returns the full remainder of the result set in
/// one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub skip_count: i64,
    pub max_items: Option<i64>,
}

impl Paging {
    pub fn new(skip_count: i64, max_items: Option<i64>) -> Self {
        Self {
            skip_count,
            max_items,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.skip_count < 0 {
            return Err(CoreError::Validation(
                "Parameter skipCount must be greater than or equal to zero".into(),
            ));
        }
        if let Some(max) = self.max_items {
            if max <= 0 {
                return Err(CoreError::Validation(
                    "Parameter maxItems must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// The index range this window selects out of `total` matched items.
    ///
    /// A `skip_count` at or beyond `total` yields an empty range.
    pub fn window(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.skip_count as usize).min(total);
        let end = match self.max_items {
            Some(max) => start.saturating_add(max as usize).min(total),
            None => total,
        };
        start..end
    }
}

/// Response-side paging metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub count: i64,
    pub total_items: i64,
    pub skip_count: i64,
    pub has_more_items: bool,
}

impl Pagination {
    /// Build metadata for a window of `count` items returned out of
    /// `total_items` after skipping `skip_count`.
    pub fn from_window(total_items: i64, skip_count: i64, count: i64) -> Self {
        Self {
            count,
            total_items,
            skip_count,
            has_more_items: skip_count + count < total_items,
        }
    }
}

/// One page of typed entities plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PagedList<T> {
    /// Page `matched` (the full filtered, sorted result set) through the
    /// given window.
    pub fn paginate(matched: Vec<T>, paging: &Paging) -> Self {
        let total = matched.len();
        let range = paging.window(total);
        let count = range.len();
        let items: Vec<T> = matched
            .into_iter()
            .skip(range.start)
            .take(count)
            .collect();
        Self {
            pagination: Pagination::from_window(total as i64, paging.skip_count, count as i64),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_when_max_items_absent() {
        let page = PagedList::paginate((0..5).collect(), &Paging::default());
        assert_eq!(page.items, vec![0, 1, 2, 3, 4]);
        assert_eq!(page.pagination, Pagination::from_window(5, 0, 5));
        assert!(!page.pagination.has_more_items);
    }

    #[test]
    fn first_window_reports_more_items() {
        let page = PagedList::paginate((0..5).collect(), &Paging::new(0, Some(2)));
        assert_eq!(page.items, vec![0, 1]);
        assert_eq!(page.pagination.count, 2);
        assert_eq!(page.pagination.total_items, 5);
        assert!(page.pagination.has_more_items);
    }

    // skip 2, max 5 over 5 items: the window drains the set, so the flag
    // must be false even though a naive `count == maxItems` check says
    // otherwise.
    #[test]
    fn exhausted_window_reports_no_more_items() {
        let page = PagedList::paginate((0..5).collect(), &Paging::new(2, Some(5)));
        assert_eq!(page.items, vec![2, 3, 4]);
        assert_eq!(page.pagination.count, 3);
        assert_eq!(page.pagination.skip_count, 2);
        assert!(!page.pagination.has_more_items);
    }

    #[test]
    fn skip_beyond_total_yields_empty_page() {
        let page = PagedList::paginate((0..3).collect::<Vec<i32>>(), &Paging::new(10, Some(2)));
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.count, 0);
        assert!(!page.pagination.has_more_items);
    }

    #[test]
    fn negative_skip_count_is_rejected() {
        assert!(Paging::new(-1, None).validate().is_err());
    }

    #[test]
    fn zero_max_items_is_rejected() {
        assert!(Paging::new(0, Some(0)).validate().is_err());
    }
}
