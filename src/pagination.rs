//! Page-boundary arithmetic over a fully materialized, ordered result set.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::domain::types::Cursor;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 32;

/// Position of one page inside a result set of `total` items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageBounds {
    /// 1-based offset of the first item on the page.
    pub offset: usize,
    /// Number of items on the page, never more than the page size.
    pub count: usize,
    pub total: usize,
    /// Offset of the following page, set only when more items remain.
    pub next_offset: Option<usize>,
}

impl PageBounds {
    pub fn compute(total: usize, offset: Cursor, page_size: NonZeroUsize) -> Self {
        let offset = offset.get();
        let page_size = page_size.get();
        let remaining = (total + 1).saturating_sub(offset);
        let count = remaining.min(page_size);
        let next_offset = (remaining > page_size).then_some(offset + count);

        Self {
            offset,
            count,
            total,
            next_offset,
        }
    }

    /// Zero-based index range of the page within the result set.
    fn range(&self) -> std::ops::Range<usize> {
        let start = (self.offset - 1).min(self.total);
        start..start + self.count
    }
}

/// One screen worth of items plus the metadata needed to continue paging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub offset: usize,
    pub count: usize,
    pub total: usize,
    pub next_offset: Option<usize>,
}

impl<T> Page<T> {
    /// 1-based index of the last item shown, or `offset - 1` for an empty slice.
    pub fn last(&self) -> usize {
        self.offset + self.count - 1
    }
}

/// Outcome of slicing a result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing<T> {
    /// The search matched nothing at all.
    NoMatches,
    Page(Page<T>),
}

impl<T: Clone> Listing<T> {
    /// Slices `items` starting at `offset`.
    pub fn slice(items: &[T], offset: Cursor, page_size: NonZeroUsize) -> Self {
        if items.is_empty() {
            return Listing::NoMatches;
        }

        let bounds = PageBounds::compute(items.len(), offset, page_size);

        Listing::Page(Page {
            entries: items[bounds.range()].to_vec(),
            offset: bounds.offset,
            count: bounds.count,
            total: bounds.total,
            next_offset: bounds.next_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn cursor(n: usize) -> Cursor {
        Cursor::new(n).unwrap()
    }

    fn page<T: Clone>(listing: Listing<T>) -> Page<T> {
        match listing {
            Listing::Page(page) => page,
            Listing::NoMatches => panic!("expected a page"),
        }
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let bounds = PageBounds::compute(32, Cursor::FIRST, size(32));
        assert_eq!(bounds.count, 32);
        assert_eq!(bounds.next_offset, None);
    }

    #[test]
    fn one_over_page_size_spills_to_second_page() {
        let first = PageBounds::compute(33, Cursor::FIRST, size(32));
        assert_eq!(first.count, 32);
        assert_eq!(first.next_offset, Some(33));

        let second = PageBounds::compute(33, cursor(33), size(32));
        assert_eq!(second.count, 1);
        assert_eq!(second.next_offset, None);
    }

    #[test]
    fn walks_five_items_two_at_a_time() {
        let items: Vec<u32> = (1..=5).collect();
        let mut offset = Some(1);
        let mut seen = Vec::new();

        while let Some(current) = offset {
            let page = page(Listing::slice(&items, cursor(current), size(2)));
            seen.push((page.offset, page.count, page.next_offset));
            offset = page.next_offset;
        }

        assert_eq!(
            seen,
            vec![(1, 2, Some(3)), (3, 2, Some(5)), (5, 1, None)]
        );
    }

    #[test]
    fn offset_past_end_is_an_empty_slice() {
        let items: Vec<u32> = (1..=5).collect();
        let page = page(Listing::slice(&items, cursor(10), size(32)));
        assert!(page.entries.is_empty());
        assert_eq!(page.count, 0);
        assert_eq!(page.total, 5);
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn offset_just_past_end_is_an_empty_slice() {
        let items: Vec<u32> = (1..=5).collect();
        let page = page(Listing::slice(&items, cursor(6), size(2)));
        assert_eq!(page.count, 0);
        assert_eq!(page.last(), 5);
    }

    #[test]
    fn empty_result_set_has_no_matches() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(
            Listing::slice(&items, Cursor::FIRST, size(32)),
            Listing::NoMatches
        );
    }

    #[test]
    fn slice_matches_offset_window_for_every_offset() {
        let items: Vec<u32> = (1..=11).collect();
        for page_size in 1..=12 {
            for offset in 1..=13 {
                let page = page(Listing::slice(&items, cursor(offset), size(page_size)));
                assert!(page.count <= page_size);
                let start = (offset - 1).min(items.len());
                assert_eq!(page.entries, items[start..start + page.count].to_vec());
            }
        }
    }

    #[test]
    fn repeated_slicing_is_idempotent() {
        let items: Vec<u32> = (1..=7).collect();
        let a = Listing::slice(&items, cursor(4), size(3));
        let b = Listing::slice(&items, cursor(4), size(3));
        assert_eq!(a, b);
    }
}
