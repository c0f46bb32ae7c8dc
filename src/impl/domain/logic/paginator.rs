use crate::entities::Page;

/// Slices `items` into the requested 1-based page. Page 0 is treated as the
/// first page; pages past the end are empty.
pub(crate) fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_into_pages() {
        let page = paginate((1..=45).collect(), 3, 20);
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total_items, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_zero_is_first_page() {
        let page = paginate(vec!['a', 'b', 'c'], 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec!['a', 'b']);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = paginate(vec![1, 2, 3], 5, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let empty = paginate(Vec::<u8>::new(), 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}
