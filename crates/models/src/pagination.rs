/// Courses per listing page
pub const PAGE_SIZE: usize = 9;

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    /// Never less than 1, even for an empty result set
    pub total_pages: u64,
    /// The requested page clamped to `1..=total_pages`
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 1,
            current_page: 1,
        }
    }

    /// Cuts page `page` (1-indexed) out of `items`.
    ///
    /// A page past the end yields no items but still reports a valid
    /// `current_page`. Page 0 is read as page 1.
    pub fn paginate(items: Vec<T>, page: u64, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_count = items.len() as u64;
        let total_pages = total_count.div_ceil(page_size as u64).max(1);

        let start = usize::try_from(page - 1)
            .ok()
            .and_then(|p| p.checked_mul(page_size))
            .unwrap_or(usize::MAX);

        let items = items.into_iter().skip(start).take(page_size).collect();

        Self {
            items,
            total_count,
            total_pages,
            current_page: page.min(total_pages),
        }
    }
}
