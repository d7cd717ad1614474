//! Page-window arithmetic for the history view's page bar.

/// Compute the page indices (0-based) to show in a page bar.
///
/// When every page fits, all of them are returned. Otherwise the window is
/// centered on `current_page` and slides to hug the first or last page instead
/// of shrinking, so its length stays exactly `max_visible`.
pub fn page_window(current_page: usize, total_pages: usize, max_visible: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }

    let max_visible = max_visible.max(1);
    if total_pages <= max_visible {
        return (0..total_pages).collect();
    }

    let current_page = current_page.min(total_pages - 1);
    let last = total_pages - 1;

    let mut start = current_page.saturating_sub(max_visible / 2);
    let end = (start + max_visible - 1).min(last);
    if end == last {
        start = (end + 1).saturating_sub(max_visible);
    }

    (start..=end).collect()
}

/// Number of pages needed for `item_count` items.
pub fn total_pages(item_count: u64, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1) as u64) as usize
}

/// Clamp a 0-based page into `[0, total_pages)`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.saturating_sub(1))
}
