use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::{HistoryQuery, PagedResult, TransactionRecord};
use crate::utils::pagination::{clamp_page, page_window, total_pages};

/// One rendered page of transaction history
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub records: Vec<TransactionRecord>,
    /// 0-based
    pub page: usize,
    pub total_pages: usize,
    pub total_elements: u64,
    pub has_next: bool,
    pub has_previous: bool,
    /// Page indices for the page bar
    pub window: Vec<usize>,
    /// Sum of successful top-ups on this page
    pub completed_amount: i64,
}

impl HistoryPage {
    pub fn from_result(result: PagedResult<TransactionRecord>, query: &HistoryQuery, max_visible: usize) -> Self {
        let page = result.page_number(query.page);
        // Some responses carry only the element count
        let page_count = if result.total_pages == 0 && result.total_elements > 0 {
            total_pages(result.total_elements, query.size)
        } else {
            result.total_pages
        };
        let completed_amount = result
            .content
            .iter()
            .filter(|r| r.status.is_completed())
            .map(|r| r.amount)
            .sum();

        Self {
            window: page_window(page, page_count, max_visible),
            page,
            total_pages: page_count,
            total_elements: result.total_elements,
            has_next: result.has_next(),
            has_previous: result.has_previous(),
            completed_amount,
            records: result.content,
        }
    }
}

/// Paging state for the history table.
///
/// Each load is stamped with an increasing request id; a response that arrives
/// after a newer load was issued is discarded, so a slow older page can never
/// replace the page the user asked for last.
pub struct HistoryView {
    state: Mutex<ViewState>,
    issued: AtomicU64,
}

struct ViewState {
    query: HistoryQuery,
    current: Option<HistoryPage>,
}

impl HistoryView {
    pub fn new(query: HistoryQuery) -> Self {
        Self {
            state: Mutex::new(ViewState {
                query,
                current: None,
            }),
            issued: AtomicU64::new(0),
        }
    }

    pub fn query(&self) -> HistoryQuery {
        self.lock_state().query.clone()
    }

    /// Replace the query (sorting, page size); the next load starts fresh.
    pub fn set_query(&self, query: HistoryQuery) {
        let mut state = self.lock_state();
        state.query = query;
        state.current = None;
    }

    /// Target page for a relative move; stays put at either end.
    pub fn relative_page(&self, forward: bool) -> usize {
        let state = self.lock_state();
        match &state.current {
            Some(page) if forward && page.has_next => page.page + 1,
            Some(page) if !forward && page.has_previous => page.page.saturating_sub(1),
            Some(page) => page.page,
            None => state.query.page,
        }
    }

    /// Load a 0-based page.
    ///
    /// Returns `Ok(None)` when a newer load was issued while this one was in flight.
    pub async fn load(&self, ctx: &AppContext, page: usize) -> Result<Option<HistoryPage>, AppError> {
        ctx.require_sign_in()?;

        let query = {
            let state = self.lock_state();
            let page = match &state.current {
                Some(current) if current.total_pages > 0 => clamp_page(page, current.total_pages),
                _ => page,
            };
            state.query.with_page(page).normalized(&ctx.config)
        };
        let ticket = self.issue();

        let result = ctx.client.history(&query).await?;

        if !self.accept(ticket) {
            debug!("Discarding history page {} from superseded request {}", query.page, ticket);
            return Ok(None);
        }

        let loaded = HistoryPage::from_result(result, &query, ctx.config.max_visible_pages);
        let mut state = self.lock_state();
        state.query = query;
        state.current = Some(loaded.clone());
        Ok(Some(loaded))
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn accept(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::transaction::TransactionStatus;
    use chrono::NaiveDateTime;

    fn record(id: &str, amount: i64, status: TransactionStatus) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            cell_phone: "3001234567".to_string(),
            amount,
            supplier_name: "Claro".to_string(),
            status,
            transactional_id: None,
            created_at: NaiveDateTime::parse_from_str("2025-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .expect("valid timestamp"),
            updated_at: None,
            message: None,
        }
    }

    fn paged(page: usize, total_pages: usize, content: Vec<TransactionRecord>) -> PagedResult<TransactionRecord> {
        PagedResult {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            pageable: Some(crate::models::page::PageableInfo {
                page_number: page,
                page_size: 10,
                offset: (page * 10) as u64,
            }),
            total_elements: (total_pages * 10) as u64,
            total_pages,
            page: None,
            first: Some(page == 0),
            last: Some(page + 1 >= total_pages),
            has_next: None,
            has_previous: None,
        }
    }

    fn query(page: usize) -> HistoryQuery {
        HistoryQuery::first_page(&Config::default()).with_page(page)
    }

    #[test]
    fn test_page_count_from_element_count() {
        let mut result = paged(1, 0, vec![]);
        result.total_elements = 25;

        let page = HistoryPage::from_result(result, &query(1), 5);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.window, vec![0, 1, 2]);
    }

    #[test]
    fn test_page_summary() {
        let result = paged(
            7,
            20,
            vec![
                record("a", 5000, TransactionStatus::Success),
                record("b", 2000, TransactionStatus::Failed),
                record("c", 1000, TransactionStatus::Completed),
            ],
        );

        let page = HistoryPage::from_result(result, &query(7), 5);

        assert_eq!(page.window, vec![5, 6, 7, 8, 9]);
        assert_eq!(page.completed_amount, 6000);
        assert!(page.has_next && page.has_previous);
    }

    #[test]
    fn test_relative_moves_stop_at_edges() {
        let view = HistoryView::new(HistoryQuery::first_page(&Config::default()));
        assert_eq!(view.relative_page(true), 0);

        view.lock_state().current = Some(HistoryPage::from_result(paged(0, 3, vec![]), &query(0), 5));
        assert_eq!(view.relative_page(true), 1);
        assert_eq!(view.relative_page(false), 0);

        view.lock_state().current = Some(HistoryPage::from_result(paged(2, 3, vec![]), &query(2), 5));
        assert_eq!(view.relative_page(true), 2);
        assert_eq!(view.relative_page(false), 1);
    }

    #[test]
    fn test_only_latest_ticket_is_accepted() {
        let view = HistoryView::new(HistoryQuery::first_page(&Config::default()));

        let older = view.issue();
        let newer = view.issue();

        assert!(!view.accept(older));
        assert!(view.accept(newer));
    }
}
