use clap::Args;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::SortDirection;
use crate::services::history_service::{HistoryPage, HistoryView};
use crate::utils::format::{format_amount, format_timestamp, truncate};
use crate::utils::Table;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Page to show, starting at 1
    #[arg(long, conflicts_with_all = ["next", "prev"])]
    pub page: Option<usize>,
    #[arg(long, conflicts_with = "prev")]
    pub next: bool,
    #[arg(long)]
    pub prev: bool,
    /// Rows per page
    #[arg(long)]
    pub size: Option<usize>,
    /// Field to sort by, e.g. createdAt or value
    #[arg(long)]
    pub sort_field: Option<String>,
    /// ASC or DESC
    #[arg(long)]
    pub direction: Option<SortDirection>,
}

pub async fn execute(ctx: &AppContext, view: &HistoryView, args: HistoryArgs) -> Result<(), AppError> {
    let mut query = view.query();
    let mut reshaped = false;

    if let Some(size) = args.size {
        if !ctx.config.page_size_options.contains(&size) {
            return Err(AppError::Usage(format!(
                "Page size must be one of {:?}",
                ctx.config.page_size_options
            )));
        }
        query.size = size;
        reshaped = true;
    }
    if let Some(field) = args.sort_field {
        query.sort_field = field;
        reshaped = true;
    }
    if let Some(direction) = args.direction {
        query.sort_direction = direction;
        reshaped = true;
    }
    if reshaped {
        view.set_query(query.with_page(0));
    }

    let target = match args.page {
        Some(0) => return Err(AppError::Usage("Pages start at 1".to_string())),
        Some(page) => page - 1,
        None if args.next => view.relative_page(true),
        None if args.prev => view.relative_page(false),
        None if reshaped => 0,
        None => query.page,
    };

    match view.load(ctx, target).await? {
        Some(page) => ctx.notifier.info(&render(&page)),
        None => ctx.notifier.info("A newer history request replaced this one"),
    }
    Ok(())
}

fn render(page: &HistoryPage) -> String {
    if page.records.is_empty() {
        return "No transactions yet".to_string();
    }

    let mut table = Table::new(&["Date", "Phone", "Operator", "Amount", "Status", "Reference"]);
    for record in &page.records {
        table.add_row(vec![
            format_timestamp(&record.created_at),
            record.cell_phone.clone(),
            truncate(&record.supplier_name, 16),
            format_amount(record.amount),
            record.status.to_string(),
            truncate(record.transactional_id.as_deref().unwrap_or("-"), 20),
        ]);
    }

    let mut out = table.render();
    if page.total_pages > 1 {
        out.push_str("\n\n");
        out.push_str(&page_bar(page));
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} transactions), completed on this page: {}",
        page.page + 1,
        page.total_pages.max(1),
        page.total_elements,
        format_amount(page.completed_amount)
    ));
    out
}

/// `« 3 4 [5] 6 7 »`, 1-based, arrows only when there is somewhere to go.
fn page_bar(page: &HistoryPage) -> String {
    let mut parts = Vec::with_capacity(page.window.len() + 2);
    if page.has_previous {
        parts.push("«".to_string());
    }
    for &index in &page.window {
        if index == page.page {
            parts.push(format!("[{}]", index + 1));
        } else {
            parts.push((index + 1).to_string());
        }
    }
    if page.has_next {
        parts.push("»".to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionStatus;
    use crate::models::TransactionRecord;
    use chrono::NaiveDateTime;

    fn page(current: usize, total_pages: usize, window: Vec<usize>) -> HistoryPage {
        HistoryPage {
            records: vec![TransactionRecord {
                id: "tx-1".to_string(),
                cell_phone: "3001234567".to_string(),
                amount: 20000,
                supplier_name: "Movistar".to_string(),
                status: TransactionStatus::Success,
                transactional_id: Some("REF-1".to_string()),
                created_at: NaiveDateTime::parse_from_str("2025-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
                updated_at: None,
                message: None,
            }],
            page: current,
            total_pages,
            total_elements: (total_pages * 10) as u64,
            has_next: current + 1 < total_pages,
            has_previous: current > 0,
            window,
            completed_amount: 20000,
        }
    }

    #[test]
    fn test_page_bar_marks_current_page() {
        assert_eq!(page_bar(&page(4, 10, vec![2, 3, 4, 5, 6])), "« 3 4 [5] 6 7 »");
        assert_eq!(page_bar(&page(0, 3, vec![0, 1, 2])), "[1] 2 3 »");
        assert_eq!(page_bar(&page(2, 3, vec![0, 1, 2])), "« 1 2 [3]");
    }

    #[test]
    fn test_render_summary_line() {
        let text = render(&page(0, 1, vec![0]));
        assert!(text.contains("$20.000"));
        assert!(text.contains("REF-1"));
        assert!(!text.contains('«'));
        assert!(text.ends_with("Page 1 of 1 (10 transactions), completed on this page: $20.000"));
    }

    #[test]
    fn test_render_empty_page() {
        let mut empty = page(0, 0, vec![]);
        empty.records.clear();
        assert_eq!(render(&empty), "No transactions yet");
    }
}
