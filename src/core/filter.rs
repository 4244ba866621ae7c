use crate::core::model::Transaction;
use chrono::NaiveDate;

/// Keeps outbound transactions dated within `[start_date, end_date]`.
///
/// Order is preserved and duplicates are kept.
pub fn filter_window(
    transactions: &[Transaction],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| {
            let date = tx.date();
            tx.is_outbound() && date >= start_date && date <= end_date
        })
        .cloned()
        .collect()
}
