use crate::models::report::{FinancialSummary, ReportPeriod};
use crate::models::transaction::{Transaction, TransactionType};

/// Totals over exactly the given transactions. No caching: callers pass the
/// current slice every time.
pub fn compute_summary<'a, I>(transactions: I) -> FinancialSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = FinancialSummary::default();
    for transaction in transactions {
        match transaction.kind {
            TransactionType::Income => summary.total_income += transaction.amount,
            TransactionType::Expense => summary.total_expenses += transaction.amount,
        }
        summary.transactions_count += 1;
    }
    summary.net_profit = summary.total_income - summary.total_expenses;
    summary
}

pub fn summarize_period(transactions: &[Transaction], period: ReportPeriod) -> FinancialSummary {
    compute_summary(transactions.iter().filter(|t| period.includes(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, amount: f64, kind: TransactionType) -> Transaction {
        Transaction {
            id: format!("{}-{}", date, amount),
            date: date.to_string(),
            description: "test".to_string(),
            category: String::new(),
            amount,
            kind,
            deleted_at: None,
        }
    }

    #[test]
    fn empty_set_is_all_zeros() {
        let summary = compute_summary(&Vec::<Transaction>::new());
        assert_eq!(summary, FinancialSummary::default());
    }

    #[test]
    fn income_minus_expenses() {
        let transactions = vec![
            tx("2023-10-05", 25000.0, TransactionType::Income),
            tx("2023-10-02", 3000.0, TransactionType::Expense),
            tx("2023-10-01", 15000.0, TransactionType::Expense),
        ];
        let summary = compute_summary(&transactions);
        assert_eq!(summary.total_income, 25000.0);
        assert_eq!(summary.total_expenses, 18000.0);
        assert_eq!(summary.net_profit, 7000.0);
        assert_eq!(summary.transactions_count, 3);
    }

    #[test]
    fn net_profit_can_go_negative() {
        let transactions = vec![tx("2024-01-01", 10.0, TransactionType::Expense)];
        let summary = compute_summary(&transactions);
        assert_eq!(summary.net_profit, -10.0);
        assert_eq!(summary.net_profit, summary.total_income - summary.total_expenses);
    }

    #[test]
    fn period_only_counts_matching_dates() {
        let transactions = vec![
            tx("2023-10-05", 100.0, TransactionType::Income),
            tx("2023-11-05", 40.0, TransactionType::Expense),
            tx("2022-10-05", 7.0, TransactionType::Income),
        ];
        let october = summarize_period(&transactions, ReportPeriod::Monthly { year: 2023, month: 10 });
        assert_eq!(october.transactions_count, 1);
        assert_eq!(october.net_profit, 100.0);

        let year = summarize_period(&transactions, ReportPeriod::Yearly { year: 2023 });
        assert_eq!(year.transactions_count, 2);
        assert_eq!(year.net_profit, 60.0);
    }
}
