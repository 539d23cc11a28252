//! Monthly dashboard figures computed from ledger entries.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::ledger::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStep {
    Prev,
    Next,
}

/// Income, spending (including installment fees) and the running balance
/// at the end of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Income dated within the month.
    pub total_income: i64,
    /// Expenses dated within the month, installment fees included.
    pub total_expense: i64,
    /// Running balance over every entry up to the month's last day.
    pub balance: i64,
}

/// All-time totals across a user's whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Number of recorded transactions.
    pub total_transactions: usize,
    /// Sum of every income entry.
    pub total_income: i64,
    /// Sum of every expense entry, installment fees included.
    pub total_expense: i64,
    /// `total_income - total_expense`.
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Expense category name.
    pub category: String,
    /// Spending in the category, installment fees included.
    pub amount: i64,
    /// Share of the month's spending, rounded to a whole percent.
    pub percentage: u32,
}

/// First and last day of `month` (1-based), or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = shift_month(year, month, MonthStep::Next);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((first, last))
}

/// Moves one month back or forward, wrapping across year boundaries.
pub fn shift_month(year: i32, month: u32, step: MonthStep) -> (i32, u32) {
    match step {
        MonthStep::Prev if month <= 1 => (year - 1, 12),
        MonthStep::Prev => (year, month - 1),
        MonthStep::Next if month >= 12 => (year + 1, 1),
        MonthStep::Next => (year, month + 1),
    }
}

/// Entries dated within the month, newest first.
pub fn transactions_in_month(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<&Transaction> {
    let Some((first, last)) = bounds_or_warn(year, month) else {
        return Vec::new();
    };

    let mut selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.date >= first && tx.date <= last)
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}

/// Totals for the month. The balance covers every entry up to the end of
/// the month, not just the month itself.
pub fn monthly_summary(transactions: &[Transaction], year: i32, month: u32) -> MonthlySummary {
    let Some((first, last)) = bounds_or_warn(year, month) else {
        return MonthlySummary::default();
    };

    let mut summary = MonthlySummary::default();
    for tx in transactions.iter().filter(|tx| tx.date <= last) {
        summary.balance = summary.balance.saturating_add(tx.balance_delta());
        if tx.date < first {
            continue;
        }
        match tx.kind {
            TransactionType::Income => {
                summary.total_income = summary.total_income.saturating_add(tx.amount);
            }
            TransactionType::Expense => {
                summary.total_expense = summary.total_expense.saturating_add(tx.outflow());
            }
        }
    }
    summary
}

/// Totals over the whole ledger regardless of date.
pub fn ledger_stats(transactions: &[Transaction]) -> LedgerStats {
    let mut stats = LedgerStats {
        total_transactions: transactions.len(),
        ..LedgerStats::default()
    };
    for tx in transactions {
        match tx.kind {
            TransactionType::Income => {
                stats.total_income = stats.total_income.saturating_add(tx.amount);
            }
            TransactionType::Expense => {
                stats.total_expense = stats.total_expense.saturating_add(tx.outflow());
            }
        }
    }
    stats.balance = stats.total_income.saturating_sub(stats.total_expense);
    stats
}

/// Spending per category for the month, largest first.
pub fn category_stats(transactions: &[Transaction], year: i32, month: u32) -> Vec<CategorySummary> {
    let month_expenses = transactions_in_month(transactions, year, month)
        .into_iter()
        .filter(|tx| tx.kind == TransactionType::Expense);

    let mut by_category: HashMap<&str, i64> = HashMap::new();
    let mut total: i64 = 0;
    for tx in month_expenses {
        let amount = tx.outflow();
        let spent = by_category.entry(tx.category.as_str()).or_default();
        *spent = spent.saturating_add(amount);
        total = total.saturating_add(amount);
    }

    let mut stats: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(category, amount)| CategorySummary {
            category: category.to_string(),
            amount,
            percentage: percentage_of(amount, total),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    stats
}

fn percentage_of(amount: i64, total: i64) -> u32 {
    if total <= 0 {
        return 0;
    }
    (amount as f64 / total as f64 * 100.0).round() as u32
}

fn bounds_or_warn(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let bounds = month_bounds(year, month);
    if bounds.is_none() {
        warn!("ignoring invalid month {year}-{month}");
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installment::InstallmentPricer;
    use crate::ledger::{PaymentMethod, TransactionInput};
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn entry(
        id: u64,
        kind: TransactionType,
        on: NaiveDate,
        amount: i64,
        category: &str,
        months: Option<i32>,
    ) -> Transaction {
        let input = TransactionInput {
            kind,
            date: on,
            amount,
            category: category.to_string(),
            description: None,
            method: Some(PaymentMethod::Card),
            installment_months: months,
            note: None,
        };
        Transaction::from_input(id, input, &InstallmentPricer::default()).unwrap()
    }

    fn sample_ledger() -> Vec<Transaction> {
        vec![
            entry(1, TransactionType::Income, date(2024, 1, 25), 3_000_000, "Salary", None),
            entry(2, TransactionType::Expense, date(2024, 1, 30), 200_000, "Living", None),
            entry(3, TransactionType::Income, date(2024, 2, 25), 3_000_000, "Salary", None),
            entry(4, TransactionType::Expense, date(2024, 2, 3), 1_000_000, "Living", Some(6)),
            entry(5, TransactionType::Expense, date(2024, 2, 29), 300_000, "Transport", None),
            entry(6, TransactionType::Expense, date(2024, 2, 10), 156_251, "Family", None),
            entry(7, TransactionType::Expense, date(2024, 3, 1), 50_000, "Living", None),
        ]
    }

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2024, 12, 31)]
    #[case(2024, 4, 30)]
    fn test_month_bounds(#[case] year: i32, #[case] month: u32, #[case] last_day: u32) {
        let (first, last) = month_bounds(year, month).unwrap();
        assert_eq!(first, date(year, month, 1));
        assert_eq!(last, date(year, month, last_day));
    }

    #[test]
    fn test_month_bounds_rejects_invalid_month() {
        assert_eq!(month_bounds(2024, 0), None);
        assert_eq!(month_bounds(2024, 13), None);
    }

    #[rstest]
    #[case(2024, 1, MonthStep::Prev, (2023, 12))]
    #[case(2024, 12, MonthStep::Next, (2025, 1))]
    #[case(2024, 6, MonthStep::Prev, (2024, 5))]
    #[case(2024, 6, MonthStep::Next, (2024, 7))]
    fn test_shift_month(
        #[case] year: i32,
        #[case] month: u32,
        #[case] step: MonthStep,
        #[case] expected: (i32, u32),
    ) {
        assert_eq!(shift_month(year, month, step), expected);
    }

    #[test]
    fn test_transactions_in_month_newest_first() {
        let ledger = sample_ledger();
        let ids: Vec<u64> = transactions_in_month(&ledger, 2024, 2)
            .iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec![5, 3, 6, 4]);
    }

    #[test]
    fn test_monthly_summary_includes_fees_and_running_balance() {
        let ledger = sample_ledger();
        let summary = monthly_summary(&ledger, 2024, 2);

        // 1_000_000 + 43_749 fee + 300_000 + 156_251
        assert_eq!(summary.total_income, 3_000_000);
        assert_eq!(summary.total_expense, 1_500_000);
        // January: 3_000_000 - 200_000; February: 3_000_000 - 1_500_000
        assert_eq!(summary.balance, 4_300_000);
    }

    #[test]
    fn test_monthly_summary_empty_month() {
        let ledger = sample_ledger();
        let summary = monthly_summary(&ledger, 2023, 12);
        assert_eq!(summary, MonthlySummary::default());
    }

    #[test]
    fn test_category_stats_sorted_with_percentages() {
        let ledger = sample_ledger();
        let stats = category_stats(&ledger, 2024, 2);

        assert_eq!(
            stats,
            vec![
                CategorySummary {
                    category: "Living".to_string(),
                    amount: 1_043_749,
                    percentage: 70,
                },
                CategorySummary {
                    category: "Transport".to_string(),
                    amount: 300_000,
                    percentage: 20,
                },
                CategorySummary {
                    category: "Family".to_string(),
                    amount: 156_251,
                    percentage: 10,
                },
            ]
        );
    }

    #[rstest]
    #[case::whole_ledger(sample_ledger(), LedgerStats {
        total_transactions: 7,
        total_income: 6_000_000,
        total_expense: 1_750_000,
        balance: 4_250_000,
    })]
    #[case::empty(Vec::new(), LedgerStats::default())]
    fn test_ledger_stats(#[case] ledger: Vec<Transaction>, #[case] expected: LedgerStats) {
        assert_eq!(ledger_stats(&ledger), expected);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let ledger = vec![
            entry(1, TransactionType::Expense, date(2024, 2, 3), i64::MAX, "Living", Some(6)),
            entry(2, TransactionType::Expense, date(2024, 2, 4), i64::MAX, "Family", None),
            entry(3, TransactionType::Income, date(2024, 2, 5), i64::MAX, "Salary", None),
            entry(4, TransactionType::Income, date(2024, 2, 6), i64::MAX, "Salary", None),
        ];

        let summary = monthly_summary(&ledger, 2024, 2);
        assert_eq!(summary.total_expense, i64::MAX);
        assert_eq!(summary.total_income, i64::MAX);

        let stats = ledger_stats(&ledger);
        assert_eq!(stats.total_expense, i64::MAX);
        assert_eq!(stats.balance, 0);

        let categories = category_stats(&ledger, 2024, 2);
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.amount == i64::MAX && c.percentage == 100));
    }

    #[test]
    fn test_category_stats_no_expenses() {
        let ledger = sample_ledger();
        assert!(category_stats(&ledger, 2025, 1).is_empty());
        assert!(category_stats(&ledger, 2024, 13).is_empty());
    }
}
