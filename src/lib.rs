//! `moneyflow` is the calculation core of a personal finance ledger.
//!
//! Its centre is the card installment pricer: given a purchase amount and a
//! number of monthly installments it works out the financing fee, the total
//! payable and the average monthly payment, following a tiered annual rate:
//!
//! | months | annual rate |
//! |--------|-------------|
//! | 1–3    | 0%          |
//! | 4–5    | 12%         |
//! | 6–9    | 15%         |
//! | 10–12  | 19%         |
//!
//! Around it sit the pieces a ledger needs to use those numbers: transaction
//! records that decide when a purchase is financed, boundary validation, and
//! monthly dashboard summaries.
//!
//! ## Usage
//!
//! ```rust
//! use moneyflow::{calculate_total_amount, installment_preview, InstallmentPricer};
//!
//! fn main() {
//!     let quote = calculate_total_amount(1_000_000, 6);
//!     println!("Fee:     {}", quote.fee);
//!     println!("Total:   {}", quote.total);
//!     println!("Monthly: {}", quote.monthly_payment);
//!     assert_eq!(quote.fee, 43_749);
//!     assert_eq!(quote.monthly_payment, 173_958);
//!
//!     // Exact decimal arithmetic drops the double precision artifact.
//!     assert_eq!(InstallmentPricer::exact().calculate_fee(1_000_000, 6), 43_750);
//!
//!     assert_eq!(installment_preview(100_000, 3), "3-month interest-free");
//! }
//! ```

pub mod format;
pub mod installment;
pub mod ledger;
pub mod summary;
pub mod validation;

pub use installment::{
    FeeArithmetic, FeeResult, INSTALLMENT_MONTHS, InstallmentPricer, PricerConfig, RATE_TIERS,
    RateTier, annual_rate, calculate_fee, calculate_total_amount, installment_preview, rate_tier,
};
pub use ledger::{
    EXPENSE_CATEGORIES, INCOME_CATEGORIES, InstallmentTerms, PaymentMethod, Transaction,
    TransactionInput, TransactionType,
};
pub use summary::{
    CategorySummary, LedgerStats, MonthStep, MonthlySummary, category_stats, ledger_stats,
    month_bounds, monthly_summary, shift_month, transactions_in_month,
};
pub use validation::ValidationError;
