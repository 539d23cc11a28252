//! Ledger records and the rule deciding when a purchase is financed.

use std::fmt;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::installment::InstallmentPricer;
use crate::validation::{
    ValidationError, validate_amount, validate_category, validate_installment_months,
};

pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Living",
    "Family",
    "Vacation",
    "Entertainment",
    "Subscriptions",
    "Transport",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 3] = ["Salary", "Allowance", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Categories offered for this kind of transaction.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }

    pub fn is_known_category(self, category: &str) -> bool {
        self.categories().iter().any(|known| *known == category)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Installment fields stored with a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentTerms {
    /// Whether the purchase is financed over several months.
    pub is_installment: bool,
    /// Number of monthly installments; 1 for a lump sum.
    pub months: i32,
    /// Financing fee added on top of the amount.
    pub fee: i64,
}

impl InstallmentTerms {
    /// Paid in full, no financing.
    pub const LUMP_SUM: Self = Self {
        is_installment: false,
        months: 1,
        fee: 0,
    };

    /// Only card expenses split over more than one month are financed.
    /// Everything else is stored as a one-month lump sum with no fee.
    pub fn resolve(
        kind: TransactionType,
        method: Option<PaymentMethod>,
        months: i32,
        amount: i64,
        pricer: &InstallmentPricer,
    ) -> Self {
        let financed = kind == TransactionType::Expense
            && method == Some(PaymentMethod::Card)
            && months > 1;
        if !financed {
            return Self::LUMP_SUM;
        }

        Self {
            is_installment: true,
            months,
            fee: pricer.calculate_fee(amount, months),
        }
    }
}

/// What the create and edit forms submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub amount: i64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub installment_months: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A validated ledger entry, ready to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier assigned by the caller's store.
    pub id: u64,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Day the transaction took place.
    pub date: NaiveDate,
    /// Amount in whole won, excluding any installment fee.
    pub amount: i64,
    /// One of the categories offered for `kind`.
    pub category: String,
    /// Short free-text label.
    pub description: Option<String>,
    /// How an expense was paid; always `None` for income.
    pub method: Option<PaymentMethod>,
    /// Longer free-text memo.
    pub note: Option<String>,
    /// Whether the expense is financed over several months.
    pub is_installment: bool,
    /// Number of monthly installments; 1 for a lump sum.
    pub installment_months: i32,
    /// Financing fee charged for the installment plan.
    pub installment_fee: i64,
}

impl Transaction {
    /// Validates a form submission and prices any installment plan.
    ///
    /// Income never carries a payment method. Month counts are only checked
    /// when they can affect pricing, i.e. for card expenses.
    pub fn from_input(
        id: u64,
        input: TransactionInput,
        pricer: &InstallmentPricer,
    ) -> Result<Self, ValidationError> {
        validate_amount(input.amount)?;
        validate_category(&input.category)?;

        let method = match input.kind {
            TransactionType::Expense => input.method,
            TransactionType::Income => None,
        };
        let months = input.installment_months.unwrap_or(1);
        if input.kind == TransactionType::Expense && method == Some(PaymentMethod::Card) {
            validate_installment_months(months)?;
        }

        let terms = InstallmentTerms::resolve(input.kind, method, months, input.amount, pricer);
        debug!(
            "transaction {id}: {} {} in {}, installment={:?}",
            input.kind, input.amount, input.category, terms
        );

        Ok(Self {
            id,
            kind: input.kind,
            date: input.date,
            amount: input.amount,
            category: input.category,
            description: non_blank(input.description),
            method,
            note: non_blank(input.note),
            is_installment: terms.is_installment,
            installment_months: terms.months,
            installment_fee: terms.fee,
        })
    }

    /// Replaces every editable field, repricing the installment plan.
    pub fn apply_update(
        &mut self,
        input: TransactionInput,
        pricer: &InstallmentPricer,
    ) -> Result<(), ValidationError> {
        *self = Self::from_input(self.id, input, pricer)?;
        Ok(())
    }

    pub fn installment_terms(&self) -> InstallmentTerms {
        InstallmentTerms {
            is_installment: self.is_installment,
            months: self.installment_months,
            fee: self.installment_fee,
        }
    }

    /// Money leaving the account: amount plus installment fee for expenses,
    /// zero for income.
    pub fn outflow(&self) -> i64 {
        match self.kind {
            TransactionType::Income => 0,
            TransactionType::Expense => self.amount.saturating_add(self.installment_fee),
        }
    }

    /// Effect on the running balance.
    pub fn balance_delta(&self) -> i64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => self.outflow().saturating_neg(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
