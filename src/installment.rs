//! Card installment fee pricing.
//!
//! A card purchase can be split into 1 to 12 monthly installments. Splitting
//! into more than three months carries a financing fee charged on the average
//! outstanding balance:
//!
//! ```text
//! fee = principal * (annual_rate / 12) * (months + 1) / 2
//! ```
//!
//! The fee is floored to the whole currency unit, so a negative principal
//! rounds away from zero (-55,000 over 6 months costs -2,407). By default the
//! formula is evaluated in IEEE-754 double precision so that stored ledger
//! fees stay reproducible (`0.15 / 12` is slightly below `0.0125`, which makes a
//! 1,000,000 purchase over 6 months cost 43,749 rather than 43,750).
//! [`FeeArithmetic::ExactDecimal`] evaluates the same formula with
//! `rust_decimal` instead.

use std::ops::RangeInclusive;

use log::trace;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::won;

/// Month counts a card purchase may be split into.
pub const INSTALLMENT_MONTHS: RangeInclusive<i32> = 1..=12;

/// A closed range of installment months sharing one annual rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateTier {
    pub min_months: i32,
    pub max_months: i32,
    /// Annual rate in basis points (1500 = 15%).
    pub annual_rate_bps: u32,
}

impl RateTier {
    pub const fn contains(&self, months: i32) -> bool {
        months >= self.min_months && months <= self.max_months
    }

    pub const fn is_interest_free(&self) -> bool {
        self.annual_rate_bps == 0
    }

    /// The annual rate as a double, identical to the literal `0.15` etc.
    pub fn annual_rate(&self) -> f64 {
        f64::from(self.annual_rate_bps) / 10_000.0
    }

    pub fn annual_rate_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.annual_rate_bps), 4)
    }

    /// Annual rate as a whole percent, rounded half up.
    pub const fn percent(&self) -> u32 {
        (self.annual_rate_bps + 50) / 100
    }
}

/// Rate schedule for card installments. Month counts outside every tier
/// are priced at 0%.
pub const RATE_TIERS: [RateTier; 4] = [
    RateTier { min_months: 1, max_months: 3, annual_rate_bps: 0 },
    RateTier { min_months: 4, max_months: 5, annual_rate_bps: 1_200 },
    RateTier { min_months: 6, max_months: 9, annual_rate_bps: 1_500 },
    RateTier { min_months: 10, max_months: 12, annual_rate_bps: 1_900 },
];

/// Finds the tier covering `months`, if any.
pub fn rate_tier(months: i32) -> Option<RateTier> {
    RATE_TIERS.iter().find(|tier| tier.contains(months)).copied()
}

/// How the fee formula is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeArithmetic {
    /// Double precision, matching fees already stored by the ledger.
    #[default]
    Float,
    /// Exact decimal arithmetic. Differs from `Float` by one unit whenever
    /// the double product lands just below an integer, e.g. 1,000,000 over
    /// 6 or 9 months.
    ExactDecimal,
}

/// Pricer settings, loadable from JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    pub arithmetic: FeeArithmetic,
}

/// Fee breakdown for a principal split over a number of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResult {
    /// The amount being financed.
    pub principal: i64,
    /// Financing fee, floored to the whole unit.
    pub fee: i64,
    /// `principal + fee`, clamped to the `i64` range.
    pub total: i64,
    /// `floor(total / months)`.
    pub monthly_payment: i64,
}

/// Computes installment fees. Stateless apart from its configuration, so a
/// single value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallmentPricer {
    config: PricerConfig,
}

impl InstallmentPricer {
    pub fn new(config: PricerConfig) -> Self {
        Self { config }
    }

    /// A pricer using exact decimal arithmetic.
    pub fn exact() -> Self {
        Self::new(PricerConfig {
            arithmetic: FeeArithmetic::ExactDecimal,
        })
    }

    pub fn config(&self) -> PricerConfig {
        self.config
    }

    /// Annual rate for `months`; 0 for month counts outside `1..=12`.
    pub fn annual_rate(&self, months: i32) -> f64 {
        rate_tier(months).map_or(0.0, |tier| tier.annual_rate())
    }

    /// Financing fee for `principal` split over `months`.
    ///
    /// Never fails: lump sums, interest-free tiers and out-of-range month
    /// counts cost nothing, and a negative principal yields a negative fee.
    pub fn calculate_fee(&self, principal: i64, months: i32) -> i64 {
        if months <= 1 {
            return 0;
        }
        let Some(tier) = rate_tier(months).filter(|tier| !tier.is_interest_free()) else {
            return 0;
        };

        let fee = match self.config.arithmetic {
            FeeArithmetic::Float => float_fee(principal, months, tier.annual_rate()),
            FeeArithmetic::ExactDecimal => {
                decimal_fee(principal, months, tier.annual_rate_decimal())
            }
        };
        trace!(
            "installment fee: principal={principal} months={months} rate_bps={} arithmetic={:?} fee={fee}",
            tier.annual_rate_bps,
            self.config.arithmetic
        );
        fee
    }

    /// Fee, total payable and the average monthly payment.
    ///
    /// The monthly payment is `floor(total / months)`. A month count below 1
    /// is read as a lump sum, so the whole total falls in one payment.
    pub fn calculate_total_amount(&self, principal: i64, months: i32) -> FeeResult {
        let fee = self.calculate_fee(principal, months);
        let total = principal.saturating_add(fee);
        let monthly_payment = total.div_euclid(i64::from(months.max(1)));

        FeeResult {
            principal,
            fee,
            total,
            monthly_payment,
        }
    }

    /// One-line description of the installment plan, as shown next to the
    /// month picker.
    pub fn installment_preview(&self, principal: i64, months: i32) -> String {
        if months <= 1 {
            return "Lump sum".to_string();
        }
        if months <= 3 {
            return format!("{months}-month interest-free");
        }

        let quote = self.calculate_total_amount(principal, months);
        let percent = rate_tier(months).map_or(0, |tier| tier.percent());
        format!(
            "{months} months ({percent}% APR) - {}/month, fee {}",
            won(quote.monthly_payment),
            won(quote.fee)
        )
    }
}

fn float_fee(principal: i64, months: i32, annual_rate: f64) -> i64 {
    let monthly_rate = annual_rate / 12.0;
    let fee = principal as f64 * monthly_rate * (f64::from(months + 1) / 2.0);
    fee.floor() as i64
}

fn decimal_fee(principal: i64, months: i32, annual_rate: Decimal) -> i64 {
    let monthly_rate = annual_rate / dec!(12);
    let fee = Decimal::from(principal) * monthly_rate * (Decimal::from(months + 1) / dec!(2));
    // |fee| < |principal|, so it always fits back into an i64
    fee.floor().to_i64().unwrap_or_default()
}

/// Annual rate for `months` using the default pricer.
pub fn annual_rate(months: i32) -> f64 {
    InstallmentPricer::default().annual_rate(months)
}

/// Installment fee using the default (double precision) pricer.
pub fn calculate_fee(principal: i64, months: i32) -> i64 {
    InstallmentPricer::default().calculate_fee(principal, months)
}

/// Fee breakdown using the default pricer.
pub fn calculate_total_amount(principal: i64, months: i32) -> FeeResult {
    InstallmentPricer::default().calculate_total_amount(principal, months)
}

/// Preview text using the default pricer.
pub fn installment_preview(principal: i64, months: i32) -> String {
    InstallmentPricer::default().installment_preview(principal, months)
}
