//! Proposal derivation engine.
//!
//! Pure functions that compute the derived figures of a proposal from its
//! persisted fields. The server read path and the optimistic edit path both go
//! through [`derive_all`], so the two can never disagree on a formula.

use rust_decimal::{Decimal, RoundingStrategy};

use super::proposals_errors::ProposalError;
use super::proposals_model::{
    ChartSegment, DerivedFields, FieldEdit, Proposal, ProposalSummary, ProposalTotals,
    ProposalWithCalculations,
};
use crate::constants::{
    MAX_AMOUNT, MAX_COMMISSION_PERCENT, MAX_DECIMAL_PLACES, PERCENT_DISPLAY_PRECISION,
};
use crate::errors::Result;

/// Saturated in place of an overflowing result, carrying the result's sign.
fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
///
/// A quotient too large for a `Decimal` saturates instead of panicking.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match part.checked_div(whole) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None => saturated(part.is_sign_negative()),
    }
}

/// Computes the three derived fields of a proposal.
///
/// Never fails. Out-of-range inputs are not rejected here: negative amounts
/// simply flow into negative results, and nothing is clamped. Results beyond
/// the range of `Decimal` saturate at `Decimal::MAX` / `Decimal::MIN`.
pub fn derive_all(proposal: &Proposal) -> DerivedFields {
    let open_balance = proposal.total_value.saturating_sub(proposal.paid_value);
    let total_commission = proposal
        .total_value
        .saturating_mul(proposal.commission_percent / Decimal::ONE_HUNDRED);
    let commission_paid_percent = percent_of(proposal.commission_paid_value, total_commission);

    DerivedFields {
        open_balance,
        total_commission,
        commission_paid_percent,
    }
}

impl From<Proposal> for ProposalWithCalculations {
    fn from(proposal: Proposal) -> Self {
        let derived = derive_all(&proposal);
        Self { proposal, derived }
    }
}

/// Checks that an edit carries a value its field can hold.
///
/// Amounts must lie in `[0, MAX_AMOUNT]` and a commission rate in `[0, 100]`.
/// Neither may carry more than two decimal places; trailing zeros do not
/// count. Labels must contain something other than whitespace.
pub fn validate_edit(edit: &FieldEdit) -> Result<()> {
    let field = edit.field();
    match edit {
        FieldEdit::Label(label) => {
            if label.trim().is_empty() {
                return Err(ProposalError::invalid_edit(field, label, "label must not be empty").into());
            }
        }
        FieldEdit::TotalValue(value)
        | FieldEdit::PaidValue(value)
        | FieldEdit::CommissionPercent(value)
        | FieldEdit::CommissionPaidValue(value)
            if value.normalize().scale() > MAX_DECIMAL_PLACES =>
        {
            return Err(ProposalError::invalid_edit(
                field,
                value,
                "at most two decimal places are allowed",
            )
            .into());
        }
        FieldEdit::CommissionPercent(value) => {
            if *value < Decimal::ZERO || *value > MAX_COMMISSION_PERCENT {
                return Err(ProposalError::invalid_edit(
                    field,
                    value,
                    "commission percent must be between 0 and 100",
                )
                .into());
            }
        }
        FieldEdit::TotalValue(value)
        | FieldEdit::PaidValue(value)
        | FieldEdit::CommissionPaidValue(value) => {
            if *value < Decimal::ZERO {
                return Err(
                    ProposalError::invalid_edit(field, value, "amount must not be negative").into(),
                );
            }
            if *value > MAX_AMOUNT {
                return Err(ProposalError::invalid_edit(
                    field,
                    value,
                    format!("amount must not exceed {}", MAX_AMOUNT),
                )
                .into());
            }
        }
    }
    Ok(())
}

/// Applies a single-field edit to a displayed record and re-derives it.
///
/// All derived fields are recomputed whatever field changed. On a rejected
/// edit the caller's record is left as it was and
/// [`ProposalError::InvalidEditValue`] is returned. The result is provisional:
/// the persisted record returned by storage replaces it once it arrives.
pub fn reconcile_on_field_edit(
    record: &ProposalWithCalculations,
    edit: FieldEdit,
) -> Result<ProposalWithCalculations> {
    if let Err(err) = validate_edit(&edit) {
        log::debug!("Rejected edit on proposal {}: {}", record.id(), err);
        return Err(err);
    }

    let mut proposal = record.proposal.clone();
    edit.apply(&mut proposal);
    Ok(ProposalWithCalculations::from(proposal))
}

/// Sums the footer columns of `records` and computes the summary ratios.
///
/// Plain addition with no intermediate rounding, so the result does not depend
/// on record order. Sums past the range of `Decimal` saturate.
pub fn aggregate<'a, I>(records: I) -> ProposalTotals
where
    I: IntoIterator<Item = &'a ProposalWithCalculations>,
{
    let mut totals = ProposalTotals::default();
    for record in records {
        totals.total_value = totals.total_value.saturating_add(record.proposal.total_value);
        totals.paid_value = totals.paid_value.saturating_add(record.proposal.paid_value);
        totals.open_balance = totals.open_balance.saturating_add(record.derived.open_balance);
        totals.total_commission = totals
            .total_commission
            .saturating_add(record.derived.total_commission);
        totals.commission_paid_value = totals
            .commission_paid_value
            .saturating_add(record.proposal.commission_paid_value);
    }
    totals.with_ratios()
}

impl ProposalTotals {
    fn with_ratios(mut self) -> Self {
        self.paid_ratio = percent_of(self.paid_value, self.total_value);
        self.commission_paid_ratio = percent_of(self.commission_paid_value, self.total_commission);
        self
    }

    /// Merges the totals of two disjoint sets of proposals.
    pub fn combine(self, other: ProposalTotals) -> ProposalTotals {
        ProposalTotals {
            total_value: self.total_value.saturating_add(other.total_value),
            paid_value: self.paid_value.saturating_add(other.paid_value),
            open_balance: self.open_balance.saturating_add(other.open_balance),
            total_commission: self.total_commission.saturating_add(other.total_commission),
            commission_paid_value: self
                .commission_paid_value
                .saturating_add(other.commission_paid_value),
            paid_ratio: Decimal::ZERO,
            commission_paid_ratio: Decimal::ZERO,
        }
        .with_ratios()
    }

    /// Received vs. still outstanding, out of the contracted total.
    pub fn payment_chart(&self) -> Vec<ChartSegment> {
        split_chart(
            self.total_value,
            ("Paid", self.paid_value),
            "Outstanding",
        )
    }

    /// Commission paid out vs. still pending, out of the total commission.
    pub fn commission_chart(&self) -> Vec<ChartSegment> {
        split_chart(
            self.total_commission,
            ("Commission paid", self.commission_paid_value),
            "Commission pending",
        )
    }
}

fn split_chart(whole: Decimal, part: (&str, Decimal), rest_label: &str) -> Vec<ChartSegment> {
    let (part_label, part_value) = part;
    let rest_value = whole.saturating_sub(part_value);
    [(part_label, part_value), (rest_label, rest_value)]
        .into_iter()
        .map(|(label, value)| ChartSegment {
            label: label.to_string(),
            value,
            percentage: percent_of(value, whole).round_dp_with_strategy(
                PERCENT_DISPLAY_PRECISION,
                RoundingStrategy::MidpointAwayFromZero,
            ),
        })
        .collect()
}

impl From<ProposalTotals> for ProposalSummary {
    fn from(totals: ProposalTotals) -> Self {
        Self {
            payments: totals.payment_chart(),
            commissions: totals.commission_chart(),
            totals,
        }
    }
}
