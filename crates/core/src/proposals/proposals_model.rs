//! Proposals domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::proposals_errors::ProposalError;
use crate::errors::Result;

/// Domain model representing a persisted sales proposal.
///
/// Only the authoritative fields live here; balance and commission figures are
/// derived on demand (see [`ProposalWithCalculations`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i32,
    #[serde(alias = "proposta")]
    pub label: String,
    #[serde(alias = "valorTotal")]
    pub total_value: Decimal,
    #[serde(alias = "valorPago")]
    pub paid_value: Decimal,
    #[serde(alias = "percentComissao")]
    pub commission_percent: Decimal,
    #[serde(alias = "valorComissaoPaga")]
    pub commission_paid_value: Decimal,
}

/// Input model for creating a new proposal. Every field is mandatory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    #[serde(alias = "proposta")]
    pub label: String,
    #[serde(alias = "valorTotal")]
    pub total_value: Decimal,
    #[serde(alias = "valorPago")]
    pub paid_value: Decimal,
    #[serde(alias = "percentComissao")]
    pub commission_percent: Decimal,
    #[serde(alias = "valorComissaoPaga")]
    pub commission_paid_value: Decimal,
}

impl NewProposal {
    /// Expresses each field as an edit so creation shares the edit validation rules.
    pub fn edits(&self) -> Vec<FieldEdit> {
        vec![
            FieldEdit::Label(self.label.clone()),
            FieldEdit::TotalValue(self.total_value),
            FieldEdit::PaidValue(self.paid_value),
            FieldEdit::CommissionPercent(self.commission_percent),
            FieldEdit::CommissionPaidValue(self.commission_paid_value),
        ]
    }
}

/// Partial update of a proposal's persisted fields. `None` leaves a field as is.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdate {
    #[serde(default, alias = "proposta")]
    pub label: Option<String>,
    #[serde(default, alias = "valorTotal")]
    pub total_value: Option<Decimal>,
    #[serde(default, alias = "valorPago")]
    pub paid_value: Option<Decimal>,
    #[serde(default, alias = "percentComissao")]
    pub commission_percent: Option<Decimal>,
    #[serde(default, alias = "valorComissaoPaga")]
    pub commission_paid_value: Option<Decimal>,
}

impl ProposalUpdate {
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.total_value.is_none()
            && self.paid_value.is_none()
            && self.commission_percent.is_none()
            && self.commission_paid_value.is_none()
    }

    /// The fields set by this update, one edit per field.
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        if let Some(label) = &self.label {
            edits.push(FieldEdit::Label(label.clone()));
        }
        if let Some(value) = self.total_value {
            edits.push(FieldEdit::TotalValue(value));
        }
        if let Some(value) = self.paid_value {
            edits.push(FieldEdit::PaidValue(value));
        }
        if let Some(value) = self.commission_percent {
            edits.push(FieldEdit::CommissionPercent(value));
        }
        if let Some(value) = self.commission_paid_value {
            edits.push(FieldEdit::CommissionPaidValue(value));
        }
        edits
    }

    pub fn apply_to(&self, proposal: &mut Proposal) {
        for edit in self.edits() {
            edit.apply(proposal);
        }
    }
}

impl From<FieldEdit> for ProposalUpdate {
    fn from(edit: FieldEdit) -> Self {
        let mut update = ProposalUpdate::default();
        match edit {
            FieldEdit::Label(v) => update.label = Some(v),
            FieldEdit::TotalValue(v) => update.total_value = Some(v),
            FieldEdit::PaidValue(v) => update.paid_value = Some(v),
            FieldEdit::CommissionPercent(v) => update.commission_percent = Some(v),
            FieldEdit::CommissionPaidValue(v) => update.commission_paid_value = Some(v),
        }
        update
    }
}

/// Persisted proposal fields that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProposalField {
    #[serde(alias = "proposta")]
    Label,
    #[serde(alias = "valorTotal")]
    TotalValue,
    #[serde(alias = "valorPago")]
    PaidValue,
    #[serde(alias = "percentComissao")]
    CommissionPercent,
    #[serde(alias = "valorComissaoPaga")]
    CommissionPaidValue,
}

impl ProposalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalField::Label => "label",
            ProposalField::TotalValue => "totalValue",
            ProposalField::PaidValue => "paidValue",
            ProposalField::CommissionPercent => "commissionPercent",
            ProposalField::CommissionPaidValue => "commissionPaidValue",
        }
    }

    pub fn is_amount(&self) -> bool {
        !matches!(self, ProposalField::Label)
    }
}

impl fmt::Display for ProposalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalField {
    type Err = ProposalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "label" | "proposta" => Ok(ProposalField::Label),
            "totalValue" | "valorTotal" => Ok(ProposalField::TotalValue),
            "paidValue" | "valorPago" => Ok(ProposalField::PaidValue),
            "commissionPercent" | "percentComissao" => Ok(ProposalField::CommissionPercent),
            "commissionPaidValue" | "valorComissaoPaga" => {
                Ok(ProposalField::CommissionPaidValue)
            }
            other => Err(ProposalError::UnknownField(other.to_string())),
        }
    }
}

/// A single-field edit intent, as emitted by the table's inline inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    Label(String),
    TotalValue(Decimal),
    PaidValue(Decimal),
    CommissionPercent(Decimal),
    CommissionPaidValue(Decimal),
}

impl FieldEdit {
    pub fn field(&self) -> ProposalField {
        match self {
            FieldEdit::Label(_) => ProposalField::Label,
            FieldEdit::TotalValue(_) => ProposalField::TotalValue,
            FieldEdit::PaidValue(_) => ProposalField::PaidValue,
            FieldEdit::CommissionPercent(_) => ProposalField::CommissionPercent,
            FieldEdit::CommissionPaidValue(_) => ProposalField::CommissionPaidValue,
        }
    }

    /// Builds an edit for `field` from an amount.
    pub fn amount(field: ProposalField, value: Decimal) -> Result<Self> {
        match field {
            ProposalField::Label => Err(ProposalError::invalid_edit(
                field,
                value,
                "label expects text, not an amount",
            )
            .into()),
            ProposalField::TotalValue => Ok(FieldEdit::TotalValue(value)),
            ProposalField::PaidValue => Ok(FieldEdit::PaidValue(value)),
            ProposalField::CommissionPercent => Ok(FieldEdit::CommissionPercent(value)),
            ProposalField::CommissionPaidValue => Ok(FieldEdit::CommissionPaidValue(value)),
        }
    }

    /// Builds an edit from a floating point input. NaN and infinities are rejected.
    pub fn from_f64(field: ProposalField, value: f64) -> Result<Self> {
        let decimal = Decimal::from_f64(value).ok_or_else(|| {
            ProposalError::invalid_edit(field, value, "value must be a finite number")
        })?;
        Self::amount(field, decimal)
    }

    /// Builds an edit from raw form text.
    ///
    /// Amounts are read as plain decimals first, then as floats so that
    /// exponent notation still works.
    pub fn parse(field: ProposalField, raw: &str) -> Result<Self> {
        if !field.is_amount() {
            return Ok(FieldEdit::Label(raw.to_string()));
        }
        let trimmed = raw.trim();
        match Decimal::from_str(trimmed) {
            Ok(value) => Self::amount(field, value),
            Err(_) => match trimmed.parse::<f64>() {
                Ok(value) => Self::from_f64(field, value),
                Err(_) => Err(ProposalError::invalid_edit(field, raw, "value is not a number").into()),
            },
        }
    }

    /// Writes the edited value into `proposal`. No validation happens here.
    pub fn apply(self, proposal: &mut Proposal) {
        match self {
            FieldEdit::Label(v) => proposal.label = v,
            FieldEdit::TotalValue(v) => proposal.total_value = v,
            FieldEdit::PaidValue(v) => proposal.paid_value = v,
            FieldEdit::CommissionPercent(v) => proposal.commission_percent = v,
            FieldEdit::CommissionPaidValue(v) => proposal.commission_paid_value = v,
        }
    }
}

/// Figures computed from a proposal's persisted fields. Never stored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    pub open_balance: Decimal,
    pub total_commission: Decimal,
    pub commission_paid_percent: Decimal,
}

/// A proposal together with its derived fields, as served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalWithCalculations {
    #[serde(flatten)]
    pub proposal: Proposal,
    #[serde(flatten)]
    pub derived: DerivedFields,
}

impl ProposalWithCalculations {
    pub fn id(&self) -> i32 {
        self.proposal.id
    }
}

/// Column sums and summary ratios over a set of proposals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTotals {
    pub total_value: Decimal,
    pub paid_value: Decimal,
    pub open_balance: Decimal,
    pub total_commission: Decimal,
    pub commission_paid_value: Decimal,
    /// Percent of the contracted total already received.
    pub paid_ratio: Decimal,
    /// Percent of the total commission already paid out.
    pub commission_paid_ratio: Decimal,
}

/// One slice of a doughnut chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSegment {
    pub label: String,
    pub value: Decimal,
    /// Share of the chart's whole, rounded for display.
    pub percentage: Decimal,
}

/// Footer totals plus the inputs of the two dashboard charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub totals: ProposalTotals,
    pub payments: Vec<ChartSegment>,
    pub commissions: Vec<ChartSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_field_names_accept_both_vocabularies() {
        assert_eq!("paidValue".parse::<ProposalField>(), Ok(ProposalField::PaidValue));
        assert_eq!("valorPago".parse::<ProposalField>(), Ok(ProposalField::PaidValue));
        assert_eq!(
            "percentComissao".parse::<ProposalField>(),
            Ok(ProposalField::CommissionPercent)
        );
        assert_eq!(
            "saldo".parse::<ProposalField>(),
            Err(ProposalError::UnknownField("saldo".to_string()))
        );
    }

    #[test]
    fn test_field_edit_wire_format() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{"field":"commissionPaidValue","value":1225}"#).unwrap();
        assert_eq!(edit, FieldEdit::CommissionPaidValue(dec!(1225)));
        assert_eq!(edit.field().to_string(), "commissionPaidValue");
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut proposal = Proposal {
            id: 1,
            label: "178.09 – Alexandre Lima".to_string(),
            total_value: dec!(15300),
            paid_value: dec!(0),
            commission_percent: dec!(8),
            commission_paid_value: dec!(0),
        };
        let update = ProposalUpdate {
            paid_value: Some(dec!(7650)),
            ..Default::default()
        };

        update.apply_to(&mut proposal);

        assert_eq!(proposal.paid_value, dec!(7650));
        assert_eq!(proposal.total_value, dec!(15300));
        assert_eq!(update.edits().len(), 1);
    }
}
