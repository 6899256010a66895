//! Wire types of the HTTP API.
//!
//! Responses mirror the core models with an OpenAPI schema attached. Request
//! payloads accept amounts either as JSON numbers or numeric strings, and the
//! Portuguese column names used by older dashboard clients.

use commissions_core::errors::ValidationError;
use commissions_core::proposals as core_proposals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i32,
    pub label: String,
    #[schema(value_type = f64)]
    pub total_value: Decimal,
    #[schema(value_type = f64)]
    pub paid_value: Decimal,
    #[schema(value_type = f64)]
    pub commission_percent: Decimal,
    #[schema(value_type = f64)]
    pub commission_paid_value: Decimal,
    #[schema(value_type = f64)]
    pub open_balance: Decimal,
    #[schema(value_type = f64)]
    pub total_commission: Decimal,
    #[schema(value_type = f64)]
    pub commission_paid_percent: Decimal,
}

impl From<core_proposals::ProposalWithCalculations> for Proposal {
    fn from(record: core_proposals::ProposalWithCalculations) -> Self {
        let core_proposals::ProposalWithCalculations { proposal, derived } = record;
        Self {
            id: proposal.id,
            label: proposal.label,
            total_value: proposal.total_value,
            paid_value: proposal.paid_value,
            commission_percent: proposal.commission_percent,
            commission_paid_value: proposal.commission_paid_value,
            open_balance: derived.open_balance,
            total_commission: derived.total_commission,
            commission_paid_percent: derived.commission_paid_percent,
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProposalPayload {
    #[serde(default, alias = "proposta")]
    pub label: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorTotal")]
    #[schema(value_type = Option<f64>)]
    pub total_value: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorPago")]
    #[schema(value_type = Option<f64>)]
    pub paid_value: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "percentComissao")]
    #[schema(value_type = Option<f64>)]
    pub commission_percent: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorComissaoPaga")]
    #[schema(value_type = Option<f64>)]
    pub commission_paid_value: Option<Decimal>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField(field.to_string()))
}

impl TryFrom<NewProposalPayload> for core_proposals::NewProposal {
    type Error = ValidationError;

    fn try_from(payload: NewProposalPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            label: required(payload.label, "label")?,
            total_value: required(payload.total_value, "totalValue")?,
            paid_value: required(payload.paid_value, "paidValue")?,
            commission_percent: required(payload.commission_percent, "commissionPercent")?,
            commission_paid_value: required(
                payload.commission_paid_value,
                "commissionPaidValue",
            )?,
        })
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdatePayload {
    #[serde(default, alias = "proposta")]
    pub label: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorTotal")]
    #[schema(value_type = Option<f64>)]
    pub total_value: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorPago")]
    #[schema(value_type = Option<f64>)]
    pub paid_value: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "percentComissao")]
    #[schema(value_type = Option<f64>)]
    pub commission_percent: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "valorComissaoPaga")]
    #[schema(value_type = Option<f64>)]
    pub commission_paid_value: Option<Decimal>,
}

impl From<ProposalUpdatePayload> for core_proposals::ProposalUpdate {
    fn from(payload: ProposalUpdatePayload) -> Self {
        Self {
            label: payload.label,
            total_value: payload.total_value,
            paid_value: payload.paid_value,
            commission_percent: payload.commission_percent,
            commission_paid_value: payload.commission_paid_value,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTotals {
    #[schema(value_type = f64)]
    pub total_value: Decimal,
    #[schema(value_type = f64)]
    pub paid_value: Decimal,
    #[schema(value_type = f64)]
    pub open_balance: Decimal,
    #[schema(value_type = f64)]
    pub total_commission: Decimal,
    #[schema(value_type = f64)]
    pub commission_paid_value: Decimal,
    #[schema(value_type = f64)]
    pub paid_ratio: Decimal,
    #[schema(value_type = f64)]
    pub commission_paid_ratio: Decimal,
}

impl From<core_proposals::ProposalTotals> for ProposalTotals {
    fn from(t: core_proposals::ProposalTotals) -> Self {
        Self {
            total_value: t.total_value,
            paid_value: t.paid_value,
            open_balance: t.open_balance,
            total_commission: t.total_commission,
            commission_paid_value: t.commission_paid_value,
            paid_ratio: t.paid_ratio,
            commission_paid_ratio: t.commission_paid_ratio,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSegment {
    pub label: String,
    #[schema(value_type = f64)]
    pub value: Decimal,
    #[schema(value_type = f64)]
    pub percentage: Decimal,
}

impl From<core_proposals::ChartSegment> for ChartSegment {
    fn from(s: core_proposals::ChartSegment) -> Self {
        Self {
            label: s.label,
            value: s.value,
            percentage: s.percentage,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub totals: ProposalTotals,
    pub payments: Vec<ChartSegment>,
    pub commissions: Vec<ChartSegment>,
}

impl From<core_proposals::ProposalSummary> for ProposalSummary {
    fn from(s: core_proposals::ProposalSummary) -> Self {
        Self {
            totals: s.totals.into(),
            payments: s.payments.into_iter().map(ChartSegment::from).collect(),
            commissions: s.commissions.into_iter().map(ChartSegment::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_payload_accepts_numbers_and_strings() {
        let payload: NewProposalPayload = serde_json::from_value(serde_json::json!({
            "label": "192.18 – Maria Alice",
            "totalValue": 18750,
            "paidValue": "18750.00",
            "commissionPercent": 12.5,
            "commissionPaidValue": "2250"
        }))
        .unwrap();

        let proposal = core_proposals::NewProposal::try_from(payload).unwrap();
        assert_eq!(proposal.total_value, dec("18750"));
        assert_eq!(proposal.paid_value, dec("18750.00"));
        assert_eq!(proposal.commission_percent, dec("12.5"));
        assert_eq!(proposal.commission_paid_value, dec("2250"));
    }

    #[test]
    fn test_payload_accepts_portuguese_names() {
        let payload: ProposalUpdatePayload = serde_json::from_value(serde_json::json!({
            "valorPago": 100,
            "proposta": "264.24 – Orlando"
        }))
        .unwrap();

        let update = core_proposals::ProposalUpdate::from(payload);
        assert_eq!(update.paid_value, Some(dec("100")));
        assert_eq!(update.label.as_deref(), Some("264.24 – Orlando"));
        assert!(update.total_value.is_none());
    }

    #[test]
    fn test_missing_field_is_named() {
        let payload = NewProposalPayload {
            label: Some("x".to_string()),
            ..Default::default()
        };
        let err = core_proposals::NewProposal::try_from(payload).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField(f) if f == "totalValue"));
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let result: Result<ProposalUpdatePayload, _> =
            serde_json::from_value(serde_json::json!({ "paidValue": "lots" }));
        assert!(result.is_err());
    }
}
