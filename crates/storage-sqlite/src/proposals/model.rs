//! Database models for proposals.
//!
//! Monetary columns are stored as TEXT so decimals survive the round trip
//! without binary floating point in between.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;

use commissions_core::proposals::{NewProposal, Proposal, ProposalUpdate};

use crate::errors::StorageError;

/// Database model for proposals
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::proposals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProposalDB {
    pub id: i32,
    pub label: String,
    pub total_value: String,
    pub paid_value: String,
    pub commission_percent: String,
    pub commission_paid_value: String,
}

/// Database model for inserting a proposal; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::proposals)]
pub struct NewProposalDB {
    pub label: String,
    pub total_value: String,
    pub paid_value: String,
    pub commission_percent: String,
    pub commission_paid_value: String,
}

/// Partial changeset. `None` columns are left out of the UPDATE statement.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::proposals)]
pub struct ProposalChangesetDB {
    pub label: Option<String>,
    pub total_value: Option<String>,
    pub paid_value: Option<String>,
    pub commission_percent: Option<String>,
    pub commission_paid_value: Option<String>,
}

fn parse_decimal(column: &'static str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value.trim()).map_err(|_| StorageError::CorruptDecimal {
        column,
        value: value.to_string(),
    })
}

impl TryFrom<ProposalDB> for Proposal {
    type Error = StorageError;

    fn try_from(db: ProposalDB) -> Result<Self, Self::Error> {
        Ok(Proposal {
            id: db.id,
            total_value: parse_decimal("total_value", &db.total_value)?,
            paid_value: parse_decimal("paid_value", &db.paid_value)?,
            commission_percent: parse_decimal("commission_percent", &db.commission_percent)?,
            commission_paid_value: parse_decimal(
                "commission_paid_value",
                &db.commission_paid_value,
            )?,
            label: db.label,
        })
    }
}

impl From<NewProposal> for NewProposalDB {
    fn from(domain: NewProposal) -> Self {
        Self {
            label: domain.label,
            total_value: domain.total_value.to_string(),
            paid_value: domain.paid_value.to_string(),
            commission_percent: domain.commission_percent.to_string(),
            commission_paid_value: domain.commission_paid_value.to_string(),
        }
    }
}

impl From<ProposalUpdate> for ProposalChangesetDB {
    fn from(update: ProposalUpdate) -> Self {
        Self {
            label: update.label,
            total_value: update.total_value.map(|v| v.to_string()),
            paid_value: update.paid_value.map(|v| v.to_string()),
            commission_percent: update.commission_percent.map(|v| v.to_string()),
            commission_paid_value: update.commission_paid_value.map(|v| v.to_string()),
        }
    }
}
