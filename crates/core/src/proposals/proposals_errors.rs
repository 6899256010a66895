//! Proposal error types.

use thiserror::Error;

use super::proposals_model::ProposalField;

/// Errors specific to proposal editing and lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProposalError {
    /// An edit carried a value the field cannot hold. The edit is discarded.
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidEditValue {
        field: ProposalField,
        value: String,
        reason: String,
    },

    /// No proposal exists with this id.
    #[error("Proposal not found: {0}")]
    NotFound(i32),

    /// A partial update that sets no field at all.
    #[error("Update must set at least one field")]
    EmptyUpdate,

    /// A field name that does not name an editable proposal field.
    #[error("Unknown proposal field: {0}")]
    UnknownField(String),
}

impl ProposalError {
    /// Creates an InvalidEditValue error.
    pub fn invalid_edit(
        field: ProposalField,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEditValue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
