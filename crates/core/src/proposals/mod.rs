//! Proposals module - domain models, derivation engine, services, and traits.

mod board;
mod derivation;
mod proposals_errors;
mod proposals_model;
mod proposals_service;
mod proposals_traits;

pub use board::ProposalBoard;
pub use derivation::{aggregate, derive_all, reconcile_on_field_edit, validate_edit};
pub use proposals_errors::ProposalError;
pub use proposals_model::{
    ChartSegment, DerivedFields, FieldEdit, NewProposal, Proposal, ProposalField,
    ProposalSummary, ProposalTotals, ProposalUpdate, ProposalWithCalculations,
};
pub use proposals_service::{sample_proposals, ProposalService};
pub use proposals_traits::{ProposalRepositoryTrait, ProposalServiceTrait};
