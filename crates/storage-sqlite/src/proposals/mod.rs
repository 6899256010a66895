//! SQLite storage implementation for proposals.

mod model;
mod repository;

pub use model::{NewProposalDB, ProposalChangesetDB, ProposalDB};
pub use repository::ProposalRepository;
