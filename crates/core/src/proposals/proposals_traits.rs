use crate::errors::Result;
use crate::proposals::proposals_model::{
    NewProposal, Proposal, ProposalSummary, ProposalUpdate, ProposalWithCalculations,
};
use async_trait::async_trait;

/// Trait for proposal repository operations
#[async_trait]
pub trait ProposalRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Proposal>>;
    fn get_by_id(&self, proposal_id: i32) -> Result<Option<Proposal>>;
    fn count(&self) -> Result<i64>;
    async fn create(&self, new_proposal: NewProposal) -> Result<Proposal>;
    async fn create_many(&self, new_proposals: Vec<NewProposal>) -> Result<usize>;
    /// Applies the fields set in `update` atomically. `None` when the id is unknown.
    async fn update_fields(
        &self,
        proposal_id: i32,
        update: ProposalUpdate,
    ) -> Result<Option<Proposal>>;
    async fn delete(&self, proposal_id: i32) -> Result<bool>;
}

/// Trait for proposal service operations
#[async_trait]
pub trait ProposalServiceTrait: Send + Sync {
    fn list_proposals(&self) -> Result<Vec<ProposalWithCalculations>>;
    fn get_proposal(&self, proposal_id: i32) -> Result<ProposalWithCalculations>;
    fn get_summary(&self) -> Result<ProposalSummary>;
    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<ProposalWithCalculations>;
    async fn update_proposal(
        &self,
        proposal_id: i32,
        update: ProposalUpdate,
    ) -> Result<ProposalWithCalculations>;
    async fn delete_proposal(&self, proposal_id: i32) -> Result<()>;
    async fn seed_sample_proposals(&self) -> Result<usize>;
}
