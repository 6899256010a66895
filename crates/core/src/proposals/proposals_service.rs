use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;

use super::derivation::{aggregate, validate_edit};
use super::proposals_errors::ProposalError;
use super::proposals_model::{
    NewProposal, ProposalSummary, ProposalUpdate, ProposalWithCalculations,
};
use super::proposals_traits::{ProposalRepositoryTrait, ProposalServiceTrait};
use crate::errors::Result;

pub struct ProposalService {
    repository: Arc<dyn ProposalRepositoryTrait>,
}

impl ProposalService {
    pub fn new(repository: Arc<dyn ProposalRepositoryTrait>) -> Self {
        ProposalService { repository }
    }
}

/// The proposals a fresh installation starts with.
pub fn sample_proposals() -> Vec<NewProposal> {
    let sample = |label: &str, total: i64, paid: i64, percent: i64, commission_paid: i64| {
        NewProposal {
            label: label.to_string(),
            total_value: Decimal::from(total),
            paid_value: Decimal::from(paid),
            commission_percent: Decimal::from(percent),
            commission_paid_value: Decimal::from(commission_paid),
        }
    };
    vec![
        sample("264.24 – Orlando", 24500, 12250, 10, 1225),
        sample("192.18 – Maria Alice", 18750, 18750, 12, 2250),
        sample("305.32 – Pedro Souza", 42800, 21400, 15, 3210),
        sample("178.09 – Alexandre Lima", 15300, 0, 8, 0),
    ]
}

#[async_trait]
impl ProposalServiceTrait for ProposalService {
    fn list_proposals(&self) -> Result<Vec<ProposalWithCalculations>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .map(ProposalWithCalculations::from)
            .collect())
    }

    fn get_proposal(&self, proposal_id: i32) -> Result<ProposalWithCalculations> {
        self.repository
            .get_by_id(proposal_id)?
            .map(ProposalWithCalculations::from)
            .ok_or_else(|| ProposalError::NotFound(proposal_id).into())
    }

    fn get_summary(&self) -> Result<ProposalSummary> {
        let proposals = self.list_proposals()?;
        Ok(ProposalSummary::from(aggregate(&proposals)))
    }

    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<ProposalWithCalculations> {
        for edit in new_proposal.edits() {
            validate_edit(&edit)?;
        }
        let created = self.repository.create(new_proposal).await?;
        info!("Created proposal {} ({})", created.id, created.label);
        Ok(ProposalWithCalculations::from(created))
    }

    async fn update_proposal(
        &self,
        proposal_id: i32,
        update: ProposalUpdate,
    ) -> Result<ProposalWithCalculations> {
        if update.is_empty() {
            return Err(ProposalError::EmptyUpdate.into());
        }
        for edit in update.edits() {
            validate_edit(&edit)?;
        }
        let updated = self
            .repository
            .update_fields(proposal_id, update)
            .await?
            .ok_or(ProposalError::NotFound(proposal_id))?;
        debug!("Updated proposal {}", proposal_id);
        Ok(ProposalWithCalculations::from(updated))
    }

    async fn delete_proposal(&self, proposal_id: i32) -> Result<()> {
        if !self.repository.delete(proposal_id).await? {
            return Err(ProposalError::NotFound(proposal_id).into());
        }
        info!("Deleted proposal {}", proposal_id);
        Ok(())
    }

    async fn seed_sample_proposals(&self) -> Result<usize> {
        if self.repository.count()? > 0 {
            return Ok(0);
        }
        let inserted = self.repository.create_many(sample_proposals()).await?;
        info!("Seeded {} sample proposals", inserted);
        Ok(inserted)
    }
}
