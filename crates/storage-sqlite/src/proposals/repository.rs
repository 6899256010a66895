use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use commissions_core::proposals::{NewProposal, Proposal, ProposalRepositoryTrait, ProposalUpdate};
use commissions_core::Result;

use super::model::{NewProposalDB, ProposalChangesetDB, ProposalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::proposals;
use crate::schema::proposals::dsl::*;

pub struct ProposalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProposalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProposalRepository { pool, writer }
    }
}

fn to_domain(row: ProposalDB) -> Result<Proposal> {
    Proposal::try_from(row).map_err(Into::into)
}

#[async_trait]
impl ProposalRepositoryTrait for ProposalRepository {
    fn list(&self) -> Result<Vec<Proposal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = proposals
            .order(id.asc())
            .select(ProposalDB::as_select())
            .load::<ProposalDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(to_domain).collect()
    }

    fn get_by_id(&self, proposal_id: i32) -> Result<Option<Proposal>> {
        let mut conn = get_connection(&self.pool)?;
        proposals
            .find(proposal_id)
            .select(ProposalDB::as_select())
            .first::<ProposalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(to_domain)
            .transpose()
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        proposals.count().get_result::<i64>(&mut conn).into_core()
    }

    async fn create(&self, new_proposal: NewProposal) -> Result<Proposal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Proposal> {
                let new_row: NewProposalDB = new_proposal.into();
                let row = diesel::insert_into(proposals::table)
                    .values(&new_row)
                    .returning(ProposalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                to_domain(row)
            })
            .await
    }

    async fn create_many(&self, new_proposals: Vec<NewProposal>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let rows: Vec<NewProposalDB> =
                    new_proposals.into_iter().map(NewProposalDB::from).collect();
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_into(proposals::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }

    async fn update_fields(
        &self,
        proposal_id: i32,
        update: ProposalUpdate,
    ) -> Result<Option<Proposal>> {
        if update.is_empty() {
            debug!("Empty update for proposal {}, returning stored row", proposal_id);
            return self.get_by_id(proposal_id);
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Proposal>> {
                let changeset: ProposalChangesetDB = update.into();
                diesel::update(proposals.find(proposal_id))
                    .set(&changeset)
                    .returning(ProposalDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .map(to_domain)
                    .transpose()
            })
            .await
    }

    async fn delete(&self, proposal_id: i32) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let removed = diesel::delete(proposals.find(proposal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(removed > 0)
            })
            .await
    }
}
