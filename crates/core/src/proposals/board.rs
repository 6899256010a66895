//! Client-side table state for the proposals dashboard.
//!
//! The board holds the rows the table renders. Inline edits are applied
//! optimistically through [`reconcile_on_field_edit`]; whatever the server
//! later returns for that proposal overwrites the provisional row.

use super::derivation::{aggregate, reconcile_on_field_edit};
use super::proposals_errors::ProposalError;
use super::proposals_model::{
    FieldEdit, Proposal, ProposalTotals, ProposalUpdate, ProposalWithCalculations,
};
use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalBoard {
    rows: Vec<ProposalWithCalculations>,
}

impl ProposalBoard {
    pub fn new(records: Vec<Proposal>) -> Self {
        let mut board = Self::default();
        board.reload(records);
        board
    }

    /// Replaces every row with a fresh authoritative listing.
    pub fn reload(&mut self, records: Vec<Proposal>) {
        self.rows = records
            .into_iter()
            .map(ProposalWithCalculations::from)
            .collect();
    }

    pub fn rows(&self) -> &[ProposalWithCalculations] {
        &self.rows
    }

    pub fn get(&self, id: i32) -> Option<&ProposalWithCalculations> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Applies an inline edit locally and returns the update to send to the server.
    ///
    /// A rejected edit leaves the board untouched.
    pub fn apply_edit(&mut self, id: i32, edit: FieldEdit) -> Result<ProposalUpdate> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(ProposalError::NotFound(id))?;

        let provisional = reconcile_on_field_edit(row, edit.clone())?;
        *row = provisional;
        Ok(ProposalUpdate::from(edit))
    }

    /// Installs the server's copy of a proposal, discarding any provisional state.
    pub fn confirm(&mut self, authoritative: Proposal) {
        let confirmed = ProposalWithCalculations::from(authoritative);
        match self.rows.iter_mut().find(|row| row.id() == confirmed.id()) {
            Some(row) => *row = confirmed,
            None => self.rows.push(confirmed),
        }
    }

    pub fn remove(&mut self, id: i32) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    /// Footer totals for the rows as currently displayed.
    pub fn totals(&self) -> ProposalTotals {
        aggregate(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    fn sample(id: i32) -> Proposal {
        Proposal {
            id,
            label: format!("Proposal {}", id),
            total_value: dec!(24500),
            paid_value: dec!(12250),
            commission_percent: dec!(10),
            commission_paid_value: dec!(1225),
        }
    }

    #[test]
    fn test_new_board_derives_rows() {
        let board = ProposalBoard::new(vec![sample(1), sample(2)]);

        assert_eq!(board.rows().len(), 2);
        assert_eq!(board.rows()[0].derived.open_balance, dec!(12250));
        assert_eq!(board.totals().total_value, dec!(49000));
    }

    #[test]
    fn test_apply_edit_updates_row_and_returns_patch() {
        let mut board = ProposalBoard::new(vec![sample(1)]);

        let update = board
            .apply_edit(1, FieldEdit::PaidValue(dec!(24500)))
            .unwrap();

        assert_eq!(
            update,
            ProposalUpdate {
                paid_value: Some(dec!(24500)),
                ..Default::default()
            }
        );
        let row = board.get(1).unwrap();
        assert_eq!(row.proposal.paid_value, dec!(24500));
        assert_eq!(row.derived.open_balance, dec!(0));
        assert_eq!(board.totals().paid_ratio, dec!(100));
    }

    #[test]
    fn test_rejected_edit_leaves_board_untouched() {
        let mut board = ProposalBoard::new(vec![sample(1)]);
        let before = board.clone();

        let result = board.apply_edit(1, FieldEdit::CommissionPercent(dec!(150)));

        assert!(matches!(
            result,
            Err(Error::Proposal(ProposalError::InvalidEditValue { .. }))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_edit_on_unknown_row() {
        let mut board = ProposalBoard::new(vec![sample(1)]);
        let result = board.apply_edit(9, FieldEdit::PaidValue(dec!(1)));
        assert!(matches!(
            result,
            Err(Error::Proposal(ProposalError::NotFound(9)))
        ));
    }

    #[test]
    fn test_confirmation_wins_over_provisional_value() {
        let mut board = ProposalBoard::new(vec![sample(1)]);
        board
            .apply_edit(1, FieldEdit::TotalValue(dec!(30000)))
            .unwrap();

        // Storage kept a different value than the one typed locally.
        let mut authoritative = sample(1);
        authoritative.total_value = dec!(28000);
        board.confirm(authoritative);

        let row = board.get(1).unwrap();
        assert_eq!(row.proposal.total_value, dec!(28000));
        assert_eq!(row.derived.open_balance, dec!(15750));
        assert_eq!(row.derived.total_commission, dec!(2800));
    }

    #[test]
    fn test_confirm_inserts_new_rows_and_remove_drops_them() {
        let mut board = ProposalBoard::default();
        board.confirm(sample(3));
        assert!(board.get(3).is_some());

        assert!(board.remove(3));
        assert!(!board.remove(3));
        assert!(board.rows().is_empty());
    }
}
