//! Journal repository: atomic, balanced postings.
//!
//! Validation runs before anything is written; the header and all lines
//! commit as one transaction, so a failed journal leaves zero rows.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use gstbooks_core::ledger::{CreateJournalInput, LedgerError, LedgerService};

use crate::entities::{accounts, journal_entries, ledger_lines};

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a balanced journal entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnbalancedJournal` (and friends) before any
    /// row is written; storage failures roll the whole entry back.
    pub async fn post_journal(&self, input: CreateJournalInput) -> Result<Uuid, LedgerError> {
        LedgerService::validate_lines(&input.lines)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let journal_id = post_journal_on(&txn, &input).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::debug!(%journal_id, lines = input.lines.len(), "journal posted");
        Ok(journal_id)
    }
}

/// Posts a journal entry on an open transaction.
///
/// Used directly by the FX realization repository so its settlement
/// posting commits atomically with the realization row.
pub(crate) async fn post_journal_on<C: ConnectionTrait>(
    conn: &C,
    input: &CreateJournalInput,
) -> Result<Uuid, LedgerError> {
    LedgerService::validate_lines(&input.lines)?;

    let account_ids: HashSet<Uuid> = input.lines.iter().map(|l| l.account_id).collect();
    for account_id in account_ids {
        let exists = accounts::Entity::find_by_id(account_id)
            .one(conn)
            .await
            .map_err(db_err)?;
        if exists.is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }
    }

    let journal_id = Uuid::new_v4();
    journal_entries::ActiveModel {
        id: Set(journal_id),
        entry_date: Set(input.entry_date),
        narration: Set(input.narration.clone()),
    }
    .insert(conn)
    .await
    .map_err(db_err)?;

    for line in &input.lines {
        ledger_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            journal_id: Set(journal_id),
            account_id: Set(line.account_id),
            debit: Set(line.debit),
            credit: Set(line.credit),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
    }

    Ok(journal_id)
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
