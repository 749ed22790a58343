use async_trait::async_trait;

use crate::errors::Result;

use super::{NewTransaction, Transaction};

/// Ledger collaborator. Storage crates implement this.
///
/// A read must observe either the state before or after an append, never a
/// partially written batch.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// All entries recorded for the user, with ordering keys populated.
    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;

    /// Appends an entry and returns it with its id and sequence number assigned.
    async fn append_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
}
