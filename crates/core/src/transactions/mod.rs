//! Transactions module - ledger entries, validation, and the ledger collaborator trait.

mod transactions_constants;
mod transactions_model;
mod transactions_traits;
mod transactions_validation;


pub use transactions_constants::*;
pub use transactions_model::{
    InstrumentClass, NewTransaction, OrderingKey, Transaction, TransactionKind,
};
pub use transactions_traits::LedgerRepositoryTrait;
pub use transactions_validation::{validate_transaction, validate_transactions};
