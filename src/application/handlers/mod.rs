//! Command handlers, grouped by aggregate.

pub mod ledger;

pub use ledger::{
    ConnectAccountCommand, ConnectAccountHandler, ConnectAccountResult, CreateTransactionCommand,
    CreateTransactionHandler, CreateTransactionResult, RefundOutcome, RefundTransactionCommand,
    RefundTransactionHandler,
};
