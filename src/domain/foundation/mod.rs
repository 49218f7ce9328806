//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, money value objects and validation errors
//! that form the vocabulary of the payments domain.

mod errors;
mod ids;
mod money;

pub use errors::ValidationError;
pub use ids::{
    AccountId, ExternalTransactionId, InternalTransactionId, MerchantId, RefundId, SetupId,
};
pub use money::{Amount, Currency};
