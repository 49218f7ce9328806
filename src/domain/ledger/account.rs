//! Merchant account records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, MerchantId};

/// A merchant connected to this provider.
///
/// Stored under its setup id. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantAccount {
    #[serde(rename = "accountId")]
    pub account_id: AccountId,

    /// The email the merchant connected with.
    #[serde(rename = "accountName")]
    pub account_name: String,

    #[serde(rename = "wixMerchantId", default)]
    pub merchant_id: MerchantId,
}

impl MerchantAccount {
    /// Opens a new account with a freshly minted id.
    pub fn open(account_name: impl Into<String>, merchant_id: MerchantId) -> Self {
        Self {
            account_id: AccountId::new(),
            account_name: account_name.into(),
            merchant_id,
        }
    }

    /// True when this account belongs to the given platform merchant.
    ///
    /// Accounts connected without a merchant id never match.
    pub fn belongs_to(&self, merchant_id: &MerchantId) -> bool {
        !self.merchant_id.as_str().is_empty() && &self.merchant_id == merchant_id
    }
}
