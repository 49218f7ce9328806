//! Redis-backed ledger store for multi-process deployments.
//!
//! Layout: two hashes, `<prefix>merchants` and `<prefix>transactions`, one
//! field per record key holding the record as JSON.
//!
//! - Inserts use `HSETNX`, so the first writer wins across processes
//! - Refunds are applied in Rust and written back with a Lua compare-and-set,
//!   retried while another writer changes the record in between

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::{Amount, ExternalTransactionId, MerchantId, SetupId};
use crate::domain::ledger::{MerchantAccount, Transaction};
use crate::ports::{Inserted, LedgerStore, StoreError};

/// Replaces a hash field only if it still holds the value the caller read.
/// Returns 1 on success, 0 when the field changed or disappeared.
const REPLACE_IF_UNCHANGED_SCRIPT: &str = r#"
if redis.call('HGET', KEYS[1], ARGV[1]) ~= ARGV[2] then
  return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[3])
return 1
"#;

/// Compare-and-set rounds before a refund gives up under contention.
const MAX_REFUND_ATTEMPTS: usize = 16;

/// Ledger store on a shared Redis connection.
#[derive(Clone)]
pub struct RedisLedgerStore {
    conn: MultiplexedConnection,
    merchants_key: String,
    transactions_key: String,
    replace_script: Script,
}

impl RedisLedgerStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "")
    }

    /// Namespaces both hashes, e.g. `martini:` gives `martini:merchants`.
    pub fn with_prefix(conn: MultiplexedConnection, prefix: &str) -> Self {
        Self {
            conn,
            merchants_key: format!("{prefix}merchants"),
            transactions_key: format!("{prefix}transactions"),
            replace_script: Script::new(REPLACE_IF_UNCHANGED_SCRIPT),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(connection_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        Ok(Self::with_prefix(conn, prefix))
    }

    async fn hget<T: DeserializeOwned>(
        &self,
        hash: &str,
        field: &str,
    ) -> Result<Option<T>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(hash, field).await.map_err(backend_error)?;
        raw.map(|json| decode(&json)).transpose()
    }

    async fn hset_nx<T: Serialize + DeserializeOwned>(
        &self,
        hash: &str,
        field: &str,
        record: T,
    ) -> Result<Inserted<T>, StoreError> {
        let json =
            serde_json::to_string(&record).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let mut conn = self.conn.clone();
        let created: bool = conn.hset_nx(hash, field, json).await.map_err(backend_error)?;
        if created {
            return Ok(Inserted::Created(record));
        }
        match self.hget(hash, field).await? {
            Some(existing) => Ok(Inserted::Existing(existing)),
            None => Err(StoreError::Backend(format!(
                "{hash}/{field} vanished after a conflicting insert"
            ))),
        }
    }
}

/// Applies a refund to a stored record, returning the record and its new JSON.
fn refunded(raw: &str, refund: Amount) -> Result<(Transaction, String), StoreError> {
    let mut transaction: Transaction = decode(raw)?;
    transaction.apply_refund(refund);
    let json =
        serde_json::to_string(&transaction).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok((transaction, json))
}

fn decode<T: DeserializeOwned>(json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn connection_error(e: redis::RedisError) -> StoreError {
    StoreError::Connection(e.to_string())
}

fn backend_error(e: redis::RedisError) -> StoreError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Backend(e.to_string())
    }
}

#[async_trait]
impl LedgerStore for RedisLedgerStore {
    async fn get_account(&self, setup_id: &SetupId) -> Result<Option<MerchantAccount>, StoreError> {
        self.hget(&self.merchants_key, setup_id.as_str()).await
    }

    async fn insert_account_if_absent(
        &self,
        setup_id: &SetupId,
        account: MerchantAccount,
    ) -> Result<Inserted<MerchantAccount>, StoreError> {
        self.hset_nx(&self.merchants_key, setup_id.as_str(), account).await
    }

    async fn find_account_by_merchant(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Option<MerchantAccount>, StoreError> {
        let mut conn = self.conn.clone();
        let all: Vec<String> = conn.hvals(&self.merchants_key).await.map_err(backend_error)?;
        for json in all {
            let account: MerchantAccount = decode(&json)?;
            if account.belongs_to(merchant_id) {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    async fn get_transaction(
        &self,
        id: &ExternalTransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        self.hget(&self.transactions_key, id.as_str()).await
    }

    async fn insert_transaction_if_absent(
        &self,
        id: &ExternalTransactionId,
        transaction: Transaction,
    ) -> Result<Inserted<Transaction>, StoreError> {
        self.hset_nx(&self.transactions_key, id.as_str(), transaction).await
    }

    async fn apply_refund(
        &self,
        id: &ExternalTransactionId,
        refund: Amount,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut conn = self.conn.clone();
        for _ in 0..MAX_REFUND_ATTEMPTS {
            let raw: Option<String> = conn
                .hget(&self.transactions_key, id.as_str())
                .await
                .map_err(backend_error)?;
            let Some(raw) = raw else {
                return Ok(None);
            };

            let (transaction, updated) = refunded(&raw, refund)?;
            let replaced: bool = self
                .replace_script
                .key(&self.transactions_key)
                .arg(id.as_str())
                .arg(&raw)
                .arg(&updated)
                .invoke_async(&mut conn)
                .await
                .map_err(backend_error)?;
            if replaced {
                return Ok(Some(transaction));
            }
            tracing::debug!(transaction_id = %id, "Refund lost a write race, retrying");
        }

        Err(StoreError::Backend(format!(
            "refund on {id} did not settle after {MAX_REFUND_ATTEMPTS} attempts"
        )))
    }
}
