use config_manager::TrackerConfig;
use helius_client::{extract_mint, HeliusError, MintRecord, TransactionSource};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Transaction fetch failed: {0}")]
    Source(#[from] HeliusError),
}

pub type Result<T> = std::result::Result<T, CollectorError>;

/// Paginates backward through a wallet's transaction history and accumulates
/// mint records.
///
/// One page is fetched per source call; the `before` cursor is the signature
/// of the last transaction of the previous page. A fixed throttle is applied
/// between processed transactions, independent of the source's retry backoff.
/// Any source failure aborts the whole pass.
pub struct MintCollector {
    source: Arc<dyn TransactionSource>,
    wallet_address: String,
    token_program_id: String,
    max_mints: usize,
    throttle: Duration,
}

impl MintCollector {
    pub fn new(source: Arc<dyn TransactionSource>, tracker: &TrackerConfig) -> Self {
        Self {
            source,
            wallet_address: tracker.wallet_address.clone(),
            token_program_id: tracker.token_program_id.clone(),
            max_mints: tracker.max_mints,
            throttle: Duration::from_millis(tracker.throttle_ms),
        }
    }

    /// Collect up to `max_mints` mint records for the configured wallet,
    /// sorted descending by timestamp
    pub async fn collect(&self) -> Result<Vec<MintRecord>> {
        let mut mints: Vec<MintRecord> = Vec::new();
        let mut before: Option<String> = None;

        while mints.len() < self.max_mints {
            let page = self
                .source
                .transactions_page(&self.wallet_address, before.as_deref())
                .await?;

            if page.is_empty() {
                debug!("No more transactions to process");
                break;
            }

            debug!("Processing page of {} transactions", page.len());

            for tx in &page {
                if let Some(record) = extract_mint(tx, &self.wallet_address, &self.token_program_id)
                {
                    debug!(
                        "Mint {}/{} added: {}",
                        mints.len() + 1,
                        self.max_mints,
                        record.mint
                    );
                    mints.push(record);
                    if mints.len() >= self.max_mints {
                        break;
                    }
                }

                // Throttle upstream pacing between transactions
                if !self.throttle.is_zero() {
                    sleep(self.throttle).await;
                }
            }

            if mints.len() >= self.max_mints {
                break;
            }

            before = page.last().map(|tx| tx.signature.clone());
        }

        mints.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        mints.truncate(self.max_mints);

        info!(
            "Collected {} mint records for wallet {}",
            mints.len(),
            self.wallet_address
        );

        Ok(mints)
    }
}
