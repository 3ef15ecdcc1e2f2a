use crate::types::HeliusTransaction;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A derived token-mint event. Uniqueness key is the transaction signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Mint address of the created token
    pub mint: String,
    /// Transaction timestamp in Unix seconds
    pub timestamp: i64,
    /// Signature of the originating transaction
    pub signature: String,
}

const TOKEN_MINT_TYPE: &str = "TOKEN_MINT";
const INITIALIZE_MINT2: &str = "initializeMint2";

/// Decide whether a transaction represents a token-mint event for the given
/// wallet, returning a normalized record if so.
///
/// A transaction qualifies only when the wallet paid its fees. The fast path
/// takes the first token transfer of a TOKEN_MINT transaction; otherwise the
/// token-program instructions are scanned for an inner `initializeMint2`.
///
/// The fast path assumes the primary mint is always the first tokenTransfers
/// entry. That is a known approximation; a transaction producing multiple
/// tokens may have its mint misattributed.
pub fn extract_mint(
    tx: &HeliusTransaction,
    wallet_address: &str,
    token_program_id: &str,
) -> Option<MintRecord> {
    if tx.fee_payer != wallet_address {
        debug!(
            "Skipping tx {}: {} is not the feePayer",
            tx.signature, wallet_address
        );
        return None;
    }

    if tx.transaction_type == TOKEN_MINT_TYPE {
        if let Some(mint) = tx
            .token_transfers
            .first()
            .and_then(|transfer| transfer.mint.as_deref())
        {
            debug!("Found mint in tx {}: {}", tx.signature, mint);
            return Some(MintRecord {
                mint: mint.to_string(),
                timestamp: tx.timestamp,
                signature: tx.signature.clone(),
            });
        }
    }

    for instruction in tx
        .instructions
        .iter()
        .filter(|ix| ix.program_id == token_program_id)
    {
        for inner in &instruction.inner_instructions {
            if inner.program_id != token_program_id {
                continue;
            }
            let Some(parsed) = &inner.parsed else {
                continue;
            };
            if parsed.instruction_type != INITIALIZE_MINT2 {
                continue;
            }
            if let Some(mint) = parsed.info.mint.as_deref() {
                debug!(
                    "Found mint in tx {} (initializeMint2): {}",
                    tx.signature, mint
                );
                return Some(MintRecord {
                    mint: mint.to_string(),
                    timestamp: tx.timestamp,
                    signature: tx.signature.clone(),
                });
            }
        }
    }

    debug!("Skipping tx {}: No mint found", tx.signature);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WALLET: &str = "BAGSB9TpGrZxQbEsrEznv5jXXdwyP6AXerN8aVRiAmcv";
    const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    fn tx_from_json(value: serde_json::Value) -> HeliusTransaction {
        serde_json::from_value(value).expect("valid test transaction")
    }

    #[test]
    fn foreign_fee_payer_is_skipped() {
        let tx = tx_from_json(json!({
            "signature": "sig1",
            "timestamp": 1700000000,
            "type": "TOKEN_MINT",
            "feePayer": "SomeOtherWallet11111111111111111111111111111",
            "tokenTransfers": [{"mint": "MintAddr111"}],
        }));

        assert_eq!(extract_mint(&tx, WALLET, TOKEN_PROGRAM), None);
    }

    #[test]
    fn token_mint_type_takes_first_transfer_mint() {
        let tx = tx_from_json(json!({
            "signature": "sig2",
            "timestamp": 1700000100,
            "type": "TOKEN_MINT",
            "feePayer": WALLET,
            "tokenTransfers": [
                {"mint": "MintAddr111", "tokenAmount": 1.0},
                {"mint": "MintAddr222", "tokenAmount": 2.0},
            ],
        }));

        assert_eq!(
            extract_mint(&tx, WALLET, TOKEN_PROGRAM),
            Some(MintRecord {
                mint: "MintAddr111".to_string(),
                timestamp: 1700000100,
                signature: "sig2".to_string(),
            })
        );
    }

    #[test]
    fn token_mint_type_without_transfer_mint_falls_through() {
        // TOKEN_MINT but the first transfer carries no mint field; the
        // instruction scan must still run
        let tx = tx_from_json(json!({
            "signature": "sig3",
            "timestamp": 1700000200,
            "type": "TOKEN_MINT",
            "feePayer": WALLET,
            "tokenTransfers": [{"tokenAmount": 1.0}],
            "instructions": [{
                "programId": TOKEN_PROGRAM,
                "innerInstructions": [{
                    "programId": TOKEN_PROGRAM,
                    "parsed": {"type": "initializeMint2", "info": {"mint": "MintAddr333"}},
                }],
            }],
        }));

        let record = extract_mint(&tx, WALLET, TOKEN_PROGRAM).unwrap();
        assert_eq!(record.mint, "MintAddr333");
    }

    #[test]
    fn initialize_mint2_inner_instruction_is_detected() {
        let tx = tx_from_json(json!({
            "signature": "sig4",
            "timestamp": 1700000300,
            "type": "UNKNOWN",
            "feePayer": WALLET,
            "instructions": [
                {"programId": "SomeOtherProgram1111111111111111111111111111"},
                {
                    "programId": TOKEN_PROGRAM,
                    "innerInstructions": [
                        {"programId": TOKEN_PROGRAM, "parsed": {"type": "transfer"}},
                        {
                            "programId": TOKEN_PROGRAM,
                            "parsed": {"type": "initializeMint2", "info": {"mint": "MintAddr444"}},
                        },
                    ],
                },
            ],
        }));

        assert_eq!(
            extract_mint(&tx, WALLET, TOKEN_PROGRAM),
            Some(MintRecord {
                mint: "MintAddr444".to_string(),
                timestamp: 1700000300,
                signature: "sig4".to_string(),
            })
        );
    }

    #[test]
    fn inner_instruction_under_foreign_program_is_ignored() {
        let tx = tx_from_json(json!({
            "signature": "sig5",
            "timestamp": 1700000400,
            "type": "UNKNOWN",
            "feePayer": WALLET,
            "instructions": [{
                "programId": TOKEN_PROGRAM,
                "innerInstructions": [{
                    "programId": "SomeOtherProgram1111111111111111111111111111",
                    "parsed": {"type": "initializeMint2", "info": {"mint": "MintAddr555"}},
                }],
            }],
        }));

        assert_eq!(extract_mint(&tx, WALLET, TOKEN_PROGRAM), None);
    }

    #[test]
    fn transaction_without_mint_yields_none() {
        let tx = tx_from_json(json!({
            "signature": "sig6",
            "timestamp": 1700000500,
            "type": "TRANSFER",
            "feePayer": WALLET,
        }));

        assert_eq!(extract_mint(&tx, WALLET, TOKEN_PROGRAM), None);
    }

    #[test]
    fn parsed_without_mint_field_yields_none() {
        let tx = tx_from_json(json!({
            "signature": "sig7",
            "timestamp": 1700000600,
            "type": "UNKNOWN",
            "feePayer": WALLET,
            "instructions": [{
                "programId": TOKEN_PROGRAM,
                "innerInstructions": [{
                    "programId": TOKEN_PROGRAM,
                    "parsed": {"type": "initializeMint2", "info": {}},
                }],
            }],
        }));

        assert_eq!(extract_mint(&tx, WALLET, TOKEN_PROGRAM), None);
    }
}
