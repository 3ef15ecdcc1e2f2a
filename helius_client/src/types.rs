use serde::{Deserialize, Serialize};

// Helius Enhanced Transactions API response structures. Only the fields the
// mint extractor inspects are modeled; every field that may be absent in the
// wire format is an Option or a defaulted collection so that access is
// always an explicit presence check.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliusTransaction {
    pub signature: String,
    pub timestamp: i64,
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    #[serde(rename = "feePayer", default)]
    pub fee_payer: String,
    #[serde(rename = "tokenTransfers", default)]
    pub token_transfers: Vec<HeliusTokenTransfer>,
    #[serde(default)]
    pub instructions: Vec<HeliusInstruction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeliusTokenTransfer {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(rename = "fromUserAccount", default)]
    pub from_user_account: Option<String>,
    #[serde(rename = "toUserAccount", default)]
    pub to_user_account: Option<String>,
    #[serde(rename = "tokenAmount", default)]
    pub token_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeliusInstruction {
    #[serde(rename = "programId", default)]
    pub program_id: String,
    #[serde(rename = "innerInstructions", default)]
    pub inner_instructions: Vec<HeliusInnerInstruction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeliusInnerInstruction {
    #[serde(rename = "programId", default)]
    pub program_id: String,
    #[serde(default)]
    pub parsed: Option<ParsedInstruction>,
}

/// Parsed-action descriptor carried by some inner instructions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedInstruction {
    #[serde(rename = "type", default)]
    pub instruction_type: String,
    #[serde(default)]
    pub info: ParsedInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedInfo {
    #[serde(default)]
    pub mint: Option<String>,
}
