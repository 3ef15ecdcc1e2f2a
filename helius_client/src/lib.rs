pub mod client;
pub mod extractor;
pub mod types;

pub use client::{HeliusClient, HeliusError, Result, TransactionSource};
pub use extractor::{extract_mint, MintRecord};
pub use types::{
    HeliusInnerInstruction, HeliusInstruction, HeliusTokenTransfer, HeliusTransaction,
    ParsedInfo, ParsedInstruction,
};
