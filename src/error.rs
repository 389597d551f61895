//! Error types for the crowdloan client

use crate::transaction::{ChainEvent, ExtrinsicStatus};

/// Main error type for all crowdloan operations
#[derive(Debug, thiserror::Error)]
pub enum CrowdloanError {
	#[error("{0}")]
	Generic(String),

	#[error("Network error: {0}")]
	NetworkError(String),

	#[error("Subxt error: {0}")]
	Subxt(#[from] subxt::Error),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Wallet error: {0}")]
	Wallet(String),

	#[error("Invalid address '{address}': {reason}")]
	InvalidAddress { address: String, reason: String },

	#[error("Invalid amount '{amount}': {reason}")]
	InvalidAmount { amount: String, reason: String },

	#[error("Not connected to the relay chain, call connect() first")]
	NotConnected,

	#[error("Transaction failed with status {status} ({} events)", .events.len())]
	TransactionFailed { status: ExtrinsicStatus, events: Vec<ChainEvent> },

	#[error("Transaction status stream closed before a final status was reached")]
	StatusStreamClosed,

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl CrowdloanError {
	/// Events captured for a failed transaction, empty for every other error
	pub fn events(&self) -> &[ChainEvent] {
		match self {
			CrowdloanError::TransactionFailed { events, .. } => events,
			_ => &[],
		}
	}
}

pub type Result<T> = std::result::Result<T, CrowdloanError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transaction_failed_message_counts_events() {
		let err = CrowdloanError::TransactionFailed {
			status: ExtrinsicStatus::InBlock,
			events: vec![ChainEvent::new("System", "ExtrinsicFailed")],
		};
		assert_eq!(err.to_string(), "Transaction failed with status in-block (1 events)");
		assert_eq!(err.events().len(), 1);
	}

	#[test]
	fn test_events_empty_for_other_errors() {
		assert!(CrowdloanError::NotConnected.events().is_empty());
	}
}
