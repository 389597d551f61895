//! # Crowdloan CLI Library
//!
//! Client for relay chain crowdloans: connect to a node, read fund and
//! balance state, and submit contributions and transfers signed through a
//! wallet bridge.

pub mod address;
pub mod amount;
pub mod chain;
pub mod cli;
pub mod config;
pub mod crowdloan;
pub mod error;
pub mod log;
pub mod transaction;
pub mod wallet;

// Re-export commonly used types and functions
pub use crowdloan::{CrowdLoan, SessionOptions};
pub use error::{CrowdloanError as Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library version
pub fn version() -> &'static str {
	VERSION
}

/// Get the library name
pub fn name() -> &'static str {
	NAME
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_version() {
		assert!(!version().is_empty());
	}

	#[test]
	fn test_name() {
		assert_eq!(name(), "crowdloan-cli");
	}
}
