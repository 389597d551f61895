//! Wallet bridge
//!
//! This module provides:
//! - the [`WalletBridge`] seam used for account discovery and signer lookup
//! - [`WalletSigner`], the signer handed to the chain client
//! - [`KeystoreWallet`], a local keystore backed bridge
pub mod keystore;

pub use keystore::{KeystoreAccount, KeystoreWallet};

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use sp_core::crypto::AccountId32;
use std::{fmt, sync::Arc};
use subxt::{utils::MultiSignature, PolkadotConfig};

/// An account exposed by the wallet bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletAccount {
	pub address: String,
	pub name: Option<String>,
}

/// Raw sr25519 signing primitive behind a [`WalletSigner`]
pub trait PayloadSigner: Send + Sync {
	fn public_key(&self) -> [u8; 32];
	fn sign(&self, payload: &[u8]) -> [u8; 64];
}

/// Signer for a single wallet account
#[derive(Clone)]
pub struct WalletSigner {
	inner: Arc<dyn PayloadSigner>,
}

impl WalletSigner {
	pub fn new(inner: Arc<dyn PayloadSigner>) -> Self {
		Self { inner }
	}

	pub fn account(&self) -> AccountId32 {
		AccountId32::from(self.inner.public_key())
	}
}

impl fmt::Debug for WalletSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WalletSigner").field("account", &self.account()).finish()
	}
}

impl subxt::tx::Signer<PolkadotConfig> for WalletSigner {
	fn account_id(&self) -> subxt::utils::AccountId32 {
		subxt::utils::AccountId32::from(self.inner.public_key())
	}

	fn sign(&self, signer_payload: &[u8]) -> MultiSignature {
		MultiSignature::Sr25519(self.inner.sign(signer_payload))
	}
}

/// Account discovery and signing, the role a browser wallet extension plays
#[async_trait]
pub trait WalletBridge: Send + Sync {
	/// Authorize `app_name` and return every account the wallet exposes
	async fn enable(&self, app_name: &str) -> Result<Vec<WalletAccount>>;

	/// Look up the signer for `address`
	async fn signer_for(&self, address: &str) -> Result<WalletSigner>;
}
