//! Local keystore wallet
//!
//! Accounts are derived from secret URIs (`//Alice`, a mnemonic, a mnemonic
//! with a derivation path) listed in the configuration file.
use super::{PayloadSigner, WalletAccount, WalletBridge, WalletSigner};
use crate::{
	address,
	error::{CrowdloanError, Result},
	log_verbose,
};
use async_trait::async_trait;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use subxt_signer::{sr25519::Keypair, SecretUri};
use zeroize::Zeroize;

/// A keystore entry as it appears in the configuration file
///
/// The secret URI is wiped from memory when the entry is dropped and never
/// shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreAccount {
	pub name: String,
	pub suri: String,
}

impl fmt::Debug for KeystoreAccount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeystoreAccount")
			.field("name", &self.name)
			.field("suri", &"<redacted>")
			.finish()
	}
}

impl Drop for KeystoreAccount {
	fn drop(&mut self) {
		self.suri.zeroize();
	}
}

struct Sr25519Signer(Keypair);

impl PayloadSigner for Sr25519Signer {
	fn public_key(&self) -> [u8; 32] {
		self.0.public_key().0
	}

	fn sign(&self, payload: &[u8]) -> [u8; 64] {
		self.0.sign(payload).0
	}
}

struct Entry {
	name: String,
	signer: WalletSigner,
}

/// Wallet bridge backed by keypairs held in memory
pub struct KeystoreWallet {
	entries: Vec<Entry>,
	ss58_prefix: u16,
}

impl KeystoreWallet {
	/// Derive every configured account. Fails on the first unparsable URI.
	pub fn from_accounts(accounts: &[KeystoreAccount], ss58_prefix: u16) -> Result<Self> {
		let mut entries = Vec::with_capacity(accounts.len());

		for account in accounts {
			let secret_uri = account.suri.parse::<SecretUri>().map_err(|e| {
				CrowdloanError::Wallet(format!("Invalid secret URI for '{}': {e}", account.name))
			})?;
			let keypair = Keypair::from_uri(&secret_uri).map_err(|e| {
				CrowdloanError::Wallet(format!("Failed to derive keypair for '{}': {e}", account.name))
			})?;

			entries.push(Entry {
				name: account.name.clone(),
				signer: WalletSigner::new(Arc::new(Sr25519Signer(keypair))),
			});
		}

		Ok(Self { entries, ss58_prefix })
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[async_trait]
impl WalletBridge for KeystoreWallet {
	async fn enable(&self, app_name: &str) -> Result<Vec<WalletAccount>> {
		log_verbose!("🔑 Keystore enabled for {}", app_name.bright_cyan());

		Ok(self
			.entries
			.iter()
			.map(|entry| WalletAccount {
				address: address::to_ss58(&entry.signer.account(), self.ss58_prefix),
				name: Some(entry.name.clone()),
			})
			.collect())
	}

	async fn signer_for(&self, address: &str) -> Result<WalletSigner> {
		let account = address::parse_account(address)?;

		self.entries
			.iter()
			.find(|entry| entry.signer.account() == account)
			.map(|entry| {
				log_verbose!("🔑 Using keystore account '{}'", entry.name.bright_green());
				entry.signer.clone()
			})
			.ok_or_else(|| {
				CrowdloanError::Wallet(format!("No keystore account found for address {address}"))
			})
	}
}
