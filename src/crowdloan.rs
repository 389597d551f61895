//! Crowdloan session
//!
//! [`CrowdLoan`] owns the relay connection, the cached token decimals and the
//! wallet bridge. Every outward operation of the client goes through it.

use crate::{
	address,
	amount::{self, TokenAmount},
	chain::{RelayCall, RelayChain, RelayConnector},
	config::Settings,
	error::{CrowdloanError, Result},
	log_error, log_info, log_verbose, log_warn,
	transaction::{self, ChainEvent},
	wallet::{WalletAccount, WalletBridge},
};
use colored::Colorize;

/// Options that shape how amounts and referral codes are handled
#[derive(Debug, Clone)]
pub struct SessionOptions {
	pub app_name: String,
	pub default_decimals: u32,
	pub raised_decimals: u32,
	pub max_referral_len: usize,
}

impl From<&Settings> for SessionOptions {
	fn from(settings: &Settings) -> Self {
		Self {
			app_name: settings.app_name.clone(),
			default_decimals: settings.default_decimals,
			raised_decimals: settings.raised_decimals,
			max_referral_len: settings.max_referral_len,
		}
	}
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self::from(&Settings::default())
	}
}

/// Bytes attached as a remark for `code`, or `None` when the code should be
/// ignored (empty or longer than `max_len` UTF-16 units). Each unit
/// contributes its low byte.
pub fn referral_remark(code: &str, max_len: usize) -> Option<Vec<u8>> {
	let units: Vec<u16> = code.encode_utf16().collect();
	if units.is_empty() || units.len() > max_len {
		return None;
	}
	Some(units.into_iter().map(|unit| unit as u8).collect())
}

/// One client session against a relay chain endpoint
pub struct CrowdLoan<C: RelayConnector, W: WalletBridge> {
	endpoint: String,
	connector: C,
	wallet: W,
	options: SessionOptions,
	relay: Option<C::Chain>,
	decimals: u32,
}

impl<C: RelayConnector, W: WalletBridge> CrowdLoan<C, W> {
	pub fn new(endpoint: impl Into<String>, connector: C, wallet: W) -> Self {
		Self::with_options(endpoint, connector, wallet, SessionOptions::default())
	}

	pub fn with_options(
		endpoint: impl Into<String>,
		connector: C,
		wallet: W,
		options: SessionOptions,
	) -> Self {
		let decimals = options.default_decimals;
		Self { endpoint: endpoint.into(), connector, wallet, options, relay: None, decimals }
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn is_connected(&self) -> bool {
		self.relay.is_some()
	}

	/// Token decimals cached by the last successful `connect`
	pub fn decimals(&self) -> u32 {
		self.decimals
	}

	fn relay(&self) -> Result<&C::Chain> {
		self.relay.as_ref().ok_or(CrowdloanError::NotConnected)
	}

	/// Open the relay connection and cache the token decimals. No-op when
	/// already connected.
	pub async fn connect(&mut self) -> Result<()> {
		if self.relay.is_some() {
			return Ok(());
		}

		log_info!("Connecting to {}", self.endpoint);
		let relay = self.connector.connect(&self.endpoint).await?;

		let decimals = match relay.token_decimals().await? {
			Some(decimals) => decimals,
			None => {
				log_warn!(
					"tokenDecimals is not found in system properties. Will be set to a hardcode of {}",
					self.options.default_decimals
				);
				self.options.default_decimals
			},
		};

		log_verbose!("💰 Token decimals: {}", decimals);
		self.decimals = decimals;
		self.relay = Some(relay);
		Ok(())
	}

	/// Close the relay connection. Errors while closing are ignored.
	pub async fn disconnect(&mut self) {
		if let Some(relay) = self.relay.take() {
			if let Err(e) = relay.disconnect().await {
				log_verbose!("⚠️  Ignoring error while disconnecting: {}", e);
			}
		}
	}

	/// Amount raised by fund `fund_id`, zero when the fund does not exist
	///
	/// The raw value is always scaled by `raised_decimals` (10 by default),
	/// not by the chain's token decimals.
	pub async fn raised_amount(&self, fund_id: u32) -> Result<TokenAmount> {
		let raised = self.relay()?.fund_raised(fund_id).await?;
		Ok(TokenAmount::new(raised.unwrap_or(0), self.options.raised_decimals))
	}

	/// Free balance of `address` in token units
	pub async fn balance(&self, address: &str) -> Result<TokenAmount> {
		let relay = self.relay()?;
		let account = address::parse_account(address)?;
		let free = relay.free_balance(&account).await?;
		Ok(TokenAmount::new(free, self.decimals))
	}

	/// Whether the wallet bridge exposes at least one account
	pub async fn has_wallet_extension(&self) -> Result<bool> {
		let accounts = self.wallet.enable(&self.options.app_name).await?;
		Ok(!accounts.is_empty())
	}

	pub async fn wallet_addresses(&self) -> Result<Vec<WalletAccount>> {
		self.wallet.enable(&self.options.app_name).await
	}

	pub fn is_valid_address(&self, address: &str) -> bool {
		address::is_valid_address(address)
	}

	/// Raw chain units for a human readable amount, using the cached decimals
	pub fn to_chain_units(&self, amount: &str) -> Result<u128> {
		amount::parse_amount(amount, self.decimals)
	}

	pub fn contribute_call(&self, fund_id: u32, amount: &str) -> Result<RelayCall> {
		Ok(RelayCall::Contribute { fund_id, value: self.to_chain_units(amount)? })
	}

	/// Contribution, batched with a remark carrying `code` when the code is
	/// usable. Otherwise the same call as a plain contribution.
	pub fn contribute_with_referral_call(
		&self,
		fund_id: u32,
		amount: &str,
		code: &str,
	) -> Result<RelayCall> {
		let contribute = self.contribute_call(fund_id, amount)?;

		match referral_remark(code, self.options.max_referral_len) {
			Some(data) => Ok(RelayCall::BatchAll(vec![contribute, RelayCall::Remark { data }])),
			None => Ok(contribute),
		}
	}

	pub fn transfer_call(&self, recipient: &str, amount: &str) -> Result<RelayCall> {
		let dest = address::parse_account(recipient)?;
		Ok(RelayCall::Transfer { dest, value: self.to_chain_units(amount)? })
	}

	pub async fn contribute(
		&self,
		sender: &str,
		fund_id: u32,
		amount: &str,
	) -> Result<Vec<ChainEvent>> {
		let call = self.contribute_call(fund_id, amount)?;
		log_verbose!("{} is contributing {} for {}", sender, amount, fund_id);
		self.submit(sender, call).await
	}

	pub async fn contribute_with_referral_code(
		&self,
		sender: &str,
		fund_id: u32,
		amount: &str,
		code: &str,
	) -> Result<Vec<ChainEvent>> {
		let call = self.contribute_with_referral_call(fund_id, amount, code)?;
		log_info!(
			"{} is contributing {} for {} with referral code {}",
			sender,
			amount,
			fund_id,
			code
		);
		self.submit(sender, call).await
	}

	pub async fn transfer(
		&self,
		sender: &str,
		recipient: &str,
		amount: &str,
	) -> Result<Vec<ChainEvent>> {
		let call = self.transfer_call(recipient, amount)?;
		log_info!("{} is transferring {} to {}", sender, amount, recipient);
		self.submit(sender, call).await
	}

	/// Contribution routed through the `SalpLite` module, parameterised by a
	/// lease slot range instead of an amount
	pub async fn alternate_chain_contribute(
		&self,
		sender: &str,
		fund_id: u32,
		first_slot: u32,
		last_slot: u32,
	) -> Result<Vec<ChainEvent>> {
		log_info!(
			"{} is contributing for {} through SalpLite, first slot = {}, last slot = {}",
			sender,
			fund_id,
			first_slot,
			last_slot
		);
		self.submit(sender, RelayCall::ContributeFund { fund_id, first_slot, last_slot }).await
	}

	/// Sign `call` as `sender`, submit it and wait for the first final status
	pub async fn submit(&self, sender: &str, call: RelayCall) -> Result<Vec<ChainEvent>> {
		let relay = self.relay()?;

		let progress = match self.sign_and_watch(relay, sender, &call).await {
			Ok(progress) => progress,
			Err(e) => {
				log_error!("Error: {}", e);
				return Err(e);
			},
		};

		log_verbose!(
			"📤 Submitted {}::{} from {}",
			call.pallet(),
			call.name(),
			sender.bright_cyan()
		);
		transaction::await_outcome(progress).await
	}

	async fn sign_and_watch(
		&self,
		relay: &C::Chain,
		sender: &str,
		call: &RelayCall,
	) -> Result<transaction::StatusStream> {
		let signer = self.wallet.signer_for(sender).await?;
		relay.sign_and_watch(call, &signer).await
	}
}
