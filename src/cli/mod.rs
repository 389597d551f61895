use crate::{
	config::Settings,
	error::{CrowdloanError, Result},
	log_print, log_success, log_verbose,
	transaction::ChainEvent,
};
use clap::Subcommand;
use colored::Colorize;

pub mod common;

use common::Session;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Show how much a crowdloan fund has raised
	Raised {
		/// Parachain id of the fund
		#[arg(short, long)]
		fund: u32,
	},

	/// Query account free balance
	Balance {
		/// Account address to query (SS58 or 0x hex)
		#[arg(short, long)]
		address: String,
	},

	/// List the accounts exposed by the wallet
	Accounts,

	/// Check whether an address is valid (SS58 or 0x hex)
	Validate {
		address: String,
	},

	/// Contribute to a crowdloan fund
	Contribute {
		/// Sender address (must be a wallet account)
		#[arg(short, long)]
		from: String,

		/// Parachain id of the fund
		#[arg(long)]
		fund: u32,

		/// Amount to contribute (e.g., "10", "10.5", "0.0001")
		#[arg(short, long)]
		amount: String,

		/// Referral code attached as a remark (ignored when empty or over 100 characters)
		#[arg(short, long)]
		referral: Option<String>,
	},

	/// Transfer tokens to another account
	Transfer {
		/// Sender address (must be a wallet account)
		#[arg(short, long)]
		from: String,

		/// The recipient's account address
		#[arg(short, long)]
		to: String,

		/// Amount to send (e.g., "10", "10.5", "0.0001")
		#[arg(short, long)]
		amount: String,
	},

	/// Contribute through the SalpLite module for a range of lease slots
	AltContribute {
		/// Sender address (must be a wallet account)
		#[arg(short, long)]
		from: String,

		/// Parachain id of the fund
		#[arg(long)]
		fund: u32,

		/// First lease slot
		#[arg(long)]
		first_slot: u32,

		/// Last lease slot
		#[arg(long)]
		last_slot: u32,
	},

	/// Show version information
	Version,
}

/// Execute a CLI command
pub async fn execute_command(command: Commands, settings: &Settings) -> Result<()> {
	match command {
		Commands::Raised { fund } => {
			let mut session = common::connect_session(settings).await?;
			let raised = session.raised_amount(fund).await;
			session.disconnect().await;
			log_print!("🏦 Fund {} raised: {}", fund, raised?.to_string().bright_yellow());
			Ok(())
		},
		Commands::Balance { address } => {
			let mut session = common::connect_session(settings).await?;
			let balance = session.balance(&address).await;
			session.disconnect().await;
			log_print!("💰 Balance: {}", balance?.to_string().bright_yellow());
			Ok(())
		},
		Commands::Accounts => handle_accounts_command(settings).await,
		Commands::Validate { address } => {
			let session = common::create_session(settings)?;
			if !session.is_valid_address(&address) {
				return Err(CrowdloanError::InvalidAddress {
					address,
					reason: "not an SS58 address or a 0x hex public key".to_string(),
				});
			}
			log_success!("✅ {} is a valid address", address);
			Ok(())
		},
		Commands::Contribute { from, fund, amount, referral } => {
			let mut session = common::connect_session(settings).await?;
			let result = match referral {
				Some(code) =>
					session.contribute_with_referral_code(&from, fund, &amount, &code).await,
				None => session.contribute(&from, fund, &amount).await,
			};
			finish_transaction(&mut session, result).await
		},
		Commands::Transfer { from, to, amount } => {
			let mut session = common::connect_session(settings).await?;
			let result = session.transfer(&from, &to, &amount).await;
			finish_transaction(&mut session, result).await
		},
		Commands::AltContribute { from, fund, first_slot, last_slot } => {
			let mut session = common::connect_session(settings).await?;
			let result =
				session.alternate_chain_contribute(&from, fund, first_slot, last_slot).await;
			finish_transaction(&mut session, result).await
		},
		Commands::Version => {
			log_print!("CLI Version: Crowdloan CLI v{}", env!("CARGO_PKG_VERSION"));
			Ok(())
		},
	}
}

async fn handle_accounts_command(settings: &Settings) -> Result<()> {
	let session = common::create_session(settings)?;

	if !session.has_wallet_extension().await? {
		log_print!("No wallet accounts found. Add [[accounts]] entries to the config file.");
		return Ok(());
	}

	log_print!("🔑 Wallet accounts:");
	for account in session.wallet_addresses().await? {
		let name = account.name.unwrap_or_default();
		log_print!("   {} {}", account.address.bright_cyan(), name.dimmed());
	}
	Ok(())
}

async fn finish_transaction(session: &mut Session, result: Result<Vec<ChainEvent>>) -> Result<()> {
	session.disconnect().await;

	let events = result?;
	log_success!("🎉 Transaction confirmed!");
	for event in events {
		log_verbose!("   📣 {}", event);
	}
	Ok(())
}
