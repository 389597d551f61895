//! Shared helpers for CLI commands
use crate::{
	chain::SubxtConnector,
	config::Settings,
	crowdloan::{CrowdLoan, SessionOptions},
	error::Result,
	log_verbose,
	wallet::KeystoreWallet,
};

/// Session type used by every command
pub type Session = CrowdLoan<SubxtConnector, KeystoreWallet>;

/// Build a session from settings without connecting
pub fn create_session(settings: &Settings) -> Result<Session> {
	let wallet = KeystoreWallet::from_accounts(&settings.accounts, settings.ss58_format)?;
	log_verbose!("🔑 Keystore loaded with {} account(s)", wallet.len());

	Ok(CrowdLoan::with_options(
		settings.node_url.clone(),
		SubxtConnector::default(),
		wallet,
		SessionOptions::from(settings),
	))
}

/// Build a session and connect it to the configured node
pub async fn connect_session(settings: &Settings) -> Result<Session> {
	let mut session = create_session(settings)?;
	session.connect().await?;
	Ok(session)
}
