//! Integration tests against a running relay chain node
//!
//! These tests require a local development relay chain at ws://127.0.0.1:9944
//! with the usual funded dev accounts (//Alice, //Bob).
//!
//! Run with: `cargo test --test live_node -- --ignored --nocapture`

use crowdloan_cli::{
	chain::SubxtConnector,
	config::{Settings, DEFAULT_NODE_URL},
	wallet::{KeystoreAccount, KeystoreWallet},
	CrowdLoan, SessionOptions,
};

const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

fn dev_session() -> CrowdLoan<SubxtConnector, KeystoreWallet> {
	let mut settings = Settings::default();
	settings.ss58_format = 42;
	settings.accounts = vec![
		KeystoreAccount { name: "alice".into(), suri: "//Alice".into() },
		KeystoreAccount { name: "bob".into(), suri: "//Bob".into() },
	];

	let wallet = KeystoreWallet::from_accounts(&settings.accounts, settings.ss58_format)
		.expect("dev accounts derive");
	CrowdLoan::with_options(
		DEFAULT_NODE_URL,
		SubxtConnector::default(),
		wallet,
		SessionOptions::from(&settings),
	)
}

#[tokio::test]
#[ignore]
async fn queries_against_local_node() {
	let mut session = dev_session();
	session.connect().await.expect("local node reachable");

	let balance = session.balance(ALICE).await.expect("balance query");
	println!("    Alice balance: {}", balance);
	assert!(!balance.is_zero());

	let raised = session.raised_amount(u32::MAX).await.expect("fund query");
	assert!(raised.is_zero());

	session.disconnect().await;
	assert!(!session.is_connected());
}

#[tokio::test]
#[ignore]
async fn transfer_on_local_node() {
	let mut session = dev_session();
	session.connect().await.expect("local node reachable");

	let events = session.transfer(ALICE, BOB, "1").await.expect("transfer succeeds");
	assert!(events.iter().any(|e| e.is("Balances", "Transfer")));

	session.disconnect().await;
}
