//! Relay chain client
//!
//! [`RelayConnector`] and [`RelayChain`] are the seam between the crowdloan
//! session and the node. [`SubxtConnector`] is the production implementation,
//! a subxt `OnlineClient` running over a jsonrpsee websocket client.

use crate::{
	chain::call::RelayCall,
	error::{CrowdloanError, Result},
	log_verbose,
	transaction::{ChainEvent, ExtrinsicStatus, StatusStream, StatusUpdate},
	wallet::WalletSigner,
};
use async_trait::async_trait;
use futures::StreamExt;
use jsonrpsee::{
	core::client::ClientT,
	rpc_params,
	ws_client::{WsClient, WsClientBuilder},
};
use sp_core::crypto::AccountId32;
use std::{sync::Arc, time::Duration};
use subxt::{
	backend::rpc::RpcClient,
	dynamic::{At, Value},
	tx::{TxProgress, TxStatus},
	OnlineClient, PolkadotConfig,
};

/// Opens connections to a relay chain node
#[async_trait]
pub trait RelayConnector: Send + Sync {
	type Chain: RelayChain;

	async fn connect(&self, endpoint: &str) -> Result<Self::Chain>;
}

/// A live connection to a relay chain node
#[async_trait]
pub trait RelayChain: Send + Sync {
	/// `tokenDecimals` from the node's system properties, if reported
	async fn token_decimals(&self) -> Result<Option<u32>>;

	/// `raised` field of `Crowdloan::Funds(fund_id)`, `None` when no fund exists
	async fn fund_raised(&self, fund_id: u32) -> Result<Option<u128>>;

	/// Free balance of `account`, zero for unknown accounts
	async fn free_balance(&self, account: &AccountId32) -> Result<u128>;

	/// Sign `call` with `signer`, submit it and stream its status updates
	async fn sign_and_watch(&self, call: &RelayCall, signer: &WalletSigner)
		-> Result<StatusStream>;

	/// Close the connection
	async fn disconnect(&self) -> Result<()>;
}

/// Read the decimals out of a `system_properties` response. The node reports
/// either a number or an array with one entry per token.
pub fn decimals_from_properties(properties: &serde_json::Value) -> Option<u32> {
	let decimals = match properties.get("tokenDecimals")? {
		serde_json::Value::Array(values) => values.first()?.as_u64(),
		value => value.as_u64(),
	};
	decimals.and_then(|decimals| u32::try_from(decimals).ok())
}

/// Connection settings for the websocket client
#[derive(Debug, Clone)]
pub struct SubxtConnector {
	pub connection_timeout: Duration,
	pub request_timeout: Duration,
}

impl Default for SubxtConnector {
	fn default() -> Self {
		Self { connection_timeout: Duration::from_secs(30), request_timeout: Duration::from_secs(30) }
	}
}

#[async_trait]
impl RelayConnector for SubxtConnector {
	type Chain = SubxtRelay;

	async fn connect(&self, endpoint: &str) -> Result<SubxtRelay> {
		SubxtRelay::connect(endpoint, self).await
	}
}

/// Wrapper around OnlineClient that also keeps the raw RPC client
pub struct SubxtRelay {
	client: OnlineClient<PolkadotConfig>,
	rpc_client: Arc<WsClient>,
	node_url: String,
}

impl SubxtRelay {
	async fn connect(node_url: &str, settings: &SubxtConnector) -> Result<Self> {
		log_verbose!("🔗 Connecting to relay chain node: {}", node_url);

		let ws_client = WsClientBuilder::default()
			.connection_timeout(settings.connection_timeout)
			.request_timeout(settings.request_timeout)
			.build(node_url)
			.await
			.map_err(|e| {
				CrowdloanError::NetworkError(format!("Failed to create RPC client: {:?}", e))
			})?;

		let ws_client = Arc::new(ws_client);
		let rpc_client = RpcClient::new(ws_client.clone());

		let client = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client)
			.await
			.map_err(|e| CrowdloanError::NetworkError(format!("Failed to connect: {:?}", e)))?;

		log_verbose!("✅ Connected to relay chain node successfully!");

		Ok(Self { client, rpc_client: ws_client, node_url: node_url.to_string() })
	}

	/// Get reference to the underlying SubXT client
	pub fn client(&self) -> &OnlineClient<PolkadotConfig> {
		&self.client
	}

	pub fn node_url(&self) -> &str {
		&self.node_url
	}

	async fn fetch_storage(
		&self,
		pallet: &str,
		entry: &str,
		keys: Vec<Value>,
	) -> Result<Option<Value<u32>>> {
		let storage_addr = subxt::dynamic::storage(pallet, entry, keys);

		let storage_at = self.client.storage().at_latest().await.map_err(|e| {
			CrowdloanError::NetworkError(format!("Failed to access storage: {:?}", e))
		})?;

		let value = storage_at.fetch(&storage_addr).await.map_err(|e| {
			CrowdloanError::NetworkError(format!(
				"Failed to fetch {}::{}: {:?}",
				pallet, entry, e
			))
		})?;

		value
			.map(|thunk| thunk.to_value().map_err(|e| decode_failure(pallet, entry, e)))
			.transpose()
	}
}

fn decode_failure(pallet: &str, entry: &str, error: impl std::fmt::Debug) -> CrowdloanError {
	CrowdloanError::Generic(format!("Failed to decode {}::{}: {:?}", pallet, entry, error))
}

/// Storage key for `System::Account`, the raw 32 account id bytes
fn account_key(account: &AccountId32) -> Value {
	Value::from_bytes(<AccountId32 as AsRef<[u8]>>::as_ref(account))
}

#[async_trait]
impl RelayChain for SubxtRelay {
	async fn token_decimals(&self) -> Result<Option<u32>> {
		log_verbose!("🔍 Querying chain properties...");

		let properties: serde_json::Value = self
			.rpc_client
			.request("system_properties", rpc_params![])
			.await
			.map_err(|e| {
				CrowdloanError::NetworkError(format!("Failed to fetch chain properties: {:?}", e))
			})?;

		log_verbose!("🔗 Chain properties: {}", properties);
		Ok(decimals_from_properties(&properties))
	}

	async fn fund_raised(&self, fund_id: u32) -> Result<Option<u128>> {
		log_verbose!("🔍 Querying crowdloan fund {}", fund_id);

		let Some(fund) =
			self.fetch_storage("Crowdloan", "Funds", vec![Value::u128(fund_id as u128)]).await?
		else {
			return Ok(None);
		};

		let raised = fund.at("raised").and_then(|v| v.as_u128()).ok_or_else(|| {
			CrowdloanError::Generic(format!("Fund {} has no readable 'raised' field", fund_id))
		})?;

		Ok(Some(raised))
	}

	async fn free_balance(&self, account: &AccountId32) -> Result<u128> {
		let Some(info) =
			self.fetch_storage("System", "Account", vec![account_key(account)]).await?
		else {
			return Ok(0);
		};

		info.at("data").at("free").and_then(|v| v.as_u128()).ok_or_else(|| {
			CrowdloanError::Generic("Account info has no readable 'data.free' field".to_string())
		})
	}

	async fn sign_and_watch(
		&self,
		call: &RelayCall,
		signer: &WalletSigner,
	) -> Result<StatusStream> {
		log_verbose!("✍️  Signing {}::{} ...", call.pallet(), call.name());

		let payload = call.to_payload();
		let progress = self
			.client
			.tx()
			.sign_and_submit_then_watch_default(&payload, signer)
			.await
			.map_err(|e| {
				CrowdloanError::NetworkError(format!("Failed to submit transaction: {:?}", e))
			})?;

		log_verbose!("📋 Transaction submitted: {:?}", progress.extrinsic_hash());
		Ok(status_stream(progress))
	}

	async fn disconnect(&self) -> Result<()> {
		// The websocket closes once the last client handle is dropped
		log_verbose!("🔌 Disconnecting from {}", self.node_url);
		Ok(())
	}
}

type Progress = TxProgress<PolkadotConfig, OnlineClient<PolkadotConfig>>;

fn status_stream(progress: Progress) -> StatusStream {
	progress
		.then(|status| async move {
			match status {
				Ok(status) => status_update(status).await,
				Err(e) => Err(CrowdloanError::NetworkError(format!(
					"Transaction progress error: {:?}",
					e
				))),
			}
		})
		.boxed()
}

async fn status_update(
	status: TxStatus<PolkadotConfig, OnlineClient<PolkadotConfig>>,
) -> Result<StatusUpdate> {
	let update = match status {
		TxStatus::Validated => StatusUpdate::new(ExtrinsicStatus::Ready),
		TxStatus::Broadcasted { .. } => StatusUpdate::new(ExtrinsicStatus::Broadcast),
		TxStatus::NoLongerInBestBlock => StatusUpdate::new(ExtrinsicStatus::Retracted),
		TxStatus::InBestBlock(in_block) => {
			log_verbose!("   Transaction included in block: {:?}", in_block.block_hash());
			let events = in_block.fetch_events().await?;
			StatusUpdate::with_events(ExtrinsicStatus::InBlock, collect_events(&events)?)
		},
		TxStatus::InFinalizedBlock(in_block) => {
			log_verbose!("   Transaction finalized in block: {:?}", in_block.block_hash());
			let events = in_block.fetch_events().await?;
			StatusUpdate::with_events(ExtrinsicStatus::Finalized, collect_events(&events)?)
		},
		TxStatus::Dropped { message } => StatusUpdate::new(ExtrinsicStatus::Dropped(message)),
		TxStatus::Invalid { message } => StatusUpdate::new(ExtrinsicStatus::Invalid(message)),
		TxStatus::Error { message } => StatusUpdate::new(ExtrinsicStatus::Other(message)),
	};
	Ok(update)
}

fn collect_events(
	events: &subxt::blocks::ExtrinsicEvents<PolkadotConfig>,
) -> Result<Vec<ChainEvent>> {
	events
		.iter()
		.map(|event| {
			let event = event?;
			Ok(ChainEvent::new(event.pallet_name(), event.variant_name()))
		})
		.collect()
}
