//! Transaction status tracking
//!
//! A submitted extrinsic reports a stream of [`StatusUpdate`]s. Each update is
//! classified into a [`TransactionOutcome`] and the first terminal outcome
//! settles the submission. Dropping the stream unsubscribes from the node.

use crate::{
	error::{CrowdloanError, Result},
	log_error, log_success, log_verbose,
};
use futures::{stream::BoxStream, StreamExt};
use std::fmt;

pub const SYSTEM_PALLET: &str = "System";
pub const EXTRINSIC_SUCCESS: &str = "ExtrinsicSuccess";
pub const EXTRINSIC_FAILED: &str = "ExtrinsicFailed";

/// Pool / block status of a submitted extrinsic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtrinsicStatus {
	/// Validated and waiting in the pool
	Ready,
	/// Gossiped to peers
	Broadcast,
	InBlock,
	Finalized,
	/// Removed from the best chain by a reorg
	Retracted,
	Dropped(String),
	Invalid(String),
	/// Anything else reported by the node
	Other(String),
}

impl ExtrinsicStatus {
	pub fn is_pending(&self) -> bool {
		matches!(self, ExtrinsicStatus::Ready | ExtrinsicStatus::Broadcast)
	}

	pub fn is_included(&self) -> bool {
		matches!(self, ExtrinsicStatus::InBlock | ExtrinsicStatus::Finalized)
	}
}

impl fmt::Display for ExtrinsicStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExtrinsicStatus::Ready => write!(f, "ready"),
			ExtrinsicStatus::Broadcast => write!(f, "broadcast"),
			ExtrinsicStatus::InBlock => write!(f, "in-block"),
			ExtrinsicStatus::Finalized => write!(f, "finalized"),
			ExtrinsicStatus::Retracted => write!(f, "retracted"),
			ExtrinsicStatus::Dropped(reason) => write!(f, "dropped: {}", reason),
			ExtrinsicStatus::Invalid(reason) => write!(f, "invalid: {}", reason),
			ExtrinsicStatus::Other(status) => write!(f, "{}", status),
		}
	}
}

/// An event emitted by the extrinsic, identified by pallet and variant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEvent {
	pub pallet: String,
	pub variant: String,
}

impl ChainEvent {
	pub fn new(pallet: impl Into<String>, variant: impl Into<String>) -> Self {
		Self { pallet: pallet.into(), variant: variant.into() }
	}

	pub fn is(&self, pallet: &str, variant: &str) -> bool {
		self.pallet == pallet && self.variant == variant
	}
}

impl fmt::Display for ChainEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.pallet, self.variant)
	}
}

/// One status report for a submitted extrinsic. `events` is only populated
/// once the extrinsic is in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
	pub status: ExtrinsicStatus,
	pub events: Vec<ChainEvent>,
}

impl StatusUpdate {
	pub fn new(status: ExtrinsicStatus) -> Self {
		Self { status, events: Vec::new() }
	}

	pub fn with_events(status: ExtrinsicStatus, events: Vec<ChainEvent>) -> Self {
		Self { status, events }
	}
}

pub type StatusStream = BoxStream<'static, Result<StatusUpdate>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
	NotReady,
	Success,
	Fail,
}

impl TransactionOutcome {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, TransactionOutcome::NotReady)
	}
}

/// Classify a single status report
///
/// Success is checked before failure. An included extrinsic carrying
/// neither event counts as a failure, as does any status that is neither
/// pending nor included.
pub fn classify(status: &ExtrinsicStatus, events: &[ChainEvent]) -> TransactionOutcome {
	if status.is_pending() {
		return TransactionOutcome::NotReady;
	}

	if status.is_included() &&
		events.iter().any(|event| event.is(SYSTEM_PALLET, EXTRINSIC_SUCCESS))
	{
		return TransactionOutcome::Success;
	}

	TransactionOutcome::Fail
}

/// Final result of a watched transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
	Succeeded(Vec<ChainEvent>),
	Failed { status: ExtrinsicStatus, events: Vec<ChainEvent> },
}

impl Settlement {
	pub fn into_result(self) -> Result<Vec<ChainEvent>> {
		match self {
			Settlement::Succeeded(events) => Ok(events),
			Settlement::Failed { status, events } =>
				Err(CrowdloanError::TransactionFailed { status, events }),
		}
	}
}

/// Resolve-once state machine over status updates
#[derive(Debug, Default)]
pub struct TxWatcher {
	settled: bool,
}

impl TxWatcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_settled(&self) -> bool {
		self.settled
	}

	/// Feed one update. Returns the settlement the first time a terminal
	/// outcome is observed and `None` for every other call.
	pub fn observe(&mut self, update: StatusUpdate) -> Option<Settlement> {
		if self.settled {
			return None;
		}

		match classify(&update.status, &update.events) {
			TransactionOutcome::NotReady => None,
			TransactionOutcome::Success => {
				self.settled = true;
				Some(Settlement::Succeeded(update.events))
			},
			TransactionOutcome::Fail => {
				self.settled = true;
				Some(Settlement::Failed { status: update.status, events: update.events })
			},
		}
	}
}

/// Drive a status stream until the first terminal outcome
///
/// Returns the captured events on success and
/// [`CrowdloanError::TransactionFailed`] on failure. The stream is dropped
/// as soon as the transaction settles.
pub async fn await_outcome(mut progress: StatusStream) -> Result<Vec<ChainEvent>> {
	let mut watcher = TxWatcher::new();

	while let Some(update) = progress.next().await {
		let update = update?;
		log_verbose!("   Transaction status: {}", update.status);

		if let Some(settlement) = watcher.observe(update) {
			match &settlement {
				Settlement::Succeeded(_) => log_success!("✅ Transaction successful"),
				Settlement::Failed { status, events } => log_error!(
					"Something went wrong with transaction. Status: {} Events: [{}]",
					status,
					events.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
				),
			}
			return settlement.into_result();
		}
	}

	Err(CrowdloanError::StatusStreamClosed)
}
