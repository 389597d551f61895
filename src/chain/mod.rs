/// Chain interaction module
///
/// This module provides functionality for:
/// - Connecting to relay chain nodes
/// - Describing the calls the client submits
/// - Querying chain state and watching submitted extrinsics
pub mod call;
pub mod client;

pub use call::RelayCall;
pub use client::{RelayChain, RelayConnector, SubxtConnector, SubxtRelay};
