//! Configuration management module
//!
//! Settings are read from a TOML file, by default
//! `<config dir>/crowdloan/config.toml`. A missing file means defaults.

use crate::{
	error::{CrowdloanError, Result},
	log_verbose,
	wallet::KeystoreAccount,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_NODE_URL: &str = "ws://127.0.0.1:9944";

/// Application identifier passed to the wallet bridge
pub const DEFAULT_APP_NAME: &str = "uniquecrowdloan";

/// Used when the node does not report `tokenDecimals`
pub const DEFAULT_DECIMALS: u32 = 12;

/// Fund `raised` values are always scaled by this many decimals,
/// independent of the chain's token decimals
pub const RAISED_AMOUNT_DECIMALS: u32 = 10;

/// Longest referral code that is attached as a remark
pub const MAX_REFERRAL_CODE_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub node_url: String,
	pub app_name: String,
	pub ss58_format: u16,
	pub default_decimals: u32,
	pub raised_decimals: u32,
	pub max_referral_len: usize,
	pub accounts: Vec<KeystoreAccount>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			node_url: DEFAULT_NODE_URL.to_string(),
			app_name: DEFAULT_APP_NAME.to_string(),
			ss58_format: 0,
			default_decimals: DEFAULT_DECIMALS,
			raised_decimals: RAISED_AMOUNT_DECIMALS,
			max_referral_len: MAX_REFERRAL_CODE_LEN,
			accounts: Vec::new(),
		}
	}
}

impl Settings {
	/// Default location of the configuration file
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("crowdloan").join("config.toml"))
	}

	/// Load settings from `path`, or from the default location when `None`
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let path = match path {
			Some(path) => path.to_path_buf(),
			None => match Self::default_path() {
				Some(path) => path,
				None => return Ok(Self::default()),
			},
		};

		if !path.exists() {
			log_verbose!("⚙️  No config file at {}, using defaults", path.display());
			return Ok(Self::default());
		}

		log_verbose!("⚙️  Loading config from {}", path.display());
		let contents = std::fs::read_to_string(&path)?;
		Self::from_toml(&contents)
	}

	pub fn from_toml(contents: &str) -> Result<Self> {
		toml::from_str(contents)
			.map_err(|e| CrowdloanError::Config(format!("Invalid config file: {}", e)))
	}

	pub fn to_toml(&self) -> Result<String> {
		toml::to_string_pretty(self)
			.map_err(|e| CrowdloanError::Config(format!("Failed to serialize config: {}", e)))
	}
}
