//! Console logging helpers
//!
//! User facing output goes through the `log_*` macros below, which print to
//! the console themselves. Every message is also forwarded to the `log`
//! facade, but the `env_logger` backend stays silent unless `RUST_LOG` asks
//! for it, so a line never reaches the terminal twice.

use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose console output
pub fn set_verbose(verbose: bool) {
	VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Whether verbose console output is enabled
pub fn is_verbose() -> bool {
	VERBOSE.load(Ordering::Relaxed)
}

/// Filter used by the `env_logger` backend when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "off";

/// Set the console verbosity and install the `env_logger` backend
pub fn init(verbose: bool) {
	set_verbose(verbose);
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
		.format_timestamp(None)
		.try_init();
}

/// Always printed
#[macro_export]
macro_rules! log_print {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::info!(target: "crowdloan", "{}", message);
		println!("{}", message);
	}};
}

/// Printed only in verbose mode
#[macro_export]
macro_rules! log_verbose {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::debug!(target: "crowdloan", "{}", message);
		if $crate::log::is_verbose() {
			use ::colored::Colorize;
			println!("{}", message.dimmed());
		}
	}};
}

/// Informational line, prefixed in verbose mode
#[macro_export]
macro_rules! log_info {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::info!(target: "crowdloan", "{}", message);
		if $crate::log::is_verbose() {
			use ::colored::Colorize;
			println!("{} {}", "INFO".bright_blue().bold(), message);
		}
	}};
}

#[macro_export]
macro_rules! log_success {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::info!(target: "crowdloan", "{}", message);
		use ::colored::Colorize;
		println!("{}", message.bright_green());
	}};
}

#[macro_export]
macro_rules! log_warn {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::warn!(target: "crowdloan", "{}", message);
		use ::colored::Colorize;
		eprintln!("{} {}", "WARNING".bright_yellow().bold(), message);
	}};
}

#[macro_export]
macro_rules! log_error {
	($($arg:tt)*) => {{
		let message = format!($($arg)*);
		::log::error!(target: "crowdloan", "{}", message);
		use ::colored::Colorize;
		eprintln!("{} {}", "ERROR".bright_red().bold(), message);
	}};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_verbose_toggle() {
		set_verbose(true);
		assert!(is_verbose());
		set_verbose(false);
		assert!(!is_verbose());
	}

	#[test]
	fn test_backend_silent_without_rust_log() {
		// The macros already print, a second console sink would duplicate them
		assert_eq!(DEFAULT_FILTER, "off");
		let _ = env_logger::Builder::from_env(
			env_logger::Env::default().default_filter_or(DEFAULT_FILTER),
		)
		.is_test(true)
		.try_init();
		if std::env::var_os("RUST_LOG").is_none() {
			assert!(!::log::log_enabled!(target: "crowdloan", ::log::Level::Error));
		}
	}
}
