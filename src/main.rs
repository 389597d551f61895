/*!
 * Crowdloan CLI - command line client for relay chain crowdloans
 *
 * Query fund and balance state and submit contributions and transfers,
 * signed with accounts from the local keystore.
 */

use clap::Parser;
use colored::Colorize;
use crowdloan_cli::{
	cli::{self, Commands},
	config::Settings,
	error::CrowdloanError,
	log_error, log_print, log_verbose,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crowdloan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command line client for relay chain crowdloans", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Enable verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Node endpoint URL (overrides the config file)
	#[arg(long, global = true)]
	node_url: Option<String>,

	/// Path to the config file
	#[arg(long, global = true)]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CrowdloanError> {
	let cli = Cli::parse();

	crowdloan_cli::log::init(cli.verbose);

	log_verbose!("{}", "🪂 Crowdloan CLI".bright_cyan().bold());

	let mut settings = match Settings::load(cli.config.as_deref()) {
		Ok(settings) => settings,
		Err(e) => {
			log_error!("{}", e);
			std::process::exit(1);
		},
	};
	if let Some(node_url) = cli.node_url {
		settings.node_url = node_url;
	}

	let start_time = std::time::Instant::now();
	let result = cli::execute_command(cli.command, &settings).await;
	let elapsed = start_time.elapsed();

	match result {
		Ok(_) => {
			log_verbose!("⏱️  Completed in {:.2}s", elapsed.as_secs_f64());
			Ok(())
		},
		Err(e) => {
			log_error!("{}", e);
			log_print!("⏱️  Failed after {:.2}s", elapsed.as_secs_f64());
			std::process::exit(1);
		},
	}
}
