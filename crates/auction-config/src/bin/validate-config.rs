//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config <config-file | chain-id>

use std::env;
use std::process;

use auction_config::ConfigLoader;
use auction_config::CommonConfig;

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file | chain-id>", args[0]);
		process::exit(1);
	}

	let target = &args[1];
	println!("Validating configuration: {}", target);

	let loaded: Result<CommonConfig, String> = match target.parse::<u64>() {
		Ok(chain_id) => ConfigLoader::for_chain(chain_id).map_err(|e| e.to_string()),
		Err(_) => ConfigLoader::from_file(target).map_err(|e| format!("{:#}", e)),
	};

	match loaded {
		Ok(config) => {
			println!("Configuration is valid");
			println!("Chain: {} ({})", config.chain.chain_name, config.chain_id());
			println!("DEX: {}", config.dex.name);
			println!("Solvers: {}", config.chain.solvers.len());
			println!(
				"Last look: {}",
				config.dex.last_look_solver.as_deref().unwrap_or("disabled")
			);
			println!(
				"Timeouts: quote {}ms / swap {}ms",
				config.params.auction_timeout_ms, config.params.auction_with_data_timeout_ms
			);
		}
		Err(e) => {
			eprintln!("Configuration validation failed:");
			eprintln!("{}", e);
			process::exit(1);
		}
	}
}
