use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Resolve versioned module requirements into a wiring")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Register every module in a TOML module set and resolve it
	Resolve {
		/// Module set file (`[[module]]` tables)
		#[arg(value_name = "PATH")]
		modules: PathBuf,

		/// Resolver configuration file
		#[arg(long, short = 'c', value_name = "PATH")]
		config: Option<PathBuf>,

		/// Resolve only modules with this name (repeatable)
		#[arg(long, value_name = "NAME")]
		only: Vec<String>,
	},
	/// Check whether a version falls inside a range
	CheckVersion {
		/// Version, e.g. `1.2.3.beta`
		version: String,
		/// Range, e.g. `[1.0,2.0)` or a bare lower bound
		range: String,
	},
}
