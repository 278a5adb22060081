//! Tether command-line front end.
//!
//! `tether resolve` loads a module set, resolves it and prints one line per
//! considered module followed by the wires of each resolved one. The exit
//! status is non-zero when any considered module failed.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use tether_resolver::{Framework, ModuleId, ModuleSet, Registry, ResolveReport, ResolverConfig};
use tether_version::{Version, VersionRange};
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::WARN
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	match cli.command {
		Command::Resolve {
			modules,
			config,
			only,
		} => {
			let config = match config {
				Some(path) => ResolverConfig::load(&path)
					.with_context(|| format!("loading config {}", path.display()))?,
				None => ResolverConfig::default(),
			};
			let set = ModuleSet::load(&modules)
				.with_context(|| format!("loading modules {}", modules.display()))?;
			resolve(&config, &set, &only)
		}
		Command::CheckVersion { version, range } => check_version(&version, &range),
	}
}

fn resolve(config: &ResolverConfig, set: &ModuleSet, only: &[String]) -> anyhow::Result<ExitCode> {
	let framework = Framework::new(config).context("registering system module")?;
	framework
		.install_all(&set.modules)
		.context("installing module set")?;
	info!(modules = set.modules.len(), "module set installed");

	let report = if only.is_empty() {
		framework.resolve(None)
	} else {
		let snapshot = framework.snapshot();
		let mut targets = Vec::new();
		for name in only {
			let ids = snapshot.ids_named(name);
			if ids.is_empty() {
				bail!("no module named {name:?}");
			}
			targets.extend_from_slice(ids);
		}
		framework.resolve(Some(targets.as_slice()))
	};

	print_report(&framework.snapshot(), &report);
	Ok(if report.is_success() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

fn print_report(registry: &Registry, report: &ResolveReport) {
	for (id, outcome) in report.iter() {
		let module = label(registry, id);
		match outcome {
			Ok(()) => println!("{module}: resolved"),
			Err(reason) => println!("{module}: FAILED: {reason}"),
		}
		let Some(wiring) = registry.wiring_for(id) else {
			continue;
		};
		for (requirement, (_, provider)) in registry.requirements_of(id).iter().zip(wiring.iter()) {
			match provider {
				Some(p) => println!("  {requirement} -> {} ({p})", label(registry, p.module())),
				None => println!("  {requirement} -> (unwired)"),
			}
		}
	}
}

fn label(registry: &Registry, id: ModuleId) -> String {
	match registry.get(id) {
		Some(m) => format!("{} {} [{id}]", m.name(), m.version()),
		None => id.to_string(),
	}
}

fn check_version(version: &str, range: &str) -> anyhow::Result<ExitCode> {
	let version = Version::parse(version).context("parsing version")?;
	let range = VersionRange::parse(range).context("parsing range")?;
	if range.matches(&version) {
		println!("{version} is in {range}");
		Ok(ExitCode::SUCCESS)
	} else {
		println!("{version} is not in {range}");
		Ok(ExitCode::FAILURE)
	}
}
