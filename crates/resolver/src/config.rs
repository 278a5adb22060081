//! Resolver configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! max_depth = 64
//!
//! [system]
//! name = "tether.system"
//! version = "1.0"
//! packages = [{ name = "tether.framework", version = "1.0" }]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tether_version::{ParseError, Version};

use crate::capability::Capability;
use crate::descriptor::ExportDescriptor;

#[cfg(test)]
mod tests;

/// Largest accepted `max_depth`. Resolution recurses on the thread stack,
/// and this bound keeps the deepest chain within a default 2 MiB thread stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Default cap on nested resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = MAX_DEPTH_LIMIT;

/// Errors from loading configuration or descriptor files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse TOML: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid version in configuration: {0}")]
	Version(#[from] ParseError),
	#[error("max_depth must be between 1 and {MAX_DEPTH_LIMIT}, got {0}")]
	InvalidMaxDepth(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
	/// Maximum number of modules under resolution at once along one chain.
	pub max_depth: usize,
	/// The always-resolved root module, if any.
	pub system: Option<SystemModuleConfig>,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			system: None,
		}
	}
}

impl ResolverConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), max_depth = config.max_depth, "resolver config loaded");
		Ok(config)
	}

	/// Checks limits and eagerly parses every version string.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(1..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
			return Err(ConfigError::InvalidMaxDepth(self.max_depth));
		}
		if let Some(system) = &self.system {
			system.parse()?;
		}
		Ok(())
	}
}

/// The framework's root module and the packages it exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemModuleConfig {
	pub name: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub packages: Vec<ExportDescriptor>,
}

impl SystemModuleConfig {
	pub fn parse(&self) -> Result<(Version, Vec<Capability>), ParseError> {
		let version = self
			.version
			.as_deref()
			.map(Version::parse)
			.transpose()?
			.unwrap_or_default();
		let packages = self
			.packages
			.iter()
			.map(ExportDescriptor::parse)
			.collect::<Result<_, _>>()?;
		Ok((version, packages))
	}
}
