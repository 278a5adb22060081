//! Structured module descriptors.
//!
//! # Role
//!
//! Descriptors are the serde-facing form of a module's metadata, with
//! versions and ranges kept as strings. [`ModuleDescriptor::parse`] turns
//! them into model values; a malformed version surfaces there as a
//! [`ParseError`], before the module ever reaches the registry.
//!
//! A TOML module set looks like:
//!
//! ```toml
//! [[module]]
//! name = "app"
//! version = "1.0"
//! imports = [{ name = "log", version = "[1.0,2.0)" }]
//! requires = [{ name = "runtime" }]
//!
//! [[module]]
//! name = "logging"
//! exports = [{ name = "log", version = "1.4", attributes = { vendor = "acme" }, mandatory = ["vendor"] }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tether_version::{ParseError, Version, VersionRange};

use crate::capability::Capability;
use crate::config::ConfigError;
use crate::error::RegistryError;
use crate::module::ModuleId;
use crate::registry::Registry;
use crate::requirement::{ModuleRequirement, PackageRequirement, Requirement};

#[cfg(test)]
mod tests;

/// An exported package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportDescriptor {
	pub name: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub attributes: BTreeMap<String, String>,
	#[serde(default)]
	pub mandatory: Vec<String>,
}

impl ExportDescriptor {
	pub fn parse(&self) -> Result<Capability, ParseError> {
		let mut cap = Capability::new(self.name.clone(), parse_version(self.version.as_deref())?);
		for (k, v) in &self.attributes {
			cap = cap.with_attribute(k.clone(), v.clone());
		}
		for key in &self.mandatory {
			cap = cap.mark_mandatory(key.clone());
		}
		Ok(cap)
	}
}

/// An imported package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportDescriptor {
	pub name: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub attributes: BTreeMap<String, String>,
	#[serde(default)]
	pub module_name: Option<String>,
	#[serde(default)]
	pub module_version: Option<String>,
	#[serde(default)]
	pub optional: bool,
}

impl ImportDescriptor {
	pub fn parse(&self) -> Result<PackageRequirement, ParseError> {
		Ok(PackageRequirement {
			name: self.name.clone(),
			range: parse_range(self.version.as_deref())?,
			attributes: self.attributes.clone(),
			module_name: self.module_name.clone(),
			module_version: self
				.module_version
				.as_deref()
				.map(VersionRange::parse)
				.transpose()?,
			optional: self.optional,
		})
	}
}

/// A required module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequireDescriptor {
	pub name: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub optional: bool,
}

impl RequireDescriptor {
	pub fn parse(&self) -> Result<ModuleRequirement, ParseError> {
		Ok(ModuleRequirement {
			name: self.name.clone(),
			range: parse_range(self.version.as_deref())?,
			optional: self.optional,
		})
	}
}

/// A module's metadata as written in a descriptor file.
///
/// Requirement order after parsing is all `imports`, then all `requires`,
/// each in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
	pub name: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub singleton: bool,
	#[serde(default)]
	pub exports: Vec<ExportDescriptor>,
	#[serde(default)]
	pub imports: Vec<ImportDescriptor>,
	#[serde(default)]
	pub requires: Vec<RequireDescriptor>,
}

/// A descriptor with every version string parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule {
	pub name: String,
	pub version: Version,
	pub singleton: bool,
	pub capabilities: Vec<Capability>,
	pub requirements: Vec<Requirement>,
}

impl ParsedModule {
	pub fn register(self, registry: &mut Registry) -> Result<ModuleId, RegistryError> {
		registry.register_module(
			self.name,
			self.version,
			self.singleton,
			self.capabilities,
			self.requirements,
		)
	}
}

impl ModuleDescriptor {
	pub fn parse(&self) -> Result<ParsedModule, ParseError> {
		let capabilities = self
			.exports
			.iter()
			.map(ExportDescriptor::parse)
			.collect::<Result<Vec<_>, _>>()?;
		let mut requirements = Vec::with_capacity(self.imports.len() + self.requires.len());
		for import in &self.imports {
			requirements.push(Requirement::Package(import.parse()?));
		}
		for require in &self.requires {
			requirements.push(Requirement::Module(require.parse()?));
		}
		Ok(ParsedModule {
			name: self.name.clone(),
			version: parse_version(self.version.as_deref())?,
			singleton: self.singleton,
			capabilities,
			requirements,
		})
	}

	/// Parses and registers in one step.
	pub fn register(&self, registry: &mut Registry) -> Result<ModuleId, RegistryError> {
		self.parse()?.register(registry)
	}
}

/// A list of `[[module]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSet {
	#[serde(default, rename = "module")]
	pub modules: Vec<ModuleDescriptor>,
}

impl ModuleSet {
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}

fn parse_version(s: Option<&str>) -> Result<Version, ParseError> {
	s.map(Version::parse).transpose().map(Option::unwrap_or_default)
}

fn parse_range(s: Option<&str>) -> Result<VersionRange, ParseError> {
	s.map(VersionRange::parse)
		.transpose()
		.map(Option::unwrap_or_default)
}
