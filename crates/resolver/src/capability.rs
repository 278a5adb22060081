use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tether_version::Version;

use crate::module::ModuleId;

/// A named, versioned package a module exports.
///
/// Keys in [`Capability::mandatory`] force importers to opt in: a requirement
/// only binds here if it names every mandatory attribute with an equal value.
/// Every mandatory key must also be an attribute key; the registry rejects
/// the module otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
	name: String,
	version: Version,
	attributes: BTreeMap<String, String>,
	mandatory: BTreeSet<String>,
}

impl Capability {
	/// Creates a capability with no attributes.
	pub fn new(name: impl Into<String>, version: Version) -> Self {
		Self {
			name: name.into(),
			version,
			attributes: BTreeMap::new(),
			mandatory: BTreeSet::new(),
		}
	}

	/// Adds (or replaces) an attribute.
	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	/// Adds an attribute and marks its key mandatory.
	pub fn with_mandatory(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let key = key.into();
		self.mandatory.insert(key.clone());
		self.attributes.insert(key, value.into());
		self
	}

	/// Marks an existing attribute key mandatory.
	pub fn mark_mandatory(mut self, key: impl Into<String>) -> Self {
		self.mandatory.insert(key.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	pub fn attributes(&self) -> &BTreeMap<String, String> {
		&self.attributes
	}

	pub fn attribute(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).map(String::as_str)
	}

	pub fn mandatory(&self) -> &BTreeSet<String> {
		&self.mandatory
	}

	/// Returns the first mandatory key that has no attribute value.
	pub(crate) fn dangling_mandatory(&self) -> Option<&str> {
		self.mandatory
			.iter()
			.find(|k| !self.attributes.contains_key(*k))
			.map(String::as_str)
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{};version=\"{}\"", self.name, self.version)?;
		for (k, v) in &self.attributes {
			write!(f, ";{k}=\"{v}\"")?;
		}
		if !self.mandatory.is_empty() {
			let keys: Vec<&str> = self.mandatory.iter().map(String::as_str).collect();
			write!(f, ";mandatory:=\"{}\"", keys.join(","))?;
		}
		Ok(())
	}
}

/// Identity of one capability: its owning module and its declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityRef {
	pub module: ModuleId,
	pub index: usize,
}

impl fmt::Display for CapabilityRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/export[{}]", self.module, self.index)
	}
}
