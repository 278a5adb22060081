use std::collections::BTreeMap;
use std::fmt;

use tether_version::VersionRange;

use crate::module::ModuleId;

/// A need a module declares against the rest of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
	/// An imported package, satisfied by a [`crate::Capability`].
	Package(PackageRequirement),
	/// A required module, satisfied by a whole [`crate::Module`].
	Module(ModuleRequirement),
}

impl Requirement {
	/// Name of the package or module being required.
	pub fn name(&self) -> &str {
		match self {
			Self::Package(p) => &p.name,
			Self::Module(m) => &m.name,
		}
	}

	pub fn range(&self) -> &VersionRange {
		match self {
			Self::Package(p) => &p.range,
			Self::Module(m) => &m.range,
		}
	}

	/// Returns true for `resolution:=optional` requirements.
	pub fn is_optional(&self) -> bool {
		match self {
			Self::Package(p) => p.optional,
			Self::Module(m) => m.optional,
		}
	}

	pub fn as_package(&self) -> Option<&PackageRequirement> {
		match self {
			Self::Package(p) => Some(p),
			Self::Module(_) => None,
		}
	}

	pub fn as_module(&self) -> Option<&ModuleRequirement> {
		match self {
			Self::Module(m) => Some(m),
			Self::Package(_) => None,
		}
	}
}

impl From<PackageRequirement> for Requirement {
	fn from(value: PackageRequirement) -> Self {
		Self::Package(value)
	}
}

impl From<ModuleRequirement> for Requirement {
	fn from(value: ModuleRequirement) -> Self {
		Self::Module(value)
	}
}

impl fmt::Display for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Package(p) => p.fmt(f),
			Self::Module(m) => m.fmt(f),
		}
	}
}

/// An imported package.
///
/// Every attribute listed here must equal the capability's value for the
/// same key. `module_name` and `module_version` further restrict which
/// module may provide the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRequirement {
	pub name: String,
	pub range: VersionRange,
	pub attributes: BTreeMap<String, String>,
	pub module_name: Option<String>,
	pub module_version: Option<VersionRange>,
	pub optional: bool,
}

impl PackageRequirement {
	/// Imports `name` at any version.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn with_range(mut self, range: VersionRange) -> Self {
		self.range = range;
		self
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	/// Restricts the provider to modules with this name.
	pub fn from_module(mut self, name: impl Into<String>) -> Self {
		self.module_name = Some(name.into());
		self
	}

	/// Restricts the provider to modules whose version is in `range`.
	pub fn from_module_version(mut self, range: VersionRange) -> Self {
		self.module_version = Some(range);
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}
}

impl fmt::Display for PackageRequirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "import {};version=\"{}\"", self.name, self.range)?;
		for (k, v) in &self.attributes {
			write!(f, ";{k}=\"{v}\"")?;
		}
		if let Some(name) = &self.module_name {
			write!(f, ";module-name=\"{name}\"")?;
		}
		if let Some(range) = &self.module_version {
			write!(f, ";module-version=\"{range}\"")?;
		}
		if self.optional {
			f.write_str(";resolution:=optional")?;
		}
		Ok(())
	}
}

/// A direct dependency on another module by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRequirement {
	pub name: String,
	pub range: VersionRange,
	pub optional: bool,
}

impl ModuleRequirement {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn with_range(mut self, range: VersionRange) -> Self {
		self.range = range;
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}
}

impl fmt::Display for ModuleRequirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "require {};version=\"{}\"", self.name, self.range)?;
		if self.optional {
			f.write_str(";resolution:=optional")?;
		}
		Ok(())
	}
}

/// Identity of one requirement: its owning module and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementId {
	pub module: ModuleId,
	pub index: usize,
}

impl fmt::Display for RequirementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/req[{}]", self.module, self.index)
	}
}
