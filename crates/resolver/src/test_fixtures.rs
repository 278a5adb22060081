use tether_version::{Version, VersionRange};

use crate::{
	Capability, ModuleId, ModuleRequirement, PackageRequirement, Registry, Requirement,
};

pub(crate) fn v(s: &str) -> Version {
	Version::parse(s).unwrap()
}

pub(crate) fn range(s: &str) -> VersionRange {
	VersionRange::parse(s).unwrap()
}

pub(crate) fn export(name: &str, version: &str) -> Capability {
	Capability::new(name, v(version))
}

pub(crate) fn import(name: &str) -> PackageRequirement {
	PackageRequirement::new(name)
}

pub(crate) fn require(name: &str) -> ModuleRequirement {
	ModuleRequirement::new(name)
}

/// Registers a non-singleton module at version 1.0.0.
pub(crate) fn add(
	registry: &mut Registry,
	name: &str,
	exports: Vec<Capability>,
	requirements: Vec<Requirement>,
) -> ModuleId {
	registry
		.register_module(name, v("1.0.0"), false, exports, requirements)
		.unwrap()
}

pub(crate) fn add_versioned(
	registry: &mut Registry,
	name: &str,
	version: &str,
	exports: Vec<Capability>,
	requirements: Vec<Requirement>,
) -> ModuleId {
	registry
		.register_module(name, v(version), false, exports, requirements)
		.unwrap()
}

pub(crate) fn add_singleton(
	registry: &mut Registry,
	name: &str,
	requirements: Vec<Requirement>,
) -> ModuleId {
	registry
		.register_module(name, v("1.0.0"), true, Vec::new(), requirements)
		.unwrap()
}
