use std::fmt;
use std::sync::Arc;

use tether_version::Version;

use crate::capability::Capability;
use crate::requirement::{ModuleRequirement, Requirement};
use crate::wiring::Wiring;

/// Registry-assigned module identifier.
///
/// Ids are handed out in installation order and never reused, so a lower id
/// always means an earlier install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub u64);

impl ModuleId {
	#[inline]
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Resolution state of a module.
///
/// There is no failed state: a module that cannot be resolved stays
/// `Unresolved` and may be retried by a later resolve call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModuleState {
	#[default]
	Unresolved,
	Resolved,
}

impl fmt::Display for ModuleState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unresolved => f.write_str("unresolved"),
			Self::Resolved => f.write_str("resolved"),
		}
	}
}

/// A resolvable unit with its exported capabilities and declared requirements.
///
/// The capability and requirement lists are fixed at registration; only the
/// state and wiring change, and only through the registry.
#[derive(Debug, Clone)]
pub struct Module {
	pub(crate) id: ModuleId,
	pub(crate) name: String,
	pub(crate) version: Version,
	pub(crate) singleton: bool,
	pub(crate) system: bool,
	pub(crate) capabilities: Arc<[Capability]>,
	pub(crate) requirements: Arc<[Requirement]>,
	pub(crate) state: ModuleState,
	pub(crate) wiring: Option<Wiring>,
}

impl Module {
	pub fn id(&self) -> ModuleId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	pub fn is_singleton(&self) -> bool {
		self.singleton
	}

	/// Returns true for the framework's always-resolved root module.
	pub fn is_system(&self) -> bool {
		self.system
	}

	pub fn state(&self) -> ModuleState {
		self.state
	}

	pub fn is_resolved(&self) -> bool {
		self.state == ModuleState::Resolved
	}

	pub fn capabilities(&self) -> &[Capability] {
		&self.capabilities
	}

	pub fn requirements(&self) -> &[Requirement] {
		&self.requirements
	}

	/// Iterates the module-to-module requirements in declaration order.
	pub fn required_modules(&self) -> impl Iterator<Item = &ModuleRequirement> {
		self.requirements.iter().filter_map(Requirement::as_module)
	}

	/// Returns the committed wiring; `None` unless resolved.
	pub fn wiring(&self) -> Option<&Wiring> {
		self.wiring.as_ref()
	}
}

impl fmt::Display for Module {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}@{}", self.id, self.name, self.version)
	}
}
