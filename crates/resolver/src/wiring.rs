//! Committed requirement-to-provider mappings.
//!
//! # Role
//!
//! A [`Wiring`] records, for one resolved module, which provider was chosen
//! for each of its requirements. It is built whole by the resolver and
//! attached to the module in a single commit, then never edited. Unwiring a
//! module drops the value outright.

use std::fmt;
use std::sync::Arc;

use crate::capability::CapabilityRef;
use crate::module::ModuleId;

/// The provider a requirement was wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderRef {
	/// A package import bound to a specific exported capability.
	Capability(CapabilityRef),
	/// A module requirement bound to a whole module.
	Module(ModuleId),
}

impl ProviderRef {
	/// Returns the module that provides this wire.
	pub fn module(&self) -> ModuleId {
		match self {
			Self::Capability(c) => c.module,
			Self::Module(m) => *m,
		}
	}

	pub fn capability(&self) -> Option<CapabilityRef> {
		match self {
			Self::Capability(c) => Some(*c),
			Self::Module(_) => None,
		}
	}
}

impl fmt::Display for ProviderRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Capability(c) => c.fmt(f),
			Self::Module(m) => m.fmt(f),
		}
	}
}

/// Per-module mapping from requirement index to provider.
///
/// Optional requirements that found no provider are stored as unwired
/// (`None`), which is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wiring {
	wires: Arc<[Option<ProviderRef>]>,
}

impl Wiring {
	pub(crate) fn new(wires: Vec<Option<ProviderRef>>) -> Self {
		Self {
			wires: Arc::from(wires),
		}
	}

	/// Returns the provider for the requirement at `index`, or `None` if it
	/// was left unwired (or the index is out of range).
	pub fn get(&self, index: usize) -> Option<ProviderRef> {
		self.wires.get(index).copied().flatten()
	}

	/// Iterates `(requirement index, provider)` pairs, including unwired slots.
	pub fn iter(&self) -> impl Iterator<Item = (usize, Option<ProviderRef>)> + '_ {
		self.wires.iter().copied().enumerate()
	}

	/// Iterates every present wire.
	pub fn wires(&self) -> impl Iterator<Item = ProviderRef> + '_ {
		self.wires.iter().filter_map(|w| *w)
	}

	/// Returns true if any wire points at `module`.
	pub fn depends_on(&self, module: ModuleId) -> bool {
		self.wires().any(|w| w.module() == module)
	}

	/// Number of requirement slots, wired or not.
	pub fn len(&self) -> usize {
		self.wires.len()
	}

	pub fn is_empty(&self) -> bool {
		self.wires.is_empty()
	}
}
