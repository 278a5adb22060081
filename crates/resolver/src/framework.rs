//! Thread-safe resolver front end with atomic publication.
//!
//! # Role
//!
//! [`Framework`] serialises every mutation of the registry (register, remove,
//! unwire, resolve) behind one lock and publishes an immutable
//! [`Registry`] snapshot after each one. Readers load the current snapshot
//! without taking the lock.
//!
//! # Invariants
//!
//! - At most one mutation is in flight; `resolve` holds the writer lock for
//!   its whole run.
//!   - Enforced in: [`Framework::write`].
//! - Readers observe either the pre- or post-mutation registry, never a
//!   module marked resolved with incomplete wiring.
//!   - Enforced in: [`Framework::write`] (publish after the closure returns).
//!   - Tested by: `tests::readers_never_see_partial_resolution`

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tether_version::{Version, VersionRange};

use crate::capability::Capability;
use crate::config::ResolverConfig;
use crate::descriptor::ModuleDescriptor;
use crate::error::RegistryError;
use crate::module::{Module, ModuleId};
use crate::registry::Registry;
use crate::requirement::Requirement;
use crate::resolver::{DefaultResolver, ResolveReport, Resolver};
use crate::wiring::Wiring;


/// Shared registry plus the resolver that operates on it.
pub struct Framework<R = DefaultResolver> {
	writer: Mutex<Registry>,
	published: ArcSwap<Registry>,
	resolver: R,
	system: Option<ModuleId>,
}

impl Framework<DefaultResolver> {
	/// Creates a framework from configuration, registering the configured
	/// system module if there is one.
	pub fn new(config: &ResolverConfig) -> Result<Self, RegistryError> {
		let mut registry = Registry::new();
		let system = match &config.system {
			Some(sys) => {
				let (version, packages) = sys.parse()?;
				Some(registry.register_system_module(sys.name.clone(), version, packages)?)
			}
			None => None,
		};
		let mut framework = Self::with_resolver(DefaultResolver::new(config), registry);
		framework.system = system;
		Ok(framework)
	}
}

impl Default for Framework<DefaultResolver> {
	fn default() -> Self {
		Self::with_resolver(DefaultResolver::default(), Registry::new())
	}
}

impl<R: Resolver> Framework<R> {
	/// Wraps an existing registry with a custom resolver.
	pub fn with_resolver(resolver: R, registry: Registry) -> Self {
		Self {
			published: ArcSwap::from_pointee(registry.clone()),
			writer: Mutex::new(registry),
			resolver,
			system: None,
		}
	}

	/// Runs `f` under the writer lock and publishes the result.
	///
	/// Publication clones the registry: modules are `Arc`-shared, but the
	/// name index and wire counts are copied, so each mutation costs O(n) in
	/// the number of modules. Bulk installs should use
	/// [`Framework::install_all`], which publishes once.
	fn write<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> T {
		let mut registry = self.writer.lock();
		let out = f(&mut registry);
		self.published.store(Arc::new(registry.clone()));
		out
	}

	/// Id of the system module, if one was configured.
	pub fn system_module(&self) -> Option<ModuleId> {
		self.system
	}

	pub fn register_module(
		&self,
		name: impl Into<String>,
		version: Version,
		singleton: bool,
		capabilities: Vec<Capability>,
		requirements: Vec<Requirement>,
	) -> Result<ModuleId, RegistryError> {
		let name = name.into();
		self.write(|r| r.register_module(name, version, singleton, capabilities, requirements))
	}

	/// Parses a descriptor and registers it. Parse errors reject the module
	/// before the lock is taken.
	pub fn install(&self, descriptor: &ModuleDescriptor) -> Result<ModuleId, RegistryError> {
		let parsed = descriptor.parse()?;
		self.write(|r| parsed.register(r))
	}

	/// Installs every descriptor under one lock with a single publication.
	///
	/// All or nothing: if any descriptor fails to parse or register, no
	/// module is added and no id is consumed.
	pub fn install_all(&self, descriptors: &[ModuleDescriptor]) -> Result<Vec<ModuleId>, RegistryError> {
		let parsed = descriptors
			.iter()
			.map(ModuleDescriptor::parse)
			.collect::<Result<Vec<_>, _>>()?;
		self.write(|r| {
			let mut staged = r.clone();
			let ids = parsed
				.into_iter()
				.map(|m| m.register(&mut staged))
				.collect::<Result<Vec<_>, _>>()?;
			*r = staged;
			Ok(ids)
		})
	}

	pub fn remove_module(&self, id: ModuleId) -> Result<Arc<Module>, RegistryError> {
		self.write(|r| r.remove_module(id))
	}

	pub fn unwire(&self, id: ModuleId) -> Result<(), RegistryError> {
		self.write(|r| r.unwire(id))
	}

	/// Resolves `target`, or every unresolved module when `None`.
	pub fn resolve(&self, target: Option<&[ModuleId]>) -> ResolveReport {
		self.write(|r| self.resolver.resolve(r, target))
	}

	/// Returns the most recently published registry.
	pub fn snapshot(&self) -> Arc<Registry> {
		self.published.load_full()
	}

	pub fn is_resolved(&self, id: ModuleId) -> bool {
		self.published.load().is_resolved(id)
	}

	pub fn wiring_for(&self, id: ModuleId) -> Option<Wiring> {
		self.published.load().wiring_for(id).cloned()
	}

	pub fn find_module(&self, name: &str, range: &VersionRange) -> Vec<ModuleId> {
		self.published.load().find_module(name, range)
	}
}
