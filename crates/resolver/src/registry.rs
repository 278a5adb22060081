//! The set of known modules and their committed wiring.
//!
//! # Role
//!
//! The registry owns every [`Module`], resolved or not, and is the only place
//! module state changes. It validates metadata on the way in, hands out
//! monotonically increasing [`ModuleId`]s, answers lookups by id and by name,
//! and keeps a count of wires per provider so the resolver can prefer
//! providers that are already in use.
//!
//! # Invariants
//!
//! - A module is either unresolved with no wiring, or resolved with complete wiring.
//!   - Enforced in: [`Registry::commit`], [`Registry::unwire`].
//!   - Tested by: `tests::unwire_clears_state_and_counts`
//! - Every mandatory capability key names an attribute.
//!   - Enforced in: `validate`.
//!   - Tested by: `tests::mandatory_key_without_attribute_is_rejected`
//! - A resolved module cannot be removed; a module other resolved modules are
//!   wired to cannot be unwired.
//!   - Enforced in: [`Registry::remove_module`], [`Registry::unwire`].
//!   - Tested by: `tests::remove_requires_unwire`, `tests::unwire_refuses_while_in_use`

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tether_version::{Version, VersionRange};

use crate::capability::{Capability, CapabilityRef};
use crate::error::RegistryError;
use crate::module::{Module, ModuleId, ModuleState};
use crate::requirement::{ModuleRequirement, Requirement, RequirementId};
use crate::wiring::{ProviderRef, Wiring};


/// All known modules, keyed by id and by name.
///
/// Cloning is cheap relative to the module data: modules are shared behind
/// [`Arc`], which is what snapshot publication relies on.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	modules: BTreeMap<ModuleId, Arc<Module>>,
	by_name: FxHashMap<String, Vec<ModuleId>>,
	wire_counts: FxHashMap<ProviderRef, usize>,
	next_id: u64,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Validates and adds an unresolved module, returning its new id.
	pub fn register_module(
		&mut self,
		name: impl Into<String>,
		version: Version,
		singleton: bool,
		capabilities: Vec<Capability>,
		requirements: Vec<Requirement>,
	) -> Result<ModuleId, RegistryError> {
		self.insert(name.into(), version, singleton, false, capabilities, requirements)
	}

	/// Adds the framework's root module, resolved from the start with an
	/// empty wiring. Its capabilities are matched like any other.
	pub fn register_system_module(
		&mut self,
		name: impl Into<String>,
		version: Version,
		capabilities: Vec<Capability>,
	) -> Result<ModuleId, RegistryError> {
		let id = self.insert(name.into(), version, false, true, capabilities, Vec::new())?;
		self.commit(id, Wiring::new(Vec::new()));
		Ok(id)
	}

	fn insert(
		&mut self,
		name: String,
		version: Version,
		singleton: bool,
		system: bool,
		capabilities: Vec<Capability>,
		requirements: Vec<Requirement>,
	) -> Result<ModuleId, RegistryError> {
		validate(&name, &capabilities, &requirements)?;

		let id = ModuleId(self.next_id);
		self.next_id += 1;

		tracing::debug!(
			module = %id,
			name = %name,
			version = %version,
			singleton,
			exports = capabilities.len(),
			requirements = requirements.len(),
			"module registered"
		);

		self.by_name.entry(name.clone()).or_default().push(id);
		self.modules.insert(
			id,
			Arc::new(Module {
				id,
				name,
				version,
				singleton,
				system,
				capabilities: Arc::from(capabilities),
				requirements: Arc::from(requirements),
				state: ModuleState::Unresolved,
				wiring: None,
			}),
		);
		Ok(id)
	}

	/// Removes an unresolved module.
	///
	/// Resolved modules must be unwired first; the system module can never
	/// be removed.
	pub fn remove_module(&mut self, id: ModuleId) -> Result<Arc<Module>, RegistryError> {
		let module = self.modules.get(&id).ok_or(RegistryError::UnknownModule(id))?;
		if module.system {
			return Err(RegistryError::SystemModule(id));
		}
		if module.is_resolved() {
			return Err(RegistryError::Resolved(id));
		}

		let module = self
			.modules
			.remove(&id)
			.ok_or(RegistryError::UnknownModule(id))?;
		if let Some(ids) = self.by_name.get_mut(&module.name) {
			ids.retain(|m| *m != id);
			if ids.is_empty() {
				self.by_name.remove(&module.name);
			}
		}
		tracing::debug!(module = %id, name = %module.name, "module removed");
		Ok(module)
	}

	/// Returns a resolved module to the unresolved state, discarding its wiring.
	///
	/// Refused while another resolved module is wired to it. Unwiring an
	/// unresolved module is a no-op.
	pub fn unwire(&mut self, id: ModuleId) -> Result<(), RegistryError> {
		let module = self.modules.get(&id).ok_or(RegistryError::UnknownModule(id))?;
		if module.system {
			return Err(RegistryError::SystemModule(id));
		}
		if !module.is_resolved() {
			return Ok(());
		}
		let dependents = self.dependents_of(id);
		if !dependents.is_empty() {
			return Err(RegistryError::InUse {
				module: id,
				dependents,
			});
		}

		let Some(entry) = self.modules.get_mut(&id) else {
			return Err(RegistryError::UnknownModule(id));
		};
		let module = Arc::make_mut(entry);
		if let Some(wiring) = module.wiring.take() {
			for wire in wiring.wires() {
				if let Some(count) = self.wire_counts.get_mut(&wire) {
					*count -= 1;
					if *count == 0 {
						self.wire_counts.remove(&wire);
					}
				}
			}
		}
		module.state = ModuleState::Unresolved;
		tracing::debug!(module = %id, "module unwired");
		Ok(())
	}

	/// Marks `id` resolved and attaches its wiring in one step.
	///
	/// Resolved modules keep their existing wiring; the call is then a no-op.
	pub(crate) fn commit(&mut self, id: ModuleId, wiring: Wiring) {
		let Some(entry) = self.modules.get_mut(&id) else {
			return;
		};
		if entry.is_resolved() {
			return;
		}
		for wire in wiring.wires() {
			*self.wire_counts.entry(wire).or_default() += 1;
		}
		let module = Arc::make_mut(entry);
		module.state = ModuleState::Resolved;
		module.wiring = Some(wiring);
	}

	pub fn get(&self, id: ModuleId) -> Option<&Module> {
		self.modules.get(&id).map(Arc::as_ref)
	}

	pub(crate) fn get_shared(&self, id: ModuleId) -> Option<Arc<Module>> {
		self.modules.get(&id).cloned()
	}

	pub fn contains(&self, id: ModuleId) -> bool {
		self.modules.contains_key(&id)
	}

	pub fn is_resolved(&self, id: ModuleId) -> bool {
		self.get(id).is_some_and(Module::is_resolved)
	}

	pub fn wiring_for(&self, id: ModuleId) -> Option<&Wiring> {
		self.get(id).and_then(Module::wiring)
	}

	/// Returns the provider wired to a single requirement.
	pub fn wire(&self, req: RequirementId) -> Option<ProviderRef> {
		self.wiring_for(req.module)?.get(req.index)
	}

	/// Exported capabilities of `id`; empty for unknown ids.
	pub fn capabilities_of(&self, id: ModuleId) -> &[Capability] {
		self.get(id).map(Module::capabilities).unwrap_or_default()
	}

	/// Declared requirements of `id`; empty for unknown ids.
	pub fn requirements_of(&self, id: ModuleId) -> &[Requirement] {
		self.get(id).map(Module::requirements).unwrap_or_default()
	}

	/// Module-to-module requirements of `id`, in declaration order.
	pub fn required_modules_of(&self, id: ModuleId) -> impl Iterator<Item = &ModuleRequirement> {
		self.get(id).into_iter().flat_map(|m| m.required_modules())
	}

	pub fn capability(&self, cap: CapabilityRef) -> Option<&Capability> {
		self.get(cap.module)?.capabilities().get(cap.index)
	}

	/// Ids of modules named `name` whose version lies in `range`, ascending.
	pub fn find_module(&self, name: &str, range: &VersionRange) -> Vec<ModuleId> {
		self.ids_named(name)
			.iter()
			.copied()
			.filter(|id| self.get(*id).is_some_and(|m| range.matches(m.version())))
			.collect()
	}

	/// Returns the earliest-installed module with exactly this name and version.
	pub fn find_by_name_version(&self, name: &str, version: &Version) -> Option<ModuleId> {
		self.ids_named(name)
			.iter()
			.copied()
			.find(|id| self.get(*id).is_some_and(|m| m.version() == version))
	}

	/// Ids registered under `name`, in installation order.
	pub fn ids_named(&self, name: &str) -> &[ModuleId] {
		self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
	}

	/// Iterates modules in ascending id order, optionally filtered by state.
	pub fn modules(&self, state: Option<ModuleState>) -> impl Iterator<Item = &Module> {
		self.modules
			.values()
			.map(Arc::as_ref)
			.filter(move |m| state.is_none_or(|s| m.state == s))
	}

	/// Resolved modules other than `id` holding at least one wire to `id`.
	pub fn dependents_of(&self, id: ModuleId) -> Vec<ModuleId> {
		self.modules(Some(ModuleState::Resolved))
			.filter(|m| m.id != id && m.wiring().is_some_and(|w| w.depends_on(id)))
			.map(Module::id)
			.collect()
	}

	/// Number of committed wires that point at `provider`.
	pub fn wire_count(&self, provider: &ProviderRef) -> usize {
		self.wire_counts.get(provider).copied().unwrap_or(0)
	}

	pub fn len(&self) -> usize {
		self.modules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

fn validate(
	name: &str,
	capabilities: &[Capability],
	requirements: &[Requirement],
) -> Result<(), RegistryError> {
	if name.is_empty() {
		return Err(RegistryError::EmptyModuleName);
	}
	for cap in capabilities {
		if cap.name().is_empty() {
			return Err(RegistryError::EmptyCapabilityName {
				module: name.to_string(),
			});
		}
		if let Some(key) = cap.dangling_mandatory() {
			return Err(RegistryError::MandatoryWithoutAttribute {
				capability: cap.name().to_string(),
				key: key.to_string(),
			});
		}
	}
	if let Some(index) = requirements.iter().position(|r| r.name().is_empty()) {
		return Err(RegistryError::EmptyRequirementName {
			module: name.to_string(),
			index,
		});
	}
	Ok(())
}
