//! Stateless capability and module matching predicates.
//!
//! # Role
//!
//! Decides whether a single provider can satisfy a single requirement. It
//! knows nothing about resolution state, ranking, or the rest of the
//! registry; the resolver layers those concerns on top.
//!
//! # Package matching rules
//!
//! Applied in order, first failure wins:
//! 1. Capability name equals the requirement name (case-sensitive).
//! 2. Capability version lies in the requirement's range.
//! 3. Every mandatory key of the capability is present in the requirement
//!    with an equal value, whether or not the importer asked about it.
//! 4. Every attribute the requirement lists equals the capability's value;
//!    a key the capability lacks never matches.
//! 5. The providing module matches `module_name` / `module_version` when set.
//!
//! Attribute comparison is exact string equality.

use crate::capability::Capability;
use crate::module::Module;
use crate::requirement::{ModuleRequirement, PackageRequirement};


/// Why a capability did or did not match a package requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
	Satisfied,
	NameMismatch,
	VersionMismatch,
	/// A mandatory capability attribute was missing from, or different in,
	/// the requirement.
	MandatoryAttribute { key: &'a str },
	/// A requirement attribute was missing from, or different in, the
	/// capability.
	RequiredAttribute { key: &'a str },
	/// The providing module's name is not the one the requirement asked for.
	ProviderName,
	/// The providing module's version is outside the requested range.
	ProviderVersion,
}

impl MatchOutcome<'_> {
	pub fn is_satisfied(&self) -> bool {
		matches!(self, Self::Satisfied)
	}

	/// Returns true when only attribute rules rejected an otherwise
	/// name- and version-compatible capability.
	pub fn is_attribute_mismatch(&self) -> bool {
		matches!(
			self,
			Self::MandatoryAttribute { .. } | Self::RequiredAttribute { .. }
		)
	}
}

/// Checks `cap`, exported by `provider`, against `req` and reports the first
/// rule that failed.
pub fn check_capability<'a>(
	cap: &'a Capability,
	provider: &Module,
	req: &'a PackageRequirement,
) -> MatchOutcome<'a> {
	if cap.name() != req.name {
		return MatchOutcome::NameMismatch;
	}
	if !req.range.matches(cap.version()) {
		return MatchOutcome::VersionMismatch;
	}
	for key in cap.mandatory() {
		if req.attributes.get(key).map(String::as_str) != cap.attribute(key) {
			return MatchOutcome::MandatoryAttribute { key };
		}
	}
	for (key, value) in &req.attributes {
		if cap.attribute(key) != Some(value.as_str()) {
			return MatchOutcome::RequiredAttribute { key };
		}
	}
	if let Some(name) = &req.module_name
		&& provider.name() != name
	{
		return MatchOutcome::ProviderName;
	}
	if let Some(range) = &req.module_version
		&& !range.matches(provider.version())
	{
		return MatchOutcome::ProviderVersion;
	}
	MatchOutcome::Satisfied
}

/// Returns true if `cap`, exported by `provider`, satisfies `req`.
pub fn capability_satisfies(cap: &Capability, provider: &Module, req: &PackageRequirement) -> bool {
	check_capability(cap, provider, req).is_satisfied()
}

/// Returns true if `candidate` statically satisfies a module requirement.
///
/// Only name and version are checked here. Whether the candidate is, or can
/// become, resolved is the resolver's concern.
pub fn module_satisfies(candidate: &Module, req: &ModuleRequirement) -> bool {
	candidate.name() == req.name && req.range.matches(candidate.version())
}
