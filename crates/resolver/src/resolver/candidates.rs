//! Candidate collection and the tie-break chain.
//!
//! # Precedence
//!
//! Candidates for one requirement are ordered by:
//! 1. Standing: already the target of a committed wire, then provided by a
//!    resolved module, then provided by a module that would have to be
//!    resolved now.
//! 2. Version (higher wins).
//! 3. Provider module id (lower, i.e. earlier installed, wins), then
//!    capability declaration index.
//!
//! The resolver walks the list in this order and takes the first candidate
//! whose provider is, or can be made, resolved.

use std::cmp::Ordering;

use tether_version::Version;

use crate::capability::CapabilityRef;
use crate::matcher::{check_capability, module_satisfies};
use crate::module::Module;
use crate::registry::Registry;
use crate::requirement::{ModuleRequirement, PackageRequirement};
use crate::wiring::ProviderRef;

/// How settled a candidate's provider is. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Standing {
	Wired,
	Resolved,
	Pending,
}

#[derive(Debug, Clone)]
pub(crate) struct Candidate {
	pub provider: ProviderRef,
	pub version: Version,
	pub standing: Standing,
}

/// Candidates for one requirement, best first.
#[derive(Debug, Default)]
pub(crate) struct Candidates {
	pub ranked: Vec<Candidate>,
	/// Name- and version-compatible capabilities rejected by attribute rules.
	pub attribute_rejected: Vec<CapabilityRef>,
}

/// Compares two candidates using the tie-break chain; `Less` means preferred.
pub(crate) fn cmp_candidate(a: &Candidate, b: &Candidate) -> Ordering {
	a.standing
		.cmp(&b.standing)
		.then_with(|| b.version.cmp(&a.version))
		.then_with(|| a.provider.cmp(&b.provider))
}

fn standing(registry: &Registry, provider: &Module, target: &ProviderRef) -> Standing {
	if registry.wire_count(target) > 0 {
		Standing::Wired
	} else if provider.is_resolved() {
		Standing::Resolved
	} else {
		Standing::Pending
	}
}

/// Collects every exported capability matching `req` across the registry.
pub(crate) fn for_package(registry: &Registry, req: &PackageRequirement) -> Candidates {
	let mut out = Candidates::default();
	for module in registry.modules(None) {
		for (index, cap) in module.capabilities().iter().enumerate() {
			let cap_ref = CapabilityRef {
				module: module.id(),
				index,
			};
			let outcome = check_capability(cap, module, req);
			if outcome.is_satisfied() {
				let provider = ProviderRef::Capability(cap_ref);
				out.ranked.push(Candidate {
					standing: standing(registry, module, &provider),
					provider,
					version: cap.version().clone(),
				});
			} else if outcome.is_attribute_mismatch() {
				tracing::trace!(
					capability = %cap_ref,
					package = %req.name,
					?outcome,
					"capability rejected by attribute rules"
				);
				out.attribute_rejected.push(cap_ref);
			}
		}
	}
	out.ranked.sort_by(cmp_candidate);
	out
}

/// Collects every module matching `req` by name and version.
pub(crate) fn for_module(registry: &Registry, req: &ModuleRequirement) -> Candidates {
	let mut out = Candidates::default();
	for id in registry.ids_named(&req.name) {
		let Some(module) = registry.get(*id) else {
			continue;
		};
		if !module_satisfies(module, req) {
			continue;
		}
		let provider = ProviderRef::Module(*id);
		out.ranked.push(Candidate {
			standing: standing(registry, module, &provider),
			provider,
			version: module.version().clone(),
		});
	}
	out.ranked.sort_by(cmp_candidate);
	out
}
