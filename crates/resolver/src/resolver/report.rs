use std::collections::BTreeMap;
use std::fmt;

use crate::capability::CapabilityRef;
use crate::module::ModuleId;
use crate::requirement::Requirement;

/// Why a module was left unresolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
	/// No candidate could be wired to a mandatory requirement.
	#[error("unsatisfied requirement {index}: {requirement}")]
	UnsatisfiedRequirement {
		index: usize,
		requirement: Requirement,
	},

	/// No candidate could be wired, and at least one name- and
	/// version-compatible capability was rejected only by attribute rules.
	#[error("unsatisfied requirement {index}: {requirement} (attributes rejected {rejected:?})")]
	AttributeMismatch {
		index: usize,
		requirement: Requirement,
		rejected: Vec<CapabilityRef>,
	},

	/// Another singleton module with the same name is already resolved.
	#[error("singleton conflict with resolved module {other}")]
	SingletonConflict { other: ModuleId },

	/// A requirement chain led back to a module still being resolved.
	/// Cycles are detected and reported, never resolved.
	#[error("cyclic dependency: {}", format_cycle(.cycle))]
	CyclicDependency { cycle: Vec<ModuleId> },

	/// Recursive resolution went deeper than the configured limit.
	#[error("dependency chain exceeds the maximum depth of {limit}")]
	DepthExceeded { limit: usize },

	/// A requested id is not in the registry.
	#[error("no module with id {0}")]
	UnknownModule(ModuleId),
}

fn format_cycle(cycle: &[ModuleId]) -> String {
	cycle
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" -> ")
}

/// Per-module outcome of one resolve call, ordered by module id.
///
/// Contains every module the call considered: each requested (or, for a
/// full pass, each unresolved) module plus every provider it attempted to
/// resolve along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
	outcomes: BTreeMap<ModuleId, Result<(), FailureReason>>,
}

impl ResolveReport {
	/// Keeps the first failure seen for a module; a later success replaces it.
	pub(crate) fn record(&mut self, id: ModuleId, outcome: Result<(), FailureReason>) {
		if outcome.is_ok() {
			self.outcomes.insert(id, outcome);
		} else {
			self.outcomes.entry(id).or_insert(outcome);
		}
	}

	pub fn get(&self, id: ModuleId) -> Option<&Result<(), FailureReason>> {
		self.outcomes.get(&id)
	}

	/// Returns the failure for `id`, if it was considered and failed.
	pub fn failure(&self, id: ModuleId) -> Option<&FailureReason> {
		self.get(id)?.as_ref().err()
	}

	pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Result<(), FailureReason>)> {
		self.outcomes.iter().map(|(id, r)| (*id, r))
	}

	/// Ids that ended resolved, ascending.
	pub fn resolved(&self) -> Vec<ModuleId> {
		self.iter()
			.filter(|(_, r)| r.is_ok())
			.map(|(id, _)| id)
			.collect()
	}

	/// Failed ids with their reasons, ascending.
	pub fn failed(&self) -> Vec<(ModuleId, &FailureReason)> {
		self.iter()
			.filter_map(|(id, r)| r.as_ref().err().map(|e| (id, e)))
			.collect()
	}

	/// Returns true when no considered module failed.
	pub fn is_success(&self) -> bool {
		self.outcomes.values().all(Result::is_ok)
	}

	pub fn len(&self) -> usize {
		self.outcomes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.outcomes.is_empty()
	}
}

impl fmt::Display for ResolveReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (id, outcome) in self.iter() {
			match outcome {
				Ok(()) => writeln!(f, "{id}: resolved")?,
				Err(reason) => writeln!(f, "{id}: failed: {reason}")?,
			}
		}
		Ok(())
	}
}
