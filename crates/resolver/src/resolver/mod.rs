//! Module resolution.
//!
//! # Purpose
//!
//! Given a registry and a target (a subset of module ids, or every
//! unresolved module), wire as many target modules as can be fully
//! satisfied and report a typed outcome for each module considered.
//!
//! # Mental Model
//!
//! Targets are processed in ascending id order. For each module:
//! 1. Already resolved: success, nothing is re-evaluated.
//! 2. Singleton and another singleton of the same name is resolved: fail.
//! 3. Each requirement, in declaration order, collects candidates (see
//!    [`candidates`]) and walks them best first. A candidate whose provider
//!    is unresolved is resolved recursively before it is used; if that fails
//!    the next candidate is tried.
//! 4. If every requirement is wired (or optional and left unwired), the
//!    module's state and wiring are committed together. Otherwise nothing
//!    is committed for it and the next target is processed.
//!
//! Providers resolved along the way stay resolved even if the module that
//! pulled them in fails; they were fully satisfied on their own.
//!
//! # Invariants
//!
//! - A module's wiring is committed all at once or not at all.
//!   - Enforced in: `Session::resolve_module` (single `Registry::commit`).
//!   - Tested by: `tests::failed_module_commits_nothing`
//! - Existing wires are never moved by a later pass.
//!   - Enforced in: `Session::resolve_module` (resolved modules short-circuit).
//!   - Tested by: `tests::sticky_wiring_survives_new_provider`
//! - Recursion is bounded: cycles are detected on an explicit stack and depth
//!   is capped by [`crate::ResolverConfig::max_depth`], itself capped by
//!   [`crate::MAX_DEPTH_LIMIT`].
//!   - Enforced in: `Session::resolve_module`, [`DefaultResolver::with_max_depth`].
//!   - Tested by: `tests::module_cycle_is_reported`, `tests::depth_limit_is_enforced`,
//!     `tests::depth_limit_is_clamped`
//! - Each module is attempted at most once per target while it keeps failing
//!   on a cycle, so cyclic graphs cost polynomial time.
//!   - Enforced in: `Session::resolve_module` (`Session::transient`).
//!   - Tested by: `tests::large_cycle_with_alternatives_finishes`,
//!     `tests::branching_graph_over_depth_limit_finishes`
//! - At most one singleton per name is resolved.
//!   - Enforced in: `Session::attempt` (checked before and after wiring).
//!   - Tested by: `tests::singleton_conflict`

mod candidates;
mod report;

pub use report::{FailureReason, ResolveReport};
use rustc_hash::FxHashMap;

use crate::config::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, ResolverConfig};
use crate::module::{Module, ModuleId, ModuleState};
use crate::registry::Registry;
use crate::requirement::Requirement;
use crate::wiring::{ProviderRef, Wiring};


/// A resolution strategy over a [`Registry`].
///
/// [`DefaultResolver`] is the reference implementation; alternatives must
/// honor the same contract: per-module all-or-nothing commits, untouched
/// resolved modules, and a report entry for every module considered.
pub trait Resolver {
	/// Resolves `target`, or every unresolved module when `None`.
	fn resolve(&self, registry: &mut Registry, target: Option<&[ModuleId]>) -> ResolveReport;
}

/// Depth-first resolver with deterministic tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultResolver {
	max_depth: usize,
}

impl Default for DefaultResolver {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl DefaultResolver {
	pub fn new(config: &ResolverConfig) -> Self {
		Self::with_max_depth(config.max_depth)
	}

	/// Caps how many modules may be under resolution at once.
	///
	/// The value is clamped to `1..=MAX_DEPTH_LIMIT`; resolution recurses on
	/// the thread stack.
	pub fn with_max_depth(max_depth: usize) -> Self {
		Self {
			max_depth: max_depth.clamp(1, MAX_DEPTH_LIMIT),
		}
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}
}

impl Resolver for DefaultResolver {
	fn resolve(&self, registry: &mut Registry, target: Option<&[ModuleId]>) -> ResolveReport {
		let scope = if target.is_some() { "subset" } else { "all" };
		let span = tracing::info_span!("resolve", scope);
		let _guard = span.enter();

		let targets: Vec<ModuleId> = match target {
			None => registry
				.modules(Some(ModuleState::Unresolved))
				.map(Module::id)
				.collect(),
			Some(ids) => {
				let mut ids = ids.to_vec();
				ids.sort_unstable();
				ids.dedup();
				ids
			}
		};

		let mut session = Session {
			registry,
			max_depth: self.max_depth,
			stack: Vec::new(),
			settled: FxHashMap::default(),
			transient: FxHashMap::default(),
			report: ResolveReport::default(),
		};
		for id in targets {
			session.resolve_target(id);
		}

		let report = session.report;
		tracing::info!(
			considered = report.len(),
			resolved = report.resolved().len(),
			failed = report.failed().len(),
			"resolve finished"
		);
		report
	}
}

/// A failed attempt to resolve one module.
///
/// Transient failures (cycles, depth) depend on the current resolution
/// stack. They are memoised only within one target; a later target may
/// reach the same module along a path where it succeeds.
struct Failure {
	reason: FailureReason,
	transient: bool,
}

impl Failure {
	fn settled(reason: FailureReason) -> Self {
		Self {
			reason,
			transient: false,
		}
	}

	fn transient(reason: FailureReason) -> Self {
		Self {
			reason,
			transient: true,
		}
	}
}

/// State for a single resolve call.
struct Session<'r> {
	registry: &'r mut Registry,
	max_depth: usize,
	/// Modules currently being resolved, outermost first.
	stack: Vec<ModuleId>,
	/// Memoised non-transient failures.
	settled: FxHashMap<ModuleId, FailureReason>,
	/// Transient failures of the current target, with the stack depth they
	/// were reached at. Cleared per target.
	transient: FxHashMap<ModuleId, (FailureReason, usize)>,
	report: ResolveReport,
}

impl Session<'_> {
	fn resolve_target(&mut self, id: ModuleId) {
		if !self.registry.contains(id) {
			self.report.record(id, Err(FailureReason::UnknownModule(id)));
			return;
		}
		if self.registry.is_resolved(id) {
			self.report.record(id, Ok(()));
			return;
		}
		self.transient.clear();
		// Outcomes, including failures, are recorded by `resolve_module`.
		let _ = self.resolve_module(id);
	}

	fn resolve_module(&mut self, id: ModuleId) -> Result<(), Failure> {
		let Some(module) = self.registry.get_shared(id) else {
			return Err(Failure::settled(FailureReason::UnknownModule(id)));
		};
		if module.is_resolved() {
			return Ok(());
		}
		if let Some(pos) = self.stack.iter().position(|m| *m == id) {
			let mut cycle = self.stack[pos..].to_vec();
			cycle.push(id);
			tracing::warn!(module = %id, ?cycle, "cyclic dependency detected");
			return Err(Failure::transient(FailureReason::CyclicDependency { cycle }));
		}
		if let Some(reason) = self.settled.get(&id) {
			return Err(Failure::settled(reason.clone()));
		}
		// A cycle failure stands for the rest of the target; a depth failure
		// only where there is no more room than before.
		if let Some((reason, depth)) = self.transient.get(&id)
			&& (matches!(reason, FailureReason::CyclicDependency { .. }) || self.stack.len() >= *depth)
		{
			return Err(Failure::transient(reason.clone()));
		}
		// Refused without an attempt, so nothing is recorded for this module.
		if self.stack.len() >= self.max_depth {
			tracing::warn!(module = %id, limit = self.max_depth, "resolution depth exceeded");
			return Err(Failure::transient(FailureReason::DepthExceeded {
				limit: self.max_depth,
			}));
		}

		let outcome = self.attempt(&module);
		drop(module);

		match outcome {
			Ok(wiring) => {
				tracing::debug!(module = %id, wires = wiring.wires().count(), "module resolved");
				self.registry.commit(id, wiring);
				self.report.record(id, Ok(()));
				Ok(())
			}
			Err(failure) => {
				tracing::debug!(module = %id, reason = %failure.reason, "module left unresolved");
				self.report.record(id, Err(failure.reason.clone()));
				if failure.transient {
					self.transient
						.insert(id, (failure.reason.clone(), self.stack.len()));
				} else {
					self.settled.insert(id, failure.reason.clone());
				}
				Err(failure)
			}
		}
	}

	fn attempt(&mut self, module: &Module) -> Result<Wiring, Failure> {
		if let Some(other) = self.singleton_conflict(module) {
			tracing::warn!(module = %module.id(), %other, name = module.name(), "singleton conflict");
			return Err(Failure::settled(FailureReason::SingletonConflict { other }));
		}
		self.stack.push(module.id());
		let wired = self.wire_requirements(module);
		self.stack.pop();
		let wiring = wired?;

		// A dependency pulled in above may have been a same-named singleton.
		if let Some(other) = self.singleton_conflict(module) {
			tracing::warn!(module = %module.id(), %other, name = module.name(), "singleton conflict");
			return Err(Failure::settled(FailureReason::SingletonConflict { other }));
		}
		Ok(wiring)
	}

	fn singleton_conflict(&self, module: &Module) -> Option<ModuleId> {
		if !module.is_singleton() {
			return None;
		}
		self.registry
			.ids_named(module.name())
			.iter()
			.copied()
			.find(|other| {
				*other != module.id()
					&& self
						.registry
						.get(*other)
						.is_some_and(|m| m.is_singleton() && m.is_resolved())
			})
	}

	fn wire_requirements(&mut self, module: &Module) -> Result<Wiring, Failure> {
		let mut wires = Vec::with_capacity(module.requirements().len());
		for (index, req) in module.requirements().iter().enumerate() {
			wires.push(self.select_provider(module, index, req)?);
		}
		Ok(Wiring::new(wires))
	}

	/// Picks the best usable provider for one requirement.
	///
	/// Returns `Ok(None)` for an optional requirement with no usable provider.
	fn select_provider(
		&mut self,
		module: &Module,
		index: usize,
		req: &Requirement,
	) -> Result<Option<ProviderRef>, Failure> {
		let candidates = match req {
			Requirement::Package(p) => candidates::for_package(self.registry, p),
			Requirement::Module(m) => candidates::for_module(self.registry, m),
		};
		tracing::trace!(
			module = %module.id(),
			requirement = %req,
			candidates = candidates.ranked.len(),
			"candidates collected"
		);

		let mut blocked: Option<Failure> = None;
		for candidate in &candidates.ranked {
			let provider = candidate.provider.module();
			// A module may import a package it exports itself.
			let usable = if provider == module.id() && candidate.provider.capability().is_some() {
				Ok(())
			} else {
				self.resolve_module(provider)
			};
			match usable {
				Ok(()) => {
					tracing::debug!(
						module = %module.id(),
						requirement = index,
						provider = %candidate.provider,
						standing = ?candidate.standing,
						"requirement wired"
					);
					return Ok(Some(candidate.provider));
				}
				Err(failure) => {
					if failure.transient && blocked.is_none() {
						blocked = Some(failure);
					}
				}
			}
		}

		if req.is_optional() {
			tracing::debug!(module = %module.id(), requirement = index, "optional requirement left unwired");
			return Ok(None);
		}
		if let Some(failure) = blocked {
			return Err(failure);
		}
		let reason = if candidates.ranked.is_empty() && !candidates.attribute_rejected.is_empty() {
			FailureReason::AttributeMismatch {
				index,
				requirement: req.clone(),
				rejected: candidates.attribute_rejected,
			}
		} else {
			FailureReason::UnsatisfiedRequirement {
				index,
				requirement: req.clone(),
			}
		};
		Err(Failure::settled(reason))
	}
}
