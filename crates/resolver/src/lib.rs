//! Module resolution: wiring package imports and module requirements to
//! the capabilities and modules that satisfy them.
//!
//! # Purpose
//!
//! Modules export versioned, attributed packages ([`Capability`]) and
//! declare [`Requirement`]s: imported packages or whole required modules.
//! The [`Resolver`] takes a set of unresolved modules from a [`Registry`] and
//! commits, for every module it can fully satisfy, a [`Wiring`] naming the
//! exact provider chosen for each requirement. Modules that cannot be
//! satisfied stay unresolved and are reported with a [`FailureReason`].
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | All known modules, their state, and committed wiring. |
//! | [`DefaultResolver`] | Reference [`Resolver`]: deterministic, depth-first, cycle-detecting. |
//! | [`ResolveReport`] | Per-module outcome of one resolve call. |
//! | [`Framework`] | Lock-serialised mutations with snapshot publication for readers. |
//! | [`ModuleDescriptor`] | Serde form of module metadata, parsed before registration. |
//!
//! # Out of scope
//!
//! Cyclic dependencies are detected and reported as
//! [`FailureReason::CyclicDependency`], never resolved. Re-resolution after
//! providers change is left to the caller (unwire, then resolve again).

mod capability;
mod config;
mod descriptor;
mod error;
mod framework;
pub mod matcher;
mod module;
mod registry;
mod requirement;
mod resolver;
mod wiring;

pub use capability::{Capability, CapabilityRef};
pub use config::{
	ConfigError, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, ResolverConfig, SystemModuleConfig,
};
pub use descriptor::{
	ExportDescriptor, ImportDescriptor, ModuleDescriptor, ModuleSet, ParsedModule,
	RequireDescriptor,
};
pub use error::RegistryError;
pub use framework::Framework;
pub use matcher::{MatchOutcome, capability_satisfies, module_satisfies};
pub use module::{Module, ModuleId, ModuleState};
pub use registry::Registry;
pub use requirement::{ModuleRequirement, PackageRequirement, Requirement, RequirementId};
pub use resolver::{DefaultResolver, FailureReason, ResolveReport, Resolver};
pub use tether_version::{ParseError, Version, VersionRange};
pub use wiring::{ProviderRef, Wiring};

#[cfg(test)]
pub(crate) mod test_fixtures;
