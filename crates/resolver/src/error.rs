use tether_version::ParseError;

use crate::module::ModuleId;

/// Errors raised by registry mutations: registration, removal, unwiring.
///
/// Resolution failures are not errors of this kind; they are reported per
/// module through [`crate::FailureReason`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A version or range string in the module metadata did not parse.
	#[error("invalid module metadata: {0}")]
	Parse(#[from] ParseError),

	#[error("module name must not be empty")]
	EmptyModuleName,

	#[error("module {module:?} exports a capability with an empty name")]
	EmptyCapabilityName { module: String },

	#[error("module {module:?} declares requirement {index} with an empty name")]
	EmptyRequirementName { module: String, index: usize },

	/// A capability marks a key mandatory without giving it a value.
	#[error("capability {capability:?} marks {key:?} mandatory but has no such attribute")]
	MandatoryWithoutAttribute { capability: String, key: String },

	#[error("no module with id {0}")]
	UnknownModule(ModuleId),

	/// Removal of a resolved module; unwire it first.
	#[error("module {0} is resolved and must be unwired before removal")]
	Resolved(ModuleId),

	/// Unwiring a module other resolved modules are still wired to.
	#[error("module {module} is still wired by {dependents:?}")]
	InUse {
		module: ModuleId,
		dependents: Vec<ModuleId>,
	},

	/// The system module is permanently resolved.
	#[error("module {0} is the system module and cannot be unwired or removed")]
	SystemModule(ModuleId),
}
