//! Versions and version ranges.
//!
//! # Role
//!
//! This crate owns the one textual format the resolver core must parse
//! byte-for-byte: `major[.minor[.micro[.qualifier]]]` versions and interval
//! ranges written as `[`/`(` low `,` high `]`/`)`.
//!
//! # Invariants
//!
//! - Formatting a parsed [`Version`] and parsing the result yields an equal value.
//!   - Tested by: `tests::prop_version_display_roundtrip`
//! - A [`VersionRange`] interval never has its low bound above its high bound.
//!   - Enforced in: [`VersionRange::interval`], [`VersionRange::parse`].
//!   - Tested by: `tests::inverted_interval_is_rejected`

mod range;
mod version;

pub use range::VersionRange;
pub use version::Version;


/// Errors produced while parsing a [`Version`] or [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	/// The input was empty or only whitespace.
	#[error("empty version string")]
	Empty,
	/// A numeric component was empty or contained non-digit characters.
	#[error("invalid component {component:?} in version {input:?}")]
	InvalidComponent { input: String, component: String },
	/// A numeric component does not fit in a `u32`.
	#[error("component {component:?} in version {input:?} is out of range")]
	ComponentOverflow { input: String, component: String },
	/// The qualifier was empty after a separator or contained a character
	/// outside `[A-Za-z0-9_-]`.
	#[error("invalid qualifier {qualifier:?} in version {input:?}")]
	InvalidQualifier { input: String, qualifier: String },
	/// The interval syntax itself was malformed.
	#[error("malformed version range {input:?}: {reason}")]
	MalformedRange { input: String, reason: &'static str },
	/// Both bounds parsed but the low bound is greater than the high bound.
	#[error("version range {input:?} has its low bound above its high bound")]
	InvertedRange { input: String },
}
