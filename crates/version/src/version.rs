use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// A four-part version: `major.minor.micro.qualifier`.
///
/// Ordering compares `major`, then `minor`, then `micro`, then the qualifier
/// lexicographically. The derived [`Ord`] relies on that field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
	major: u32,
	minor: u32,
	micro: u32,
	qualifier: String,
}

impl Version {
	/// The version `0.0.0` with no qualifier.
	pub const EMPTY: Version = Version::new(0, 0, 0);

	/// Creates a version with an empty qualifier.
	pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
		Self {
			major,
			minor,
			micro,
			qualifier: String::new(),
		}
	}

	/// Returns this version with the given qualifier.
	///
	/// The qualifier is checked against the same `[A-Za-z0-9_-]*` alphabet
	/// the parser enforces.
	pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Result<Self, ParseError> {
		let qualifier = qualifier.into();
		if !is_valid_qualifier(&qualifier) {
			return Err(ParseError::InvalidQualifier {
				input: format!("{}.{}.{}.{}", self.major, self.minor, self.micro, qualifier),
				qualifier,
			});
		}
		self.qualifier = qualifier;
		Ok(self)
	}

	/// Parses `major[.minor[.micro[.qualifier]]]`.
	///
	/// Missing numeric components default to zero and a missing qualifier
	/// defaults to empty. Surrounding whitespace is ignored; anything else
	/// outside the grammar is rejected.
	pub fn parse(s: &str) -> Result<Self, ParseError> {
		let input = s.trim();
		if input.is_empty() {
			return Err(ParseError::Empty);
		}

		let mut parts = input.splitn(4, '.');
		let major = numeric_component(input, parts.next())?;
		let minor = numeric_component(input, parts.next())?;
		let micro = numeric_component(input, parts.next())?;
		let qualifier = match parts.next() {
			None => String::new(),
			Some(q) if !q.is_empty() && is_valid_qualifier(q) => q.to_string(),
			Some(q) => {
				return Err(ParseError::InvalidQualifier {
					input: input.to_string(),
					qualifier: q.to_string(),
				});
			}
		};

		Ok(Self {
			major,
			minor,
			micro,
			qualifier,
		})
	}

	pub fn major(&self) -> u32 {
		self.major
	}

	pub fn minor(&self) -> u32 {
		self.minor
	}

	pub fn micro(&self) -> u32 {
		self.micro
	}

	/// Returns the qualifier, or `""` when absent.
	pub fn qualifier(&self) -> &str {
		&self.qualifier
	}

	/// Returns true for `0.0.0` with no qualifier.
	pub fn is_empty(&self) -> bool {
		*self == Self::EMPTY
	}
}

fn numeric_component(input: &str, part: Option<&str>) -> Result<u32, ParseError> {
	let Some(part) = part else {
		return Ok(0);
	};
	if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
		return Err(ParseError::InvalidComponent {
			input: input.to_string(),
			component: part.to_string(),
		});
	}
	part.parse().map_err(|_| ParseError::ComponentOverflow {
		input: input.to_string(),
		component: part.to_string(),
	})
}

fn is_valid_qualifier(q: &str) -> bool {
	q.bytes()
		.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
		if !self.qualifier.is_empty() {
			write!(f, ".{}", self.qualifier)?;
		}
		Ok(())
	}
}

impl FromStr for Version {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for Version {
	type Error = ParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<Version> for String {
	fn from(value: Version) -> Self {
		value.to_string()
	}
}
