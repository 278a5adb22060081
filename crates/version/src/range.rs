use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParseError, Version};

/// A set of versions: either `[v, ∞)` or an explicit interval.
///
/// A bare version string parses to [`VersionRange::AtLeast`]; the default
/// range is `AtLeast(0.0.0)`, which matches every version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionRange {
	/// Every version greater than or equal to the bound.
	AtLeast(Version),
	/// Versions between `low` and `high`, each bound independently inclusive.
	Interval {
		low: Version,
		low_inclusive: bool,
		high: Version,
		high_inclusive: bool,
	},
}

impl Default for VersionRange {
	fn default() -> Self {
		Self::AtLeast(Version::EMPTY)
	}
}

impl VersionRange {
	/// Returns the range that matches every version.
	pub fn unbounded() -> Self {
		Self::default()
	}

	/// Returns `[v, ∞)`.
	pub fn at_least(v: Version) -> Self {
		Self::AtLeast(v)
	}

	/// Returns `[v, v]`.
	pub fn exact(v: Version) -> Self {
		Self::Interval {
			low: v.clone(),
			low_inclusive: true,
			high: v,
			high_inclusive: true,
		}
	}

	/// Builds an interval, rejecting a low bound above the high bound.
	pub fn interval(
		low: Version,
		low_inclusive: bool,
		high: Version,
		high_inclusive: bool,
	) -> Result<Self, ParseError> {
		if low > high {
			return Err(ParseError::InvertedRange {
				input: format_interval(&low, low_inclusive, &high, high_inclusive),
			});
		}
		Ok(Self::Interval {
			low,
			low_inclusive,
			high,
			high_inclusive,
		})
	}

	/// Parses a bare version (`1.2`) or an interval (`[1.2,2.0)`).
	pub fn parse(s: &str) -> Result<Self, ParseError> {
		let input = s.trim();
		let bytes = input.as_bytes();
		let low_inclusive = match bytes.first() {
			Some(b'[') => true,
			Some(b'(') => false,
			_ => return Version::parse(input).map(Self::AtLeast),
		};

		let malformed = |reason| ParseError::MalformedRange {
			input: input.to_string(),
			reason,
		};

		if bytes.len() < 2 {
			return Err(malformed("missing closing bracket"));
		}
		let high_inclusive = match bytes[bytes.len() - 1] {
			b']' => true,
			b')' => false,
			_ => return Err(malformed("missing closing bracket")),
		};

		let body = &input[1..input.len() - 1];
		let Some((low, high)) = body.split_once(',') else {
			return Err(malformed("expected two bounds separated by ','"));
		};
		if high.contains(',') {
			return Err(malformed("expected exactly two bounds"));
		}

		let low = Version::parse(low)?;
		let high = Version::parse(high)?;
		if low > high {
			return Err(ParseError::InvertedRange {
				input: input.to_string(),
			});
		}

		Ok(Self::Interval {
			low,
			low_inclusive,
			high,
			high_inclusive,
		})
	}

	/// Returns true if `v` lies inside the range, honoring bound inclusivity.
	pub fn matches(&self, v: &Version) -> bool {
		match self {
			Self::AtLeast(low) => v >= low,
			Self::Interval {
				low,
				low_inclusive,
				high,
				high_inclusive,
			} => {
				let above = if *low_inclusive { v >= low } else { v > low };
				let below = if *high_inclusive { v <= high } else { v < high };
				above && below
			}
		}
	}

	/// Returns the low bound.
	pub fn low(&self) -> &Version {
		match self {
			Self::AtLeast(low) | Self::Interval { low, .. } => low,
		}
	}

	/// Returns the high bound, or `None` for an unbounded range.
	pub fn high(&self) -> Option<&Version> {
		match self {
			Self::AtLeast(_) => None,
			Self::Interval { high, .. } => Some(high),
		}
	}

	/// Returns true if no version can match, e.g. `[1.0,1.0)`.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::AtLeast(_) => false,
			Self::Interval {
				low,
				low_inclusive,
				high,
				high_inclusive,
			} => low == high && !(*low_inclusive && *high_inclusive),
		}
	}
}

fn format_interval(low: &Version, low_inclusive: bool, high: &Version, high_inclusive: bool) -> String {
	format!(
		"{}{},{}{}",
		if low_inclusive { '[' } else { '(' },
		low,
		high,
		if high_inclusive { ']' } else { ')' }
	)
}

impl fmt::Display for VersionRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::AtLeast(low) => write!(f, "{low}"),
			Self::Interval {
				low,
				low_inclusive,
				high,
				high_inclusive,
			} => f.write_str(&format_interval(low, *low_inclusive, high, *high_inclusive)),
		}
	}
}

impl FromStr for VersionRange {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for VersionRange {
	type Error = ParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<VersionRange> for String {
	fn from(value: VersionRange) -> Self {
		value.to_string()
	}
}

impl From<Version> for VersionRange {
	fn from(value: Version) -> Self {
		Self::AtLeast(value)
	}
}
