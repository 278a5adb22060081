use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_document_uses_defaults() {
	let config = ResolverConfig::from_toml_str("").unwrap();
	assert_eq!(config, ResolverConfig::default());
	assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
	assert!(config.system.is_none());
}

#[test]
fn system_module_is_parsed() {
	let config = ResolverConfig::from_toml_str(
		r#"
		max_depth = 64

		[system]
		name = "tether.system"
		version = "1.0"
		packages = [
			{ name = "tether.framework", version = "1.0" },
			{ name = "tether.log", attributes = { vendor = "tether" }, mandatory = ["vendor"] },
		]
		"#,
	)
	.unwrap();

	assert_eq!(config.max_depth, 64);
	let system = config.system.unwrap();
	let (version, packages) = system.parse().unwrap();
	assert_eq!(version, Version::new(1, 0, 0));
	assert_eq!(packages.len(), 2);
	assert_eq!(packages[0].name(), "tether.framework");
	assert_eq!(packages[1].version(), &Version::EMPTY);
	assert_eq!(packages[1].attribute("vendor"), Some("tether"));
	assert!(packages[1].mandatory().contains("vendor"));
}

#[test]
fn unknown_keys_are_rejected() {
	let err = ResolverConfig::from_toml_str("max_dept = 3").unwrap_err();
	assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn zero_depth_is_rejected() {
	let err = ResolverConfig::from_toml_str("max_depth = 0").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidMaxDepth(0)));
}

#[test]
fn depth_above_stack_bound_is_rejected() {
	let at_limit = format!("max_depth = {MAX_DEPTH_LIMIT}");
	assert_eq!(
		ResolverConfig::from_toml_str(&at_limit).unwrap().max_depth,
		MAX_DEPTH_LIMIT
	);

	let err = ResolverConfig::from_toml_str("max_depth = 100000").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidMaxDepth(100_000)));
}

#[test]
fn bad_system_version_is_reported_eagerly() {
	let err = ResolverConfig::from_toml_str(
		r#"
		[system]
		name = "sys"
		version = "1.x"
		"#,
	)
	.unwrap_err();
	assert!(matches!(
		err,
		ConfigError::Version(ParseError::InvalidComponent { .. })
	));
}

#[test]
fn load_reads_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "max_depth = 12").unwrap();

	let config = ResolverConfig::load(file.path()).unwrap();
	assert_eq!(config.max_depth, 12);
}

#[test]
fn load_reports_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");

	let err = ResolverConfig::load(&path).unwrap_err();
	match err {
		ConfigError::Read { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("unexpected error: {other}"),
	}
}
