use pretty_assertions::assert_eq;

use super::*;

const SET: &str = r#"
[[module]]
name = "app"
version = "1.0"
imports = [
	{ name = "log", version = "[1.0,2.0)", attributes = { vendor = "acme" } },
	{ name = "metrics", optional = true, module_name = "telemetry", module_version = "[1.0,2.0)" },
]
requires = [{ name = "runtime", version = "2.0" }]

[[module]]
name = "logging"
version = "1.4"
singleton = true
exports = [{ name = "log", version = "1.4", attributes = { vendor = "acme" }, mandatory = ["vendor"] }]
"#;

#[test]
fn module_set_parses() {
	let set = ModuleSet::from_toml_str(SET).unwrap();
	assert_eq!(set.modules.len(), 2);

	let app = set.modules[0].parse().unwrap();
	assert_eq!(app.name, "app");
	assert_eq!(app.version, Version::new(1, 0, 0));
	assert!(!app.singleton);
	assert!(app.capabilities.is_empty());

	let names: Vec<_> = app.requirements.iter().map(Requirement::name).collect();
	assert_eq!(names, ["log", "metrics", "runtime"]);

	let log = app.requirements[0].as_package().unwrap();
	assert_eq!(log.range, VersionRange::parse("[1.0,2.0)").unwrap());
	assert_eq!(log.attributes.get("vendor").map(String::as_str), Some("acme"));
	assert!(!log.optional);

	let metrics = app.requirements[1].as_package().unwrap();
	assert!(metrics.optional);
	assert_eq!(metrics.module_name.as_deref(), Some("telemetry"));
	assert!(metrics.module_version.is_some());

	let runtime = app.requirements[2].as_module().unwrap();
	assert_eq!(runtime.range, VersionRange::at_least(Version::new(2, 0, 0)));

	let logging = set.modules[1].parse().unwrap();
	assert!(logging.singleton);
	assert!(logging.capabilities[0].mandatory().contains("vendor"));
}

#[test]
fn missing_versions_default() {
	let descriptor = ModuleDescriptor {
		name: "bare".into(),
		exports: vec![ExportDescriptor {
			name: "p".into(),
			..Default::default()
		}],
		requires: vec![RequireDescriptor {
			name: "core".into(),
			..Default::default()
		}],
		..Default::default()
	};

	let parsed = descriptor.parse().unwrap();
	assert_eq!(parsed.version, Version::EMPTY);
	assert_eq!(parsed.capabilities[0].version(), &Version::EMPTY);
	assert_eq!(parsed.requirements[0].range(), &VersionRange::default());
}

#[test]
fn malformed_version_never_reaches_registry() {
	let mut registry = Registry::new();
	let descriptor = ModuleDescriptor {
		name: "bad".into(),
		version: Some("1..2".into()),
		..Default::default()
	};

	let err = descriptor.register(&mut registry).unwrap_err();
	assert!(matches!(err, RegistryError::Parse(_)));
	assert!(registry.is_empty());
}

#[test]
fn register_assigns_ids_in_file_order() {
	let mut registry = Registry::new();
	let set = ModuleSet::from_toml_str(SET).unwrap();
	let ids: Vec<ModuleId> = set
		.modules
		.iter()
		.map(|m| m.register(&mut registry).unwrap())
		.collect();

	assert_eq!(ids, vec![ModuleId(0), ModuleId(1)]);
	assert_eq!(registry.get(ids[1]).unwrap().name(), "logging");
}

#[test]
fn unknown_fields_are_rejected() {
	let err = ModuleSet::from_toml_str(
		r#"
		[[module]]
		name = "x"
		exprots = []
		"#,
	)
	.unwrap_err();
	assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("modules.toml");
	std::fs::write(&path, SET).unwrap();

	let set = ModuleSet::load(&path).unwrap();
	assert_eq!(set.modules.len(), 2);
}
