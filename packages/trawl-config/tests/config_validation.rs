use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use trawl_config::Error;

const SAMPLE_CONFIG_TOML: &str = r#"
[backend]
url = "http://localhost:9200/"
timeout_ms = 5000

[backend.default_headers]
authorization = "ApiKey secret"

[indexing]
refresh_writes = false
default_per_page = 25
"#;

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("trawl_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: &str) -> trawl_config::Result<trawl_config::Config> {
	let path = write_temp_config(payload);
	let result = trawl_config::load(&path);

	let _ = fs::remove_file(&path);

	result
}

#[test]
fn load_parses_and_normalizes() {
	let cfg = load(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.backend.url, "http://localhost:9200");
	assert_eq!(cfg.backend.timeout_ms, 5_000);
	assert_eq!(
		cfg.backend.default_headers.get("authorization").and_then(|value| value.as_str()),
		Some("ApiKey secret"),
	);
	assert!(!cfg.indexing.refresh_writes);
	assert_eq!(cfg.indexing.default_per_page, 25);
}

#[test]
fn defaults_apply_when_fields_are_omitted() {
	let cfg = load("[backend]\nurl = \"http://search.internal\"\n").expect("Config must load.");

	assert_eq!(cfg.backend.timeout_ms, 30_000);
	assert!(cfg.backend.default_headers.is_empty());
	assert!(cfg.indexing.refresh_writes);
	assert_eq!(cfg.indexing.default_per_page, 15);
}

#[test]
fn rejects_empty_url() {
	let err = load("[backend]\nurl = \"  \"\n").expect_err("Blank URL must be rejected.");

	assert!(matches!(err, Error::Validation { message } if message.contains("backend.url")));
}

#[test]
fn rejects_zero_timeout() {
	let err = load("[backend]\nurl = \"http://search.internal\"\ntimeout_ms = 0\n")
		.expect_err("Zero timeout must be rejected.");

	assert!(
		matches!(err, Error::Validation { message } if message.contains("backend.timeout_ms"))
	);
}

#[test]
fn rejects_non_string_header_values() {
	let payload = "\
[backend]
url = \"http://search.internal\"

[backend.default_headers]
x-attempts = 3
";
	let err = load(payload).expect_err("Numeric header values must be rejected.");

	assert!(matches!(err, Error::Validation { message } if message.contains("x-attempts")));
}

#[test]
fn rejects_zero_default_per_page() {
	let payload = "\
[backend]
url = \"http://search.internal\"

[indexing]
default_per_page = 0
";
	let err = load(payload).expect_err("Zero page size must be rejected.");

	assert!(
		matches!(err, Error::Validation { message } if message.contains("default_per_page"))
	);
}

#[test]
fn missing_file_is_a_read_error() {
	let err = trawl_config::load(&env::temp_dir().join("trawl_config_missing.toml"))
		.expect_err("Missing file must fail to load.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
