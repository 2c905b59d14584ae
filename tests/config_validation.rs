// tests/config_validation.rs

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use steamdeploy::config::{BuildPlan, load_and_validate, parse_duration};
use steamdeploy::download::Source;
use steamdeploy::errors::DeployError;
use steamdeploy::exec::Timeouts;
use steamdeploy::platform::Platform;
use steamdeploy_test_utils::builders::ConfigFileBuilder;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn Error>>;

fn config_error(result: steamdeploy::errors::Result<impl std::fmt::Debug>) -> String {
    match result {
        Err(DeployError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn full_file_loads_into_a_deploy_config() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[steam]
user = "builder"

[install]
directory = "tools/steamcmd"
source = "https://example.invalid/steamcmd.tar.gz"
platform = "linux"

[build]
application = "target/image"
app_id = 1000
depot_id = 1001
description = "nightly"
preview = true

[timeouts]
total = "10m"
inactivity = "90s"
"#
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.user, "builder");
    assert!(!cfg.cached_credentials);
    assert_eq!(cfg.install_dir, PathBuf::from("tools/steamcmd"));
    assert_eq!(
        cfg.source,
        Some(Source::Url("https://example.invalid/steamcmd.tar.gz".to_string()))
    );
    assert_eq!(cfg.platform, Some(Platform::Linux));
    assert_eq!(cfg.application, Some(PathBuf::from("target/image")));
    assert_eq!(
        cfg.build,
        Some(BuildPlan::Generated {
            app_id: 1000,
            depot_id: 1001,
            description: Some("nightly".to_string()),
            verbose: false,
            preview: true,
        })
    );
    assert_eq!(
        cfg.timeouts,
        Timeouts {
            total: Duration::from_secs(600),
            inactivity: Duration::from_secs(90),
        }
    );
    Ok(())
}

#[test]
fn defaults_apply_to_a_minimal_file() -> TestResult {
    let cfg = ConfigFileBuilder::new().try_build()?;

    assert_eq!(cfg.install_dir, PathBuf::from("target/steamcmd"));
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert_eq!(cfg.build, None);
    assert_eq!(cfg.source, None);
    assert!(!cfg.skip);
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "[steam]\nuser = \"builder\"\npasword = \"typo\"\n")?;

    let result = load_and_validate(file.path());

    assert!(matches!(result, Err(DeployError::TomlError(_))));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_and_validate("/nonexistent/Steamdeploy.toml");

    assert!(matches!(result, Err(DeployError::IoError(_))));
}

#[test]
fn user_is_required() {
    let msg = config_error(ConfigFileBuilder::new().user("  ").try_build());

    assert!(msg.contains("user"));
}

#[test]
fn script_excludes_app_build_parameters() {
    let msg = config_error(
        ConfigFileBuilder::new()
            .script("app_build.vdf")
            .app(1000, 1001)
            .verbose(true)
            .try_build(),
    );

    assert!(msg.contains("app_id"));
    assert!(msg.contains("depot_id"));
    assert!(msg.contains("verbose"));
}

#[test]
fn script_alone_is_a_script_plan() -> TestResult {
    let cfg = ConfigFileBuilder::new().script("app_build.vdf").try_build()?;

    assert_eq!(cfg.build, Some(BuildPlan::Script(PathBuf::from("app_build.vdf"))));
    Ok(())
}

#[test]
fn app_id_without_depot_id_is_rejected() {
    let msg = config_error(ConfigFileBuilder::new().app_id(1000).try_build());

    assert!(msg.contains("depot_id"));
}

#[test]
fn description_without_ids_is_rejected() {
    let result = ConfigFileBuilder::new().description("orphan").try_build();

    assert!(matches!(result, Err(DeployError::ConfigError(_))));
}

#[test]
fn zero_or_malformed_timeouts_are_rejected() {
    let msg = config_error(ConfigFileBuilder::new().timeouts("0s", "2m").try_build());
    assert!(msg.contains("total"));

    let msg = config_error(ConfigFileBuilder::new().timeouts("5m", "soon").try_build());
    assert!(msg.contains("inactivity"));
}

#[test]
fn unknown_platform_is_rejected() {
    let msg = config_error(ConfigFileBuilder::new().platform("amiga").try_build());

    assert!(msg.contains("amiga"));
}

#[test]
fn local_sources_are_parsed_as_paths() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .source("file:///opt/mirror/steamcmd.zip")
        .try_build()?;

    assert_eq!(
        cfg.source,
        Some(Source::File(PathBuf::from("/opt/mirror/steamcmd.zip")))
    );
    Ok(())
}

#[test]
fn generated_plan_renders_its_app_build_script() {
    let cfg = ConfigFileBuilder::new()
        .app(1234, 5678)
        .description("")
        .verbose(true)
        .build();

    let script = cfg.build.expect("plan").script();

    assert_eq!(
        script,
        steamdeploy::injectable::InjectableFile::app_build(1234, "", true, false, 5678)
    );
}

#[test]
fn duration_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("5m"), Ok(Duration::from_secs(300)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("1d").is_err());
    assert!(parse_duration("").is_err());
}

#[test]
fn out_of_range_durations_are_errors() {
    assert!(parse_duration("307445734561825861m").is_err());
    assert!(parse_duration("18446744073709551615h").is_err());

    let msg = config_error(
        ConfigFileBuilder::new()
            .timeouts("6000000000000000h", "2m")
            .try_build(),
    );
    assert!(msg.contains("total"));
    assert!(msg.contains("out of range"));
}
