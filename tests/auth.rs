// tests/auth.rs

use std::error::Error;

use steamdeploy::auth::{Auth, Credential};
use steamdeploy::errors::DeployError;
use steamdeploy::injectable::InjectableFile;

type TestResult = Result<(), Box<dyn Error>>;

// base64 of "\"InstallConfigStore\"\n{\n}\n"
const SESSION_VDF: &str = "Ikluc3RhbGxDb25maWdTdG9yZSIKewp9Cg==";

#[test]
fn password_and_session_vdf_are_mutually_exclusive() {
    let result = Auth::from_env_values(
        "builder",
        Some("hunter2".to_string()),
        Some(SESSION_VDF.to_string()),
        false,
    );

    match result {
        Err(DeployError::ConfigError(msg)) => {
            assert!(msg.contains("STEAM_PASSWORD"));
            assert!(msg.contains("STEAM_AUTH_VDF"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn both_values_are_rejected_even_with_cached_credentials() {
    let result = Auth::from_env_values(
        "builder",
        Some("hunter2".to_string()),
        Some(SESSION_VDF.to_string()),
        true,
    );

    assert!(result.is_err());
}

#[test]
fn password_is_used_when_given() -> TestResult {
    let auth = Auth::from_env_values("builder", Some("hunter2".to_string()), None, false)?;

    assert_eq!(auth.username(), "builder");
    assert_eq!(auth.password(), Some("hunter2"));
    assert!(auth.session_vdf().is_none());
    Ok(())
}

#[test]
fn session_vdf_is_decoded() -> TestResult {
    let auth = Auth::from_env_values("builder", None, Some(SESSION_VDF.to_string()), false)?;

    assert_eq!(
        auth.session_vdf(),
        Some(&InjectableFile::from_text("\"InstallConfigStore\"\n{\n}\n"))
    );
    assert_eq!(auth.password(), None);
    Ok(())
}

#[test]
fn cached_flag_ignores_the_environment() -> TestResult {
    let auth = Auth::from_env_values("builder", Some("hunter2".to_string()), None, true)?;

    assert_eq!(auth.credential(), &Credential::Cached);
    Ok(())
}

#[test]
fn nothing_supplied_falls_back_to_the_cached_session() -> TestResult {
    let auth = Auth::from_env_values("builder", Some(String::new()), None, false)?;

    assert_eq!(auth.credential(), &Credential::Cached);
    Ok(())
}

#[test]
fn debug_output_never_contains_the_password() {
    let auth = Auth::with_password("builder", "hunter2");

    let debug = format!("{auth:?}");

    assert!(debug.contains("builder"));
    assert!(!debug.contains("hunter2"));
}
