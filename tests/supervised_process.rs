// tests/supervised_process.rs
#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use steamdeploy::errors::DeployError;
use steamdeploy::exec::{ProcessSpec, TIMED_OUT_STATUS, Termination, run};
use steamdeploy_test_utils::{init_tracing, with_timeout};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> ProcessSpec {
    ProcessSpec::new(["sh", "-c", script]).polling_every(Duration::from_millis(100))
}

#[tokio::test]
async fn merges_stderr_into_stdout_in_emission_order() -> TestResult {
    with_timeout(async {
        init_tracing();

        let result = run(sh("echo one; echo two 1>&2; echo three")).await?;

        assert_eq!(result.status(), 0);
        assert_eq!(result.termination(), Termination::Exited);
        assert_eq!(result.lines(), ["one", "two", "three"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn reports_nonzero_exit_status() -> TestResult {
    with_timeout(async {
        let result = run(sh("echo failing; exit 3")).await?;

        assert_eq!(result.status(), 3);
        assert!(!result.success());
        assert!(!result.timed_out());
        assert_eq!(result.lines(), ["failing"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn signal_exit_is_distinct_from_the_timeout_sentinel() -> TestResult {
    with_timeout(async {
        let result = run(sh("kill -9 $$")).await?;

        assert_eq!(result.termination(), Termination::Exited);
        assert_eq!(result.status(), 128 + 9);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn keeps_final_line_without_newline_and_strips_carriage_returns() -> TestResult {
    with_timeout(async {
        let result = run(sh(r"printf 'win\r\nunix\nlast'")).await?;

        assert_eq!(result.lines(), ["win", "unix", "last"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn silent_process_is_killed_for_inactivity() -> TestResult {
    with_timeout(async {
        init_tracing();
        let started = Instant::now();

        let spec = sh("echo $$; exec sleep 30")
            .failing_after(Duration::from_secs(20))
            .tolerating_inactivity_of(Duration::from_millis(500));
        let result = run(spec).await?;

        assert_eq!(result.status(), TIMED_OUT_STATUS);
        assert_eq!(result.termination(), Termination::Inactivity);
        assert_eq!(result.lines().len(), 1);
        assert!(started.elapsed() < Duration::from_secs(10));

        #[cfg(target_os = "linux")]
        {
            let pid = result.lines()[0].trim();
            assert!(
                !std::path::Path::new(&format!("/proc/{pid}")).exists(),
                "process {pid} should have been killed and reaped"
            );
        }
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn chatty_process_is_killed_at_the_total_deadline() -> TestResult {
    with_timeout(async {
        let started = Instant::now();

        let spec = sh("while true; do echo tick; sleep 0.1; done")
            .failing_after(Duration::from_secs(1))
            .tolerating_inactivity_of(Duration::from_secs(10));
        let result = run(spec).await?;

        assert_eq!(result.status(), TIMED_OUT_STATUS);
        assert_eq!(result.termination(), Termination::TotalTimeout);
        assert!(!result.lines().is_empty());
        assert!(result.lines().iter().all(|line| line == "tick"));
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_secs(5));
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn steady_output_keeps_the_inactivity_monitor_quiet() -> TestResult {
    with_timeout(async {
        let spec = sh("for i in 1 2 3 4 5; do echo $i; sleep 0.2; done")
            .tolerating_inactivity_of(Duration::from_secs(1));
        let result = run(spec).await?;

        assert_eq!(result.status(), 0);
        assert_eq!(result.lines(), ["1", "2", "3", "4", "5"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn simultaneous_limits_still_report_a_timeout() -> TestResult {
    with_timeout(async {
        let spec = sh("exec sleep 30")
            .failing_after(Duration::from_millis(500))
            .tolerating_inactivity_of(Duration::from_millis(400));
        let result = run(spec).await?;

        assert!(result.timed_out());
        assert_eq!(result.status(), TIMED_OUT_STATUS);
        assert!(result.lines().is_empty());
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn runs_in_the_requested_working_directory() -> TestResult {
    with_timeout(async {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("marker.txt"), "")?;

        let result = run(ProcessSpec::new(["ls"]).in_dir(dir.path())).await?;

        assert_eq!(result.status(), 0);
        assert_eq!(result.lines(), ["marker.txt"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn missing_executable_is_a_startup_failure() -> TestResult {
    with_timeout(async {
        let err = run(ProcessSpec::new(["/nonexistent/steamdeploy-missing-binary"]))
            .await
            .expect_err("spawn must fail");

        match err {
            DeployError::Spawn { program, .. } => {
                assert_eq!(program, "/nonexistent/steamdeploy-missing-binary")
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn empty_command_is_rejected() -> TestResult {
    with_timeout(async {
        let result = run(ProcessSpec::new(Vec::<String>::new())).await;

        assert!(matches!(result, Err(DeployError::Spawn { .. })));
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn background_descendant_does_not_hold_the_caller_after_exit() -> TestResult {
    with_timeout(async {
        let started = Instant::now();

        let spec = sh("sleep 6 & echo hi; exit 0").failing_after(Duration::from_secs(60));
        let result = run(spec).await?;

        assert_eq!(result.status(), 0);
        assert_eq!(result.termination(), Termination::Exited);
        assert_eq!(result.lines(), ["hi"]);
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "returned after {:?}",
            started.elapsed()
        );
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn unbounded_limits_are_accepted() -> TestResult {
    with_timeout(async {
        let spec = sh("echo done")
            .failing_after(Duration::MAX)
            .tolerating_inactivity_of(Duration::MAX);
        let result = run(spec).await?;

        assert_eq!(result.status(), 0);
        assert_eq!(result.lines(), ["done"]);
        Ok::<_, Box<dyn Error>>(())
    })
    .await
}
