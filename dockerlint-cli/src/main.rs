#![deny(missing_docs)]
//! dockerlint command-line interface.
//!
//! Lints Dockerfiles with hadolint and prints one JSON report on stdout.
//! Everything meant for humans goes to stderr.

mod args;

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use dockerlint_core::{
    Clock, LintEnvironment, LintExecutor, LintReport, ParseOutcome, RunnerId, Threshold,
    write_report,
};
#[cfg(not(test))]
use dockerlint_core::{CommandProbe, RunnerConfig, StdFileSystem, StdProcessLauncher, SystemClock};
use log::error;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let outcome = args::parse_args(
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned()),
    );

    let config = RunnerConfig::from_env();
    let fs = StdFileSystem::new();
    let env = LintEnvironment {
        fs: &fs,
        probe: &CommandProbe,
        launcher: &StdProcessLauncher,
        clock: &SystemClock,
        config: &config,
    };

    let mut stderr = std::io::stderr();
    let report = run_guarded(env, outcome, &mut stderr);
    let code = match emit_report(&report, &mut std::io::stdout()) {
        Ok(()) => report.exit_code,
        Err(err) => {
            let _ = writeln!(stderr, "error: could not write report: {err}");
            1
        }
    };
    std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
fn main() {}

/// Run the executor, turning a panic anywhere below into a failed report.
fn run_guarded(
    env: LintEnvironment<'_>,
    outcome: ParseOutcome,
    diag: &mut dyn Write,
) -> LintReport {
    let started = env.clock.now_epoch_ms();
    let (threshold, strict) = match &outcome {
        ParseOutcome::Parsed(options) => (options.threshold(), options.strict()),
        _ => (Threshold::default(), false),
    };
    let result =
        panic::catch_unwind(AssertUnwindSafe(|| LintExecutor::new(env).run(outcome, &mut *diag)));
    match result {
        Ok(report) => report,
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            error!("lint run panicked: {detail}");
            let _ = writeln!(diag, "error: internal failure: {detail}");
            aborted_report(threshold, strict, started, env.clock)
        }
    }
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn aborted_report(
    threshold: Threshold,
    strict: bool,
    started: i64,
    clock: &dyn Clock,
) -> LintReport {
    LintReport {
        exit_code: 1,
        threshold,
        strict,
        targets: Vec::new(),
        missing: Vec::new(),
        failed: Vec::new(),
        runner: RunnerId::Unknown,
        started_at_epoch_ms: started,
        finished_at_epoch_ms: clock.now_epoch_ms().max(started),
    }
}

fn emit_report(report: &LintReport, out: &mut dyn Write) -> CliResult<()> {
    write_report(out, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{emit_report, run_guarded};
    use dockerlint_core::{
        Clock, CommandSpec, FileSystem, LintEnvironment, Options, ParseOutcome,
        ProcessLauncher, RunnerConfig, RunnerId, Threshold, ToolProbe,
    };
    use std::cell::Cell;
    use std::path::{Path, PathBuf};

    struct FakeFs {
        existing: Vec<PathBuf>,
    }

    impl FileSystem for FakeFs {
        fn is_file(&self, path: &Path) -> bool {
            self.existing.iter().any(|existing| existing == path)
        }

        fn current_dir(&self) -> dockerlint_core::Result<PathBuf> {
            Ok(PathBuf::from("/work"))
        }
    }

    struct FakeProbe {
        binary: bool,
    }

    impl ToolProbe for FakeProbe {
        fn is_available(&self, program: &str) -> bool {
            program == "hadolint" && self.binary
        }
    }

    struct PanickingProbe;

    impl ToolProbe for PanickingProbe {
        fn is_available(&self, _program: &str) -> bool {
            panic!("probe exploded");
        }
    }

    struct FakeLauncher {
        failing: Vec<String>,
        calls: Cell<usize>,
    }

    impl ProcessLauncher for FakeLauncher {
        fn run(&self, spec: &CommandSpec) -> dockerlint_core::Result<i32> {
            self.calls.set(self.calls.get() + 1);
            let target = spec.args.last().cloned().unwrap_or_default();
            Ok(if self.failing.contains(&target) { 1 } else { 0 })
        }
    }

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_epoch_ms(&self) -> i64 {
            self.0
        }
    }

    fn parsed(targets: &[&str]) -> ParseOutcome {
        ParseOutcome::Parsed(Options::new(
            targets.iter().map(|t| t.to_string()).collect(),
            Threshold::Warning,
            false,
        ))
    }

    #[test]
    fn guarded_run_passes_reports_through() {
        let fs = FakeFs {
            existing: vec![PathBuf::from("/work/A"), PathBuf::from("/work/B")],
        };
        let launcher = FakeLauncher {
            failing: vec!["/work/A".to_string()],
            calls: Cell::new(0),
        };
        let config = RunnerConfig::default();
        let env = LintEnvironment {
            fs: &fs,
            probe: &FakeProbe { binary: true },
            launcher: &launcher,
            clock: &FixedClock(42),
            config: &config,
        };

        let mut diag = Vec::new();
        let report = run_guarded(env, parsed(&["A", "B"]), &mut diag);

        assert_eq!(report.exit_code, 1);
        assert_eq!(report.failed, ["/work/A"]);
        assert_eq!(report.targets, ["/work/A", "/work/B"]);
        assert_eq!(launcher.calls.get(), 2);
    }

    #[test]
    fn panics_become_failed_reports() {
        let fs = FakeFs {
            existing: vec![PathBuf::from("/work/Dockerfile")],
        };
        let launcher = FakeLauncher {
            failing: Vec::new(),
            calls: Cell::new(0),
        };
        let config = RunnerConfig::default();
        let env = LintEnvironment {
            fs: &fs,
            probe: &PanickingProbe,
            launcher: &launcher,
            clock: &FixedClock(7),
            config: &config,
        };

        let mut diag = Vec::new();
        let outcome = ParseOutcome::Parsed(Options::new(
            vec!["Dockerfile".to_string()],
            Threshold::Error,
            true,
        ));
        let report = run_guarded(env, outcome, &mut diag);
        let diag = String::from_utf8(diag).expect("utf8");

        assert_eq!(report.exit_code, 1);
        assert_eq!(report.runner, RunnerId::Unknown);
        assert_eq!(report.threshold, Threshold::Error);
        assert!(report.strict);
        assert_eq!(report.started_at_epoch_ms, 7);
        assert!(diag.contains("probe exploded"));
    }

    #[test]
    fn emitted_report_is_single_json_object() {
        let fs = FakeFs {
            existing: Vec::new(),
        };
        let launcher = FakeLauncher {
            failing: Vec::new(),
            calls: Cell::new(0),
        };
        let config = RunnerConfig::default();
        let env = LintEnvironment {
            fs: &fs,
            probe: &FakeProbe { binary: false },
            launcher: &launcher,
            clock: &FixedClock(1),
            config: &config,
        };

        let mut diag = Vec::new();
        let report = run_guarded(
            env,
            ParseOutcome::HelpRequested {
                usage: "Usage: dockerlint".to_string(),
            },
            &mut diag,
        );
        let mut out = Vec::new();
        emit_report(&report, &mut out).expect("emit");

        let stdout = String::from_utf8(out).expect("utf8");
        let value: serde_json::Value = serde_json::from_str(&stdout).expect("one json object");
        assert_eq!(value["exitCode"], 0);
        assert_eq!(value["runner"], "unknown");
        assert!(!stdout.contains("Usage"));
        assert!(String::from_utf8(diag).expect("utf8").contains("Usage"));
    }
}
