//! Purpose: Hold top-level CLI command dispatch for `logprobe`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Dispatch sequences calls only; output formatting stays in `main.rs` helpers.
//! Invariants: Every arm returns `RunOutcome` or `Error`; nothing exits the process directly.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Run {
            wait,
            every,
            tick,
            skip_env,
        } => {
            let config = probe_config(&wait, &every, &tick, skip_env)?;
            init_tracing();
            probe::run_probe(&config)?;
            Ok(RunOutcome::ok())
        }
        Command::Env { json } => {
            let snapshot = snapshot_environment();
            if json {
                emit_json(env_report_json(&snapshot));
            } else {
                for (key, value) in &snapshot.visible {
                    println!("{key}={value}");
                }
            }
            if snapshot.redacted > 0 {
                let notice = Notice::new(
                    "redacted",
                    "env",
                    format!("redacted {} entries", snapshot.redacted),
                )
                .with_time(notice_time_now().unwrap_or_default())
                .with_detail("count", json!(snapshot.redacted));
                emit_notice(&notice);
            }
            Ok(RunOutcome::ok())
        }
        Command::Levels => {
            init_tracing();
            probe::emit_severity_ladder();
            probe::emit_direct_writes()?;
            Ok(RunOutcome::ok())
        }
        Command::Wait { wait, every, tick } => {
            let config = probe_config(&wait, &every, &tick, false)?;
            let plan = WaitPlan::new(config.wait, config.every, config.tick)?;
            init_tracing();
            probe::run_wait_phase(&plan);
            probe::emit_completion();
            Ok(RunOutcome::ok())
        }
        Command::Check {
            wait,
            every,
            tick,
            json,
        } => {
            let config = probe_config(&wait, &every, &tick, false)?;
            let plan = WaitPlan::new(config.wait, config.every, config.tick)?;
            let report = ScheduleReport::from_plan(&config, &plan);
            emit_check_report(&report, json);
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "logprobe", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}
