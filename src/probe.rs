//! Purpose: Emit the probe's output pattern: markers, env lines, severity ladder, heartbeats.
//! Exports: `ProbeConfig`, `ScheduleReport`, `run_probe`, per-phase emitters.
//! Role: Probe behavior used by the CLI; isolates the output contract from dispatch.
//! Invariants: Marker strings are stable once published; capture agents grep for them.
//! Invariants: The start marker precedes all other probe output; completion is the final log line.
//! Invariants: Redacted environment keys never reach any output stream.
use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use logprobe::core::error::{Error, ErrorKind};
use logprobe::core::schedule::{WaitPlan, run_wait};
use logprobe::redact::{EnvSnapshot, snapshot_environment};

#[derive(Clone, Copy, Debug)]
pub struct ProbeConfig {
    pub wait: Duration,
    pub every: Duration,
    pub tick: Duration,
    pub skip_env: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ScheduleReport {
    pub wait_ms: u64,
    pub every_ms: u64,
    pub tick_ms: u64,
    pub ticks: u64,
    pub stride: u64,
    pub heartbeats: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_beat: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_beat: Option<u64>,
}

impl ScheduleReport {
    pub fn from_plan(config: &ProbeConfig, plan: &WaitPlan) -> Self {
        Self {
            wait_ms: config.wait.as_millis() as u64,
            every_ms: config.every.as_millis() as u64,
            tick_ms: config.tick.as_millis() as u64,
            ticks: plan.ticks,
            stride: plan.stride,
            heartbeats: plan.heartbeats(),
            first_beat: plan.first_beat(),
            last_beat: plan.last_beat(),
        }
    }
}

pub fn run_probe(config: &ProbeConfig) -> Result<(), Error> {
    let plan = WaitPlan::new(config.wait, config.every, config.tick)?;
    emit_start();
    if !config.skip_env {
        emit_environment(&snapshot_environment());
    }
    emit_severity_ladder();
    emit_direct_writes()?;
    run_wait_phase(&plan);
    emit_completion();
    Ok(())
}

pub fn emit_start() {
    info!(
        "PROBE: starting log capture probe v{}",
        env!("CARGO_PKG_VERSION")
    );
}

pub fn emit_environment(snapshot: &EnvSnapshot) {
    info!(
        "PROBE: environment: {} visible, {} redacted",
        snapshot.visible.len(),
        snapshot.redacted
    );
    for (key, value) in &snapshot.visible {
        info!("ENV: {key}={value}");
    }
}

pub fn emit_severity_ladder() {
    debug!("PROBE: debug-level message");
    info!("PROBE: info-level message");
    warn!("PROBE: warning-level message");
    error!("PROBE: error-level message");
}

pub fn emit_direct_writes() -> Result<(), Error> {
    let mut stdout = io::stdout();
    writeln!(stdout, "PROBE: direct write to stdout")
        .and_then(|_| stdout.flush())
        .map_err(|err| direct_write_error("stdout", err))?;

    let mut stderr = io::stderr();
    writeln!(stderr, "PROBE: direct write to stderr")
        .and_then(|_| stderr.flush())
        .map_err(|err| direct_write_error("stderr", err))?;
    Ok(())
}

pub fn run_wait_phase(plan: &WaitPlan) {
    info!(
        "PROBE: waiting {} before exit",
        format_duration(plan.total_sleep())
    );
    run_wait(plan, std::thread::sleep, |tick_index, ticks| {
        info!("PROBE: still waiting... {tick_index}/{ticks}");
    });
}

pub fn emit_completion() {
    info!("PROBE: completed successfully");
}

fn direct_write_error(stream: &str, err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(format!("failed to write to {stream}"))
        .with_source(err)
}

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis % 1_000 != 0 {
        return format!("{millis}ms");
    }
    let seconds = millis / 1_000;
    if seconds % 3_600 == 0 {
        format!("{}h", seconds / 3_600)
    } else if seconds % 60 == 0 {
        format!("{}m", seconds / 60)
    } else {
        format!("{seconds}s")
    }
}
