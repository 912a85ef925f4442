//! Purpose: `logprobe` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits results.
//! Invariants: Log diagnostics go to stderr; stdout carries data and direct-write markers.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod probe;

use logprobe::core::error::{Error, ErrorKind, to_exit_code};
use logprobe::core::schedule::WaitPlan;
use logprobe::notice::{Notice, notice_json};
use logprobe::redact::{EnvSnapshot, snapshot_environment};
use probe::{ProbeConfig, ScheduleReport};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(message)
                    .with_hint(hint));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command)
}

#[derive(Parser)]
#[command(
    name = "logprobe",
    version,
    about = "Log-capture probe for containerized jobs",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Emits a known pattern of log lines, environment dumps, and heartbeats so a
log-collection agent can be verified end to end.

Mental model:
  - `run` performs the full probe sequence (env, levels, direct writes, wait)
  - `levels`, `env`, and `wait` exercise one phase at a time
  - `check` previews the heartbeat schedule without sleeping
"#,
    after_help = r#"EXAMPLES
  $ logprobe run                          # full sequence: 20s wait, beat every 5s
  $ logprobe run --wait 6s --every 2s     # shorter idle for local checks
  $ RUST_LOG=debug logprobe levels        # reveal the debug rung of the ladder
  $ logprobe env --json | jq '.env.redacted_count'

LEARN MORE
  Log lines go to stderr; stdout carries data and direct-write markers.
  Environment keys containing password, token, secret, or key are never echoed.

  $ logprobe <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Run the full probe sequence",
        long_about = r#"Run the full probe sequence: start marker, environment dump, severity
ladder, mirrored direct writes, heartbeat wait, completion marker.

Exit code 0 means every phase completed and a capture agent should have
seen the whole pattern."#,
        after_help = r#"EXAMPLES
  $ logprobe run
  $ logprobe run --wait 60s --every 10s
  $ logprobe run --wait 2s --every 500ms --tick 100ms   # fast cadence
  $ logprobe run --skip-env                             # omit the env dump

NOTES
  - Heartbeats land on tick 0 and every --every thereafter
  - A trailing partial tick is dropped (--wait 2500ms --tick 1s waits 2s)
  - Environment keys containing password, token, secret, or key are never echoed"#
    )]
    Run {
        #[arg(
            long,
            default_value = "20s",
            help = "Total idle time after emission (e.g. 500ms, 20s, 1m)"
        )]
        wait: String,
        #[arg(long, default_value = "5s", help = "Heartbeat interval during the wait")]
        every: String,
        #[arg(long, default_value = "1s", help = "Sleep granularity of the wait loop")]
        tick: String,
        #[arg(long = "skip-env", help = "Skip the environment dump phase")]
        skip_env: bool,
    },
    #[command(
        about = "Print the filtered environment",
        long_about = r#"Print the process environment with sensitive keys removed.

Keys containing password, token, secret, or key (case-insensitive) are
omitted entirely; only a count of omissions is reported on stderr."#,
        after_help = r#"EXAMPLES
  $ logprobe env
  $ logprobe env --json | jq '.env.visible.PATH'"#
    )]
    Env {
        #[arg(long, help = "Emit JSON instead of KEY=value lines")]
        json: bool,
    },
    #[command(
        about = "Emit one log line per severity plus direct writes",
        long_about = r#"Emit the severity ladder (debug, info, warn, error) and mirrored direct
writes to stdout and stderr, then exit.

The debug rung is hidden under the default filter; set RUST_LOG=debug to
reveal it."#,
        after_help = r#"EXAMPLES
  $ logprobe levels
  $ RUST_LOG=debug logprobe levels"#
    )]
    Levels,
    #[command(
        about = "Idle with periodic heartbeats",
        long_about = r#"Sleep for the configured wait, emitting a heartbeat log line on tick 0
and every interval thereafter, then log completion."#,
        after_help = r#"EXAMPLES
  $ logprobe wait
  $ logprobe wait --wait 10s --every 2s"#
    )]
    Wait {
        #[arg(
            long,
            default_value = "20s",
            help = "Total idle time (e.g. 500ms, 20s, 1m)"
        )]
        wait: String,
        #[arg(long, default_value = "5s", help = "Heartbeat interval during the wait")]
        every: String,
        #[arg(long, default_value = "1s", help = "Sleep granularity of the wait loop")]
        tick: String,
    },
    #[command(
        about = "Validate flags and preview the heartbeat schedule",
        long_about = r#"Validate the duration flags and print the effective heartbeat schedule
without sleeping."#,
        after_help = r#"EXAMPLES
  $ logprobe check
  $ logprobe check --wait 90s --every 7s --json"#
    )]
    Check {
        #[arg(
            long,
            default_value = "20s",
            help = "Total idle time (e.g. 500ms, 20s, 1m)"
        )]
        wait: String,
        #[arg(long, default_value = "5s", help = "Heartbeat interval during the wait")]
        every: String,
        #[arg(long, default_value = "1s", help = "Sleep granularity of the wait loop")]
        tick: String,
        #[arg(long, help = "Emit JSON instead of human-readable output")]
        json: bool,
    },
    #[command(
        about = "Print version info as JSON",
        long_about = r#"Emit version info as JSON (stable, machine-readable)."#,
        after_help = r#"EXAMPLES
  $ logprobe version"#
    )]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout.
Redirect it to the location your shell sources completions from
to enable tab completion."#,
        after_help = r#"EXAMPLES
  $ logprobe completion bash > ~/.local/share/bash-completion/completions/logprobe
  $ source ~/.bashrc
  $ logprobe completion zsh > ~/.zfunc/_logprobe
  $ autoload -U compinit && compinit
  $ logprobe completion fish > ~/.config/fish/completions/logprobe.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr)
        .try_init();
}

fn probe_config(wait: &str, every: &str, tick: &str, skip_env: bool) -> Result<ProbeConfig, Error> {
    Ok(ProbeConfig {
        wait: parse_flag_duration("--wait", wait)?,
        every: parse_flag_duration("--every", every)?,
        tick: parse_flag_duration("--tick", tick)?,
        skip_env,
    })
}

fn parse_flag_duration(flag: &str, input: &str) -> Result<Duration, Error> {
    parse_duration(input).map_err(|err| err.with_flag(flag))
}

fn parse_duration(input: &str) -> Result<Duration, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("invalid duration")
            .with_hint("Use a number plus ms|s|m|h (e.g. 10s)."));
    }
    let split = trimmed.char_indices().find(|(_, ch)| !ch.is_ascii_digit());
    let (num_str, unit) = match split {
        Some((idx, _)) => trimmed.split_at(idx),
        None => ("", ""),
    };
    if num_str.is_empty() || unit.is_empty() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("invalid duration")
            .with_hint("Use a number plus ms|s|m|h (e.g. 10s)."));
    }
    let value: u64 = num_str.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid duration")
            .with_hint("Use a number plus ms|s|m|h (e.g. 10s).")
    })?;
    let millis = match unit {
        "ms" => value,
        "s" => value.saturating_mul(1_000),
        "m" => value.saturating_mul(60_000),
        "h" => value.saturating_mul(3_600_000),
        _ => {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("invalid duration")
                .with_hint("Use a number plus ms|s|m|h (e.g. 10s)."));
        }
    };
    Ok(Duration::from_millis(millis))
}

fn env_report_json(snapshot: &EnvSnapshot) -> Value {
    let mut visible = Map::new();
    for (key, value) in &snapshot.visible {
        visible.insert(key.clone(), json!(value));
    }
    json!({
        "env": {
            "visible": visible,
            "redacted_count": snapshot.redacted,
        }
    })
}

fn check_report_lines(report: &ScheduleReport) -> Vec<String> {
    let mut lines = vec![
        "Configuration valid.".to_string(),
        String::new(),
        format!(
            "  Wait:       {} ({} ticks x {})",
            probe::format_duration(Duration::from_millis(report.wait_ms)),
            report.ticks,
            probe::format_duration(Duration::from_millis(report.tick_ms)),
        ),
        format!(
            "  Heartbeats: {} (every {}, stride {} ticks)",
            report.heartbeats,
            probe::format_duration(Duration::from_millis(report.every_ms)),
            report.stride,
        ),
    ];
    match (report.first_beat, report.last_beat) {
        (Some(first), Some(last)) => {
            lines.push(format!("  Beats:      tick {first} through tick {last}"));
        }
        _ => {
            lines.push("  Beats:      none (wait is shorter than one tick)".to_string());
        }
    }
    lines
}

fn emit_check_report(report: &ScheduleReport, json: bool) {
    if !json {
        for line in check_report_lines(report) {
            println!("{line}");
        }
        return;
    }

    let mut inner = Map::new();
    inner.insert("status".to_string(), json!("valid"));
    if let Some(time) = notice_time_now() {
        inner.insert("time".to_string(), json!(time));
    }
    inner.insert(
        "schedule".to_string(),
        serde_json::to_value(report).unwrap_or_else(|_| json!({})),
    );
    let mut outer = Map::new();
    outer.insert("check".to_string(), Value::Object(inner));
    emit_json(Value::Object(outer));
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("logprobe {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(json!({
            "name": "logprobe",
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn notice_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
}

fn emit_notice(notice: &Notice) {
    if io::stderr().is_terminal() {
        eprintln!("notice: {}", notice.message);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(flag) = err.flag() {
        inner.insert("flag".to_string(), json!(flag));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = Vec::new();
    lines.push(format!("error: {}", error_message(err)));

    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(flag) = err.flag() {
        lines.push(format!("flag: {flag}"));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!("caused by: {cause}"));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `logprobe --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "logprobe") else {
        return "Try `logprobe --help`.".to_string();
    };

    let mut parts = Vec::new();
    for token in tokens.iter().skip(pos + 1) {
        if token.starts_with('-') || token.starts_with('<') || token.starts_with('[') {
            break;
        }
        parts.push(*token);
    }

    if parts.is_empty() {
        return "Try `logprobe --help`.".to_string();
    }

    format!("Try `logprobe {} --help`.", parts.join(" "))
}
