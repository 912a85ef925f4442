//! Purpose: Shared core library crate used by the `logprobe` CLI and tests.
//! Exports: `core` (wait scheduling, errors), `notice`, `redact`.
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core modules take explicit inputs; only `redact` reads the process environment.
pub mod core;
pub mod notice;
pub mod redact;
