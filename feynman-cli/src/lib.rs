//! Support library for the `feynman` binary.
//!
//! Exposes argument parsing, command execution and logging setup so tests
//! can drive the commands without spawning a subprocess.

pub mod cli;
pub mod logging;
