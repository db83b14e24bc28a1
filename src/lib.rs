//! Staged-transaction management for the verdigris wallet engine.
//!
//! The wallet engine owns everything cryptographic: key management, script
//! construction, fee estimation, coin selection and broadcast. This library
//! manages the local draft around those calls: it persists a work-in-progress
//! transaction across command invocations, applies output and coin-selection
//! edits to it, and runs every edit through the engine's revalidation before
//! writing it back.
//!
//! The `verdigris-cli` binary in `src/main.rs` is a thin clap front-end over
//! these modules.

pub mod data_directory;
pub mod draft;
pub mod engine;
