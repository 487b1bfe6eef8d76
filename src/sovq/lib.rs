//! # Sovq Architecture
//!
//! Sovq tracks country research reports through their lifecycle and the
//! uploaded source documents feeding them. Two actors share the data: a
//! producing side that registers reports and uploads raw material, and a
//! processing agent that pulls pending files, works the queue and reports
//! status back.
//!
//! Sovq is a library first. The CLI is one client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, picks exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses enum text (types, statuses) at the boundary       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Report lifecycle, upload sync, work queue                │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait, RecordStore over a StorageBackend       │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout, never exits the process
//! and never assumes a terminal. Diagnostics go through `tracing`; whoever
//! owns the process decides where they land (see [`logging`]).
//!
//! ## Derived Artifacts
//!
//! `reports.md` is a human-readable rendering of the report collection,
//! rewritten after every report write. It is output only and never read back.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Report`, `UploadedFile`, status enums)
//! - [`markdown`]: The `reports.md` renderer
//! - [`config`]: Layered configuration
//! - [`init`]: Wiring config, store and API into a context
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod store;
