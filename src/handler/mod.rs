//! Command orchestration: fetch, cache check, generate, reply, clean up.

/// The command handlers.
pub mod bot;
/// Best-effort temp file removal.
pub mod cleanup;
/// Collaborator interfaces for the chat platform.
pub mod platform;
/// Reaction-threshold reply ledger.
pub mod reactions;
