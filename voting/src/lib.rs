//! Omnibus vote preparation and verification.
//!
//! A vote bundles an ordered list of administrative actions into one packed
//! call script the DAO executes atomically if token holders approve it.
//! This crate supplies the typed action model, the builder that previews
//! and submits a vote, the verifier that replays it on a dev or forked
//! chain and checks every effect, and the prepared real-world votes the
//! `omnibus` binary exposes.

pub mod actions;
pub mod builder;
mod error;
pub mod verifier;
pub mod votes;

pub use actions::Action;
pub use builder::{Confirm, StdioConfirm, VoteBuilder, VoteOutcome};
pub use error::VoteError;
