//! Interfaces layer, external entry points.
//!
//! `spec.md` §1 treats the command-line driver, logging configuration
//! and human-readable formatting as external collaborators; this is
//! where the crate supplies them. No matching logic lives here.

pub mod cli;
