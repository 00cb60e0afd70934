#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Document verification for VaultIQ
//!
//! A [`Verifier`] parses submission metadata, then consults three
//! collaborators strictly in sequence: OCR extraction, forgery detection and
//! market validation. The forgery and market scores are averaged and the
//! result is approved only when it strictly exceeds the approval threshold.
//! The first failure aborts the run.

pub mod collaborator;
pub mod command;
pub mod scoring;
mod verifier;

pub use collaborator::{ForgeryDetector, MarketValidator, TextExtractor};
pub use command::CommandCollaborator;
pub use scoring::{aggregate, classify};
pub use verifier::{Verifier, VerifierBuilder};
