//! HTTP client for the KYC backend
//!
//! Implements the core crate's [`IdentityProvisioner`] and [`Submitter`]
//! seams on top of a single pooled reqwest client.
//!
//! [`IdentityProvisioner`]: kyc_probe_core::IdentityProvisioner
//! [`Submitter`]: kyc_probe_core::Submitter

pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod types;

pub use client::KycApiClient;
pub use config::ClientConfig;
pub use errors::HttpError;
