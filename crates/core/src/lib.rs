//! Commissions Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the sales commissions dashboard:
//! the proposal model, the derivation engine that keeps balance and commission
//! figures consistent, and the service/repository traits implemented by the
//! `storage-sqlite` crate. It is database-agnostic.

pub mod constants;
pub mod errors;
pub mod proposals;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
