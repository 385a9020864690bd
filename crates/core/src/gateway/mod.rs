//! Tax-authority gateway client.
//!
//! The client signs the canonical payload bytes, transmits them with
//! bounded exponential-backoff retries, and verifies response signatures
//! when a verifying key is configured. With no endpoint configured it
//! routes to a deterministic local simulator under the same return
//! contract — a logged substitution, never an error mask.

pub mod client;
pub mod error;
pub mod signing;
pub mod simulator;

pub use client::{Authority, AuthorityResponse, GatewayClient};
pub use error::GatewayError;
pub use signing::{PayloadSigner, ResponseVerifier, SigningError};
pub use simulator::SimulatedAuthority;
