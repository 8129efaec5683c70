//! Managed resources
//!
//! Each resource binds the platform tooling to the reconciler's
//! [`declarative::Resource`] trait.

mod ba_client;

pub use ba_client::BaClient;
