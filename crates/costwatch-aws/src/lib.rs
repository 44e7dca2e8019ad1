//! AWS Cost Explorer billing provider for costwatch
//!
//! This crate implements the `BillingApi` trait on top of the AWS SDK and
//! reads the credentials it needs from the environment.

pub mod client;
pub mod config;

#[cfg(test)]
pub mod test_utils;

pub use client::CostExplorerBilling;
pub use config::AwsConfig;
