//! AT command protocol engine and module drivers for UART-attached wireless
//! connectivity modules (cellular, Wi-Fi).
//!
//! The [`at`] module is the shared engine: line ingress fed from the UART
//! receive interrupt, command formatting, typed argument parsing, nested
//! unsolicited-event dispatch and a blocking confirmation waiter. Module
//! drivers ([`adrastea`], [`calypso`]) put a dialect and typed wrappers on
//! top of it.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod at;
pub mod base64;
mod config;
mod error;
mod helpers;

#[cfg(feature = "adrastea")]
pub mod adrastea;
#[cfg(feature = "calypso")]
pub mod calypso;

pub use config::{ModuleConfig, NoPin};
pub use error::Error;
pub use helpers::LossyStr;
