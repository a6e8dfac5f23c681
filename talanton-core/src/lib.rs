//! Board-agnostic core logic for the Talanton pedal firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Load-cell hardware abstraction trait
//! - Axis mapping and clamping
//! - Gain-setting decode policy for the persisted amplifier setting
//! - Bind sweep state machine
//! - Pedal application state

// Host unit tests need std (proptest, Vec); target builds stay no_std
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod axis;
pub mod settings;
pub mod sweep;
pub mod traits;
