//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in talanton-core:
//!
//! - HX711 24-bit load-cell bridge (bit-banged serial interface)

#![no_std]
#![deny(unsafe_code)]

pub mod loadcell;
