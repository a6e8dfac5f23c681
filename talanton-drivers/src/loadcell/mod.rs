//! Load-cell bridge drivers

pub mod hx711;

pub use hx711::Hx711;
