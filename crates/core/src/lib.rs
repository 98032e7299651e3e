//! Core business logic for savora.

pub mod services;

pub use services::*;
