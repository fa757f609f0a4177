// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod limiter;
pub mod pin_service;
pub mod storage;

pub use limiter::*;
pub use pin_service::*;
pub use storage::*;
