//! Expofloor API client
//!
//! Typed wrappers over the booking backend's REST endpoints. The backend
//! is an external collaborator; this crate only shapes requests and
//! decodes responses into `expofloor-core` types.

pub mod client;
pub mod error;

pub use client::{ApiClient, BookingReceipt};
pub use error::{Error, Result};
