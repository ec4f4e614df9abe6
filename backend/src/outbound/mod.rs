//! Outbound adapters implementing the domain's ports against external
//! services, plus in-memory stand-ins for development and tests.

pub mod cloudinary;
pub mod firebase;
pub mod memory;
