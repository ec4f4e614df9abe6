//! Ports through which the domain reaches persistence, authentication and
//! media storage. Adapters implementing these traits live in
//! `crate::outbound`; tests substitute mockall doubles.

pub mod auth_provider;
pub mod counter_store;
pub mod dog_store;
pub mod image_store;
pub mod medical_store;
pub mod store;
pub mod user_store;
