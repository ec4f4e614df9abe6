//! Core domain model for the pet-care tracker.
//!
//! Owners register accounts, manage the dogs they care for, keep per-dog
//! daily schedules, and log medical history with due-date reminders.
//! Persistence and authentication are reached through the traits in
//! [`ports`]; concrete adapters live in `crate::outbound`.

pub mod accounts;
pub mod dog;
pub mod error;
pub mod ids;
pub mod medical;
pub mod medical_service;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod schedule;
pub mod uploads;
pub mod user;
pub mod users_service;

pub mod dogs_service;

pub use error::{Error, ErrorCode};
