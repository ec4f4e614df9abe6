//! Firebase adapters: Realtime Database persistence and Identity Toolkit
//! authentication, both over their REST APIs.

pub mod auth;
pub mod db;

pub use auth::FirebaseAuth;
pub use db::FirebaseDb;
