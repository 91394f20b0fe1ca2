//! Union Portal Client
//!
//! Thin JSON client for the backend's `/api/auth/*` endpoints used by the
//! registration flow: quick registration, e-mail code verification, setting
//! a password, and logging in. Calls are single-shot; there is no retry.
//!
//! Failed calls carry the message the portal would show in its error
//! banner, extracted from the response body by [`error_message_from_body`].

pub mod auth;
pub mod error;

pub use auth::*;
pub use error::*;
