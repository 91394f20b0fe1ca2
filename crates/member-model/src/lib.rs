//! Union Portal Member Model
//!
//! Defines the data contracts shared by export and validation:
//! - **Member:** The flat profile record submitted by the portal
//! - **Status:** One canonical membership status in place of the
//!   boolean/number/string variants the portal pages used
//! - **Text:** Whitespace normalization and filename slugs
//! - **Age:** Birth date parsing and age on a given day
//!
//! Nothing here fails on malformed field values: bad input normalizes to
//! empty and is skipped downstream.

pub mod age;
pub mod member;
pub mod status;
pub mod text;

pub use age::*;
pub use member::*;
pub use status::*;
pub use text::*;
