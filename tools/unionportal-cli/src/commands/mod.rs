pub mod auth;
pub mod check_template;
pub mod export;
pub mod fields;
pub mod validate;
