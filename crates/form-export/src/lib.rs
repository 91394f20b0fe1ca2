//! Union Portal Form Export
//!
//! Produces a filled membership application PDF from a member record by
//! overlaying text onto a fixed-layout template image.
//!
//! # Pipeline
//!
//! ```text
//! member.json ──► MemberRecord ──► collect_entries ──┐
//!                                                    │
//! template URL ──► TemplateProvider ──┐              │
//!                    (fallback SVG)   ├──► compose ──┴──► FormPlan
//!                                     │    (fit, place, wrap)   │
//!                                     ▼                         ▼
//!                               TemplateImage ──────────► write_pdf
//!                                                               │
//!                                                               ▼
//!                                        <slug>-membership-<date>.pdf
//! ```
//!
//! Field positions live in [`layout`] as fractions of an 816×1184 design
//! canvas, so the template can be rendered at any size.

pub mod compositor;
pub mod export;
pub mod fields;
pub mod layout;
pub mod pdf;
pub mod template;
pub mod text;

pub use export::*;
