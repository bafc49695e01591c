//! Apartment listing extraction for ss.lv-style classified pages.
//!
//! A listing document goes through the field extractors, is assembled into a
//! candidate, and is either accepted as an [`ApartmentRecord`] or dropped with a
//! [`RejectionReason`] by the validation pipeline.

pub mod assembler;
pub mod candidate;
pub mod config;
pub mod derived;
pub mod document;
pub mod export;
pub mod extract;
pub mod models;
pub mod observer;
pub mod pipeline;
pub mod scrapers;
pub mod summary;

pub use assembler::RecordAssembler;
pub use config::ScoutConfig;
pub use document::{HtmlListing, ListingDocument};
pub use models::{ApartmentRecord, RejectionReason};
