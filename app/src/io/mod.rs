//! # IO Module
//!
//! Everything that leaves the device: the remote settings endpoints
//! (consumed, never implemented, by this app) and the third-party ARASAAC
//! pictogram search. Wire DTOs come from the `shared` crate; `mappers`
//! translates them to and from domain models field by field.

pub mod mappers;
pub mod pictograms;
pub mod settings_api;

pub use pictograms::PictogramClient;
pub use settings_api::{AppearanceApi, HttpSettingsApi, ParentalApi};
