//! Wire ↔ domain translation.
//!
//! The remote settings service speaks snake_case JSON (the DTOs in the
//! `shared` crate); the domain layer keeps its own models. Every field
//! crosses explicitly, so a wire rename shows up here and nowhere else.

pub mod appearance_mapper;
pub mod parental_mapper;

pub use appearance_mapper::AppearanceMapper;
pub use parental_mapper::ParentalMapper;
