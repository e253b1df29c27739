//! Domain models: the in-memory shapes of everything this layer persists
//! or syncs. Wire DTOs live in the `shared` crate; translation between the
//! two happens in `io::mappers`.

pub mod display_settings;
pub mod parental_settings;
pub mod symbol;

pub use display_settings::{
    ContrastMode, DisplaySettings, DisplaySettingsPatch, GridLayout, TextSize,
};
pub use parental_settings::{
    AsdLevel, EmailValidationError, ParentalSettings, ParentalSettingsPatch, Weekday,
};
pub use symbol::{CategoryItem, CategoryValidationError, SymbolItem, SymbolValidationError};
