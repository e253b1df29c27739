//! Domain-level command and query types.
//! These structs are consumed by the services in this layer and are **not**
//! part of the public wire surface; the `shared` crate holds the DTOs that
//! travel to the remote service, and `io::mappers` translates.

pub mod symbols {
    /// Input from the add-symbol form.
    #[derive(Debug, Clone)]
    pub struct AddSymbolCommand {
        pub name: String,
        pub image_uri: Option<String>,
        pub category_id: Option<String>,
    }

    /// Input from the edit-symbol form. `None` leaves a field untouched;
    /// `category_id` is `Option<Option<..>>` because "move to
    /// uncategorized" is a real edit.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateSymbolCommand {
        pub name: Option<String>,
        pub image_uri: Option<Option<String>>,
        pub category_id: Option<Option<String>>,
    }

    /// One rendered section of the symbol grid.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SymbolSection {
        /// `None` for the "Uncategorized" group
        pub category_id: Option<String>,
        pub label: String,
        pub symbols: Vec<crate::domain::models::SymbolItem>,
    }
}

pub mod parental {
    /// Input from the set-passcode form.
    #[derive(Debug, Clone)]
    pub struct SetPasscodeCommand {
        pub passcode: String,
        pub confirmation: String,
    }
}
