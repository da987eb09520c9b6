//! Settings module - store location and scratch configuration.

mod settings_model;

pub use settings_model::StoreSettings;
