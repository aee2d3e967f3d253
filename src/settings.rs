//! Settings

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    basket::DEFAULT_CAPACITY_GRAMS, history::DEFAULT_HISTORY_LIMIT, pricing::find_currency,
};

/// Errors loading or validating order settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Baskets must hold at least one gram
    #[error("Basket capacity must be greater than zero")]
    ZeroCapacity,

    /// At least one undo step must be kept
    #[error("History limit must be greater than zero")]
    ZeroHistoryLimit,

    /// The first basket always exists
    #[error("At least one initial basket is required")]
    NoInitialBaskets,

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Order settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderSettings {
    /// Grams each basket can hold
    pub capacity_grams: u32,

    /// Undo steps retained
    pub history_limit: usize,

    /// Baskets the order starts with
    pub initial_baskets: usize,

    /// ISO code of the currency prices are in
    pub currency: String,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            capacity_grams: DEFAULT_CAPACITY_GRAMS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            initial_baskets: 1,
            currency: "VND".to_string(),
        }
    }
}

impl OrderSettings {
    /// Parse settings from YAML, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the settings are invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_norway::from_str(yaml)?;

        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the settings are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Check the settings describe a usable order.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.capacity_grams == 0 {
            return Err(SettingsError::ZeroCapacity);
        }

        if self.history_limit == 0 {
            return Err(SettingsError::ZeroHistoryLimit);
        }

        if self.initial_baskets == 0 {
            return Err(SettingsError::NoInitialBaskets);
        }

        self.currency().map(|_| ())
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownCurrency`] for an unsupported code.
    pub fn currency(&self) -> Result<&'static Currency, SettingsError> {
        find_currency(&self.currency)
            .ok_or_else(|| SettingsError::UnknownCurrency(self.currency.clone()))
    }
}
