use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ListError;

pub const DEFAULT_LIST_NAME: &str = "My Customers";
pub const DEFAULT_PAGE_SIZE: usize = 4;
pub const DATA_FILE_NAME: &str = "customers.json";

/// Settings for one list instance
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ListConfig {
    pub name: String,
    pub page_size: usize,
}

impl ListConfig {
    pub fn new(name: impl Into<String>, page_size: usize) -> Result<Self, ListError> {
        let config = Self {
            name: name.into(),
            page_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ListError> {
        if self.page_size == 0 {
            return Err(ListError::InvalidConfig(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a config stored as JSON
    pub fn from_json_file(path: &Path) -> Result<Self, ListError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ListConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        log::debug!("Loaded list config from {}", path.display());
        Ok(config)
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LIST_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Default location of the customers file in the platform data directory
pub fn default_data_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "customer-list").map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
}
