pub mod business;
pub mod config;
pub mod error;
pub mod format;
pub mod handle;
pub mod loader;
pub mod pagination;
pub mod render;
pub mod source;

pub use business::{Business, CustomerInfo};
pub use config::{ListConfig, default_data_path};
pub use error::ListError;
pub use handle::{ListCommand, ListHandle};
pub use loader::{AsyncLoader, SourceLoader};
pub use pagination::{ListState, PaginatedList};
pub use render::{BusinessEntry, BusinessRenderer, ItemRenderer, Keyed, ListEntry};
pub use source::{HttpSource, JsonFileSource, RecordSource, StaticSource, parse_records};
pub use time::Month;

/// Customer list as shown by the front ends
pub type CustomerList = PaginatedList<Business, BusinessRenderer>;

/// Build an empty customer list from a config
pub fn customer_list(config: &ListConfig) -> Result<CustomerList, ListError> {
    config.validate()?;
    PaginatedList::new(config.page_size, None, BusinessRenderer)
}
