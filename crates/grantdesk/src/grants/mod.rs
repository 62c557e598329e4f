pub mod domain;
pub mod filter;
pub mod import;
pub mod service;
pub mod store;
pub mod template;

pub use domain::{
    CallStatus, Currency, Grant, GrantDraft, GrantId, GrantType, InvalidEnumValue, Order,
    RequirementStatus, UsmStatus,
};
pub use filter::{filter_grants, GrantFilter};
pub use import::{CsvImport, ImportError, ImportOutcome, RowError, CSV_HEADERS};
pub use service::{GrantService, ServiceError};
pub use store::{GrantStore, InMemoryStore, JsonFileStore, StoreError};
pub use template::{template_csv, write_template};
