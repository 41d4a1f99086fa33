//! FixtureKit Test Data
//!
//! Generates synthetic users, products, orders and API request fixtures for
//! browser E2E suites, keeps track of everything generated, and tears it
//! down again in a single cleanup cycle.
//!
//! # Lifecycle
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ TestDataManager                                              │
//! │   generate_user / _product / _order / _api_data              │
//! │     └── append to registry (type label -> [entity])          │
//! │   save_test_data(category, name, value)                      │
//! │     └── encrypt sensitive fields -> DataStore::write         │
//! │   cleanup(strategy)                                          │
//! │     ├── database backend   (strategy database | all)         │
//! │     ├── api backend        (strategy api | all)              │
//! │     ├── persisted fixtures (strategy file | all)             │
//! │     ├── hooks, registration order, failures isolated         │
//! │     └── registry cleared                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod cleanup;
pub mod entities;
pub mod error;
pub mod faker;
pub mod manager;
pub mod store;

pub use cleanup::{CleanupBackend, CleanupReport, HookError, LoggingBackend};
pub use entities::{
    ApiData, ApiDataOptions, GeneratedEntity, Order, OrderOptions, Product, ProductOptions, User,
    UserOptions,
};
pub use error::{DataError, DataResult};
pub use manager::{DataStatistics, TestDataManager};
pub use store::{DataStore, FileStore};
