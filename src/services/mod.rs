// Service exports
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;

pub use matching::{MatchError, MatchService};
pub use memory::InMemoryStore;
pub use postgres::PostgresClient;
pub use store::{BundleStore, CatalogStore, StoreError};
