//! PostgreSQL record store adapter.

mod record_store;

pub use record_store::PostgresRecordStore;
