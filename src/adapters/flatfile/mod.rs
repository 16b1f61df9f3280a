//! Flat-file (JSON lines) record store adapter.

mod record_store;

pub use record_store::FlatFileRecordStore;
