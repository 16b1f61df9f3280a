//! Ports: trait boundaries between the domain and its collaborators.

mod record_store;

pub use record_store::{NewPatient, RecordStore, StoreError};
