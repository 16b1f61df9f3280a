//! Adapters: concrete implementations of the ports plus the demo front end.

pub mod console;
pub mod flatfile;
pub mod memory;
pub mod postgres;
