//! Use cases orchestrating the exchange protocol

pub mod broadcast;
pub mod export_dataset;
pub mod run_exchange;
