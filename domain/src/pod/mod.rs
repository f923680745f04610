//! Pod aggregate: conversation sessions, turn records, and alert derivation

pub mod alert;
pub mod entities;
