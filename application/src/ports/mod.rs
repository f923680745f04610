//! Ports (interfaces) for external collaborators

pub mod agent_gateway;
