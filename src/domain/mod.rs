//! Core domain types and collaborator ports

pub mod ports;

#[cfg(test)]
pub mod fake;
