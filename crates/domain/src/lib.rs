//! Domain layer for the location services client
//!
//! Contains the value objects and errors shared by the service clients and
//! the command-line front end. This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
