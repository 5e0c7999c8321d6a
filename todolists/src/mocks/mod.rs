//! Mock implementations for tests and demos

mod transport;

pub use transport::{InMemoryTransport, Operation};
