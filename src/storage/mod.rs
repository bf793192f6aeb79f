//! Session persistence backends

pub mod file;
pub mod in_memory;

pub use file::FileSessionBackend;
pub use in_memory::InMemorySessionBackend;
