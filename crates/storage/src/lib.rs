pub mod conformance;
mod error;
mod memory;
mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use traits::ResourceStore;
