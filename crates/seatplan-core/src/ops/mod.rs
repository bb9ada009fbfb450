pub mod guest_ops;
pub mod store;
pub mod table_ops;

pub use store::MemoryStore;
