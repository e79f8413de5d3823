//! Storage backends for the three persisted slots.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{Slot, SlotStore, load_slot, save_slot};
