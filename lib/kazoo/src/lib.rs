pub mod couch;
pub mod error;
pub mod memory;
pub mod model;
pub mod traits;

pub use couch::CouchStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use model::{AccountRecord, DeviceRecord};
pub use traits::{AccountStore, DeviceStore};
