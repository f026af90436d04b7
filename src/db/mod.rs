pub mod memory;
pub mod mongo;
pub mod mongo_store;
pub mod records;
pub mod store;

pub use memory::MemoryTripStore;
pub use mongo_store::MongoTripStore;
pub use store::{TripStore, WriteOutcome};
