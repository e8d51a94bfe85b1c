// Adapters layer: concrete implementations of the domain ports.

pub mod offer_store;
pub mod storage;

pub use offer_store::{FileOfferStore, InMemoryOfferStore};
pub use storage::LocalStorage;
