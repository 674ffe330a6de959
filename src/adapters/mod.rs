// Adapters layer: concrete implementations of the domain ports.

pub mod comparables;
pub mod credits;
pub mod storage;

pub use comparables::FileComparableSource;
pub use credits::{FileCreditLedger, InMemoryCreditLedger};
pub use storage::LocalStorage;
