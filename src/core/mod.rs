pub mod clustering;
pub mod engine;
pub mod estimator;
pub mod narrative;
pub mod selection;
pub mod statistics;

pub use crate::domain::model::{ComparableObservation, Estimate, TargetParcel};
pub use crate::domain::ports::{ComparableSource, CreditLedger, Storage};
pub use crate::utils::error::Result;
