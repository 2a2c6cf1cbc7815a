//! Typed records of the fee confirmation and policy roster reports

pub mod columns;
mod data;
mod binding;

pub use data::{FeeBreakdown, FeeLine, FeeRecord, PolicyRecord};
pub use binding::{bind_fee_records, bind_policy_records};
