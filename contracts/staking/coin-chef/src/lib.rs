#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod accrual;
pub mod contract;
pub mod emission;
mod error;
pub mod ledger;
pub mod math;
pub mod msg;
mod registry;
pub mod state;


pub use crate::error::ContractError;
