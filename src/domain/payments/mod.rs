//! Payments domain - Amounts, currencies and validation shared by the facade operations.

mod errors;
mod money;

pub use errors::{require, PaymentsError};
pub use money::{Currency, MinorUnits, DEFAULT_CURRENCY};
