//! Domain layer: ledgers over balances and allowances, token metadata and
//! the transfer engine.

pub mod accounts;
pub mod allowances;
pub mod amount;
pub mod engine;
pub mod metadata;

pub use accounts::{balance_key, get_balance, set_balance, BALANCE_PREFIX};
pub use allowances::{allowance_key, get_allowance, set_allowance, ALLOWANCE_PREFIX};
pub use amount::{parse_amount, Amount};
