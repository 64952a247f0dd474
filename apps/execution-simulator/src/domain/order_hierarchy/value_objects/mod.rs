//! Value objects for the order hierarchy domain.

mod fill;
mod fill_ledger;
mod instruction;
mod order_level;
mod order_side;
mod order_status;
mod reasons;
mod urgency;

pub use fill::Fill;
pub use fill_ledger::FillLedger;
pub use instruction::Instruction;
pub use order_level::OrderLevel;
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
pub use reasons::{CancelReason, RejectReason};
pub use urgency::Urgency;
