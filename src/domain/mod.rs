//! Domain models for the simulated exchange.

mod funds;
mod market;
mod order;
mod orderbook;
mod user;

pub use funds::{
    Deposit, NetworkFee, Transaction, TransactionKind, TransferStatus, Withdrawal,
    WithdrawalPreview,
};
pub use market::{split_pair, PairTicker, TapeTrade};
pub use order::{Order, OrderSide, OrderStatus, OrderType};
pub use orderbook::{Orderbook, PriceLevel};
pub use user::UserProfile;
