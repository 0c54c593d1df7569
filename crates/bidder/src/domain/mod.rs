pub mod allocation;
pub mod auction;
pub mod countdown;
pub mod ledger;
pub mod session;

pub use {
    auction::Auction,
    countdown::Countdown,
    ledger::{BidEvent, Ledger},
    session::Session,
};
