//! Wire model shared between the auction engine and the clearnode
//! transport.

pub mod allocation;
pub mod session;

pub use {
    allocation::{Allocation, Asset, Intent},
    primitive_types::H160,
    session::{AuctionId, AuctionState, Participants, SessionData, SessionId, SessionUpdate, Version},
};

/// An account address within the session, as used on the wire.
pub type Address = primitive_types::H160;
