//! Client engine for a penny auction whose authoritative state lives in a
//! shared, versioned app session on a clearnode rather than on a chain per
//! bid. The engine keeps a ledger of committed price/fee/allocation states
//! for one bidder, reconciles its own submissions against updates pushed by
//! the other participants, and drives the session from creation through the
//! bid loop to expiry and settlement.

pub mod domain;
pub mod infra;

pub use {
    domain::session::{Bid, Error, Receipt, Session, Skip, Snapshot, Status},
    infra::{clearnode::Clearnode, config::Config},
};
