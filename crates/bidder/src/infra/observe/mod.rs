//! This module implements the observability for the session engine. It
//! exposes functions which represent events that are meaningful to the
//! system; they are called when the corresponding events occur and log
//! them at the appropriate level.

use {
    crate::{
        domain::session::{Receipt, Skip},
        infra::clearnode,
    },
    model::{SessionId, SessionUpdate, Version},
    number::Amount,
};

/// Observe that an app session was opened and seeded with the opening bid.
pub fn session_created(session: &SessionId, version: Version, budget: Amount) {
    tracing::info!(%session, %version, %budget, "session created");
}

/// Observe that opening a session failed before any state was committed.
pub fn create_failed(err: &clearnode::Error) {
    tracing::warn!(?err, "failed to create session");
}

/// Observe a committed local bid.
pub fn bid_committed(session: &SessionId, version: Version, price: Amount) {
    tracing::info!(%session, %version, %price, "bid committed");
}

/// Observe a bid attempt that was deliberately not submitted.
pub fn bid_skipped(skip: Skip) {
    tracing::debug!(?skip, "bid skipped");
}

/// Observe an acknowledged submission that lost to a higher remote version
/// while it was in flight.
pub fn bid_superseded(session: &SessionId, submitted: Version, current: Version) {
    tracing::debug!(%session, %submitted, %current, "bid superseded by remote state");
}

/// Observe a submission the clearnode failed to acknowledge.
pub fn submission_failed(session: &SessionId, version: Version, err: &clearnode::Error) {
    tracing::warn!(%session, %version, ?err, "submission failed");
}

/// Observe an adopted remote state.
pub fn remote_update(update: &SessionUpdate) {
    tracing::info!(session = %update.session_id, version = %update.version, "remote update adopted");
}

/// Observe a pushed update that is at or below the local version.
pub fn stale_update(update: &SessionUpdate) {
    tracing::trace!(session = %update.session_id, version = %update.version, "stale update dropped");
}

/// Observe a pushed update for some other session or auction.
pub fn foreign_update(update: &SessionUpdate) {
    tracing::trace!(session = %update.session_id, "foreign update dropped");
}

/// Observe the bidding window running out.
pub fn expired(session: &SessionId) {
    tracing::info!(%session, "bidding window expired");
}

/// Observe a settled and closed session.
pub fn session_closed(session: &SessionId, receipt: &Receipt) {
    tracing::info!(%session, %receipt, "session closed");
}

/// Observe a failed close submission.
pub fn close_failed(session: &SessionId, err: &clearnode::Error) {
    tracing::warn!(%session, ?err, "failed to close session");
}

/// Observe a hard reset of the session state.
pub fn session_reset() {
    tracing::info!("session reset");
}
