//! Merges session states pushed by the other participants into the local
//! session. Updates are processed in arrival order but applied by version
//! precedence alone, so reordered delivery cannot corrupt the state: a
//! higher version always wins, anything at or below the local version is a
//! harmless duplicate.

use {
    super::{Inner, State, Status},
    crate::{
        domain::{auction::Auction, ledger::BidEvent},
        infra::{self, observe},
    },
    futures::StreamExt,
    model::SessionUpdate,
    std::sync::Arc,
};

/// Consumes the clearnode's push stream for the lifetime of the session.
pub(super) async fn run(inner: Arc<Inner>) {
    let mut updates = inner.clearnode.updates();
    while let Some(update) = updates.next().await {
        let mut state = inner.state.lock().unwrap();
        let disposition = merge(&mut state, &update, &inner.auction);
        drop(state);
        match disposition {
            Disposition::Applied => observe::remote_update(&update),
            Disposition::Stale => observe::stale_update(&update),
            Disposition::Foreign => observe::foreign_update(&update),
            Disposition::Inactive => {}
        }
    }
}

/// Where a pushed update ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Disposition {
    /// Higher version than ours: adopted wholesale.
    Applied,
    /// Version at or below ours: duplicate or reordered delivery.
    Stale,
    /// Some other session or auction.
    Foreign,
    /// No session to apply to, either unstarted or already closed.
    Inactive,
}

pub(super) fn merge(state: &mut State, update: &SessionUpdate, auction: &Auction) -> Disposition {
    if !matches!(state.status, Status::Active | Status::Ended) {
        return Disposition::Inactive;
    }
    if state.session.as_ref() != Some(&update.session_id)
        || update.session_data.auction_id != auction.id
    {
        return Disposition::Foreign;
    }
    if update.version <= state.version {
        return Disposition::Stale;
    }

    let wire = &update.session_data.state;
    state.version = update.version;
    state.current_price = wire.current_price;
    state.last_bidder = wire.last_bidder;
    state.bid_count = wire.bid_count;
    state.total_fees = wire.total_fees;
    // An accepted bid elsewhere restarts the window, even if ours had
    // already run out.
    state.countdown.reset(auction.window);
    state.status = Status::Active;
    state.ledger.record(BidEvent {
        session: update.session_id.clone(),
        version: update.version,
        price_after: wire.current_price,
        bidder: wire.last_bidder,
        timestamp: infra::time::now(),
    });
    Disposition::Applied
}
