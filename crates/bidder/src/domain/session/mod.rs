use {
    super::{
        allocation,
        auction::Auction,
        countdown::Countdown,
        ledger::{BidEvent, Ledger},
    },
    crate::infra::{
        self,
        clearnode::{self, Clearnode, CreateRequest, Submission},
        observe,
    },
    model::{Address, AuctionId, AuctionState, Intent, Participants, SessionData, SessionId, Version},
    number::Amount,
    std::sync::{Arc, Mutex},
    thiserror::Error,
    tokio::task::JoinHandle,
};

mod reconcile;

/// Handle to one auction session, owned by whoever created it. The handle
/// owns the countdown ticker and the remote-update subscription; both are
/// torn down together when the session closes, resets or is dropped.
///
/// Local mutations (bids, the close) and remotely pushed states both funnel
/// into the same state behind a single lock. A local mutation commits only
/// once the clearnode acknowledged it; a remote state commits as soon as it
/// validates, since it already carries the signatures of the others.
pub struct Session(Arc<Inner>);

struct Inner {
    clearnode: Arc<dyn Clearnode>,
    config: infra::Config,
    auction: Auction,
    participants: Participants,
    state: Mutex<State>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Debug)]
struct State {
    status: Status,
    session: Option<SessionId>,
    version: Version,
    current_price: Amount,
    last_bidder: Option<Address>,
    bid_count: u64,
    total_fees: Amount,
    budget: Amount,
    countdown: Countdown,
    ledger: Ledger,
    /// Set while a local submission awaits its acknowledgement. At most
    /// one may be outstanding; two submissions computed off the same
    /// snapshot would collide on the next version.
    in_flight: bool,
    receipt: Option<Receipt>,
}

impl State {
    fn idle(auction: &Auction, budget: Amount) -> Self {
        Self {
            status: Status::Unstarted,
            session: None,
            version: Version::default(),
            current_price: auction.starting_price,
            last_bidder: None,
            bid_count: 0,
            total_fees: Amount::ZERO,
            budget,
            countdown: Countdown::Inactive,
            ledger: Ledger::default(),
            in_flight: false,
            receipt: None,
        }
    }
}

/// Lifecycle of an auction session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Unstarted,
    Active,
    Ended,
    Closed,
}

/// Opaque settlement token handed out when a session closes. Stable across
/// repeated close calls.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub struct Receipt(String);

impl Receipt {
    fn new(session: &SessionId, version: Version) -> Self {
        Self(format!("0x{}", hex::encode(format!("{session}:{version}"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of a bid attempt. A skip is a deliberate no-op: nothing was
/// submitted and the session state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bid {
    Placed(Version),
    Skipped(Skip),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    /// No running session to bid on.
    NotActive,
    /// The bidding window has run out; only settling remains.
    Expired,
    /// Another bid fee would push the seller allocation past the budget.
    BudgetExhausted,
    /// An earlier submission is still awaiting its acknowledgement.
    InFlight,
    /// A higher remote version landed while the submission was in flight;
    /// the acknowledged state is already obsolete.
    Superseded,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] Validation),
    #[error("clearnode request failed: {0}")]
    Transport(#[from] clearnode::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Validation {
    #[error("budget must exceed the starting price plus one bid fee")]
    BudgetTooLow,
    #[error("a participant address is missing")]
    MissingParticipant,
    #[error("the session has already been started")]
    AlreadyStarted,
}

/// Point-in-time view of the session for rendering.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub status: Status,
    pub session: Option<SessionId>,
    pub version: Version,
    pub current_price: Amount,
    pub time_left: u64,
    pub formatted_time: String,
    pub last_bidder: Option<Address>,
    pub bid_count: u64,
    pub total_fees: Amount,
    pub budget: Amount,
}

struct Seeded {
    session: SessionId,
    version: Version,
    current_price: Amount,
    total_fees: Amount,
    bid_count: u64,
}

impl Session {
    /// A fresh, unstarted session handle for one auction.
    pub fn new(
        clearnode: Arc<dyn Clearnode>,
        config: infra::Config,
        auction: AuctionId,
        participants: Participants,
    ) -> Self {
        let auction = Auction {
            id: auction,
            starting_price: config.starting_price,
            increment: config.bid_increment,
            fee: config.bid_fee,
            window: config.window_ticks(),
        };
        let state = State::idle(&auction, config.default_budget);
        Self(Arc::new(Inner {
            clearnode,
            config,
            auction,
            participants,
            state: Mutex::new(state),
            tasks: Mutex::new(Vec::new()),
        }))
    }

    /// Opens the app session and submits the opening bid. On success the
    /// session is `Active`, the countdown runs at the full window, and the
    /// engine listens for remote updates.
    pub async fn create(&self, budget: Option<Amount>) -> Result<(), Error> {
        let inner = &self.0;
        let budget = budget.unwrap_or(inner.config.default_budget);
        {
            let mut state = inner.state.lock().unwrap();
            if state.status != Status::Unstarted || state.in_flight {
                return Err(Validation::AlreadyStarted.into());
            }
            if !inner.participants.complete() {
                return Err(Validation::MissingParticipant.into());
            }
            if budget <= inner.auction.minimum_budget() {
                return Err(Validation::BudgetTooLow.into());
            }
            state.in_flight = true;
        }

        let result = self.open(budget).await;
        let mut state = inner.state.lock().unwrap();
        state.in_flight = false;
        match result {
            Ok(seeded) => {
                state.status = Status::Active;
                state.session = Some(seeded.session.clone());
                state.version = seeded.version;
                state.current_price = seeded.current_price;
                state.last_bidder = Some(inner.participants.bidder);
                state.bid_count = seeded.bid_count;
                state.total_fees = seeded.total_fees;
                state.budget = budget;
                state.countdown.reset(inner.auction.window);
                state.receipt = None;
                state.ledger.record(BidEvent {
                    session: seeded.session.clone(),
                    version: seeded.version,
                    price_after: seeded.current_price,
                    bidder: Some(inner.participants.bidder),
                    timestamp: infra::time::now(),
                });
                drop(state);
                observe::session_created(&seeded.session, seeded.version, budget);
                self.spawn_tasks();
                Ok(())
            }
            Err(err) => {
                drop(state);
                observe::create_failed(&err);
                Err(err.into())
            }
        }
    }

    /// Opens the session with the whole budget on the bidder's side, then
    /// submits the opening bid: one fee moves to the seller, the price
    /// takes its first increment.
    async fn open(&self, budget: Amount) -> Result<Seeded, clearnode::Error> {
        let inner = &self.0;
        let opening = allocation::split(
            Intent::Operate,
            &inner.participants,
            &inner.config.asset,
            budget,
            inner.auction.starting_price,
            Amount::ZERO,
        );
        let created = inner
            .clearnode
            .create_app_session(CreateRequest {
                participants: inner.participants,
                allocations: opening,
                weights: inner.config.weights,
                quorum: inner.config.quorum,
                application: inner.config.application.clone(),
            })
            .await?;

        let bid_count = 1;
        let version = created.version.next();
        let current_price = inner.auction.price_after(bid_count);
        let total_fees = inner.auction.fees_after(bid_count);
        let allocations = allocation::split(
            Intent::Operate,
            &inner.participants,
            &inner.config.asset,
            budget,
            current_price,
            total_fees,
        );
        inner
            .clearnode
            .submit_app_state(Submission {
                session: created.session.clone(),
                version,
                allocations,
                intent: Intent::Operate,
                session_data: SessionData {
                    auction_id: inner.auction.id.clone(),
                    state: AuctionState {
                        current_price,
                        time_left: inner.auction.window,
                        last_bidder: Some(inner.participants.bidder),
                        bid_count,
                        total_fees,
                    },
                },
            })
            .await?;

        Ok(Seeded {
            session: created.session,
            version,
            current_price,
            total_fees,
            bid_count,
        })
    }

    /// Attempts to raise the price by one increment. The new state is
    /// committed only once the clearnode acknowledges the submission; on
    /// failure the local state is left exactly as it was and the error
    /// surfaces to the caller.
    pub async fn place_bid(&self) -> Result<Bid, Error> {
        let inner = &self.0;
        let prepared = {
            let mut state = inner.state.lock().unwrap();
            if state.status != Status::Active {
                return Ok(Bid::Skipped(Skip::NotActive));
            }
            let Some(session) = state.session.clone() else {
                return Ok(Bid::Skipped(Skip::NotActive));
            };
            if state.countdown.is_expired() {
                observe::bid_skipped(Skip::Expired);
                return Ok(Bid::Skipped(Skip::Expired));
            }
            if state.in_flight {
                observe::bid_skipped(Skip::InFlight);
                return Ok(Bid::Skipped(Skip::InFlight));
            }
            let bid_count = state.bid_count + 1;
            let total_fees = inner.auction.fees_after(bid_count);
            if total_fees > state.budget {
                observe::bid_skipped(Skip::BudgetExhausted);
                return Ok(Bid::Skipped(Skip::BudgetExhausted));
            }
            let version = state.version.next();
            let current_price = state.current_price + inner.auction.increment;
            let allocations = allocation::split(
                Intent::Operate,
                &inner.participants,
                &inner.config.asset,
                state.budget,
                current_price,
                total_fees,
            );
            state.in_flight = true;
            Submission {
                session,
                version,
                allocations,
                intent: Intent::Operate,
                session_data: SessionData {
                    auction_id: inner.auction.id.clone(),
                    state: AuctionState {
                        current_price,
                        time_left: inner.auction.window,
                        last_bidder: Some(inner.participants.bidder),
                        bid_count,
                        total_fees,
                    },
                },
            }
        };

        let result = inner.clearnode.submit_app_state(prepared.clone()).await;

        let mut state = inner.state.lock().unwrap();
        state.in_flight = false;
        match result {
            Err(err) => {
                drop(state);
                observe::submission_failed(&prepared.session, prepared.version, &err);
                Err(err.into())
            }
            Ok(()) => {
                if state.status != Status::Active {
                    // The session was reset or ended while the submission
                    // was in flight; there is nothing to commit onto.
                    return Ok(Bid::Skipped(Skip::NotActive));
                }
                if state.version >= prepared.version {
                    let current = state.version;
                    drop(state);
                    observe::bid_superseded(&prepared.session, prepared.version, current);
                    return Ok(Bid::Skipped(Skip::Superseded));
                }
                let wire = &prepared.session_data.state;
                state.version = prepared.version;
                state.current_price = wire.current_price;
                state.last_bidder = wire.last_bidder;
                state.bid_count = wire.bid_count;
                state.total_fees = wire.total_fees;
                state.countdown.reset(inner.auction.window);
                state.ledger.record(BidEvent {
                    session: prepared.session.clone(),
                    version: prepared.version,
                    price_after: wire.current_price,
                    bidder: wire.last_bidder,
                    timestamp: infra::time::now(),
                });
                drop(state);
                observe::bid_committed(&prepared.session, prepared.version, wire.current_price);
                Ok(Bid::Placed(prepared.version))
            }
        }
    }

    /// Settles the session once the bidding window has run out: the seller
    /// walks away with the accumulated fees plus the final price, the
    /// bidder with the remainder of the budget. Calling this again after a
    /// successful close returns the original receipt without another
    /// submission. Before the window expires this is a no-op.
    pub async fn close_order(&self) -> Result<Option<Receipt>, Error> {
        let inner = &self.0;
        let (session, allocations) = {
            let mut state = inner.state.lock().unwrap();
            match state.status {
                Status::Closed => return Ok(state.receipt.clone()),
                Status::Ended => {}
                Status::Unstarted | Status::Active => return Ok(None),
            }
            if state.in_flight {
                return Ok(None);
            }
            let Some(session) = state.session.clone() else {
                return Ok(None);
            };
            let allocations = allocation::split(
                Intent::Close,
                &inner.participants,
                &inner.config.asset,
                state.budget,
                state.current_price,
                state.total_fees,
            );
            state.in_flight = true;
            (session, allocations)
        };

        let result = inner
            .clearnode
            .close_app_session(session.clone(), allocations)
            .await;

        let receipt = {
            let mut state = inner.state.lock().unwrap();
            state.in_flight = false;
            match result {
                Err(err) => {
                    drop(state);
                    observe::close_failed(&session, &err);
                    return Err(err.into());
                }
                Ok(()) => {
                    state.status = Status::Closed;
                    state.countdown.cancel();
                    let receipt = Receipt::new(&session, state.version);
                    state.receipt = Some(receipt.clone());
                    receipt
                }
            }
        };
        self.teardown_tasks();
        observe::session_closed(&session, &receipt);
        Ok(Some(receipt))
    }

    /// Hard reset, mirroring a wallet disconnect: stops the ticker and the
    /// update subscription and discards the in-memory session state. No
    /// recovery is attempted; the clearnode keeps whatever state the
    /// session had.
    pub fn disconnect(&self) {
        self.teardown_tasks();
        let inner = &self.0;
        let mut state = inner.state.lock().unwrap();
        *state = State::idle(&inner.auction, inner.config.default_budget);
        drop(state);
        observe::session_reset();
    }

    /// Point-in-time view of the session.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.0.state.lock().unwrap();
        Snapshot {
            status: state.status,
            session: state.session.clone(),
            version: state.version,
            current_price: state.current_price,
            time_left: state.countdown.remaining(),
            formatted_time: state.countdown.clock(),
            last_bidder: state.last_bidder,
            bid_count: state.bid_count,
            total_fees: state.total_fees,
            budget: state.budget,
        }
    }

    /// The newest committed bids, most recent first.
    pub fn recent_bids(&self) -> Vec<BidEvent> {
        self.0.state.lock().unwrap().ledger.recent()
    }

    fn spawn_tasks(&self) {
        let mut tasks = self.0.tasks.lock().unwrap();
        tasks.push(tokio::spawn(tick(Arc::clone(&self.0))));
        tasks.push(tokio::spawn(reconcile::run(Arc::clone(&self.0))));
    }

    fn teardown_tasks(&self) {
        for task in self.0.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown_tasks();
    }
}

/// Drives the countdown, one tick per second. The tick that reaches zero
/// ends the bidding phase; from then on only the close is actionable,
/// unless a remote bid revives the window first.
async fn tick(inner: Arc<Inner>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let mut state = inner.state.lock().unwrap();
        if state.countdown.tick() {
            state.status = Status::Ended;
            let session = state.session.clone();
            drop(state);
            if let Some(session) = session {
                observe::expired(&session);
            }
        }
    }
}
