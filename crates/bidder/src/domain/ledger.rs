use {
    chrono::{DateTime, Utc},
    model::{Address, SessionId, Version},
    number::Amount,
};

/// One committed session state: who drove the price where, and at which
/// version.
#[derive(Clone, Debug, PartialEq)]
pub struct BidEvent {
    pub session: SessionId,
    pub version: Version,
    pub price_after: Amount,
    pub bidder: Option<Address>,
    pub timestamp: DateTime<Utc>,
}

impl BidEvent {
    /// Stable identifier; versions are unique within a session.
    pub fn id(&self) -> String {
        format!("{}-{}", self.session, self.version)
    }
}

/// How many entries [`Ledger::recent`] serves. Matches the length of the
/// bid feed rendered by callers.
const RECENT: usize = 8;

/// Append-only history of committed states, ordered by version.
#[derive(Debug, Default)]
pub struct Ledger {
    events: Vec<BidEvent>,
}

impl Ledger {
    /// Appends `event` if its version advances the ledger. Duplicates and
    /// regressions are refused, which makes replayed commits harmless.
    pub fn record(&mut self, event: BidEvent) -> bool {
        if self
            .events
            .last()
            .is_some_and(|last| event.version <= last.version)
        {
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn latest(&self) -> Option<&BidEvent> {
        self.events.last()
    }

    /// The newest entries, most recent first.
    pub fn recent(&self) -> Vec<BidEvent> {
        self.events.iter().rev().take(RECENT).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(version: u64) -> BidEvent {
        BidEvent {
            session: "0xsession".into(),
            version: Version(version),
            price_after: Amount::from_cents(5 + i64::try_from(version).unwrap()),
            bidder: Some(Address::from_low_u64_be(2)),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn appends_in_version_order() {
        let mut ledger = Ledger::default();
        assert!(ledger.record(event(1)));
        assert!(ledger.record(event(2)));
        assert_eq!(ledger.latest().unwrap().version, Version(2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn refuses_duplicates_and_regressions() {
        let mut ledger = Ledger::default();
        assert!(ledger.record(event(5)));
        assert!(!ledger.record(event(5)));
        assert!(!ledger.record(event(4)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn versions_may_skip_ahead() {
        // Remote states can advance by more than one version at a time.
        let mut ledger = Ledger::default();
        assert!(ledger.record(event(1)));
        assert!(ledger.record(event(7)));
        assert_eq!(ledger.latest().unwrap().version, Version(7));
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let mut ledger = Ledger::default();
        for version in 1..=12 {
            ledger.record(event(version));
        }
        let recent = ledger.recent();
        assert_eq!(recent.len(), 8);
        assert_eq!(recent.first().unwrap().version, Version(12));
        assert_eq!(recent.last().unwrap().version, Version(5));
    }

    #[test]
    fn event_id_is_session_scoped() {
        assert_eq!(event(3).id(), "0xsession-3");
    }
}
