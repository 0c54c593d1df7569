use {
    anyhow::Context,
    model::Asset,
    number::Amount,
    serde::Deserialize,
    std::{path::Path, time::Duration},
};

/// Protocol parameters of the auction session layer. The defaults match
/// the sandbox clearnode deployment.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    /// Ledger asset all allocations are denominated in.
    pub asset: Asset,
    /// Fixed fee charged to the bidder per accepted bid.
    pub bid_fee: Amount,
    /// Price increase per accepted bid.
    pub bid_increment: Amount,
    /// Price an auction opens at.
    pub starting_price: Amount,
    /// Bidding window; the countdown restarts here on every accepted bid.
    #[serde(with = "humantime_serde")]
    pub bidding_window: Duration,
    /// Budget used when the caller does not pass one explicitly.
    pub default_budget: Amount,
    /// Signature weights for seller, bidder and operator.
    pub weights: [u64; 3],
    /// Combined weight required for a state to be accepted.
    pub quorum: u64,
    /// Application tag under which app sessions are created.
    pub application: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset: "ytest.usd".into(),
            bid_fee: Amount::from_cents(100),
            bid_increment: Amount::from_cents(1),
            starting_price: Amount::from_cents(5),
            bidding_window: Duration::from_secs(15),
            default_budget: Amount::from_cents(10_000),
            weights: [40, 40, 50],
            quorum: 80,
            application: "pennyclear".to_string(),
        }
    }
}

impl Config {
    /// Countdown ticks in the bidding window, one per second.
    pub fn window_ticks(&self) -> u64 {
        self.bidding_window.as_secs()
    }

    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?;
        toml::de::from_str(&data).with_context(|| format!("invalid configuration in {path:?}"))
    }
}
