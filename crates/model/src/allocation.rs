use {
    crate::Address,
    number::Amount,
    serde::{Deserialize, Serialize},
};

/// Ledger asset identifier, e.g. `"ytest.usd"`.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Asset(String);

impl From<&str> for Asset {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The amount of an asset attributed to one participant within a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub participant: Address,
    pub asset: Asset,
    pub amount: Amount,
}

/// Whether a submitted state keeps the session running or settles it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Operate,
    Close,
}
