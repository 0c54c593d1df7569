use {
    crate::Address,
    number::Amount,
    serde::{de, Deserialize, Deserializer, Serialize},
};

/// Identifier of an app session on the clearnode, assigned at creation.
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
pub struct SessionId(String);

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of the auction a session settles.
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
pub struct AuctionId(String);

impl From<&str> for AuctionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Monotonic counter identifying the latest agreed session state. The sole
/// tie-break between conflicting updates: higher version wins.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The three parties of an auction session, in the order the clearnode
/// expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Participants {
    pub seller: Address,
    pub bidder: Address,
    pub operator: Address,
}

impl Participants {
    pub fn ordered(&self) -> [Address; 3] {
        [self.seller, self.bidder, self.operator]
    }

    /// All three addresses are present (non-zero).
    pub fn complete(&self) -> bool {
        self.ordered().iter().all(|address| !address.is_zero())
    }
}

/// Auction state snapshot as carried inside a session update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionState {
    pub current_price: Amount,
    pub time_left: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bidder: Option<Address>,
    pub bid_count: u64,
    pub total_fees: Amount,
}

/// The session payload carried opaquely inside the transport's generic
/// state field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub auction_id: AuctionId,
    pub state: AuctionState,
}

/// A state snapshot pushed by the clearnode when any participant advances
/// the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub session_id: SessionId,
    pub version: Version,
    #[serde(deserialize_with = "inline_or_embedded")]
    pub session_data: SessionData,
}

/// The clearnode wire is inconsistent about the session data field: some
/// senders inline the object, others embed it as a JSON string.
fn inline_or_embedded<'de, D>(deserializer: D) -> Result<SessionData, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Embedded(String),
        Inline(SessionData),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Embedded(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
        Raw::Inline(data) => Ok(data),
    }
}
