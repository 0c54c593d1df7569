use {
    async_trait::async_trait,
    futures::stream::BoxStream,
    model::{Allocation, Intent, Participants, SessionData, SessionId, SessionUpdate, Version},
    thiserror::Error,
};

/// The signed-message transport to the clearnode hosting the app sessions.
/// Authentication, wallet signing and message framing live behind this
/// trait; the engine only sees acknowledged or failed operations. Every
/// failure is terminal for the call in question: the engine never retries
/// on its own.
#[mockall::automock]
#[async_trait]
pub trait Clearnode: Send + Sync {
    /// Opens a multi-party app session and returns its id along with the
    /// base version to build on.
    async fn create_app_session(&self, request: CreateRequest) -> Result<Created, Error>;

    /// Proposes a new versioned session state. Resolves once the required
    /// signature quorum has been collected.
    async fn submit_app_state(&self, submission: Submission) -> Result<(), Error>;

    /// Settles and closes the session with the given final allocations.
    async fn close_app_session(
        &self,
        session: SessionId,
        allocations: [Allocation; 3],
    ) -> Result<(), Error>;

    /// Standing subscription to session updates pushed by the clearnode.
    /// Dropping the stream unsubscribes.
    fn updates(&self) -> BoxStream<'static, SessionUpdate>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateRequest {
    pub participants: Participants,
    pub allocations: [Allocation; 3],
    /// Signature weights per participant, in [`Participants::ordered`]
    /// order.
    pub weights: [u64; 3],
    /// Combined weight required for a state to be accepted.
    pub quorum: u64,
    pub application: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Created {
    pub session: SessionId,
    pub version: Version,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub session: SessionId,
    pub version: Version,
    pub allocations: [Allocation; 3],
    pub intent: Intent,
    pub session_data: SessionData,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("timed out waiting for the clearnode acknowledgement")]
    Timeout,
    #[error("connection to the clearnode was lost")]
    ConnectionLost,
    #[error("the clearnode rejected the request: {0}")]
    Rejected(String),
}
