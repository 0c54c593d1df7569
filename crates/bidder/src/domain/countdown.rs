/// The single-ticking timer governing the bidding window. It alone gates
/// whether a bid is admissible: while `Expired` only settling remains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Countdown {
    #[default]
    Inactive,
    Running {
        remaining: u64,
    },
    Expired,
}

impl Countdown {
    pub fn start(window: u64) -> Self {
        if window == 0 {
            Self::Expired
        } else {
            Self::Running { remaining: window }
        }
    }

    /// Restart at the full window. Happens on every accepted bid, local or
    /// remote.
    pub fn reset(&mut self, window: u64) {
        *self = Self::start(window);
    }

    pub fn cancel(&mut self) {
        *self = Self::Inactive;
    }

    /// Advance by one logical second. Returns true on the tick that
    /// reaches zero; Inactive and Expired timers don't move.
    pub fn tick(&mut self) -> bool {
        match self {
            Self::Running { remaining } if *remaining <= 1 => {
                *self = Self::Expired;
                true
            }
            Self::Running { remaining } => {
                *remaining -= 1;
                false
            }
            Self::Inactive | Self::Expired => false,
        }
    }

    pub fn remaining(&self) -> u64 {
        match self {
            Self::Running { remaining } => *remaining,
            Self::Inactive | Self::Expired => 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Clock string for rendering, e.g. `0:07`.
    pub fn clock(&self) -> String {
        format!("0:{:02}", self.remaining())
    }
}
