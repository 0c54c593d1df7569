use {model::AuctionId, number::Amount};

/// Static parameters of one penny auction. Every accepted bid raises the
/// price by `increment` and charges the bidder a fixed `fee`, so the full
/// price/fee schedule follows from the bid count alone.
#[derive(Clone, Debug)]
pub struct Auction {
    pub id: AuctionId,
    pub starting_price: Amount,
    pub increment: Amount,
    pub fee: Amount,
    /// Bidding window in whole seconds. The countdown restarts here on
    /// every accepted bid.
    pub window: u64,
}

impl Auction {
    /// The price after `bids` accepted bids.
    pub fn price_after(&self, bids: u64) -> Amount {
        self.starting_price + self.increment.times(bids)
    }

    /// The fees accumulated by the seller after `bids` accepted bids.
    pub fn fees_after(&self, bids: u64) -> Amount {
        self.fee.times(bids)
    }

    /// The budget has to cover the starting price plus at least one bid
    /// fee, otherwise there is no point in joining.
    pub fn minimum_budget(&self) -> Amount {
        self.starting_price + self.fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auction() -> Auction {
        Auction {
            id: "auction-1".into(),
            starting_price: "0.05".parse().unwrap(),
            increment: "0.01".parse().unwrap(),
            fee: "1.00".parse().unwrap(),
            window: 15,
        }
    }

    #[test]
    fn schedule_follows_bid_count() {
        let auction = auction();
        assert_eq!(auction.price_after(0), "0.05".parse().unwrap());
        assert_eq!(auction.price_after(1), "0.06".parse().unwrap());
        assert_eq!(auction.price_after(5), "0.10".parse().unwrap());
        assert_eq!(auction.fees_after(0), Amount::ZERO);
        assert_eq!(auction.fees_after(5), "5.00".parse().unwrap());
    }

    #[test]
    fn minimum_budget_covers_entry() {
        assert_eq!(auction().minimum_budget(), "1.05".parse().unwrap());
    }
}
