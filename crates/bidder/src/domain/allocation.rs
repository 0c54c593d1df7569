use {
    model::{Allocation, Asset, Intent, Participants},
    number::Amount,
};

/// Splits the fixed budget between the participants for a given auction
/// state.
///
/// While operating, the seller holds the accumulated bid fees; at close it
/// additionally receives the final price. The bidder keeps whatever the
/// seller does not, saturating at zero, so any residual lands on the
/// bidder's side and the three amounts add up to the budget cent-exactly.
/// The operator never holds funds.
pub fn split(
    intent: Intent,
    participants: &Participants,
    asset: &Asset,
    budget: Amount,
    current_price: Amount,
    total_fees: Amount,
) -> [Allocation; 3] {
    let seller = match intent {
        Intent::Operate => total_fees,
        Intent::Close => total_fees + current_price,
    };
    let bidder = budget.saturating_sub(seller);
    [
        Allocation {
            participant: participants.seller,
            asset: asset.clone(),
            amount: seller,
        },
        Allocation {
            participant: participants.bidder,
            asset: asset.clone(),
            amount: bidder,
        },
        Allocation {
            participant: participants.operator,
            asset: asset.clone(),
            amount: Amount::ZERO,
        },
    ]
}

/// The funds held across all participants.
pub fn total(allocations: &[Allocation; 3]) -> Amount {
    allocations.iter().map(|allocation| allocation.amount).sum()
}
