use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::domain::model::FlightOffer;

/// Merge step for one aggregation run: drop (airline, price) duplicates
/// keeping the first encountered, then stable-sort ascending by price.
///
/// The identity key is deliberately coarse. Sources do not reliably expose
/// flight numbers, so two genuinely different flights sharing airline and
/// price collapse into one.
pub fn finalize(offers: Vec<FlightOffer>) -> Vec<FlightOffer> {
    let mut seen: HashSet<(String, Decimal)> = HashSet::with_capacity(offers.len());
    let mut unique: Vec<FlightOffer> = Vec::with_capacity(offers.len());

    for offer in offers {
        if seen.insert((offer.airline.clone(), offer.price)) {
            unique.push(offer);
        }
    }

    unique.sort_by(|a, b| a.price.cmp(&b.price));
    unique
}
