use crate::models::{Balance, DayRating, Redemption, ShopItem};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifetime rating points minus everything spent in the shop.
pub fn compute_balance(ratings: &BTreeMap<String, DayRating>, redemptions: &[Redemption]) -> Balance {
    let lifetime_score: i64 = ratings.values().map(DayRating::total).sum();
    let spent: i64 = redemptions.iter().map(|r| r.cost).sum();
    Balance {
        lifetime_score,
        spent,
        balance: lifetime_score - spent,
    }
}

/// Affordability is checked by callers before logging a redemption.
pub fn can_afford(balance: &Balance, cost: i64) -> bool {
    balance.balance >= cost
}

pub fn redemption_for(item: &ShopItem, at: DateTime<Local>) -> Redemption {
    Redemption {
        id: Uuid::new_v4().to_string(),
        shop_item_id: item.id.clone(),
        item_name: item.name.clone(),
        cost: item.cost,
        date: at.to_rfc3339(),
    }
}
