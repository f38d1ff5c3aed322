//! Order drafts handed to order placement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, CartTotals};
use crate::ids::OrderId;

/// How the shopper receives the order.
///
/// The delivery fee is charged in both modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Fulfillment {
    /// Delivered to an address, paid on delivery.
    HomeDelivery { address: String },
    /// Collected at the ferretería, paid at the counter.
    StorePickup,
}

impl Fulfillment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fulfillment::HomeDelivery { .. } => "home_delivery",
            Fulfillment::StorePickup => "store_pickup",
        }
    }

    pub fn payment_label(&self) -> &'static str {
        match self {
            Fulfillment::HomeDelivery { .. } => "Cash on delivery",
            Fulfillment::StorePickup => "Pay at store",
        }
    }
}

/// A validated cart snapshot with locked totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    pub id: OrderId,
    pub lines: Vec<CartLineItem>,
    pub totals: CartTotals,
    pub fulfillment: Fulfillment,
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    pub fn new(lines: Vec<CartLineItem>, totals: CartTotals, fulfillment: Fulfillment) -> Self {
        Self::at(Utc::now(), lines, totals, fulfillment)
    }

    /// Build a draft stamped with a given time.
    pub fn at(
        created_at: DateTime<Utc>,
        lines: Vec<CartLineItem>,
        totals: CartTotals,
        fulfillment: Fulfillment,
    ) -> Self {
        Self {
            id: OrderId::new(format!("ROF-{}", created_at.timestamp_millis())),
            lines,
            totals,
            fulfillment,
            created_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
