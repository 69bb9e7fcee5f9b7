//! Row encoding for the `orders` table.
//!
//! Orders are stored as a JSONB document plus a few extracted columns
//! (`restaurant_id`, `status`, `payment_status`) used for filtering and
//! indexing. These helpers convert between the domain [`Order`] and its
//! document column.

use crate::domain::Order;
use crate::error::GatewayError;

/// Decodes an order document column into a domain [`Order`].
///
/// # Errors
///
/// Returns [`GatewayError::Persistence`] if the stored document does not
/// deserialize — that is storage corruption, not caller input.
pub fn decode_order(doc: serde_json::Value) -> Result<Order, GatewayError> {
    serde_json::from_value(doc)
        .map_err(|e| GatewayError::Persistence(format!("corrupt order document: {e}")))
}

/// Encodes a domain [`Order`] into its JSONB document representation.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if serialization fails.
pub fn encode_order(order: &Order) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(order)
        .map_err(|e| GatewayError::Internal(format!("order serialization failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewOrder, OrderId, OrderItem, OrderType, PaymentMethod, RestaurantId};

    #[test]
    fn encode_decode_round_trip() {
        let order = Order::from_new(
            OrderId::new(),
            NewOrder {
                restaurant_id: RestaurantId::new(),
                table_id: Some(uuid::Uuid::new_v4()),
                customer_name: "Sunil Fernando".to_string(),
                customer_phone: "0112223334".to_string(),
                customer_email: Some("sunil@example.com".to_string()),
                items: vec![OrderItem {
                    menu_item_id: uuid::Uuid::new_v4(),
                    quantity: 2,
                    unit_price_cents: 1500,
                    special_instructions: Some("less spicy".to_string()),
                }],
                order_type: OrderType::DineIn,
                payment_method: PaymentMethod::Lankaqr,
                delivery_address: None,
                delivery_fee_cents: 0,
                special_instructions: None,
            },
        );

        let Ok(doc) = encode_order(&order) else {
            panic!("encode failed");
        };
        let Ok(decoded) = decode_order(doc) else {
            panic!("decode failed");
        };
        assert_eq!(decoded.id, order.id);
        assert_eq!(decoded.total_cents, order.total_cents);
        assert_eq!(decoded.items.len(), 1);
    }

    #[test]
    fn decode_rejects_garbage() {
        let result = decode_order(serde_json::json!({"not": "an order"}));
        assert!(matches!(result, Err(GatewayError::Persistence(_))));
    }
}
