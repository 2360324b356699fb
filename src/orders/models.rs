//! Order wire models.
//!
//! Shape of the order-creation contract with the backend; field names on
//! the wire are camelCase.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::selection::MenuItems;

/// Lifecycle status stamped on newly created orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    Pending,
}

/// One order-creation request; one is issued per cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Owning identity.
    pub user_id: i64,
    /// Referenced catalog event.
    pub event_id: i64,
    /// Always [`OrderStatus::Pending`] at creation.
    pub status: OrderStatus,
    /// Combined event date and time, UTC.
    pub date: Timestamp,
    /// Number of guests.
    pub guest_count: u32,
    /// Chosen menu tier name.
    pub menu_selection: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// Line total: rounded menu cost times quantity, plus the staffing fee.
    pub total_amount: Decimal,
    /// Staffing fee for the line.
    pub waiter_fee: Decimal,
    /// JSON-encoded [`AdditionalInfo`], opaque to the backend.
    pub additional_info: String,
}

/// Extra payload carried inside `additionalInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    /// Repeat bookings of the configuration.
    pub quantity: u32,
    /// Display image snapshotted at add-time; empty when none.
    pub image_url: String,
    /// Chosen dishes per category.
    pub selected_items: MenuItems,
}

/// The backend's acknowledgement of a created order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    /// Identifier of the created order.
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn request_serializes_with_camel_case_wire_names() -> TestResult {
        let request = CreateOrderRequest {
            user_id: 7,
            event_id: 42,
            status: OrderStatus::Pending,
            date: "2026-09-15T19:30:00Z".parse()?,
            guest_count: 25,
            menu_selection: Some("Menu Executivo".to_owned()),
            location: Some("São Paulo".to_owned()),
            total_amount: Decimal::new(3780_00, 2),
            waiter_fee: Decimal::new(780_00, 2),
            additional_info: "{}".to_owned(),
        };

        let value = serde_json::to_value(&request)?;

        assert_eq!(value["userId"], json!(7));
        assert_eq!(value["eventId"], json!(42));
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["date"], json!("2026-09-15T19:30:00Z"));
        assert_eq!(value["guestCount"], json!(25));
        assert_eq!(value["menuSelection"], json!("Menu Executivo"));
        assert_eq!(value["location"], json!("São Paulo"));
        assert_eq!(value["totalAmount"], json!(3780.0));
        assert_eq!(value["waiterFee"], json!(780.0));
        assert_eq!(value["additionalInfo"], json!("{}"));

        Ok(())
    }

    #[test]
    fn missing_menu_and_location_serialize_as_null() -> TestResult {
        let request = CreateOrderRequest {
            user_id: 7,
            event_id: 42,
            status: OrderStatus::Pending,
            date: "2026-09-15T12:00:00Z".parse()?,
            guest_count: 25,
            menu_selection: None,
            location: None,
            total_amount: Decimal::from(100u32),
            waiter_fee: Decimal::ZERO,
            additional_info: "{}".to_owned(),
        };

        let value = serde_json::to_value(&request)?;

        assert!(value["menuSelection"].is_null());
        assert!(value["location"].is_null());

        Ok(())
    }

    #[test]
    fn created_order_parses_from_a_larger_body() -> TestResult {
        let order: CreatedOrder =
            serde_json::from_str(r#"{"id": 91, "status": "pending", "userId": 7}"#)?;

        assert_eq!(order.id, 91);

        Ok(())
    }
}
