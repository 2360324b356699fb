//! Cart models.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::selection::MenuItems;

/// One configured catering request, pending purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Client-generated identifier, distinct per add.
    pub id: i64,

    /// Catalog event this line is based on (non-owning reference).
    pub event_id: i64,

    /// Display title, snapshotted at add-time.
    pub title: String,

    /// Display image, snapshotted at add-time.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,

    /// Time of day, `HH:MM`; checkout defaults it to `"12:00"` when absent.
    #[serde(default)]
    pub time: Option<String>,

    /// Number of guests; drives both the menu cost and the staffing fee.
    pub guest_count: u32,

    /// Venue; required before checkout.
    #[serde(default)]
    pub location: Option<String>,

    /// Chosen menu tier name.
    #[serde(default)]
    pub menu_selection: Option<String>,

    /// Chosen dishes per category.
    #[serde(default)]
    pub menu_items: MenuItems,

    /// Cached menu cost for the whole line (per-guest price × guest count).
    pub price: Decimal,

    /// Cached staffing fee, derived from `guest_count`. Written only by the
    /// store's mutation paths; a restored value that is missing or
    /// malformed collapses to zero rather than poisoning totals.
    #[serde(default, deserialize_with = "fee_or_zero")]
    pub waiter_fee: Decimal,

    /// Repeat bookings of this exact configuration.
    pub quantity: u32,
}

impl CartLine {
    /// Validity predicate applied on add and on restore: the line must
    /// reference an event, carry a title, and have positive price and
    /// guest count.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.event_id > 0
            && !self.title.trim().is_empty()
            && self.price > Decimal::ZERO
            && self.guest_count > 0
    }

    /// Merge key: lines for the same event, date and menu tier collapse
    /// into a single entry.
    #[must_use]
    pub fn merges_with(&self, other: &Self) -> bool {
        self.event_id == other.event_id
            && self.date == other.date
            && self.menu_selection == other.menu_selection
    }
}

/// Client-generated line identifier: the current timestamp in
/// milliseconds, distinct for every add a user can physically perform.
#[must_use]
pub fn next_line_id() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}

fn fee_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(value
        .as_f64()
        .and_then(Decimal::from_f64_retain)
        .unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
impl CartLine {
    /// Minimal well-formed line for tests; `id` mirrors `event_id`.
    #[must_use]
    pub fn sample(event_id: i64, price: u32, guest_count: u32, quantity: u32) -> Self {
        Self {
            id: event_id,
            event_id,
            title: "Coquetel Corporativo".to_owned(),
            image_url: Some("https://img.example/evento.jpg".to_owned()),
            date: "2026-09-15".to_owned(),
            time: Some("19:30".to_owned()),
            guest_count,
            location: Some("São Paulo".to_owned()),
            menu_selection: Some("Menu Executivo".to_owned()),
            menu_items: MenuItems::new(),
            price: Decimal::from(price),
            waiter_fee: Decimal::ZERO,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_ids_are_millisecond_timestamps() {
        let id = next_line_id();

        // 2020-01-01T00:00:00Z in milliseconds; sanity floor, not an exact value.
        assert!(id > 1_577_836_800_000, "unexpected id {id}");
    }

    #[test]
    fn serializes_with_camel_case_keys() -> TestResult {
        let value = serde_json::to_value(CartLine::sample(3, 100, 20, 1))?;

        for key in [
            "id",
            "eventId",
            "title",
            "imageUrl",
            "date",
            "time",
            "guestCount",
            "location",
            "menuSelection",
            "menuItems",
            "price",
            "waiterFee",
            "quantity",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}: {value}");
        }

        Ok(())
    }

    #[test]
    fn malformed_waiter_fee_restores_as_zero() -> TestResult {
        let mut value = serde_json::to_value(CartLine::sample(3, 100, 20, 1))?;
        value["waiterFee"] = json!("not a number");

        let line: CartLine = serde_json::from_value(value)?;

        assert_eq!(line.waiter_fee, Decimal::ZERO);
        assert!(line.is_well_formed(), "the line itself must survive");

        Ok(())
    }

    #[test]
    fn missing_waiter_fee_restores_as_zero() -> TestResult {
        let mut value = serde_json::to_value(CartLine::sample(3, 100, 20, 1))?;
        let removed = value
            .as_object_mut()
            .map(|object| object.remove("waiterFee"));
        assert!(removed.is_some(), "fixture must have had a waiterFee");

        let line: CartLine = serde_json::from_value(value)?;

        assert_eq!(line.waiter_fee, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn well_formedness_requires_event_title_price_and_guests() {
        assert!(CartLine::sample(3, 100, 20, 1).is_well_formed());

        let mut no_event = CartLine::sample(3, 100, 20, 1);
        no_event.event_id = 0;
        assert!(!no_event.is_well_formed());

        let mut blank_title = CartLine::sample(3, 100, 20, 1);
        blank_title.title = "  ".to_owned();
        assert!(!blank_title.is_well_formed());

        let mut free_line = CartLine::sample(3, 100, 20, 1);
        free_line.price = Decimal::ZERO;
        assert!(!free_line.is_well_formed());

        let mut no_guests = CartLine::sample(3, 100, 20, 1);
        no_guests.guest_count = 0;
        assert!(!no_guests.is_well_formed());
    }

    #[test]
    fn merge_key_is_event_date_and_menu() {
        let line = CartLine::sample(3, 100, 20, 1);

        let mut same_booking = CartLine::sample(3, 200, 35, 2);
        same_booking.id = 99;
        assert!(line.merges_with(&same_booking));

        let mut other_date = CartLine::sample(3, 100, 20, 1);
        other_date.date = "2026-10-01".to_owned();
        assert!(!line.merges_with(&other_date));

        let mut other_menu = CartLine::sample(3, 100, 20, 1);
        other_menu.menu_selection = Some("Menu Premium".to_owned());
        assert!(!line.merges_with(&other_menu));

        let other_event = CartLine::sample(4, 100, 20, 1);
        assert!(!line.merges_with(&other_event));
    }
}
