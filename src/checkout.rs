//! Checkout orchestration.
//!
//! Turns the cart's lines into one backend order each, strictly in
//! collection order and one request at a time. The seriality is deliberate:
//! it makes partial failure deterministic (everything before the failing
//! line is committed, nothing after it is attempted), and there is no
//! compensation of earlier submissions. The cart is cleared only on full
//! success, so a failed checkout leaves every original line in place;
//! errors carry the identifiers created before the failure so callers can
//! build idempotent retries on top.

use std::sync::Arc;

use jiff::{Timestamp, civil, tz::TimeZone};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    auth::UserId,
    cart::CartLine,
    context::CartContext,
    orders::{AdditionalInfo, CreateOrderRequest, OrderStatus, OrdersApi, OrdersApiError},
    pricing,
};

/// Fallback event time for lines that have none.
const DEFAULT_EVENT_TIME: &str = "12:00";

/// Errors composing a line's date and time into a timestamp.
#[derive(Debug, Error)]
pub enum EventDateError {
    /// The date or time string is not in the expected shape.
    #[error("unparseable date/time: {value:?}")]
    Unparseable {
        /// The offending string.
        value: String,
    },

    /// The components do not form a valid civil date-time.
    #[error(transparent)]
    Invalid(#[from] jiff::Error),
}

/// Outcome of a fully successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSuccess {
    /// Created order identifiers, in submission order.
    pub order_ids: Vec<i64>,
}

impl CheckoutSuccess {
    /// Route for the "pay now" follow-up, preselecting the first order.
    #[must_use]
    pub fn payment_route(&self) -> String {
        match self.order_ids.first() {
            Some(id) => format!("/orders?pay={id}&newOrder=true"),
            None => "/orders?newOrder=true".to_owned(),
        }
    }
}

/// Errors aborting a checkout.
///
/// The two in-flight variants carry the identifiers of orders already
/// created in this run; those remain created on the backend and are not
/// rolled back.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No authenticated identity; the consumer redirects to login.
    #[error("Você precisa estar logado para finalizar o pedido.")]
    NotAuthenticated,

    /// Nothing in the cart to submit.
    #[error("Carrinho vazio. Adicione itens ao carrinho antes de finalizar o pedido.")]
    EmptyCart,

    /// A line's date and time did not compose into a timestamp.
    #[error("Data do evento inválida")]
    InvalidEventDate {
        /// Index of the line that failed, in collection order.
        failed_at: usize,
        /// Orders created before the failure, in submission order.
        created_order_ids: Vec<i64>,
        /// What went wrong while composing the timestamp.
        #[source]
        source: EventDateError,
    },

    /// The backend refused a line; no later lines were submitted.
    #[error("{source}")]
    OrderRejected {
        /// Index of the line that failed, in collection order.
        failed_at: usize,
        /// Orders created before the failure, in submission order.
        created_order_ids: Vec<i64>,
        /// The backend's refusal.
        #[source]
        source: OrdersApiError,
    },
}

/// Sequential order submission over the current cart lines.
pub struct CheckoutOrchestrator {
    api: Arc<dyn OrdersApi>,
}

impl CheckoutOrchestrator {
    /// Create an orchestrator submitting through the given backend.
    #[must_use]
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self { api }
    }

    /// Submit one order per cart line, in collection order.
    ///
    /// On full success the cart is cleared, the cart view closed, and the
    /// created identifiers returned in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAuthenticated`] or
    /// [`CheckoutError::EmptyCart`] before anything is submitted, and
    /// [`CheckoutError::InvalidEventDate`] or
    /// [`CheckoutError::OrderRejected`] when a line aborts the loop; the
    /// cart is left untouched in every error case.
    #[instrument(skip(self, ctx), fields(line_count = tracing::field::Empty))]
    pub async fn checkout(&self, ctx: &mut CartContext) -> Result<CheckoutSuccess, CheckoutError> {
        let Some(user) = ctx.current_user() else {
            return Err(CheckoutError::NotAuthenticated);
        };

        if ctx.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = ctx.cart().lines().to_vec();
        tracing::Span::current().record("line_count", lines.len());

        let mut created: Vec<i64> = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let timestamp = match event_timestamp(line) {
                Ok(timestamp) => timestamp,
                Err(source) => {
                    warn!(line_id = line.id, %source, "aborting checkout on bad event date");
                    return Err(CheckoutError::InvalidEventDate {
                        failed_at: index,
                        created_order_ids: created,
                        source,
                    });
                }
            };

            match self.api.create_order(order_request(user, line, timestamp)).await {
                Ok(order) => {
                    debug!(line_id = line.id, order_id = order.id, "order created");
                    created.push(order.id);
                }
                Err(source) => {
                    warn!(line_id = line.id, %source, "aborting checkout on backend refusal");
                    return Err(CheckoutError::OrderRejected {
                        failed_at: index,
                        created_order_ids: created,
                        source,
                    });
                }
            }
        }

        ctx.cart_mut().clear();
        ctx.cart_mut().close_cart();

        Ok(CheckoutSuccess { order_ids: created })
    }
}

/// Combine a line's date and time (defaulting to noon) into a UTC timestamp.
fn event_timestamp(line: &CartLine) -> Result<Timestamp, EventDateError> {
    let date = parse_date(&line.date)?;
    let time = parse_time(line.time.as_deref().unwrap_or(DEFAULT_EVENT_TIME))?;

    Ok(TimeZone::UTC.to_timestamp(civil::DateTime::from_parts(date, time))?)
}

fn parse_date(value: &str) -> Result<civil::Date, EventDateError> {
    let unparseable = || EventDateError::Unparseable {
        value: value.to_owned(),
    };

    let mut parts = value.split('-');
    let year = parts
        .next()
        .and_then(|part| part.parse::<i16>().ok())
        .ok_or_else(unparseable)?;
    let month = parts
        .next()
        .and_then(|part| part.parse::<i8>().ok())
        .ok_or_else(unparseable)?;
    let day = parts
        .next()
        .and_then(|part| part.parse::<i8>().ok())
        .ok_or_else(unparseable)?;

    Ok(civil::Date::new(year, month, day)?)
}

fn parse_time(value: &str) -> Result<civil::Time, EventDateError> {
    let unparseable = || EventDateError::Unparseable {
        value: value.to_owned(),
    };

    let mut parts = value.split(':');
    let hour = parts
        .next()
        .and_then(|part| part.parse::<i8>().ok())
        .ok_or_else(unparseable)?;
    let minute = parts
        .next()
        .and_then(|part| part.parse::<i8>().ok())
        .ok_or_else(unparseable)?;

    Ok(civil::Time::new(hour, minute, 0, 0)?)
}

fn order_request(user: UserId, line: &CartLine, date: Timestamp) -> CreateOrderRequest {
    let additional = AdditionalInfo {
        quantity: line.quantity,
        image_url: line.image_url.clone().unwrap_or_default(),
        selected_items: line.menu_items.clone(),
    };

    let total_amount =
        pricing::round2(line.price * Decimal::from(line.quantity)) + line.waiter_fee;

    CreateOrderRequest {
        user_id: user.0,
        event_id: line.event_id,
        status: OrderStatus::Pending,
        date,
        guest_count: line.guest_count,
        menu_selection: line.menu_selection.clone(),
        location: line.location.clone(),
        total_amount,
        waiter_fee: line.waiter_fee,
        additional_info: serde_json::to_string(&additional).unwrap_or_default(),
    }
}
