//! Orders backend client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::orders::models::{CreateOrderRequest, CreatedOrder};

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrdersApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend refused the order.
    #[error("{message}")]
    Rejected {
        /// HTTP status code of the refusal.
        status: u16,
        /// Human-readable reason, preferring structured validation details.
        message: String,
    },
}

/// Narrow contract to the order backend.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create one order from a cart line.
    async fn create_order(
        &self,
        order: CreateOrderRequest,
    ) -> Result<CreatedOrder, OrdersApiError>;
}

/// Configuration for connecting to the order backend.
#[derive(Debug, Clone)]
pub struct OrdersApiConfig {
    /// Backend base address, e.g. `"https://catering.example.com/api"`.
    pub base_url: String,
}

/// HTTP client for the order backend.
#[derive(Debug, Clone)]
pub struct HttpOrdersApi {
    config: OrdersApiConfig,
    http: Client,
}

impl HttpOrdersApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: OrdersApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl OrdersApi for HttpOrdersApi {
    async fn create_order(
        &self,
        order: CreateOrderRequest,
    ) -> Result<CreatedOrder, OrdersApiError> {
        let url = format!("{}/orders", self.config.base_url);

        let response = self.http.post(&url).json(&order).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(rejection(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<serde_json::Value>,
}

/// Build the user-facing rejection from an error response body, preferring
/// structured validation details over the plain message, with a generic
/// fallback when the body is not even JSON.
fn rejection(status: u16, body: &str) -> OrdersApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    let message = match parsed {
        Some(ErrorBody {
            details: Some(details),
            ..
        }) => format!("Erro de validação: {details}"),
        Some(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => format!("Erro ao criar pedido: {body}"),
    };

    OrdersApiError::Rejected { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_message(error: &OrdersApiError) -> String {
        match error {
            OrdersApiError::Rejected { message, .. } => message.clone(),
            OrdersApiError::Http(other) => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejection_prefers_structured_details() {
        let error = rejection(
            400,
            r#"{"message": "Erro ao criar pedido", "details": {"guestCount": "obrigatório"}}"#,
        );

        assert_eq!(
            rejected_message(&error),
            r#"Erro de validação: {"guestCount":"obrigatório"}"#
        );
    }

    #[test]
    fn rejection_falls_back_to_the_message() {
        let error = rejection(500, r#"{"message": "Evento não encontrado"}"#);

        assert_eq!(rejected_message(&error), "Evento não encontrado");
    }

    #[test]
    fn rejection_falls_back_to_the_raw_body() {
        let error = rejection(502, "Bad Gateway");

        assert_eq!(rejected_message(&error), "Erro ao criar pedido: Bad Gateway");
    }

    #[test]
    fn rejection_keeps_the_status_code() {
        let error = rejection(422, "{}");

        assert!(matches!(error, OrdersApiError::Rejected { status: 422, .. }));
    }
}
