//! Orders

pub mod client;
pub mod models;

pub use client::{HttpOrdersApi, MockOrdersApi, OrdersApi, OrdersApiConfig, OrdersApiError};
pub use models::{AdditionalInfo, CreateOrderRequest, CreatedOrder, OrderStatus};
