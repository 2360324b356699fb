//! Catalog collaborator types.
//!
//! Events, menus and dishes are owned by the catalog service; the engine
//! holds non-owning references and snapshots display copy at add-time. The
//! only call it makes is fetching a menu's dishes, once per menu selection.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// A bookable catering event, as listed by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Catalog identifier.
    pub id: i64,
    /// Display title, snapshotted into cart lines at add-time.
    pub title: String,
    /// Display image, snapshotted into cart lines at add-time.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A menu tier offered for an event, priced per guest.
#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    /// Catalog identifier.
    pub id: i64,
    /// Display name, e.g. `"Menu Executivo"`.
    pub name: String,
    /// Price per guest.
    pub price: Decimal,
}

/// One dish on a menu, grouped by its category name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dish {
    /// Display name.
    pub name: String,
    /// Category name as the catalog spells it, e.g. `"BEBIDAS"`.
    pub category: String,
}

/// Errors surfaced by the catalog collaborator.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dish list for a menu could not be fetched.
    #[error("menu dishes unavailable: {0}")]
    Unavailable(String),
}

/// Narrow contract to the catalog service.
#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch all dishes attached to the given menu.
    async fn menu_dishes(&self, menu_id: i64) -> Result<Vec<Dish>, CatalogError>;
}
