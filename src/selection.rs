//! Menu selection
//!
//! State machine for one "build a cart line" interaction: the dish catalog
//! for a chosen menu is grouped by category, each category gets a required
//! selection count, and the user toggles dishes until every category holds
//! exactly its required count. Committing produces the `menuItems` mapping
//! carried by a cart line; the state itself is never persisted.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    cart::models::CartLine,
    catalog::{CatalogApi, CatalogError, Dish, Event, Menu},
    pricing,
};

/// Committed dish choices: category name to chosen dish names, in pick order.
pub type MenuItems = BTreeMap<String, Vec<String>>;

/// Errors raised while toggling or committing a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The category already holds its required number of dishes; the user
    /// must uncheck one before checking another.
    #[error("Você já selecionou o número máximo de {limit} itens para {category}")]
    CategoryFull {
        /// Category that is already at its limit.
        category: String,
        /// Required count for that category.
        limit: usize,
    },

    /// The category does not exist on the loaded menu.
    #[error("Categoria desconhecida: {0}")]
    UnknownCategory(String),

    /// One or more categories hold a count different from their limit.
    #[error("Selecione a quantidade exata de itens em cada categoria:\n{}", format_shortfalls(.0))]
    Incomplete(Vec<CategoryShortfall>),
}

/// Required versus actual count for one offending category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShortfall {
    /// Category name.
    pub category: String,
    /// Count the category must hold.
    pub required: usize,
    /// Count it currently holds.
    pub actual: usize,
}

fn format_shortfalls(shortfalls: &[CategoryShortfall]) -> String {
    let lines: Vec<String> = shortfalls
        .iter()
        .map(|s| {
            format!(
                "{}: selecione exatamente {} (atualmente: {})",
                s.category, s.required, s.actual
            )
        })
        .collect();

    lines.join("\n")
}

/// Derive the required selection count per category from a grouped catalog.
///
/// With at most three distinct categories, each requires
/// `min(3, dishes in category)`. With more, beverage and dessert categories
/// require one, small categories (two dishes or fewer) require one, and
/// everything else requires two.
fn category_limits(categories: &[String], dishes: &FxHashMap<String, Vec<Dish>>) -> FxHashMap<String, usize> {
    let mut limits = FxHashMap::default();

    if categories.len() <= 3 {
        for category in categories {
            let count = dishes.get(category).map_or(0, Vec::len);
            limits.insert(category.clone(), count.min(3));
        }

        return limits;
    }

    for category in categories {
        let upper = category.to_uppercase();
        let count = dishes.get(category).map_or(0, Vec::len);

        let limit = if upper.contains("BEBIDA")
            || upper.contains("SOBREMESA")
            || upper.contains("BOLOS")
            || count <= 2
        {
            1
        } else {
            2
        };

        limits.insert(category.clone(), limit);
    }

    limits
}

/// In-progress dish selection for one menu.
#[derive(Debug, Clone)]
pub struct MenuSelection {
    /// Categories in catalog load order; drives display and error reporting.
    categories: Vec<String>,
    limits: FxHashMap<String, usize>,
    chosen: FxHashMap<String, Vec<String>>,
}

impl MenuSelection {
    /// Group a menu's dishes by category and derive each category's limit.
    #[must_use]
    pub fn new(dishes: &[Dish]) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let mut grouped: FxHashMap<String, Vec<Dish>> = FxHashMap::default();

        for dish in dishes {
            if !grouped.contains_key(&dish.category) {
                categories.push(dish.category.clone());
            }

            grouped.entry(dish.category.clone()).or_default().push(dish.clone());
        }

        let limits = category_limits(&categories, &grouped);

        let chosen = categories
            .iter()
            .map(|category| (category.clone(), Vec::new()))
            .collect();

        Self {
            categories,
            limits,
            chosen,
        }
    }

    /// Fetch a menu's dishes from the catalog and build the selection
    /// state. Awaited once per menu selection.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the dish list cannot be fetched.
    pub async fn load(catalog: &dyn CatalogApi, menu_id: i64) -> Result<Self, CatalogError> {
        Ok(Self::new(&catalog.menu_dishes(menu_id).await?))
    }

    /// Categories in load order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Required count for a category; absent categories default to one.
    #[must_use]
    pub fn limit(&self, category: &str) -> usize {
        self.limits.get(category).copied().unwrap_or(1)
    }

    /// Dishes currently chosen in a category, in pick order.
    #[must_use]
    pub fn chosen(&self, category: &str) -> &[String] {
        self.chosen.get(category).map_or(&[], Vec::as_slice)
    }

    /// Check (`true`) or uncheck (`false`) a dish in a category.
    ///
    /// Checking a dish already checked is a no-op. Checking when the
    /// category is at its limit is rejected and leaves the state unchanged.
    /// Unchecking always succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::CategoryFull`] on a rejected check, or
    /// [`SelectionError::UnknownCategory`] for a category the loaded menu
    /// does not have.
    pub fn toggle(&mut self, category: &str, dish: &str, checked: bool) -> Result<(), SelectionError> {
        let Some(picked) = self.chosen.get_mut(category) else {
            return Err(SelectionError::UnknownCategory(category.to_owned()));
        };

        if !checked {
            picked.retain(|name| name != dish);
            return Ok(());
        }

        if picked.iter().any(|name| name == dish) {
            return Ok(());
        }

        let limit = self.limits.get(category).copied().unwrap_or(1);

        if picked.len() >= limit {
            return Err(SelectionError::CategoryFull {
                category: category.to_owned(),
                limit,
            });
        }

        picked.push(dish.to_owned());

        Ok(())
    }

    /// Whether every category holds exactly its required count.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfalls().is_empty()
    }

    fn shortfalls(&self) -> Vec<CategoryShortfall> {
        self.categories
            .iter()
            .filter_map(|category| {
                let required = self.limit(category);
                let actual = self.chosen(category).len();

                (actual != required).then(|| CategoryShortfall {
                    category: category.clone(),
                    required,
                    actual,
                })
            })
            .collect()
    }

    /// Produce the committed `menuItems` mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Incomplete`] naming every category whose
    /// count differs from its limit, with required and actual counts.
    pub fn commit(&self) -> Result<MenuItems, SelectionError> {
        let shortfalls = self.shortfalls();

        if !shortfalls.is_empty() {
            return Err(SelectionError::Incomplete(shortfalls));
        }

        Ok(self
            .chosen
            .iter()
            .map(|(category, picked)| (category.clone(), picked.clone()))
            .collect())
    }
}

/// Everything the add-to-cart interaction gathers besides the dish choices.
#[derive(Debug, Clone)]
pub struct LineDraft {
    /// Event being booked.
    pub event: Event,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`; checkout defaults it to `"12:00"` when absent.
    pub time: Option<String>,
    /// Number of guests.
    pub guest_count: u32,
    /// Venue.
    pub location: Option<String>,
    /// Chosen menu tier.
    pub menu: Option<Menu>,
}

/// Errors raised while composing a draft into a cart line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// Required fields are missing; all of them are reported at once.
    #[error("Selecione todas as opções necessárias: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    /// The dish selection is not committable.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl LineDraft {
    /// Compose a cart line from this draft and a committable selection.
    ///
    /// The line's `price` is the menu's per-guest price times the guest
    /// count, and its staffing fee is computed from the guest count.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Incomplete`] listing every missing field, or a
    /// wrapped [`SelectionError`] when the dish selection cannot commit.
    pub fn into_line(self, id: i64, selection: &MenuSelection) -> Result<CartLine, DraftError> {
        let mut missing = Vec::new();

        if self.date.trim().is_empty() {
            missing.push("data");
        }
        if self.time.as_deref().is_none_or(|t| t.trim().is_empty()) {
            missing.push("horário");
        }
        if self.guest_count == 0 {
            missing.push("número de convidados");
        }
        if self.menu.is_none() {
            missing.push("menu");
        }
        if self.location.as_deref().is_none_or(|l| l.trim().is_empty()) {
            missing.push("local");
        }

        if !missing.is_empty() {
            return Err(DraftError::Incomplete(missing));
        }

        let menu_items = selection.commit()?;

        let Some(menu) = self.menu else {
            return Err(DraftError::Incomplete(vec!["menu"]));
        };

        Ok(CartLine {
            id,
            event_id: self.event.id,
            title: self.event.title,
            image_url: self.event.image_url,
            date: self.date,
            time: self.time,
            guest_count: self.guest_count,
            location: self.location,
            menu_selection: Some(menu.name),
            menu_items,
            price: pricing::line_menu_cost(menu.price, self.guest_count),
            waiter_fee: pricing::staffing_fee(self.guest_count),
            quantity: 1,
        })
    }
}
