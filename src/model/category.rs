use crate::model::Amount;
use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The label of the entry shown when there are no movements at all.
pub const EMPTY_CATEGORY: &str = "Sin movimientos";

/// The ticket amount given to the empty-state entry so that the chart still draws a full ring.
pub const EMPTY_CATEGORY_AMOUNT: i64 = 100;

/// Brand color used for categories that are not in the palette.
pub const BRAND_COLOR: &str = "#7B2CBF";

const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("Transferencia", "#36A2EB"),
    ("Eventos", "#FF6384"),
    ("Entretenimiento", "#FFCE56"),
    ("Cupones", "#4BC0C0"),
    ("Compras", "#FF9F40"),
    (EMPTY_CATEGORY, "#CCCCCC"),
];

/// Per-category totals after transfer de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub transaction_count: u64,
    pub ticket_amount: Amount,
    pub color: String,
}

impl CategorySummary {
    /// The single entry returned when there is nothing to aggregate.
    pub fn placeholder(palette: &CategoryPalette) -> Self {
        Self {
            name: EMPTY_CATEGORY.to_string(),
            transaction_count: 0,
            ticket_amount: Amount::from(EMPTY_CATEGORY_AMOUNT),
            color: palette.color_for(EMPTY_CATEGORY).to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == EMPTY_CATEGORY && self.transaction_count == 0
    }
}

/// Maps category labels to chart colors. This is passed into the aggregation functions rather than
/// held as global state; `Default` gives the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPalette {
    colors: BTreeMap<String, String>,
    fallback: String,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .map(|(name, color)| (name.to_string(), color.to_string()))
                .collect(),
            fallback: BRAND_COLOR.to_string(),
        }
    }
}

impl CategoryPalette {
    /// The color for `name`, or the brand color if the category is unknown.
    pub fn color_for(&self, name: &str) -> &str {
        self.colors
            .get(name)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    /// Adds or replaces the color for `name`.
    ///
    /// # Errors
    /// Returns an error if `color` is not of the form `#RRGGBB`.
    pub fn set(&mut self, name: impl Into<String>, color: impl Into<String>) -> Result<()> {
        let name = name.into();
        let color = color.into();
        if !is_hex_color(&color) {
            bail!("Invalid color '{color}' for category '{name}', expected #RRGGBB");
        }
        self.colors.insert(name, color.to_uppercase());
        Ok(())
    }

    /// Returns a copy of this palette with every entry of `overrides` applied.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut palette = self.clone();
        for (name, color) in overrides {
            palette.set(name.as_str(), color.as_str())?;
        }
        Ok(palette)
    }
}

/// True for strings of the form `#RRGGBB`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
