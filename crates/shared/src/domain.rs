use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

// Page-relative sequence number. Only unique inside the page window it was
// assigned in; a new fetch reassigns it.
id_newtype!(ProductId);

impl ProductId {
    /// `(page - 1) * page_size + index_in_page + 1`, with `page` 1-based.
    pub fn page_relative(page: u32, page_size: u32, index_in_page: usize) -> Self {
        let page_offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        Self(page_offset + index_in_page as u64 + 1)
    }
}

/// Shown in place of a product image the record does not carry.
pub const FALLBACK_IMAGE: &str = "nodata.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: String,
}

impl Product {
    pub fn image_or_fallback(&self) -> &str {
        match self.image.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => FALLBACK_IMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub page: u32,
    pub products: Vec<Product>,
    pub total_pages: u32,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.iter().any(|seen| seen == &product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Name,
    Brand,
    Category,
    Price,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" | "s.no" | "sno" => Some(Self::Id),
            "name" => Some(Self::Name),
            "brand" => Some(Self::Brand),
            "category" => Some(Self::Category),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parses `field` or `field:direction`, e.g. `price:desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, direction) = match raw.split_once(':') {
            Some((field, direction)) => (field, SortDirection::parse(direction)?),
            None => (raw, SortDirection::Asc),
        };
        Some(Self::new(SortField::parse(field)?, direction))
    }
}

/// Handed to the detail view when a list row is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub product_id: ProductId,
    pub product: Option<Product>,
}
