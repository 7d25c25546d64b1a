//! Search, category filter and column sort over one loaded page.

use std::cmp::Ordering;

use shared::domain::{Product, SortDirection, SortField, SortSpec};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    /// `None` means every category.
    pub category: Option<String>,
    pub sort: Option<SortSpec>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.category.is_none() && self.sort.is_none()
    }
}

/// Applies `criteria` to `products` and returns a new sequence; the input is
/// never reordered.
pub fn derive(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    let needle = criteria.search_text.to_lowercase();
    let category = criteria.category.as_deref().filter(|c| !c.is_empty());

    let mut rows: Vec<Product> = products
        .iter()
        .filter(|product| needle.is_empty() || product.name.to_lowercase().contains(&needle))
        .filter(|product| category.map_or(true, |category| product.category == category))
        .cloned()
        .collect();

    if let Some(sort) = criteria.sort {
        // sort_by is stable, so ties keep their page order in both directions.
        rows.sort_by(|a, b| match sort.direction {
            SortDirection::Asc => compare_by(a, b, sort.field),
            SortDirection::Desc => compare_by(b, a, sort.field),
        });
    }

    rows
}

pub fn compare_by(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Price => compare_price(a.price, b.price),
        SortField::Name => locale_compare(&a.name, &b.name),
        SortField::Brand => locale_compare(&a.brand, &b.brand),
        SortField::Category => locale_compare(&a.category, &b.category),
    }
}

fn compare_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Three levels, like a collator: base letters ignoring accents and case,
/// then unaccented before accented, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercased(a).cmp(lowercased(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowercased(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
