//! Plain-text rendering of list and detail views.

use std::fmt::Write as _;

use client_core::{DetailView, ListView};
use shared::{domain::Product, error::ErrorCode};

const NAME_WIDTH: usize = 32;
const BRAND_WIDTH: usize = 16;
const CATEGORY_WIDTH: usize = 20;

pub fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |price| format!("{price:.2}"))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

pub fn render_list(view: &ListView) -> String {
    if view.loading {
        return format!("Loading page {}...\n", view.page);
    }

    let mut out = String::new();
    match view.empty_reason() {
        Some(ErrorCode::EmptyResult) => out.push_str("No products to show.\n"),
        Some(_) => {
            let reason = view
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            let _ = writeln!(out, "Could not load products: {reason}");
        }
        None => {
            let _ = writeln!(
                out,
                "{:>6}  {:<NAME_WIDTH$}  {:<BRAND_WIDTH$}  {:<CATEGORY_WIDTH$}  {:>10}",
                "S.No", "Name", "Brand", "Category", "Price(in $)"
            );
            for row in &view.rows {
                let _ = writeln!(
                    out,
                    "{:>6}  {:<NAME_WIDTH$}  {:<BRAND_WIDTH$}  {:<CATEGORY_WIDTH$}  {:>10}",
                    row.id,
                    truncate(&row.name, NAME_WIDTH),
                    truncate(&row.brand, BRAND_WIDTH),
                    truncate(&row.category, CATEGORY_WIDTH),
                    format_price(row.price),
                );
            }
        }
    }

    let _ = writeln!(out, "Page {} of {}", view.page, view.total_pages);
    if !view.categories.is_empty() {
        let _ = writeln!(out, "Categories: {}", view.categories.join(", "));
    }
    out
}

pub fn render_product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "Brand: {}", product.brand);
    let _ = writeln!(out, "Category: {}", product.category);
    let _ = writeln!(out, "Price: ${}", format_price(product.price));
    let _ = writeln!(out, "Image: {}", product.image_or_fallback());
    let _ = writeln!(out, "Description: {}", product.description);
    out
}

pub fn render_detail(view: &DetailView) -> String {
    if view.loading {
        return "Loading product...\n".to_string();
    }
    match &view.product {
        Some(product) => render_product(product),
        None => "Product not found\n".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
