use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{PageResult, Product, ProductId};

pub const PRODUCTS_PATH: &str = "/cms/products";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MrpRecord {
    #[serde(default)]
    pub mrp: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesRecord {
    #[serde(default)]
    pub front: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_category: String,
    #[serde(default)]
    pub mrp: Option<MrpRecord>,
    #[serde(default)]
    pub images: Option<ImagesRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl ProductRecord {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            brand: self.brand,
            category: self.main_category,
            price: self.mrp.and_then(|mrp| mrp.mrp),
            image: self.images.and_then(|images| images.front),
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<ProductRecord>,
    #[serde(default, deserialize_with = "lenient_page_count")]
    pub total_pages: u32,
}

/// Treats an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageCount {
    Whole(i64),
    Fractional(f64),
}

/// Accepts `5`, `5.0`, `4.2` (rounded up), negatives and `null` (as 0).
fn lenient_page_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<PageCount>::deserialize(deserializer)? {
        None => 0,
        Some(PageCount::Whole(n)) => n.clamp(0, i64::from(u32::MAX)) as u32,
        Some(PageCount::Fractional(n)) if n.is_finite() && n > 0.0 => {
            n.ceil().min(f64::from(u32::MAX)) as u32
        }
        Some(PageCount::Fractional(_)) => 0,
    };
    Ok(count)
}

impl ProductsResponse {
    pub fn into_page(self, page: u32, page_size: u32) -> PageResult {
        let products = self
            .products
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record.into_product(ProductId::page_relative(page, page_size, index))
            })
            .collect();
        PageResult {
            page,
            products,
            total_pages: self.total_pages,
        }
    }
}
