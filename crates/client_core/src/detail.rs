use shared::{
    domain::{Navigation, Product, ProductId},
    error::CatalogError,
};
use tracing::{info, warn};

use crate::catalog::CatalogSource;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Loading,
    Ready(Product),
    NotFound,
    /// The lookup itself failed; rendered like `NotFound`.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub product: Option<Product>,
    pub loading: bool,
    pub not_found: bool,
    pub error: Option<String>,
}

pub struct ProductDetailController {
    product_id: ProductId,
    status: DetailStatus,
}

impl ProductDetailController {
    /// A product handed over by the list is shown as-is; otherwise the
    /// controller starts in `Loading` and waits for [`load`](Self::load).
    pub fn open(navigation: Navigation) -> Self {
        let status = match navigation.product {
            Some(product) => DetailStatus::Ready(product),
            None => DetailStatus::Loading,
        };
        Self {
            product_id: navigation.product_id,
            status,
        }
    }

    pub fn for_id(product_id: ProductId) -> Self {
        Self::open(Navigation {
            product_id,
            product: None,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    /// Looks the product up when it was not handed over. Terminal states are
    /// never retried.
    pub async fn load(&mut self, source: &dyn CatalogSource) -> &DetailStatus {
        if self.status != DetailStatus::Loading {
            return &self.status;
        }

        self.status = match source.fetch_by_id(self.product_id).await {
            Ok(product) => DetailStatus::Ready(product),
            Err(CatalogError::NotFound(id)) => {
                info!(product_id = id.0, "detail: product not found");
                DetailStatus::NotFound
            }
            Err(err) => {
                warn!(product_id = self.product_id.0, error = %err, "detail: lookup failed");
                DetailStatus::Unavailable(err.to_string())
            }
        };
        &self.status
    }

    pub fn view(&self) -> DetailView {
        match &self.status {
            DetailStatus::Loading => DetailView {
                product: None,
                loading: true,
                not_found: false,
                error: None,
            },
            DetailStatus::Ready(product) => DetailView {
                product: Some(product.clone()),
                loading: false,
                not_found: false,
                error: None,
            },
            DetailStatus::NotFound => DetailView {
                product: None,
                loading: false,
                not_found: true,
                error: None,
            },
            DetailStatus::Unavailable(reason) => DetailView {
                product: None,
                loading: false,
                not_found: true,
                error: Some(reason.clone()),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
