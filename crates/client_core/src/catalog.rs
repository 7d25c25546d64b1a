use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{PageResult, Product, ProductId},
    error::CatalogError,
    protocol::{ProductsQuery, ProductsResponse, PRODUCTS_PATH},
};
use tracing::{debug, info};

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://catalog-management-system-dev-ak3ogf6zea-uc.a.run.app";

// An id lookup is sent as a regular first-page request with an `id` filter.
const LOOKUP_PAGE: u32 = 1;
const LOOKUP_LIMIT: u32 = 10;

/// Source of catalog pages and single products.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PageResult, CatalogError>;
    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct CatalogClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| CatalogError::network(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_products(&self, query: &ProductsQuery) -> Result<ProductsResponse, CatalogError> {
        let response = self
            .http
            .get(format!("{}{PRODUCTS_PATH}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Network {
                message: format!("unexpected status {status}"),
                status: Some(status.as_u16()),
            });
        }

        response.json::<ProductsResponse>().await.map_err(|err| {
            if err.is_decode() {
                CatalogError::Decode(err.to_string())
            } else {
                map_transport_error(err)
            }
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> CatalogError {
    CatalogError::Network {
        message: err.to_string(),
        status: err.status().map(|status| status.as_u16()),
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PageResult, CatalogError> {
        let query = ProductsQuery {
            page,
            limit: page_size,
            id: None,
        };
        let response = self
            .retry
            .run("fetch_page", || self.request_products(&query))
            .await?;
        let result = response.into_page(page, page_size);
        debug!(
            page,
            page_size,
            products = result.products.len(),
            total_pages = result.total_pages,
            "catalog: page fetched"
        );
        Ok(result)
    }

    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let query = ProductsQuery {
            page: LOOKUP_PAGE,
            limit: LOOKUP_LIMIT,
            id: Some(id.0),
        };
        let response = match self
            .retry
            .run("fetch_by_id", || self.request_products(&query))
            .await
        {
            Ok(response) => response,
            Err(CatalogError::Network {
                status: Some(status),
                ..
            }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(CatalogError::NotFound(id));
            }
            Err(err) => return Err(err),
        };

        match response.products.into_iter().next() {
            Some(record) => Ok(record.into_product(id)),
            None => {
                info!(product_id = id.0, "catalog: no record matches id");
                Err(CatalogError::NotFound(id))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
