use std::sync::atomic::{AtomicU32, Ordering};

use super::*;
use async_trait::async_trait;
use shared::domain::PageResult;

struct LookupCatalog {
    lookups: AtomicU32,
    known: Vec<u64>,
    offline: bool,
}

impl LookupCatalog {
    fn with_known(known: Vec<u64>) -> Self {
        Self {
            lookups: AtomicU32::new(0),
            known,
            offline: false,
        }
    }

    fn offline() -> Self {
        Self {
            lookups: AtomicU32::new(0),
            known: Vec::new(),
            offline: true,
        }
    }
}

fn product(id: u64) -> Product {
    Product {
        id: ProductId(id),
        name: format!("product-{id}"),
        brand: "House".to_string(),
        category: "Dairy".to_string(),
        price: Some(2.5),
        image: None,
        description: "fresh".to_string(),
    }
}

#[async_trait]
impl CatalogSource for LookupCatalog {
    async fn fetch_page(&self, page: u32, _page_size: u32) -> Result<PageResult, CatalogError> {
        Ok(PageResult {
            page,
            products: Vec::new(),
            total_pages: 0,
        })
    }

    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(CatalogError::network("dns error: no such host"));
        }
        if self.known.contains(&id.0) {
            Ok(product(id.0))
        } else {
            Err(CatalogError::NotFound(id))
        }
    }
}

#[tokio::test]
async fn handed_over_product_is_ready_without_lookup() {
    let catalog = LookupCatalog::with_known(vec![7]);
    let mut detail = ProductDetailController::open(Navigation {
        product_id: ProductId(7),
        product: Some(product(7)),
    });

    let view = detail.view();
    assert!(!view.loading);
    assert_eq!(view.product.map(|p| p.name), Some("product-7".to_string()));

    detail.load(&catalog).await;
    assert_eq!(catalog.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_product_is_looked_up_by_id() {
    let catalog = LookupCatalog::with_known(vec![4]);
    let mut detail = ProductDetailController::for_id(ProductId(4));
    assert!(detail.view().loading);

    let status = detail.load(&catalog).await;
    assert_eq!(status, &DetailStatus::Ready(product(4)));
    assert_eq!(detail.product_id(), ProductId(4));
    assert_eq!(catalog.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn nonexistent_id_ends_in_not_found() {
    let catalog = LookupCatalog::with_known(vec![1]);
    let mut detail = ProductDetailController::for_id(ProductId(999));

    detail.load(&catalog).await;
    let view = detail.view();
    assert_eq!(detail.status(), &DetailStatus::NotFound);
    assert!(view.not_found);
    assert!(!view.loading);
    assert!(view.error.is_none());

    detail.load(&catalog).await;
    assert_eq!(catalog.lookups.load(Ordering::SeqCst), 1, "terminal, no retry");
}

#[tokio::test]
async fn lookup_failure_renders_as_not_found_with_reason() {
    let catalog = LookupCatalog::offline();
    let mut detail = ProductDetailController::for_id(ProductId(2));

    detail.load(&catalog).await;
    let view = detail.view();
    assert!(matches!(detail.status(), DetailStatus::Unavailable(_)));
    assert!(view.not_found);
    assert!(view
        .error
        .as_deref()
        .is_some_and(|reason| reason.contains("dns error")));
}
