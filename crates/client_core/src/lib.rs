//! Catalog browsing core: paginated fetching, page-local search/filter/sort
//! and the list and detail controllers built on top of them.

pub mod catalog;
pub mod debounce;
pub mod detail;
pub mod filter;
pub mod list;
pub mod retry;

pub use catalog::{CatalogClient, CatalogClientConfig, CatalogSource, DEFAULT_BASE_URL};
pub use debounce::DebouncedValue;
pub use detail::{DetailStatus, DetailView, ProductDetailController};
pub use filter::{derive, FilterCriteria};
pub use list::{
    FetchTicket, ListConfig, ListEffect, ListEvent, ListStatus, ListView, ProductListController,
    ProductListState,
};
pub use retry::RetryPolicy;
