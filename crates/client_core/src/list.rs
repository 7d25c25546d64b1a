//! Product list: reducer-style state plus the async driver that runs its
//! fetch effects and feeds settled search input back in.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Navigation, PageResult, Product, ProductId, SortSpec},
    error::{CatalogError, ErrorCode},
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogSource,
    debounce::DebouncedValue,
    filter::{derive, FilterCriteria},
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Identifies one issued fetch. Only the latest ticket's result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Empty,
}

#[derive(Debug, Clone)]
pub enum ListEvent {
    Mounted,
    Refresh,
    PageChanged(u32),
    SearchSettled(String),
    CategoryChanged(Option<String>),
    SortChanged(Option<SortSpec>),
    FetchSucceeded {
        ticket: FetchTicket,
        page: PageResult,
    },
    FetchFailed {
        ticket: FetchTicket,
        error: CatalogError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    FetchPage {
        ticket: FetchTicket,
        page: u32,
        page_size: u32,
    },
}

/// What the display layer renders.
#[derive(Debug, Clone)]
pub struct ListView {
    pub rows: Vec<Product>,
    pub loading: bool,
    pub page: u32,
    pub total_pages: u32,
    pub categories: Vec<String>,
    pub error: Option<CatalogError>,
}

impl ListView {
    /// Why nothing is shown, once loading has stopped.
    pub fn empty_reason(&self) -> Option<ErrorCode> {
        if self.loading || !self.rows.is_empty() {
            return None;
        }
        Some(
            self.error
                .as_ref()
                .map_or(ErrorCode::EmptyResult, CatalogError::code),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProductListState {
    page: u32,
    page_size: u32,
    criteria: FilterCriteria,
    page_result: Option<PageResult>,
    categories: Vec<String>,
    rows: Vec<Product>,
    status: ListStatus,
    issued_tickets: u64,
    latest_ticket: Option<FetchTicket>,
    last_error: Option<CatalogError>,
    selected: Option<ProductId>,
}

impl ProductListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            criteria: FilterCriteria::default(),
            page_result: None,
            categories: Vec::new(),
            rows: Vec::new(),
            status: ListStatus::Loading,
            issued_tickets: 0,
            latest_ticket: None,
            last_error: None,
            selected: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page_result(&self) -> Option<&PageResult> {
        self.page_result.as_ref()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn rows(&self) -> &[Product] {
        &self.rows
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    pub fn latest_ticket(&self) -> Option<FetchTicket> {
        self.latest_ticket
    }

    pub fn apply(&mut self, event: ListEvent) -> Vec<ListEffect> {
        match event {
            ListEvent::Mounted | ListEvent::Refresh => self.start_fetch(),
            ListEvent::PageChanged(page) => {
                if page == 0 || page == self.page {
                    return Vec::new();
                }
                self.page = page;
                self.start_fetch()
            }
            ListEvent::SearchSettled(search_text) => {
                self.criteria.search_text = search_text;
                self.criteria_changed();
                Vec::new()
            }
            ListEvent::CategoryChanged(category) => {
                self.criteria.category = category.filter(|category| !category.is_empty());
                self.criteria_changed();
                Vec::new()
            }
            ListEvent::SortChanged(sort) => {
                self.criteria.sort = sort;
                self.criteria_changed();
                Vec::new()
            }
            ListEvent::FetchSucceeded { ticket, page } => {
                if !self.is_latest(ticket) {
                    debug!(?ticket, page = page.page, "list: dropping stale page");
                    return Vec::new();
                }
                self.categories = page.categories();
                self.page_result = Some(page);
                self.last_error = None;
                self.selected = None;
                self.rederive();
                Vec::new()
            }
            ListEvent::FetchFailed { ticket, error } => {
                if !self.is_latest(ticket) {
                    debug!(?ticket, error = %error, "list: dropping stale failure");
                    return Vec::new();
                }
                warn!(page = self.page, error = %error, "list: page fetch failed");
                self.rows.clear();
                self.last_error = Some(error);
                self.status = ListStatus::Empty;
                Vec::new()
            }
        }
    }

    /// Resolves a clicked row against the loaded page. Returns `None` when
    /// the row is already the selected one.
    pub fn row_clicked(&mut self, id: ProductId) -> Option<Navigation> {
        if self.selected == Some(id) {
            return None;
        }
        self.selected = Some(id);
        let product = self
            .current_page()
            .and_then(|page| page.find(id))
            .cloned();
        if product.is_none() {
            debug!(product_id = id.0, "list: clicked row not in loaded page");
        }
        Some(Navigation {
            product_id: id,
            product,
        })
    }

    /// Returning from the detail view; the same row can be opened again.
    pub fn detail_closed(&mut self) {
        self.selected = None;
    }

    pub fn view(&self) -> ListView {
        ListView {
            rows: self.rows.clone(),
            loading: self.status == ListStatus::Loading,
            page: self.page,
            total_pages: self.page_result.as_ref().map_or(0, |page| page.total_pages),
            categories: self.categories.clone(),
            error: self.last_error.clone(),
        }
    }

    fn start_fetch(&mut self) -> Vec<ListEffect> {
        self.issued_tickets += 1;
        let ticket = FetchTicket(self.issued_tickets);
        self.latest_ticket = Some(ticket);
        self.status = ListStatus::Loading;
        info!(page = self.page, page_size = self.page_size, ?ticket, "list: fetching page");
        vec![ListEffect::FetchPage {
            ticket,
            page: self.page,
            page_size: self.page_size,
        }]
    }

    fn is_latest(&self, ticket: FetchTicket) -> bool {
        self.latest_ticket == Some(ticket)
    }

    fn current_page(&self) -> Option<&PageResult> {
        self.page_result
            .as_ref()
            .filter(|result| result.page == self.page)
    }

    fn criteria_changed(&mut self) {
        // A pending fetch derives with the new criteria when it lands.
        if self.status == ListStatus::Loading || self.current_page().is_none() {
            return;
        }
        self.rederive();
    }

    fn rederive(&mut self) {
        self.rows = match self.current_page() {
            Some(page) => derive(&page.products, &self.criteria),
            None => Vec::new(),
        };
        self.status = if self.rows.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Ready
        };
        debug!(rows = self.rows.len(), criteria = ?self.criteria, "list: rows derived");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

enum Wake {
    Event(ListEvent),
    SearchSettled,
}

/// Drives [`ProductListState`]: fetch effects run as tasks that post their
/// outcome back through a channel, raw search text goes through a
/// [`DebouncedValue`].
pub struct ProductListController {
    state: ProductListState,
    source: Arc<dyn CatalogSource>,
    search: DebouncedValue<String>,
    search_rx: watch::Receiver<String>,
    events_tx: mpsc::UnboundedSender<ListEvent>,
    events_rx: mpsc::UnboundedReceiver<ListEvent>,
    inflight: Option<(FetchTicket, JoinHandle<()>)>,
}

impl ProductListController {
    pub fn new(source: Arc<dyn CatalogSource>, config: ListConfig) -> Self {
        let search = DebouncedValue::new(String::new(), config.search_debounce);
        let search_rx = search.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: ProductListState::new(config.page_size),
            source,
            search,
            search_rx,
            events_tx,
            events_rx,
            inflight: None,
        }
    }

    pub fn state(&self) -> &ProductListState {
        &self.state
    }

    pub fn view(&self) -> ListView {
        self.state.view()
    }

    pub fn is_fetching(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn mount(&mut self) {
        self.dispatch(ListEvent::Mounted);
    }

    pub fn refresh(&mut self) {
        self.dispatch(ListEvent::Refresh);
    }

    pub fn set_page(&mut self, page: u32) {
        self.dispatch(ListEvent::PageChanged(page));
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.dispatch(ListEvent::CategoryChanged(category));
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.dispatch(ListEvent::SortChanged(sort));
    }

    /// Raw keystroke input; reaches the rows once the debounce settles and
    /// [`next_event`](Self::next_event) picks it up.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.set(text.into());
    }

    pub fn row_clicked(&mut self, id: ProductId) -> Option<Navigation> {
        self.state.row_clicked(id)
    }

    pub fn detail_closed(&mut self) {
        self.state.detail_closed();
    }

    pub fn dispatch(&mut self, event: ListEvent) {
        if let ListEvent::FetchSucceeded { ticket, .. } | ListEvent::FetchFailed { ticket, .. } =
            &event
        {
            if self
                .inflight
                .as_ref()
                .is_some_and(|(inflight, _)| inflight == ticket)
            {
                self.inflight = None;
            }
        }

        for effect in self.state.apply(event) {
            self.run_effect(effect);
        }
    }

    /// Waits for the next fetch completion or settled search value and
    /// applies it.
    pub async fn next_event(&mut self) {
        let wake = tokio::select! {
            event = self.events_rx.recv() => event.map(Wake::Event),
            changed = self.search_rx.changed() => changed.ok().map(|()| Wake::SearchSettled),
        };

        match wake {
            Some(Wake::Event(event)) => self.dispatch(event),
            Some(Wake::SearchSettled) => {
                let text = self.search_rx.borrow_and_update().clone();
                self.dispatch(ListEvent::SearchSettled(text));
            }
            None => {}
        }
    }

    /// Processes events until no fetch is in flight.
    pub async fn wait_until_loaded(&mut self) {
        while self.inflight.is_some() {
            self.next_event().await;
        }
    }

    fn run_effect(&mut self, effect: ListEffect) {
        match effect {
            ListEffect::FetchPage {
                ticket,
                page,
                page_size,
            } => {
                let source = Arc::clone(&self.source);
                let events_tx = self.events_tx.clone();
                let handle = tokio::spawn(async move {
                    let event = match source.fetch_page(page, page_size).await {
                        Ok(page) => ListEvent::FetchSucceeded { ticket, page },
                        Err(error) => ListEvent::FetchFailed { ticket, error },
                    };
                    let _ = events_tx.send(event);
                });
                if let Some((superseded, previous)) = self.inflight.replace((ticket, handle)) {
                    debug!(?superseded, "list: aborting superseded fetch");
                    previous.abort();
                }
            }
        }
    }
}

impl Drop for ProductListController {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.inflight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
