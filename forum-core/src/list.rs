//! Paginated resource list state.
//!
//! Every fetch goes through a [`FetchTicket`]. Only the most recently issued
//! ticket may change the list, so a slow response for an old page can never
//! overwrite a newer one.

use crate::models::Page;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub search: String,
}

impl PageQuery {
    pub fn new(page: u32, size: u32, search: impl Into<String>) -> Self {
        Self {
            page,
            size: size.max(1),
            search: search.into(),
        }
    }

    /// Query-string pairs in the order the backend expects them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("search", self.search.clone()),
        ]
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_params())
            .finish()
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, "")
    }
}

/// Handle of one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: PageQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

/// Outcome of [`ResourceList::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A newer ticket was issued; nothing changed.
    Stale,
    Applied,
    /// The page fell past the end (e.g. its last row was deleted) and was
    /// moved back to the last page, which still has to be fetched.
    Clamped,
}

impl Completion {
    /// Whether the list changed.
    pub fn applied(&self) -> bool {
        !matches!(self, Completion::Stale)
    }

    pub fn needs_refetch(&self) -> bool {
        matches!(self, Completion::Clamped)
    }
}

/// What a list screen should draw right now.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Error(&'a str),
    Empty,
    Items(&'a [T]),
}

#[derive(Debug, Clone)]
pub struct ResourceList<T> {
    items: Vec<T>,
    page: u32,
    size: u32,
    total_pages: u32,
    search: String,
    loading: bool,
    error: Option<String>,
    issued: u64,
}

impl<T> ResourceList<T> {
    pub fn new(size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            size: size.max(1),
            total_pages: 0,
            search: String::new(),
            loading: false,
            error: None,
            issued: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.size, self.search.clone())
    }

    /// Starts a fetch for the current query and supersedes any earlier ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            seq: self.issued,
            query: self.query(),
        }
    }

    /// Applies a fetch result if `ticket` is still the newest one.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Page<T>, String>) -> Completion {
        if ticket.seq != self.issued {
            tracing::debug!(
                "Dropping stale page response (ticket {}, newest {})",
                ticket.seq,
                self.issued
            );
            return Completion::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.content;
                self.total_pages = page.total_pages;
                self.error = None;
                if self.total_pages > 0 && self.page >= self.total_pages {
                    tracing::debug!(
                        "Page {} is past the end, moving to page {}",
                        self.page,
                        self.total_pages - 1
                    );
                    self.page = self.total_pages - 1;
                    return Completion::Clamped;
                }
            }
            Err(message) => {
                self.items.clear();
                self.total_pages = 0;
                self.error = Some(message);
            }
        }
        Completion::Applied
    }

    /// Back to an empty first page with no filter, for a new data source.
    ///
    /// Fetches already in flight are invalidated.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.items.clear();
        self.page = 0;
        self.total_pages = 0;
        self.search.clear();
        self.loading = false;
        self.error = None;
    }

    /// Changes the filter. A new filter always starts from the first page.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.page = 0;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.page < self.total_pages - 1
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jumps to `page`, clamped to the known range.
    pub fn go_to(&mut self, page: u32) -> bool {
        let last = self.total_pages.saturating_sub(1);
        let target = page.min(last);
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.total_pages.max(1))
    }

    pub fn view(&self) -> ListView<'_, T> {
        if self.loading {
            ListView::Loading
        } else if let Some(error) = &self.error {
            ListView::Error(error)
        } else if self.items.is_empty() {
            ListView::Empty
        } else {
            ListView::Items(&self.items)
        }
    }
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
