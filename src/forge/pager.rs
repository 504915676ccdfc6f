//! Cursor over paginated forge listings.
use std::future::Future;

use crate::{Result, forge::request::Page};

/// First page, and the sentinel meaning "no more pages".
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size for paginated queries
pub const DEFAULT_PER_PAGE: u32 = 20;
/// Largest page size GitLab will honor
pub const MAX_PER_PAGE: u32 = 100;

/// Page cursor for a listing endpoint.
///
/// The page is advanced from the server's next page hint after every
/// fetch. A missing hint resets the cursor to [`DEFAULT_PAGE`], which
/// fetch loops read as "done".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    per_page: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pager {
    /// Create a cursor, replacing invalid values with defaults.
    pub fn new(page: u32, per_page: u32) -> Self {
        let page = if page < DEFAULT_PAGE { DEFAULT_PAGE } else { page };

        let per_page = if per_page < DEFAULT_PER_PAGE {
            DEFAULT_PER_PAGE
        } else {
            per_page.min(MAX_PER_PAGE)
        };

        Self { page, per_page }
    }

    /// First page with the given page size.
    pub fn with_per_page(per_page: u32) -> Self {
        Self::new(DEFAULT_PAGE, per_page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Move to the page the server reported next.
    pub fn advance(&mut self, next_page: Option<u32>) {
        self.page = match next_page {
            Some(page) if page > DEFAULT_PAGE => page,
            _ => DEFAULT_PAGE,
        };
    }

    /// Whether the last advance pointed at another page.
    pub fn has_next(&self) -> bool {
        self.page != DEFAULT_PAGE
    }
}

/// Fetch every page of a listing, starting at `pager`, and concatenate
/// the items in order. An error on any page discards everything fetched
/// so far.
pub async fn collect_all<T, F, Fut>(mut pager: Pager, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Pager) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = vec![];

    loop {
        let page = fetch(pager).await?;
        log::debug!(
            "fetched page {} ({} items), next page: {:?}",
            pager.page(),
            page.items.len(),
            page.next_page
        );
        items.extend(page.items);
        pager.advance(page.next_page);

        if !pager.has_next() {
            break;
        }
    }

    Ok(items)
}
