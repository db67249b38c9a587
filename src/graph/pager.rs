//! Cursor pagination over Graph connections.
//!
//! The walker is a pull-based lazy sequence: callers ask for one accepted
//! item at a time and pages are fetched only when needed. A walk is finite
//! (bounded by the page limit or cursor exhaustion) and not restartable;
//! any fetch error leaves the walker exhausted.

use async_trait::async_trait;

use crate::{
    error::GraphResult,
    types::{Item, Page},
};

/// Per-item predicate. Returns `true` to reject the item, `false` (or no
/// filter at all) to keep it.
pub type ItemFilter = Box<dyn Fn(&Item) -> bool + Send + Sync>;

/// Something that can produce the first page of a collection and follow
/// its cursors. Implemented by [`crate::graph::client::ConnectionQuery`];
/// tests substitute in-memory sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn first_page(&self) -> GraphResult<Page>;
    async fn next_page(&self, cursor: &str) -> GraphResult<Page>;
}

enum WalkState {
    NotStarted,
    InPage {
        items: std::vec::IntoIter<Item>,
        next: Option<String>,
    },
    Exhausted,
}

/// Lazy traversal of a paginated collection.
///
/// Page-limit contract: the initial fetch counts as page one, so
/// `max_pages == 0` consumes zero pages and never fetches anything, and
/// `max_pages == 1` renders exactly the first page. Any negative limit
/// means unlimited: the walk continues until a page arrives without a
/// cursor.
pub struct PageWalker<S> {
    source: S,
    max_pages: i64,
    filter: Option<ItemFilter>,
    pages_consumed: u32,
    state: WalkState,
}

impl<S: PageSource> PageWalker<S> {
    pub fn new(source: S, max_pages: i64) -> Self {
        PageWalker {
            source,
            max_pages,
            filter: None,
            pages_consumed: 0,
            state: WalkState::NotStarted,
        }
    }

    pub fn with_filter(mut self, filter: ItemFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Pages fetched so far. Never exceeds a non-negative `max_pages`.
    pub fn pages_consumed(&self) -> u32 {
        self.pages_consumed
    }

    /// The next accepted item, or `None` once the walk is over.
    ///
    /// A fetch failure aborts the walk: the error is returned once and the
    /// walker stays exhausted afterwards. Items already handed out are not
    /// retracted.
    pub async fn next(&mut self) -> GraphResult<Option<Item>> {
        loop {
            // Leave the walker exhausted across every await so an error
            // mid-fetch cannot resume a half-consumed page.
            match std::mem::replace(&mut self.state, WalkState::Exhausted) {
                WalkState::NotStarted => {
                    if self.max_pages == 0 {
                        return Ok(None);
                    }
                    let page = self.source.first_page().await?;
                    self.state = WalkState::InPage {
                        items: page.items.into_iter(),
                        next: page.next,
                    };
                }
                WalkState::InPage { mut items, next } => {
                    while let Some(item) = items.next() {
                        let rejected = self.filter.as_ref().is_some_and(|f| f(&item));
                        if !rejected {
                            self.state = WalkState::InPage { items, next };
                            return Ok(Some(item));
                        }
                    }

                    self.pages_consumed += 1;
                    if self.max_pages >= 0 && i64::from(self.pages_consumed) >= self.max_pages {
                        return Ok(None);
                    }
                    let Some(cursor) = next else {
                        return Ok(None);
                    };
                    let page = self.source.next_page(&cursor).await?;
                    self.state = WalkState::InPage {
                        items: page.items.into_iter(),
                        next: page.next,
                    };
                }
                WalkState::Exhausted => return Ok(None),
            }
        }
    }
}

/// Drives a walker to exhaustion, calling `emit` once per accepted item.
///
/// `emit` receives `Some(separator)` only between two consecutive items:
/// never before the first, never after the last, and rejected items leave
/// no trace. Returns the number of items emitted.
pub async fn emit_all<S, F>(
    walker: &mut PageWalker<S>,
    separator: Option<&str>,
    mut emit: F,
) -> GraphResult<usize>
where
    S: PageSource,
    F: FnMut(Option<&str>, &Item),
{
    let mut emitted = 0usize;
    while let Some(item) = walker.next().await? {
        let sep = if emitted > 0 { separator } else { None };
        emit(sep, &item);
        emitted += 1;
    }
    Ok(emitted)
}
