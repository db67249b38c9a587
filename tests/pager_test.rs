use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use fbcli::error::{GraphError, GraphResult, RemoteApiError};
use fbcli::graph::pager::{self, ItemFilter, PageSource, PageWalker};
use fbcli::types::{Item, Page};

/// In-memory page source. Cursors are stringified page indices; `next_page`
/// follows them, and every fetch is counted so tests can assert how many
/// pages were actually pulled.
struct FakeSource {
    pages: Vec<Page>,
    fetches: AtomicUsize,
    fail_on_fetch: Option<usize>,
}

impl FakeSource {
    fn new(pages: Vec<Page>) -> Self {
        FakeSource {
            pages,
            fetches: AtomicUsize::new(0),
            fail_on_fetch: None,
        }
    }

    fn failing_at(mut self, fetch: usize) -> Self {
        self.fail_on_fetch = Some(fetch);
        self
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn fetch(&self, index: usize) -> GraphResult<Page> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_fetch == Some(n) {
            return Err(RemoteApiError {
                kind: "OAuthException".to_string(),
                code: Some(190),
                subcode: None,
                http_status: 400,
                message: "simulated failure".to_string(),
                trace_id: None,
            }
            .into());
        }
        Ok(self.pages[index].clone())
    }
}

#[async_trait]
impl PageSource for &FakeSource {
    async fn first_page(&self) -> GraphResult<Page> {
        self.fetch(0)
    }

    async fn next_page(&self, cursor: &str) -> GraphResult<Page> {
        self.fetch(cursor.parse().unwrap())
    }
}

fn item(name: &str) -> Item {
    json!({ "name": name }).as_object().unwrap().clone()
}

/// Pages of the given sizes, items named `p{page}i{index}`, chained by
/// cursors; the last page carries none.
fn pages(sizes: &[usize]) -> Vec<Page> {
    sizes
        .iter()
        .enumerate()
        .map(|(p, &size)| Page {
            items: (0..size).map(|i| item(&format!("p{}i{}", p, i))).collect(),
            next: (p + 1 < sizes.len()).then(|| (p + 1).to_string()),
        })
        .collect()
}

async fn collect(
    walker: &mut PageWalker<&FakeSource>,
    separator: Option<&str>,
) -> GraphResult<Vec<(Option<String>, String)>> {
    let mut emitted = Vec::new();
    pager::emit_all(walker, separator, |sep, item| {
        emitted.push((
            sep.map(str::to_string),
            item["name"].as_str().unwrap().to_string(),
        ));
    })
    .await?;
    Ok(emitted)
}

fn names(emitted: &[(Option<String>, String)]) -> Vec<&str> {
    emitted.iter().map(|(_, name)| name.as_str()).collect()
}

#[tokio::test]
async fn page_limit_bounds_fetches() {
    let source = FakeSource::new(pages(&[2, 2, 2]));
    let mut walker = PageWalker::new(&source, 2);

    let emitted = collect(&mut walker, None).await.unwrap();
    assert_eq!(names(&emitted), vec!["p0i0", "p0i1", "p1i0", "p1i1"]);
    assert_eq!(source.fetches(), 2);
    assert_eq!(walker.pages_consumed(), 2);
}

#[tokio::test]
async fn limit_larger_than_collection_stops_at_cursor_exhaustion() {
    let source = FakeSource::new(pages(&[1, 1]));
    let mut walker = PageWalker::new(&source, 10);

    let emitted = collect(&mut walker, None).await.unwrap();
    assert_eq!(emitted.len(), 2);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn negative_limit_walks_every_page() {
    let source = FakeSource::new(pages(&[1, 1, 1, 1, 1]));
    let mut walker = PageWalker::new(&source, -1);

    let emitted = collect(&mut walker, None).await.unwrap();
    assert_eq!(emitted.len(), 5);
    assert_eq!(source.fetches(), 5);
}

#[tokio::test]
async fn zero_pages_never_fetches() {
    let source = FakeSource::new(pages(&[3, 3]));
    let mut walker = PageWalker::new(&source, 0);

    let emitted = collect(&mut walker, Some("-")).await.unwrap();
    assert!(emitted.is_empty());
    assert_eq!(source.fetches(), 0);
    assert_eq!(walker.pages_consumed(), 0);
}

#[tokio::test]
async fn filtered_items_are_never_emitted() {
    let source = FakeSource::new(pages(&[2, 2]));
    let filter: ItemFilter = Box::new(|item| item["name"].as_str().unwrap().ends_with("i0"));
    let mut walker = PageWalker::new(&source, -1).with_filter(filter);

    let emitted = collect(&mut walker, None).await.unwrap();
    assert_eq!(names(&emitted), vec!["p0i1", "p1i1"]);
}

#[tokio::test]
async fn separator_appears_between_consecutive_items_only() {
    let source = FakeSource::new(pages(&[2, 1]));
    let mut walker = PageWalker::new(&source, -1);

    let emitted = collect(&mut walker, Some("- - -")).await.unwrap();
    assert_eq!(emitted.len(), 3);
    assert_eq!(emitted[0].0, None);
    assert_eq!(emitted[1].0.as_deref(), Some("- - -"));
    assert_eq!(emitted[2].0.as_deref(), Some("- - -"));

    let separators = emitted.iter().filter(|(sep, _)| sep.is_some()).count();
    assert_eq!(separators, emitted.len() - 1);
}

#[tokio::test]
async fn single_item_gets_no_separator() {
    let source = FakeSource::new(pages(&[1]));
    let mut walker = PageWalker::new(&source, -1);

    let emitted = collect(&mut walker, Some("-")).await.unwrap();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].0, None);
}

#[tokio::test]
async fn two_pages_with_filtered_first_item_of_second_page() {
    // Three pages of sizes 2, 2, 1; the filter rejects the first item of
    // page two; with a limit of 2 exactly three items come out and the
    // third page is never fetched.
    let source = FakeSource::new(pages(&[2, 2, 1]));
    let filter: ItemFilter = Box::new(|item| item["name"].as_str().unwrap() == "p1i0");
    let mut walker = PageWalker::new(&source, 2).with_filter(filter);

    let emitted = collect(&mut walker, Some("- - -")).await.unwrap();
    assert_eq!(names(&emitted), vec!["p0i0", "p0i1", "p1i1"]);
    assert_eq!(source.fetches(), 2);

    // Separator bookkeeping survives the page boundary and the rejection.
    let separators = emitted.iter().filter(|(sep, _)| sep.is_some()).count();
    assert_eq!(separators, 2);
}

#[tokio::test]
async fn empty_page_with_cursor_is_continuable() {
    let pages = vec![
        Page {
            items: Vec::new(),
            next: Some("1".to_string()),
        },
        Page {
            items: vec![item("only")],
            next: None,
        },
    ];
    let source = FakeSource::new(pages);
    let mut walker = PageWalker::new(&source, -1);

    let emitted = collect(&mut walker, None).await.unwrap();
    assert_eq!(names(&emitted), vec!["only"]);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn fetch_error_aborts_the_walk() {
    let source = FakeSource::new(pages(&[1, 1])).failing_at(1);
    let mut walker = PageWalker::new(&source, -1);

    let first = walker.next().await.unwrap();
    assert_eq!(first.unwrap()["name"], "p0i0");

    let err = walker.next().await.unwrap_err();
    assert!(matches!(err, GraphError::RemoteApi(_)));

    // The walker stays exhausted; nothing is refetched.
    assert!(walker.next().await.unwrap().is_none());
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn first_fetch_error_emits_nothing() {
    let source = FakeSource::new(pages(&[1])).failing_at(0);
    let mut walker = PageWalker::new(&source, -1);

    let mut called = false;
    let result = pager::emit_all(&mut walker, None, |_, _| called = true).await;
    assert!(result.is_err());
    assert!(!called);
}
