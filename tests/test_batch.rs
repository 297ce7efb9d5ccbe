mod common;

use common::{product_page, profile, MockFetcher, BASE};
use std::sync::Arc;
use watch_scout::scrapers::BatchRunner;

fn product_urls(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{BASE}/products/w{i}")).collect()
}

#[tokio::test]
async fn twenty_five_urls_make_three_batches() {
    let urls = product_urls(25);
    let fetcher = urls.iter().enumerate().fold(MockFetcher::new(), |f, (i, url)| {
        f.with_page(url, product_page(&format!("Omega Seamaster {i}"), "CHF 4,200", &[]))
    });
    let fetcher = Arc::new(fetcher);

    let runner = BatchRunner::new(fetcher.clone(), profile()).unwrap();
    let report = runner.run_all(&urls).await;

    assert_eq!(report.batches, 3);
    assert_eq!(report.pauses, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(fetcher.calls(), 25);

    let sources: Vec<&str> = report.records.iter().map(|r| r.source_url.as_str()).collect();
    let expected: Vec<&str> = urls.iter().map(String::as_str).collect();
    assert_eq!(sources, expected);
    assert!(report.records.iter().all(|r| r.brand == "Omega" && r.price == 4200.0));
}

#[tokio::test]
async fn failures_are_dropped_without_affecting_siblings() {
    let urls = product_urls(4);
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_page(&urls[0], product_page("Rolex Datejust", "CHF 7'500", &[]))
            .with_page(&urls[2], product_page("Tudor Pelagos", "CHF 3'900", &["Unworn"])),
    );

    let runner = BatchRunner::new(fetcher, profile()).unwrap();
    let report = runner.run_all(&urls).await;

    assert_eq!(report.batches, 1);
    assert_eq!(report.pauses, 0);
    assert_eq!(report.failed, 2);
    let models: Vec<&str> = report.records.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["Rolex Datejust", "Tudor Pelagos"]);
}

#[tokio::test]
async fn empty_input_does_nothing() {
    let fetcher = Arc::new(MockFetcher::new());
    let runner = BatchRunner::new(fetcher.clone(), profile()).unwrap();
    let report = runner.run_all(&[]).await;

    assert_eq!(report.batches, 0);
    assert!(report.records.is_empty());
    assert_eq!(fetcher.calls(), 0);
}
