//! Integration tests for the two-pass substitute/resolve cycle.
//!
//! These tests drive `EquationCache` the way a document build does: mint
//! placeholders while assembling text, resolve them, flush, and start the
//! next build from the persisted cache.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eqcache_core::{EquationCache, EquationStore, OutputMode};
use eqcache_engine::test_utils::SpyLauncher;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

fn open_cache(dir: &TempDir, spy: &SpyLauncher) -> EquationCache<SpyLauncher> {
    let store = EquationStore::load(dir.path().join("equations.json"));
    EquationCache::new(store, spy.clone())
}

fn build_document(cache: &EquationCache<SpyLauncher>) -> String {
    format!(
        "<p>Euler: {}</p>\n<div>{}</div>\n<p>Again: {}</p>",
        cache.make_placeholder("e^{i\\pi} + 1 = 0", true),
        cache.make_placeholder("\\int_0^1 x\\,dx", false),
        cache.make_placeholder("e^{i\\pi} + 1 = 0", true),
    )
}

/// Collects the messages of WARN events.
#[derive(Clone, Default)]
struct WarnCollector(Arc<Mutex<Vec<String>>>);

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        }
    }
}

impl<S: Subscriber> Layer<S> for WarnCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut message = String::new();
            event.record(&mut MessageVisitor(&mut message));
            self.0.lock().push(message);
        }
    }
}

#[tokio::test]
async fn second_build_is_served_from_cache() {
    let dir = TempDir::new().unwrap();

    let first_spy = SpyLauncher::new();
    let first = open_cache(&dir, &first_spy);
    let doc = build_document(&first);
    let first_output = first.fill_placeholders(&doc, OutputMode::Svg).await;
    assert!(first.flush().await.unwrap());

    assert!(!first_output.contains("XEQUATIONX"));
    assert!(first_output.contains("<title>e^{i\\pi} + 1 = 0</title>"));
    assert_eq!(first_spy.render_count(), 2);

    let second_spy = SpyLauncher::new();
    let second = open_cache(&dir, &second_spy);
    let doc = build_document(&second);
    let second_output = second.fill_placeholders(&doc, OutputMode::Svg).await;

    assert_eq!(second_output, first_output);
    assert_eq!(doc, second_output);
    assert_eq!(second.placeholder_count(), 0);
    assert_eq!(second_spy.launch_count(), 0);
    assert_eq!(second_spy.render_count(), 0);
    assert!(!second.flush().await.unwrap());
}

#[tokio::test]
async fn second_html_build_is_served_from_cache() {
    let dir = TempDir::new().unwrap();

    let first_spy = SpyLauncher::new();
    let first = open_cache(&dir, &first_spy).with_output(OutputMode::Html);
    let doc = build_document(&first);
    let first_output = first.fill_placeholders(&doc, OutputMode::Html).await;
    assert!(first.flush().await.unwrap());

    assert!(!first_output.contains("XEQUATIONX"));
    assert!(first_output.contains(r#"<mjx-input-tex aria-hidden="true">\[\int_0^1 x\,dx\]"#));
    assert_eq!(first_spy.render_count(), 2);

    let second_spy = SpyLauncher::new();
    let second = open_cache(&dir, &second_spy).with_output(OutputMode::Html);
    let doc = build_document(&second);
    let second_output = second.fill_placeholders(&doc, OutputMode::Html).await;

    assert_eq!(second_output, first_output);
    assert_eq!(doc, second_output);
    assert_eq!(second.placeholder_count(), 0);
    assert_eq!(second_spy.launch_count(), 0);
    assert_eq!(second_spy.render_count(), 0);

    // The SVG entries of the same expressions were never rendered.
    let svg = open_cache(&dir, &second_spy);
    assert!(build_document(&svg).contains("XEQUATIONX"));
}

#[tokio::test]
async fn document_without_math_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    let cache = open_cache(&dir, &spy);

    let doc = "# Title\n\nNo equations here, only $5 and EQUATION text.\n";
    assert_eq!(cache.fill_placeholders(doc, OutputMode::Svg).await, doc);
    assert_eq!(cache.fill_placeholders("", OutputMode::Html).await, "");
    assert_eq!(spy.launch_count(), 0);
}

#[tokio::test]
async fn entity_variants_render_once() {
    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    let cache = open_cache(&dir, &spy);

    let doc = format!(
        "{} | {}",
        cache.make_placeholder("a &lt; b", true),
        cache.make_placeholder("a < b", true),
    );
    let output = cache.fill_placeholders(&doc, OutputMode::Svg).await;

    let (left, right) = output.split_once(" | ").unwrap();
    assert_eq!(left, right);
    assert_eq!(spy.render_count(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn malformed_expression_warns_once_and_renders_empty() {
    let warnings = WarnCollector::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    spy.fail_on("\\frac{1}{");
    let cache = open_cache(&dir, &spy);

    let doc = format!(
        "before {} middle {} after",
        cache.make_placeholder("\\frac{1}{", false),
        cache.make_placeholder("x", true),
    );
    let output = cache.fill_placeholders(&doc, OutputMode::Svg).await;

    assert!(output.starts_with("before  middle <svg"));
    assert!(output.ends_with("</svg> after"));

    let warnings = warnings.0.lock();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("\\frac{1}{"));
    assert!(warnings[0].contains("Undefined control sequence"));
}

#[tokio::test]
async fn flush_writes_valid_json_only_when_modified() {
    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    let cache = open_cache(&dir, &spy);
    let path = cache.store_path();

    assert!(!cache.flush().await.unwrap());
    assert!(!path.exists());

    let doc = build_document(&cache);
    cache.fill_placeholders(&doc, OutputMode::Svg).await;
    assert!(cache.flush().await.unwrap());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = json.as_object().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key("e^{i\\pi} + 1 = 0true"));
    assert!(entries.contains_key("\\int_0^1 x\\,dxfalse"));

    let reloaded = EquationStore::load(&path);
    assert_eq!(reloaded.len(), cache.len());
}

#[tokio::test]
async fn output_modes_are_cached_separately() {
    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    let cache = open_cache(&dir, &spy);

    let svg = cache.render("x", true, OutputMode::Svg).await;
    let html = cache.render("x", true, OutputMode::Html).await;

    assert!(svg.starts_with("<svg"));
    assert!(html.starts_with("<mjx-container"));
    assert_eq!(spy.launch_count(), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_cache_starts_engine_once() {
    let dir = TempDir::new().unwrap();
    let spy = SpyLauncher::new();
    let cache = Arc::new(open_cache(&dir, &spy));
    let rendered = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let rendered = Arc::clone(&rendered);
            tokio::spawn(async move {
                let doc = format!("doc {i}: {}", cache.make_placeholder(&format!("x_{i}"), true));
                let output = cache.fill_placeholders(&doc, OutputMode::Svg).await;
                if output.contains(&format!("<title>x_{i}</title>")) {
                    rendered.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(rendered.load(Ordering::SeqCst), 8);
    assert_eq!(spy.launch_count(), 1);
    assert_eq!(cache.len(), 8);
}
