use semantic_canvas::config::LayoutConfig;
use semantic_canvas::error::ProviderError;
use semantic_canvas::layout::{Canvas, LayoutEngine, MarkerStyle, VectorStore};
use semantic_canvas::provider::{
    Embedder, HashingEmbedder, KeywordLabeler, ProviderConfig, Providers,
};
use semantic_canvas::worker::{InsertQueue, Ticket};

fn measure(text: &str) -> f32 {
    text.chars().count() as f32 * 7.0
}

/// Reports a dimension it does not produce.
struct LyingEmbedder;

impl Embedder for LyingEmbedder {
    fn name(&self) -> &str {
        "lying"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(4)
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(vec![0.5, 0.5])
    }
}

#[test]
fn queued_texts_are_committed_in_submission_order() {
    let providers = Providers::init(&ProviderConfig::default()).unwrap();
    let mut queue = InsertQueue::spawn(providers).unwrap();
    let engine = LayoutEngine::new(&LayoutConfig::default(), MarkerStyle::default());
    let canvas = Canvas::new(1024.0, 768.0);

    let texts = [
        "Rust ownership and borrowing",
        "Borrowing rules in Rust",
        "Slow roasted tomatoes with garlic",
        "Garlic bread recipe",
    ];
    for text in texts {
        queue.submit(text).unwrap();
    }

    let mut store = VectorStore::new();
    for (expected, _) in texts.iter().enumerate() {
        let outcome = queue.wait().unwrap();
        assert_eq!(outcome.ticket, Ticket(expected as u64));

        let prepared = outcome.result.unwrap();
        assert_eq!(prepared.text, texts[expected]);
        let committed = engine
            .insert(&store, prepared.label, prepared.vector, canvas, &measure)
            .unwrap();
        store = committed.store;
        assert_eq!(committed.frame.len(), expected + 1);
    }

    assert_eq!(store.len(), texts.len());
    assert_eq!(store.dimensions(), Some(256));
    assert_eq!(queue.in_flight(), 0);
}

#[test]
fn malformed_provider_output_never_reaches_the_store() {
    let providers = Providers::new(
        Box::new(LyingEmbedder),
        Box::new(KeywordLabeler::new(3, 32)),
    );
    let mut queue = InsertQueue::spawn(providers).unwrap();
    queue.submit("anything at all").unwrap();

    let outcome = queue.wait().unwrap();
    assert!(matches!(
        outcome.result,
        Err(ProviderError::MalformedEmbedding(_))
    ));
}

#[test]
fn hashing_embeddings_keep_related_texts_closer_on_canvas() {
    let embedder = HashingEmbedder::new(256).unwrap();
    let engine = LayoutEngine::new(&LayoutConfig::default(), MarkerStyle::default());
    let canvas = Canvas::new(1024.0, 768.0);

    let texts = [
        "rust borrow checker ownership",
        "rust ownership borrow rules",
        "tomato garlic pasta sauce",
        "garlic tomato sauce recipe",
    ];
    let mut store = VectorStore::new();
    for text in texts {
        store.append(text, embedder.embed(text).unwrap()).unwrap();
    }

    let frame = engine.compute(&store, canvas, &measure).unwrap();
    let p = &frame.projection;
    let within_rust = (p[0] - p[1]).length();
    let within_food = (p[2] - p[3]).length();
    let across = (p[0] - p[2]).length().min((p[1] - p[3]).length());
    assert!(within_rust < across, "{within_rust} vs {across}");
    assert!(within_food < across, "{within_food} vs {across}");
}
