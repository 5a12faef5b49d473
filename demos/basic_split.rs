//! Basic Semantic Splitting
//!
//! Split a two-topic document with a toy keyword embedder and print what the
//! pipeline saw along the way.
//!
//! ```bash
//! RUST_LOG=seams=debug cargo run --example basic_split
//! ```

use std::sync::Arc;

use seams::{BoxError, EmbeddingProvider, SemanticSplitter, SplitConfig, StructureConfig};
use tracing_subscriber::EnvFilter;

/// Two-dimensional "embedding": does the text talk about space or cooking?
struct Keywords;

impl EmbeddingProvider for Keywords {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        Ok(texts
            .iter()
            .map(|t| {
                let space = ["orbit", "rocket", "planet", "moon"]
                    .iter()
                    .filter(|w| t.contains(*w))
                    .count() as f32;
                let food = ["flour", "oven", "dough", "butter"]
                    .iter()
                    .filter(|w| t.contains(*w))
                    .count() as f32;
                vec![space + 0.1, food + 0.1]
            })
            .collect())
    }
}

fn main() -> Result<(), seams::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = "The rocket lifted off and headed for orbit.\n\
        Its upper stage will circle the moon twice.\n\
        Engineers tracked the rocket past the planet's shadow.\n\
        Mix the flour with cold butter until it crumbles.\n\
        Rest the dough for an hour before rolling it out.\n\
        Bake in a hot oven until the crust turns golden.";

    let splitter = SemanticSplitter::new(Arc::new(Keywords)).with_config(
        SplitConfig::new(120)
            .window_size(1)
            .smoothing(2, 3)
            .structure(StructureConfig {
                line_size: 40,
                sentence_size: 40,
                cleanup_size: 8,
            }),
    );

    let trace = splitter.analyze(document)?;

    println!("Document: {} bytes, {} units", document.len(), trace.units.len());
    println!("Curve: {:.2?}", trace.curve);
    println!("Boundaries at units: {:?}\n", trace.boundaries);

    for chunk in &trace.chunks {
        println!("[{}] {} bytes: {:?}", chunk.index, chunk.len(), chunk.text);
    }

    Ok(())
}
