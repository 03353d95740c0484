//! # chargpt
//!
//! A character-level GPT trained from scratch on a scalar autograd engine:
//! computation-graph reverse-mode differentiation, a one-token-at-a-time
//! transformer forward pass with a KV cache, an Adam training loop, and an
//! autoregressive sampler. Everything is single-threaded and deterministic
//! for a fixed seed.
//!
//! The pipeline: seed the RNG, load and shuffle the corpus, build the
//! character vocabulary (plus a boundary token), initialize parameters with
//! small Gaussian weights, train with teacher forcing and Adam, then sample
//! new sequences from the boundary token.

pub mod autograd;
pub mod config;
pub mod data;
pub mod model;
pub mod rng;
pub mod sampler;
pub mod telemetry;
pub mod tokenizer;
pub mod train;

use config::Config;
use data::load_from_path;
use model::ModelParams;
use rng::SeededRng;
use telemetry::StepMetrics;
use tokenizer::{CharTokenizer, Tokenizer};

/// Runs the full pipeline: load corpus, train, then sample.
///
/// Prints progress and generated samples to stdout.
///
/// # Errors
///
/// Fails when the corpus cannot be loaded; training and sampling themselves
/// do not produce recoverable errors (numerical failures propagate as
/// non-finite values, visible only as degraded loss).
pub fn run(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    run_with_callback(cfg, None)
}

/// Like [`run`], with a step-level telemetry callback for an external
/// observer (visualization, logging). The callback fires every
/// `cfg.callback_every` steps and is never read back by the core.
pub fn run_with_callback(
    cfg: &Config,
    on_step: Option<&mut dyn FnMut(&StepMetrics)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SeededRng::new(cfg.seed);

    let mut docs = load_from_path(&cfg.input_path)?;
    rng.shuffle(&mut docs);
    println!("num docs: {}", docs.len());

    let tokenizer = CharTokenizer::from_docs(&docs);
    println!("vocab size: {}", tokenizer.vocab_size());

    let params = ModelParams::new(cfg, tokenizer.vocab_size(), &mut rng);
    println!("num params: {}", params.flat().len());

    train::train(cfg, &docs, &tokenizer, &params, on_step);

    println!("\n--- inference (new, hallucinated samples) ---");
    for sample_idx in 0..cfg.sample_size {
        let text = sampler::sample_text(cfg, &params, &tokenizer, &mut rng);
        println!("sample {:2}: {}", sample_idx + 1, text);
    }

    Ok(())
}
