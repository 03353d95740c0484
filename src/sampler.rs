//! Autoregressive sampling from trained parameters.
//!
//! Starts at the boundary token, repeatedly runs the forward pass against a
//! fresh per-sample KV cache, tempers and softmaxes the logits, and draws the
//! next token by weighted choice. Generation stops when the boundary token
//! recurs or after `block_size` positions. No gradients are computed.

use crate::autograd::Scalar;
use crate::config::Config;
use crate::model::{forward, softmax, KvCache, ModelParams};
use crate::rng::SeededRng;
use crate::tokenizer::{CharTokenizer, Tokenizer};

/// Generates one sequence and returns its token ids (boundary excluded).
#[must_use]
pub fn sample_ids(
    cfg: &Config,
    params: &ModelParams,
    tokenizer: &CharTokenizer,
    rng: &mut SeededRng,
) -> Vec<usize> {
    let bos = tokenizer.bos_id();
    let mut cache = KvCache::new(cfg.n_layer);
    let mut token_id = bos;
    let mut out = Vec::new();

    for pos_id in 0..cfg.block_size {
        let logits = forward(token_id, pos_id, cfg, params, &mut cache, None);
        // Lower temperature sharpens the distribution toward confident picks.
        let tempered: Vec<Scalar> = logits.iter().map(|l| l / cfg.temperature).collect();
        let probs: Vec<f64> = softmax(&tempered).iter().map(Scalar::data).collect();

        token_id = rng.weighted_choice(&probs).unwrap_or(bos);
        if token_id == bos {
            break;
        }
        out.push(token_id);
    }
    out
}

/// Generates one sequence as text.
#[must_use]
pub fn sample_text(
    cfg: &Config,
    params: &ModelParams,
    tokenizer: &CharTokenizer,
    rng: &mut SeededRng,
) -> String {
    let ids = sample_ids(cfg, params, tokenizer, rng);
    // Ids come straight from the model's vocabulary-sized distribution.
    tokenizer.decode(&ids).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Config, ModelParams, CharTokenizer) {
        let cfg = Config {
            n_layer: 1,
            ..Config::default()
        };
        let docs = vec!["ana".to_string(), "bob".to_string()];
        let tokenizer = CharTokenizer::from_docs(&docs);
        let mut rng = SeededRng::new(42);
        let params = ModelParams::new(&cfg, tokenizer.vocab_size(), &mut rng);
        (cfg, params, tokenizer)
    }

    #[test]
    fn samples_stay_in_vocabulary_and_within_block_size() {
        let (cfg, params, tokenizer) = fixture();
        let mut rng = SeededRng::new(42);
        for _ in 0..10 {
            let ids = sample_ids(&cfg, &params, &tokenizer, &mut rng);
            assert!(ids.len() <= cfg.block_size);
            assert!(ids.iter().all(|&id| id < tokenizer.vocab_size()));
            // The boundary token terminates rather than appearing in output.
            assert!(ids.iter().all(|&id| id != tokenizer.bos_id()));
        }
    }

    #[test]
    fn sampling_is_reproducible_for_a_fixed_seed() {
        let (cfg, params, tokenizer) = fixture();
        let mut a = SeededRng::new(7);
        let mut b = SeededRng::new(7);
        assert_eq!(
            sample_ids(&cfg, &params, &tokenizer, &mut a),
            sample_ids(&cfg, &params, &tokenizer, &mut b)
        );
    }

    #[test]
    fn sample_text_decodes_generated_ids() {
        let (cfg, params, tokenizer) = fixture();
        let mut rng = SeededRng::new(42);
        let text = sample_text(&cfg, &params, &tokenizer, &mut rng);
        assert!(text.chars().count() <= cfg.block_size);
        assert!(text.chars().all(|c| "anob".contains(c)));
    }

    #[test]
    fn sampling_leaves_gradients_untouched() {
        let (cfg, params, tokenizer) = fixture();
        let mut rng = SeededRng::new(42);
        let _ = sample_ids(&cfg, &params, &tokenizer, &mut rng);
        assert!(params.flat().iter().all(|p| p.grad() == 0.0));
    }
}
