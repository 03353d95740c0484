//! Training loop: teacher-forced next-character prediction over the corpus.
//!
//! Each step takes the next document cyclically, runs the forward pass once
//! per position against a fresh per-sequence KV cache, averages the
//! cross-entropy losses into one terminal node, backpropagates exactly once,
//! and applies one Adam update. The step's whole computation graph is
//! discarded afterwards.

mod adam;

pub use adam::Adam;

use crate::autograd::Scalar;
use crate::config::Config;
use crate::model::{forward, softmax, KvCache, ModelParams};
use crate::telemetry::{ForwardTrace, StepMetrics};
use crate::tokenizer::{CharTokenizer, Tokenizer};

/// Observer of per-step telemetry. Never read back by the core.
pub type StepCallback<'a> = &'a mut dyn FnMut(&StepMetrics);

/// Yield to the host scheduler this often, purely to keep an interactive
/// embedder responsive. No ordering or cancellation semantics.
const YIELD_EVERY: usize = 10;

/// One document's forward pass: the averaged loss node, the token sequence,
/// and (when traced) the last position's introspection and probabilities.
struct DocForward {
    loss: Scalar,
    tokens: Vec<usize>,
    last: Option<(ForwardTrace, Vec<f64>)>,
}

/// Tokenizes one document as `[BOS, char ids…, BOS]`.
///
/// The tokenizer was built from the same corpus, so unknown characters cannot
/// occur; if a caller ever feeds a foreign document they are skipped rather
/// than failing mid-run.
fn tokenize_doc(doc: &str, tokenizer: &CharTokenizer) -> Vec<usize> {
    let bos = tokenizer.bos_id();
    let mut tokens = Vec::with_capacity(doc.chars().count() + 2);
    tokens.push(bos);
    tokens.extend(tokenizer.encode(doc).unwrap_or_default());
    tokens.push(bos);
    tokens
}

/// Teacher-forced pass over one document with a fresh KV cache: per-position
/// logits, softmax, negative log-probability of the true next token, averaged
/// into a single loss node. No backward here.
fn forward_doc(
    doc: &str,
    cfg: &Config,
    tokenizer: &CharTokenizer,
    params: &ModelParams,
    want_trace: bool,
) -> DocForward {
    let tokens = tokenize_doc(doc, tokenizer);
    let n = (tokens.len() - 1).min(cfg.block_size);

    let mut cache = KvCache::new(cfg.n_layer);
    let mut losses = Vec::with_capacity(n);
    let mut last = None;

    for pos_id in 0..n {
        let token_id = tokens[pos_id];
        let target_id = tokens[pos_id + 1];

        // Only the last position's introspection is reported.
        let mut trace = (want_trace && pos_id == n - 1).then(ForwardTrace::new);
        let logits = forward(token_id, pos_id, cfg, params, &mut cache, trace.as_mut());
        let probs = softmax(&logits);
        losses.push(-&probs[target_id].log());

        if let Some(t) = trace.take() {
            last = Some((t, probs.iter().map(Scalar::data).collect()));
        }
    }

    let mut loss = Scalar::new(0.0);
    for l in &losses {
        loss = &loss + l;
    }
    loss = &loss / n as f64;

    DocForward { loss, tokens, last }
}

/// Trains for `cfg.num_steps` steps and returns the final step's loss.
///
/// `docs` must already be shuffled; documents are consumed cyclically. The
/// callback, when present, fires every `cfg.callback_every` steps with a
/// [`StepMetrics`] snapshot taken after `backward` and before the parameter
/// update. Loss is printed every `cfg.loss_log_every` steps and at step 0.
pub fn train(
    cfg: &Config,
    docs: &[String],
    tokenizer: &CharTokenizer,
    params: &ModelParams,
    mut on_step: Option<StepCallback<'_>>,
) -> f64 {
    let mut adam = Adam::new(cfg, params.flat().len());
    let mut last_loss = f64::NAN;

    for step in 0..cfg.num_steps {
        let doc = &docs[step % docs.len()];
        let report = on_step.is_some() && step % cfg.callback_every == 0;

        let out = forward_doc(doc, cfg, tokenizer, params, report);
        out.loss.backward();

        // Gradient norms must be read after backward, before Adam zeroes them.
        let grad_norms = report.then(|| params.grad_norms());
        adam.step(params.flat(), step);
        last_loss = out.loss.data();

        if let (Some(cb), Some((trace, probs)), Some(grad_norms)) =
            (on_step.as_deref_mut(), out.last, grad_norms)
        {
            cb(&StepMetrics {
                step,
                loss: last_loss,
                attn_weights: trace.attn_weights,
                probs,
                tokens: out.tokens,
                embeddings: params.embedding_snapshot(),
                chars: tokenizer.chars().to_vec(),
                bos_id: tokenizer.bos_id(),
                vocab_size: tokenizer.vocab_size(),
                residual_stages: trace.residual_stages,
                head_outputs: trace.head_outputs,
                mlp_activations: trace.mlp_activations,
                grad_norms,
            });
        }

        if (step + 1) % cfg.loss_log_every == 0 || step == 0 {
            println!(
                "step {:4} / {:4} | loss {:.4}",
                step + 1,
                cfg.num_steps,
                last_loss
            );
        }

        if step % YIELD_EVERY == 0 {
            std::thread::yield_now();
        }
    }

    last_loss
}
