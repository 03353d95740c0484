//! Transformer forward pass: one token at one position, with a KV cache.

use crate::autograd::Scalar;
use crate::config::Config;
use crate::telemetry::{ForwardTrace, ResidualStage};

use super::ops::{linear, rmsnorm, softmax};
use super::params::ModelParams;

/// Per-layer key/value cache for one sequence.
///
/// Keys and values are appended once per position and reused by every later
/// position's attention. Growth is the causal mechanism: a position attends to
/// everything cached so far, and future positions are simply not there yet.
/// A cache belongs to exactly one sequence and must start empty.
pub struct KvCache {
    keys: Vec<Vec<Vec<Scalar>>>,
    values: Vec<Vec<Vec<Scalar>>>,
}

impl KvCache {
    /// A fresh, empty cache for a sequence about to start.
    #[must_use]
    pub fn new(n_layer: usize) -> Self {
        KvCache {
            keys: vec![Vec::new(); n_layer],
            values: vec![Vec::new(); n_layer],
        }
    }

    /// Number of positions cached so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.first().map_or(0, Vec::len)
    }

    /// `true` before the first position is processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs the forward pass for `token_id` at `pos_id`, appending this position's
/// keys and values to `cache`, and returns logits over the vocabulary.
///
/// Pipeline: token + position embedding, RMSNorm, then per layer a pre-norm
/// attention block (Q/K/V projections, cache append, per-head scaled
/// dot-product attention, output projection, residual) and a pre-norm MLP
/// block (4× expand, ReLU, contract, residual); finally the lm_head
/// projection. When `trace` is given, attention weights, head outputs, MLP
/// activations, and residual-stream snapshots are copied into it as plain
/// values.
#[must_use]
pub fn forward(
    token_id: usize,
    pos_id: usize,
    cfg: &Config,
    params: &ModelParams,
    cache: &mut KvCache,
    mut trace: Option<&mut ForwardTrace>,
) -> Vec<Scalar> {
    let head_dim = cfg.head_dim();

    // What the token is plus where it sits.
    let mut x: Vec<Scalar> = params.wte[token_id]
        .iter()
        .zip(&params.wpe[pos_id])
        .map(|(t, p)| t + p)
        .collect();
    x = rmsnorm(&x);

    if let Some(t) = trace.as_deref_mut() {
        t.residual_stages.push(ResidualStage {
            label: "embed".to_string(),
            values: x.iter().map(Scalar::data).collect(),
        });
    }

    for (li, layer) in params.layers.iter().enumerate() {
        // Attention: which cached positions to pull information from.
        let x_residual = x.clone();
        x = rmsnorm(&x);

        let q = linear(&x, &layer.attn_wq);
        let k = linear(&x, &layer.attn_wk);
        let v = linear(&x, &layer.attn_wv);
        cache.keys[li].push(k);
        cache.values[li].push(v);

        let mut layer_attn_weights = Vec::new();
        let mut layer_head_outputs = Vec::new();
        let mut x_attn = Vec::with_capacity(cfg.n_embed);
        for h in 0..cfg.n_head {
            let hs = h * head_dim;
            let q_h = &q[hs..hs + head_dim];

            // Scaled dot-product scores against every cached key.
            let scale = (head_dim as f64).sqrt();
            let attn_logits: Vec<Scalar> = cache.keys[li]
                .iter()
                .map(|k_t| {
                    let mut score = Scalar::new(0.0);
                    for (qj, kj) in q_h.iter().zip(&k_t[hs..hs + head_dim]) {
                        score = &score + &(qj * kj);
                    }
                    &score / scale
                })
                .collect();

            let attn_weights = softmax(&attn_logits);
            if trace.is_some() {
                layer_attn_weights.push(attn_weights.iter().map(Scalar::data).collect::<Vec<_>>());
            }

            // Weighted sum of cached values is this head's output.
            let mut head_output = Vec::with_capacity(head_dim);
            for j in 0..head_dim {
                let mut out = Scalar::new(0.0);
                for (v_t, w_t) in cache.values[li].iter().zip(&attn_weights) {
                    out = &out + &(w_t * &v_t[hs + j]);
                }
                head_output.push(out.data());
                x_attn.push(out);
            }
            if trace.is_some() {
                layer_head_outputs.push(head_output);
            }
        }

        if let Some(t) = trace.as_deref_mut() {
            t.attn_weights.push(layer_attn_weights);
            t.head_outputs.push(layer_head_outputs);
        }

        // Heads are already concatenated in x_attn; project and add residual.
        x = linear(&x_attn, &layer.attn_wo);
        x = x.iter().zip(&x_residual).map(|(a, b)| a + b).collect();

        if let Some(t) = trace.as_deref_mut() {
            t.residual_stages.push(ResidualStage {
                label: format!("L{li}_attn"),
                values: x.iter().map(Scalar::data).collect(),
            });
        }

        // Position-wise MLP: expand, ReLU, contract, residual.
        let x_residual = x.clone();
        x = rmsnorm(&x);
        x = linear(&x, &layer.mlp_fc1);
        x = x.iter().map(Scalar::relu).collect();
        if let Some(t) = trace.as_deref_mut() {
            t.mlp_activations
                .push(x.iter().map(Scalar::data).collect());
        }
        x = linear(&x, &layer.mlp_fc2);
        x = x.iter().zip(&x_residual).map(|(a, b)| a + b).collect();

        if let Some(t) = trace.as_deref_mut() {
            t.residual_stages.push(ResidualStage {
                label: format!("L{li}_mlp"),
                values: x.iter().map(Scalar::data).collect(),
            });
        }
    }

    linear(&x, &params.lm_head)
}
