//! Learnable parameters: embedding tables, per-layer projections, and the
//! language-model head.
//!
//! Each layer is a statically typed record; the whole store is flattened once
//! at construction into the list the optimizer indexes. Shapes are fixed after
//! init; only each node's `data` mutates, in place, on optimizer steps.

use std::collections::BTreeMap;

use crate::autograd::Scalar;
use crate::config::Config;
use crate::rng::SeededRng;

/// MLP hidden width as a multiple of the embedding width.
pub(crate) const MLP_RATIO: usize = 4;

/// A fixed-shape 2D arrangement of leaf nodes, row-major `[out][in]`.
pub type Matrix = Vec<Vec<Scalar>>;

/// Weights for one transformer layer.
pub struct LayerParams {
    /// Query projection, `n_embed × n_embed`.
    pub attn_wq: Matrix,
    /// Key projection, `n_embed × n_embed`.
    pub attn_wk: Matrix,
    /// Value projection, `n_embed × n_embed`.
    pub attn_wv: Matrix,
    /// Attention output projection, `n_embed × n_embed`.
    pub attn_wo: Matrix,
    /// MLP expansion, `4·n_embed × n_embed`.
    pub mlp_fc1: Matrix,
    /// MLP contraction, `n_embed × 4·n_embed`.
    pub mlp_fc2: Matrix,
}

/// The full parameter store.
pub struct ModelParams {
    /// Token-embedding table, `vocab_size × n_embed`.
    pub wte: Matrix,
    /// Position-embedding table, `block_size × n_embed`.
    pub wpe: Matrix,
    /// Output head, `vocab_size × n_embed`.
    pub lm_head: Matrix,
    /// Per-layer weights in layer order.
    pub layers: Vec<LayerParams>,
    /// Flat, optimizer-indexed view of every leaf, built once at init.
    flat: Vec<Scalar>,
}

fn matrix(nout: usize, nin: usize, std: f64, rng: &mut SeededRng) -> Matrix {
    (0..nout)
        .map(|_| (0..nin).map(|_| Scalar::new(rng.gauss(0.0, std))).collect())
        .collect()
}

fn extend_flat(flat: &mut Vec<Scalar>, m: &Matrix) {
    for row in m {
        flat.extend(row.iter().cloned());
    }
}

impl ModelParams {
    /// Initializes all weights as Gaussian(0, `init_std`) leaves.
    ///
    /// Draw order is fixed (embeddings, head, then per layer q, k, v, o, fc1,
    /// fc2) so a given seed always produces the same initialization.
    #[must_use]
    pub fn new(cfg: &Config, vocab_size: usize, rng: &mut SeededRng) -> Self {
        let std = cfg.init_std;
        let wte = matrix(vocab_size, cfg.n_embed, std, rng);
        let wpe = matrix(cfg.block_size, cfg.n_embed, std, rng);
        let lm_head = matrix(vocab_size, cfg.n_embed, std, rng);
        let layers: Vec<LayerParams> = (0..cfg.n_layer)
            .map(|_| LayerParams {
                attn_wq: matrix(cfg.n_embed, cfg.n_embed, std, rng),
                attn_wk: matrix(cfg.n_embed, cfg.n_embed, std, rng),
                attn_wv: matrix(cfg.n_embed, cfg.n_embed, std, rng),
                attn_wo: matrix(cfg.n_embed, cfg.n_embed, std, rng),
                mlp_fc1: matrix(MLP_RATIO * cfg.n_embed, cfg.n_embed, std, rng),
                mlp_fc2: matrix(cfg.n_embed, MLP_RATIO * cfg.n_embed, std, rng),
            })
            .collect();

        let mut flat = Vec::new();
        extend_flat(&mut flat, &wte);
        extend_flat(&mut flat, &wpe);
        extend_flat(&mut flat, &lm_head);
        for layer in &layers {
            extend_flat(&mut flat, &layer.attn_wq);
            extend_flat(&mut flat, &layer.attn_wk);
            extend_flat(&mut flat, &layer.attn_wv);
            extend_flat(&mut flat, &layer.attn_wo);
            extend_flat(&mut flat, &layer.mlp_fc1);
            extend_flat(&mut flat, &layer.mlp_fc2);
        }

        ModelParams {
            wte,
            wpe,
            lm_head,
            layers,
            flat,
        }
    }

    /// The optimizer-indexed flat parameter list.
    #[must_use]
    pub fn flat(&self) -> &[Scalar] {
        &self.flat
    }

    /// Iterates named parameter groups in a stable order.
    fn groups(&self) -> Vec<(String, &Matrix)> {
        let mut groups: Vec<(String, &Matrix)> = vec![
            ("wte".to_string(), &self.wte),
            ("wpe".to_string(), &self.wpe),
            ("lm_head".to_string(), &self.lm_head),
        ];
        for (li, layer) in self.layers.iter().enumerate() {
            groups.push((format!("layer{li}.attn_wq"), &layer.attn_wq));
            groups.push((format!("layer{li}.attn_wk"), &layer.attn_wk));
            groups.push((format!("layer{li}.attn_wv"), &layer.attn_wv));
            groups.push((format!("layer{li}.attn_wo"), &layer.attn_wo));
            groups.push((format!("layer{li}.mlp_fc1"), &layer.mlp_fc1));
            groups.push((format!("layer{li}.mlp_fc2"), &layer.mlp_fc2));
        }
        groups
    }

    /// Gradient L2 norm per parameter group (for telemetry; call after
    /// `backward`, before the optimizer zeroes gradients).
    #[must_use]
    pub fn grad_norms(&self) -> BTreeMap<String, f64> {
        self.groups()
            .into_iter()
            .map(|(name, m)| {
                let sum_sq: f64 = m
                    .iter()
                    .flatten()
                    .map(|p| {
                        let g = p.grad();
                        g * g
                    })
                    .sum();
                (name, sum_sq.sqrt())
            })
            .collect()
    }

    /// Plain-valued snapshot of the token-embedding table.
    #[must_use]
    pub fn embedding_snapshot(&self) -> Vec<Vec<f64>> {
        self.wte
            .iter()
            .map(|row| row.iter().map(Scalar::data).collect())
            .collect()
    }
}
