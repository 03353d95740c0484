//! Step-level telemetry for external observers.
//!
//! The training loop can invoke a callback at a configurable cadence with a
//! [`StepMetrics`] snapshot: everything a visualization or logging collaborator
//! needs, copied out as plain `f64` tensors. The core never reads any of it
//! back; consuming the payload cannot influence training.

use std::collections::BTreeMap;

/// One labeled snapshot of the residual stream (`embed`, `L0_attn`, ...).
#[derive(Clone, Debug)]
pub struct ResidualStage {
    /// Where in the pipeline the snapshot was taken.
    pub label: String,
    /// Residual-stream values at that point.
    pub values: Vec<f64>,
}

/// Introspection artifacts collected during one forward call.
///
/// Filled only when the caller asks for it; the forward pass itself never
/// depends on any of these.
#[derive(Clone, Debug, Default)]
pub struct ForwardTrace {
    /// Attention weights per layer, per head, over the cached positions.
    pub attn_weights: Vec<Vec<Vec<f64>>>,
    /// Per-layer, per-head output vectors (head_dim values each).
    pub head_outputs: Vec<Vec<Vec<f64>>>,
    /// Per-layer post-ReLU MLP activations (4 * n_embed values each).
    pub mlp_activations: Vec<Vec<f64>>,
    /// Residual-stream snapshots at the embedding and after each block.
    pub residual_stages: Vec<ResidualStage>,
}

impl ForwardTrace {
    /// An empty trace ready to be filled by one forward call.
    #[must_use]
    pub fn new() -> Self {
        ForwardTrace::default()
    }
}

/// Everything reported to the step callback.
#[derive(Clone, Debug)]
pub struct StepMetrics {
    /// Zero-based training step index.
    pub step: usize,
    /// Mean cross-entropy loss for this step's document.
    pub loss: f64,
    /// Attention weights from the last position of the step.
    pub attn_weights: Vec<Vec<Vec<f64>>>,
    /// Next-token probability vector at the last position.
    pub probs: Vec<f64>,
    /// The tokenized document, boundary tokens included.
    pub tokens: Vec<usize>,
    /// Snapshot of the token-embedding table.
    pub embeddings: Vec<Vec<f64>>,
    /// Vocabulary characters in id order.
    pub chars: Vec<char>,
    /// Boundary-token id.
    pub bos_id: usize,
    /// Total vocabulary size.
    pub vocab_size: usize,
    /// Residual-stream snapshots from the last position.
    pub residual_stages: Vec<ResidualStage>,
    /// Per-head outputs from the last position.
    pub head_outputs: Vec<Vec<Vec<f64>>>,
    /// MLP activations from the last position.
    pub mlp_activations: Vec<Vec<f64>>,
    /// Gradient L2 norm per parameter group, taken before the Adam update.
    pub grad_norms: BTreeMap<String, f64>,
}
