//! Model: learnable parameters and the transformer forward pass.

mod forward;
mod ops;
mod params;

pub use forward::{forward, KvCache};
pub use ops::{linear, rmsnorm, softmax};
pub use params::{LayerParams, Matrix, ModelParams};
