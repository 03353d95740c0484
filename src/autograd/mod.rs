//! Autograd: a computation graph of scalar values with reverse-mode
//! differentiation.
//!
//! The graph is built implicitly during forward operations; calling
//! [`Scalar::backward`] on a terminal node (the loss) propagates gradients to
//! every reachable node via the chain rule, visiting each edge exactly once.
//! Graphs are rebuilt fresh every training step and discarded once their
//! gradients have been consumed.

mod scalar;
#[cfg(test)]
mod tests;

pub use scalar::Scalar;
