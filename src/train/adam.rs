//! Adam optimizer with bias correction and linear learning-rate decay.

use crate::autograd::Scalar;
use crate::config::Config;

/// Adam state: one (first-moment, second-moment) pair per parameter,
/// positionally aligned with the flattened parameter list. Persists for the
/// lifetime of a training run and is never reset.
pub struct Adam {
    m: Vec<f64>,
    v: Vec<f64>,
    lr0: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    num_steps: usize,
}

impl Adam {
    /// Fresh optimizer state for `n_params` parameters.
    #[must_use]
    pub fn new(cfg: &Config, n_params: usize) -> Self {
        Adam {
            m: vec![0.0; n_params],
            v: vec![0.0; n_params],
            lr0: cfg.learning_rate,
            beta1: cfg.beta1,
            beta2: cfg.beta2,
            epsilon: cfg.epsilon,
            num_steps: cfg.num_steps,
        }
    }

    /// Learning rate at `step`: linear decay from `lr0` to 0 over the run.
    #[must_use]
    pub fn lr_at(&self, step: usize) -> f64 {
        self.lr0 * (1.0 - step as f64 / self.num_steps as f64)
    }

    /// Applies one update from the gradients currently on `params`, then
    /// zeroes every gradient. `step` is zero-based.
    pub fn step(&mut self, params: &[Scalar], step: usize) {
        let lr_t = self.lr_at(step);
        let bias1 = 1.0 - self.beta1.powi(step as i32 + 1);
        let bias2 = 1.0 - self.beta2.powi(step as i32 + 1);

        for (i, p) in params.iter().enumerate() {
            let g = p.grad();
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;

            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;

            p.set_data(p.data() - lr_t * m_hat / (v_hat.sqrt() + self.epsilon));
            p.zero_grad();
        }
    }
}
