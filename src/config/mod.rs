//! Configuration for model, training, and sampling.
//!
//! Build from the environment with [`from_env`] and check preconditions with
//! [`Config::validate`] before running. Defaults and env key names are
//! centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::path::PathBuf;

use constants::{
    DEFAULT_BETA1, DEFAULT_BETA2, DEFAULT_BLOCK_SIZE, DEFAULT_CALLBACK_EVERY, DEFAULT_EPSILON,
    DEFAULT_INIT_STD, DEFAULT_INPUT_PATH, DEFAULT_LEARNING_RATE, DEFAULT_LOSS_LOG_EVERY,
    DEFAULT_NUM_STEPS, DEFAULT_N_EMBED, DEFAULT_N_HEAD, DEFAULT_N_LAYER, DEFAULT_SAMPLE_SIZE,
    DEFAULT_SEED, DEFAULT_TEMPERATURE,
};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

/// Central configuration for the whole pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    /// RNG seed; fixes the corpus shuffle, the weight init, and sampling.
    pub seed: u64,
    /// Path to the corpus (one document per line).
    pub input_path: PathBuf,

    /// Embedding dimension (must be divisible by `n_head`).
    pub n_embed: usize,
    /// Number of attention heads.
    pub n_head: usize,
    /// Number of transformer layers.
    pub n_layer: usize,
    /// Maximum context length in tokens.
    pub block_size: usize,

    /// Weight init standard deviation (Gaussian, mean 0).
    pub init_std: f64,

    /// Adam base learning rate (decays linearly to 0 over `num_steps`).
    pub learning_rate: f64,
    /// Adam first-moment decay.
    pub beta1: f64,
    /// Adam second-moment decay.
    pub beta2: f64,
    /// Adam denominator epsilon.
    pub epsilon: f64,

    /// Number of training steps.
    pub num_steps: usize,
    /// Print loss every this many steps.
    pub loss_log_every: usize,
    /// Invoke the step callback every this many steps.
    pub callback_every: usize,

    /// Sampling temperature in (0, 1].
    pub temperature: f64,
    /// Number of samples to generate after training.
    pub sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            n_embed: DEFAULT_N_EMBED,
            n_head: DEFAULT_N_HEAD,
            n_layer: DEFAULT_N_LAYER,
            block_size: DEFAULT_BLOCK_SIZE,
            init_std: DEFAULT_INIT_STD,
            learning_rate: DEFAULT_LEARNING_RATE,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            num_steps: DEFAULT_NUM_STEPS,
            loss_log_every: DEFAULT_LOSS_LOG_EVERY,
            callback_every: DEFAULT_CALLBACK_EVERY,
            temperature: DEFAULT_TEMPERATURE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Config {
    /// Checks preconditions. Violations are terminal for the run, not
    /// recoverable states.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] naming the rule that failed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_head == 0 {
            return Err(ConfigError::Validation(
                "n_head must be greater than 0".to_string(),
            ));
        }
        if self.n_embed % self.n_head != 0 {
            return Err(ConfigError::Validation(format!(
                "n_embed ({}) must be divisible by n_head ({})",
                self.n_embed, self.n_head
            )));
        }
        if self.n_layer == 0 {
            return Err(ConfigError::Validation(
                "n_layer must be greater than 0".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(ConfigError::Validation(
                "block_size must be greater than 0".to_string(),
            ));
        }
        if self.num_steps == 0 {
            return Err(ConfigError::Validation(
                "num_steps must be greater than 0".to_string(),
            ));
        }
        if self.temperature <= 0.0 || self.temperature > 1.0 {
            return Err(ConfigError::Validation(
                "temperature must be in (0, 1]".to_string(),
            ));
        }
        if self.loss_log_every == 0 || self.callback_every == 0 {
            return Err(ConfigError::Validation(
                "log and callback cadences must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-head dimension (`n_embed / n_head`).
    #[must_use]
    pub fn head_dim(&self) -> usize {
        self.n_embed / self.n_head
    }
}
