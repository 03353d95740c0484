//! Build [`Config`] from environment variables.
//!
//! Every field can be overridden through a `CHARGPT_`-prefixed variable; unset
//! variables fall back to [`Config::default`]. Key names live in the
//! `constants` submodule so there is one place to look them up.

use std::path::PathBuf;

use super::constants::{
    ENV_BETA1, ENV_BETA2, ENV_BLOCK_SIZE, ENV_CALLBACK_EVERY, ENV_EPSILON, ENV_INIT_STD,
    ENV_INPUT_PATH, ENV_LEARNING_RATE, ENV_LOSS_LOG_EVERY, ENV_NUM_STEPS, ENV_N_EMBED, ENV_N_HEAD,
    ENV_N_LAYER, ENV_PREFIX, ENV_SAMPLE_SIZE, ENV_SEED, ENV_TEMPERATURE,
};
use super::{Config, ConfigError};

/// Full environment key for a suffix (e.g. `SEED` → `CHARGPT_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Ok(None)` when unset, `Err(ConfigError::EnvVar)` when set but
/// unreadable.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads and parses an environment variable.
///
/// Returns `Ok(None)` when unset and `Err(ConfigError::Parse)` when set but
/// not valid for `T`.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`Config`] from the environment, defaulting unset fields.
///
/// # Errors
///
/// [`ConfigError`] if any *set* variable fails to read or parse.
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    Ok(Config {
        seed: env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed),
        input_path: env_string(&env_key(ENV_INPUT_PATH))?
            .map(PathBuf::from)
            .unwrap_or(default.input_path),
        n_embed: env_parsed::<usize>(&env_key(ENV_N_EMBED))?.unwrap_or(default.n_embed),
        n_head: env_parsed::<usize>(&env_key(ENV_N_HEAD))?.unwrap_or(default.n_head),
        n_layer: env_parsed::<usize>(&env_key(ENV_N_LAYER))?.unwrap_or(default.n_layer),
        block_size: env_parsed::<usize>(&env_key(ENV_BLOCK_SIZE))?.unwrap_or(default.block_size),
        init_std: env_parsed::<f64>(&env_key(ENV_INIT_STD))?.unwrap_or(default.init_std),
        learning_rate: env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?
            .unwrap_or(default.learning_rate),
        beta1: env_parsed::<f64>(&env_key(ENV_BETA1))?.unwrap_or(default.beta1),
        beta2: env_parsed::<f64>(&env_key(ENV_BETA2))?.unwrap_or(default.beta2),
        epsilon: env_parsed::<f64>(&env_key(ENV_EPSILON))?.unwrap_or(default.epsilon),
        num_steps: env_parsed::<usize>(&env_key(ENV_NUM_STEPS))?.unwrap_or(default.num_steps),
        loss_log_every: env_parsed::<usize>(&env_key(ENV_LOSS_LOG_EVERY))?
            .unwrap_or(default.loss_log_every),
        callback_every: env_parsed::<usize>(&env_key(ENV_CALLBACK_EVERY))?
            .unwrap_or(default.callback_every),
        temperature: env_parsed::<f64>(&env_key(ENV_TEMPERATURE))?.unwrap_or(default.temperature),
        sample_size: env_parsed::<usize>(&env_key(ENV_SAMPLE_SIZE))?.unwrap_or(default.sample_size),
    })
}
