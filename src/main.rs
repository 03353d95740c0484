//! Binary entry point: configuration from the environment, then the full
//! train-and-sample pipeline.

use chargpt::config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::from_env()?;
    cfg.validate()?;
    chargpt::run(&cfg)
}
