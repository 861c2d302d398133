//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::{Context, Result};

use crate::config::{parse_flag, Config};

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("circuitz Configuration");
    println!("{:-<40}", "");

    println!("Clock Period:        {} ms", config.clock_period_ms);
    println!("Clock Samples:       {}", config.clock_samples);
    println!("Verify Consistency:  {}", config.verify_consistency);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "clock-period" | "period" => {
            let period: u64 = value
                .parse()
                .with_context(|| format!("Invalid clock period: {value}"))?;
            if period == 0 {
                anyhow::bail!("Clock period must be at least 1 ms");
            }
            config.clock_period_ms = period;
            println!("Set clock-period to: {} ms", period);
        }
        "clock-samples" | "samples" => {
            config.clock_samples = value
                .parse()
                .with_context(|| format!("Invalid sample count: {value}"))?;
            println!("Set clock-samples to: {}", config.clock_samples);
        }
        "verify" | "verify-consistency" => {
            config.verify_consistency = parse_flag(value)?;
            println!("Set verify-consistency to: {}", config.verify_consistency);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}. Valid keys: clock-period, clock-samples, verify-consistency",
                key
            );
        }
    }

    config.save()?;
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "clock-period" | "period" => config.clock_period_ms.to_string(),
        "clock-samples" | "samples" => config.clock_samples.to_string(),
        "verify" | "verify-consistency" => config.verify_consistency.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
