use crate::app_config::EngineConfig;
use crate::ConfigError;

/// Load engine configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_engine_config_from_env()
}

/// Load engine configuration from environment variables already in the process.
///
/// Unlike [`load_engine_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config_from_env() -> Result<EngineConfig, ConfigError> {
    build_engine_config(|key| std::env::var(key))
}

/// Build engine configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults come from [`EngineConfig::default`].
fn build_engine_config<F>(lookup: F) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = EngineConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, &default.to_string());
        let value = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
            },
        }
    };

    let log_level = or_default("MPBOT_LOG_LEVEL", &defaults.log_level);
    let target_lang = or_default("MPBOT_TARGET_LANG", &defaults.target_lang)
        .trim()
        .to_ascii_lowercase();
    if target_lang.is_empty() {
        return Err(invalid("MPBOT_TARGET_LANG", "must not be empty".to_string()));
    }

    let http_timeout_secs = parse_u64("MPBOT_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?;
    let user_agent = or_default("MPBOT_USER_AGENT", &defaults.user_agent);
    let probe_batch_size =
        parse_positive_usize("MPBOT_PROBE_BATCH_SIZE", defaults.probe_batch_size)?;
    let probe_range_bytes = parse_u64("MPBOT_PROBE_RANGE_BYTES", defaults.probe_range_bytes)?;
    let probe_max_bytes = parse_u64("MPBOT_PROBE_MAX_BYTES", defaults.probe_max_bytes)?;
    let probe_detail_images =
        parse_bool("MPBOT_PROBE_DETAIL_IMAGES", defaults.probe_detail_images)?;
    let llm_token_budget = parse_u32("MPBOT_LLM_TOKEN_BUDGET", defaults.llm_token_budget)?;
    let max_images = parse_positive_usize("MPBOT_MAX_IMAGES", defaults.max_images)?;

    Ok(EngineConfig {
        log_level,
        target_lang,
        http_timeout_secs,
        user_agent,
        probe_batch_size,
        probe_range_bytes,
        probe_max_bytes,
        probe_detail_images,
        llm_token_budget,
        max_images,
        filter: defaults.filter,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
