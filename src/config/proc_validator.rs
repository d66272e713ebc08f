//! Configuration validation with aggregated errors.

use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::config::vendors::{LeanConfig, PlaidConfig, ServiceConfig};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_lean(&cfg.lean, &mut errors);
    validate_plaid(&cfg.plaid, &mut errors);

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    match settings.server.port.parse::<u16>() {
        Ok(0) | Err(_) => errors.push(format!(
            "settings.server.port '{}' must be an integer in range 1-65535",
            settings.server.port
        )),
        Ok(_) => {}
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if settings.records.is_enabled && settings.records.path.trim().is_empty() {
        errors.push("settings.records.path must not be empty when records are enabled".to_string());
    }

    if settings.http_timeout_ms == Some(0) {
        errors.push("settings.http_timeout_ms must be greater than 0".to_string());
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_lean(lean: &LeanConfig, errors: &mut Vec<String>) {
    require_url("lean.auth_url", &lean.auth_url, errors);
    require_url("lean.api_url", &lean.api_url, errors);
    require_present("lean.client_id", &lean.client_id, errors);
    require_present("lean.client_secret", &lean.client_secret, errors);
    require_present("lean.app_token", &lean.app_token, errors);
}

fn validate_plaid(plaid: &PlaidConfig, errors: &mut Vec<String>) {
    require_url("plaid.base_url", &plaid.base_url, errors);
    require_present("plaid.client_id", &plaid.client_id, errors);
    require_present("plaid.secret", &plaid.secret, errors);
    require_present("plaid.client_name", &plaid.client_name, errors);

    if plaid.products.is_empty() {
        errors.push("plaid.products must contain at least one product".to_string());
    }
    if plaid.country_codes.is_empty() {
        errors.push("plaid.country_codes must contain at least one country code".to_string());
    }
}

fn require_present(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required (set it in the config or through its env variable)", field));
    }
}

fn require_url(field: &str, value: &str, errors: &mut Vec<String>) {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(format!("{} '{}' must be an http(s) URL", field, value));
    }
}
