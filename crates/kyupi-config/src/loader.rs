// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./kyupi.toml` > `~/.config/kyupi/kyupi.toml` > `/etc/kyupi/kyupi.toml`
//! with environment variable overrides via the `KYUPI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KyupiConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/kyupi/kyupi.toml`
/// 3. `~/.config/kyupi/kyupi.toml`
/// 4. `./kyupi.toml`
/// 5. `KYUPI_*` environment variables
pub fn load_config() -> Result<KyupiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KyupiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KyupiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KyupiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KyupiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KyupiConfig::default()))
        .merge(Toml::file("/etc/kyupi/kyupi.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("kyupi/kyupi.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("kyupi.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `KYUPI_GATEWAY_IDENTITY_HEADER`
/// must become `gateway.identity_header`, not `gateway.identity.header`.
fn env_provider() -> Env {
    Env::prefixed("KYUPI_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}
