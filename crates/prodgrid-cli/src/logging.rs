// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// The terminal belongs to the UI, so events only go to a file. With no
/// `[log].path` no subscriber is installed.
pub fn init(config: &Config, config_path: &Path) -> Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };
    install_file_subscriber(&path, config.log_level())?;
    tracing::debug!(
        config = %config_path.display(),
        page_size = config.page_size(),
        "config loaded"
    );
    Ok(())
}

fn install_file_subscriber(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}; fix [log].path", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("parse log level {level:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
