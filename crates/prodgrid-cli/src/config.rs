// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use prodgrid_app::{DEFAULT_PAGE_SIZE, PagingSpec, ProductField, SortDirection, SortSpec};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::runtime::CatalogSource;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SORT_FIELD: ProductField = ProductField::ProductName;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            grid: Grid::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub categories_path: Option<String>,
    pub products_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Grid {
    pub page_size: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
            sort_field: Some(DEFAULT_SORT_FIELD.as_str().to_owned()),
            sort_direction: Some(SortDirection::Asc.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            path: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("PRODGRID_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set PRODGRID_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(prodgrid_data::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and keep values under [data], [grid], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(page_size) = self.grid.page_size
            && page_size <= 0
        {
            bail!(
                "grid.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(field) = &self.grid.sort_field
            && !field.is_empty()
            && ProductField::parse(field).is_none()
        {
            let known = ProductField::ALL
                .iter()
                .map(|field| field.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "grid.sort_field {:?} in {} is not a product field; use one of: {} (or \"\" for no sort)",
                field,
                path.display(),
                known
            );
        }

        if let Some(direction) = &self.grid.sort_direction
            && SortDirection::parse(direction).is_none()
        {
            bail!(
                "grid.sort_direction {:?} in {} must be \"asc\" or \"desc\"",
                direction,
                path.display()
            );
        }

        match (&self.data.categories_path, &self.data.products_path) {
            (Some(_), None) | (None, Some(_)) => bail!(
                "[data] in {} sets only one of categories_path/products_path; set both or neither",
                path.display()
            ),
            _ => {}
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).map_err(|error| {
                anyhow!(
                    "log.level {:?} in {} is not a valid filter: {error}",
                    level,
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match (&self.data.categories_path, &self.data.products_path) {
            (Some(categories), Some(products)) => CatalogSource::Files {
                categories_path: PathBuf::from(categories),
                products_path: PathBuf::from(products),
            },
            _ => CatalogSource::Builtin,
        }
    }

    pub fn page_size(&self) -> usize {
        self.grid
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_sort(&self) -> Vec<SortSpec> {
        let field = match self.grid.sort_field.as_deref() {
            Some("") => return Vec::new(),
            Some(name) => ProductField::parse(name).unwrap_or(DEFAULT_SORT_FIELD),
            None => DEFAULT_SORT_FIELD,
        };
        let direction = self
            .grid
            .sort_direction
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Asc);
        vec![SortSpec { field, direction }]
    }

    pub fn initial_paging(&self) -> PagingSpec {
        PagingSpec::new(self.default_sort(), self.page_size())
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.path.as_ref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# prodgrid config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Both paths must be set together; default is the built-in catalog.\n# categories_path = \"/absolute/path/to/categories.json\"\n# products_path = \"/absolute/path/to/products.json\"\n\n[grid]\npage_size = {}\nsort_field = \"{}\"\nsort_direction = \"asc\"\n\n[log]\n# Optional. Logging is off unless a file is set; RUST_LOG overrides level.\n# path = \"/tmp/prodgrid.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_PAGE_SIZE,
            DEFAULT_SORT_FIELD.as_str(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
