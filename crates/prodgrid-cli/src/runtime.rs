// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use prodgrid_app::{Category, Product};
use prodgrid_data::Catalog;
use prodgrid_tui::AppRuntime;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    Files {
        categories_path: PathBuf,
        products_path: PathBuf,
    },
}

impl CatalogSource {
    pub fn load(&self) -> Result<Catalog> {
        match self {
            Self::Builtin => Catalog::builtin().context("load built-in catalog"),
            Self::Files {
                categories_path,
                products_path,
            } => Catalog::load(categories_path, products_path).with_context(|| {
                format!(
                    "load catalog from {} and {}; fix [data] paths or remove them to use the built-in catalog",
                    categories_path.display(),
                    products_path.display()
                )
            }),
        }
    }
}

/// Reads the catalog fresh on every category load so `r` picks up file edits.
/// Products come from the same snapshot as the categories that preceded them.
pub struct CatalogRuntime {
    source: CatalogSource,
    snapshot: Option<Catalog>,
}

impl CatalogRuntime {
    pub fn with_catalog(source: CatalogSource, catalog: Catalog) -> Self {
        Self {
            source,
            snapshot: Some(catalog),
        }
    }
}

impl AppRuntime for CatalogRuntime {
    fn load_categories(&mut self) -> Result<Vec<Category>> {
        let catalog = match self.snapshot.take() {
            Some(catalog) => catalog,
            None => self.source.load()?,
        };
        let categories = catalog.categories().to_vec();
        self.snapshot = Some(catalog);
        Ok(categories)
    }

    fn load_products(&mut self) -> Result<Vec<Product>> {
        let catalog = match self.snapshot.take() {
            Some(catalog) => catalog,
            None => self.source.load()?,
        };
        Ok(catalog.products().to_vec())
    }
}
