// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use prodgrid_app::{Category, CategoryId, Product, ProductId};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const APP_NAME: &str = "prodgrid";

const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.json");
const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(rename = "CategoryID")]
    category_id: i64,
    #[serde(rename = "CategoryName")]
    category_name: String,
    #[serde(rename = "Description", default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(rename = "ProductID")]
    product_id: i64,
    #[serde(rename = "ProductName")]
    product_name: String,
    #[serde(rename = "CategoryID")]
    category_id: i64,
    #[serde(rename = "QuantityPerUnit", default)]
    quantity_per_unit: String,
    #[serde(rename = "UnitPrice", default)]
    unit_price: f64,
    #[serde(rename = "UnitsInStock", default)]
    units_in_stock: i64,
    #[serde(rename = "UnitsOnOrder", default)]
    units_on_order: i64,
    #[serde(rename = "ReorderLevel", default)]
    reorder_level: i64,
    #[serde(rename = "Discontinued", default)]
    discontinued: bool,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: CategoryId::new(record.category_id),
            name: record.category_name,
            description: record.description,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: ProductId::new(record.product_id),
            name: record.product_name,
            category_id: CategoryId::new(record.category_id),
            quantity_per_unit: record.quantity_per_unit,
            unit_price_cents: price_to_cents(record.unit_price),
            units_in_stock: record.units_in_stock,
            units_on_order: record.units_on_order,
            reorder_level: record.reorder_level,
            discontinued: record.discontinued,
        }
    }
}

/// Converts a decimal dataset price to whole cents, rounding half away from zero.
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// The two read-only collections the browser works over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// The datasets compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let catalog = Self::from_json(BUILTIN_CATEGORIES, BUILTIN_PRODUCTS)
            .context("load built-in catalog")?;
        tracing::info!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            "built-in catalog loaded"
        );
        Ok(catalog)
    }

    pub fn load(categories_path: &Path, products_path: &Path) -> Result<Self> {
        let categories = fs::read_to_string(categories_path)
            .with_context(|| format!("read categories file {}", categories_path.display()))?;
        let products = fs::read_to_string(products_path)
            .with_context(|| format!("read products file {}", products_path.display()))?;
        let catalog = Self::from_json(&categories, &products).with_context(|| {
            format!(
                "load catalog from {} and {}",
                categories_path.display(),
                products_path.display()
            )
        })?;
        tracing::info!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            categories_path = %categories_path.display(),
            products_path = %products_path.display(),
            "catalog loaded from files"
        );
        Ok(catalog)
    }

    pub fn from_json(categories: &str, products: &str) -> Result<Self> {
        let categories: Vec<CategoryRecord> = serde_json::from_str(categories)
            .context("parse categories JSON; expected an array of {CategoryID, CategoryName}")?;
        let products: Vec<ProductRecord> = serde_json::from_str(products).context(
            "parse products JSON; expected an array of {ProductID, ProductName, CategoryID, ...}",
        )?;
        Self::new(
            categories.into_iter().map(Category::from).collect(),
            products.into_iter().map(Product::from).collect(),
        )
    }

    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self> {
        validate(&categories, &products)?;
        Ok(Self {
            categories,
            products,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

fn validate(categories: &[Category], products: &[Product]) -> Result<()> {
    let mut category_ids = BTreeSet::new();
    for category in categories {
        if !category_ids.insert(category.id) {
            bail!(
                "duplicate category id {} ({:?}) -- category ids must be unique",
                category.id,
                category.name
            );
        }
        if category.name.trim().is_empty() {
            bail!("category {} has an empty name", category.id);
        }
    }

    let mut product_ids = BTreeSet::new();
    for product in products {
        if !product_ids.insert(product.id) {
            bail!(
                "duplicate product id {} ({:?}) -- product ids must be unique",
                product.id,
                product.name
            );
        }
        if product.name.trim().is_empty() {
            bail!("product {} has an empty name", product.id);
        }
        if !category_ids.contains(&product.category_id) {
            bail!(
                "product {} ({:?}) references unknown category {} -- add the category or fix CategoryID",
                product.id,
                product.name,
                product.category_id
            );
        }
        if product.unit_price_cents < 0 {
            bail!(
                "product {} ({:?}) has a negative unit price",
                product.id,
                product.name
            );
        }
        if product.units_in_stock < 0 || product.units_on_order < 0 || product.reorder_level < 0 {
            bail!(
                "product {} ({:?}) has a negative stock count",
                product.id,
                product.name
            );
        }
    }

    Ok(())
}
