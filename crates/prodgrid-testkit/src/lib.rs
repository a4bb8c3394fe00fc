// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use prodgrid_app::{Category, CategoryId, Product, ProductId};
use serde_json::{Value, json};
use std::path::PathBuf;

const CATEGORY_NAMES: [(&str, &str); 4] = [
    ("Beverages", "Soft drinks, coffees, teas, beers, and ales"),
    ("Condiments", "Sweet and savory sauces, relishes, spreads, and seasonings"),
    ("Produce", "Dried fruit and bean curd"),
    ("Seafood", "Seaweed and fish"),
];

const PRODUCT_ADJECTIVES: [&str; 10] = [
    "Smoked", "Aged", "Spiced", "Organic", "Pickled", "Roasted", "Sweet", "Dried", "Wild",
    "Golden",
];

const PRODUCT_NOUNS: [&str; 12] = [
    "Lager", "Syrup", "Tofu", "Herring", "Marmalade", "Pears", "Stout", "Seasoning", "Kelp",
    "Chutney", "Crab", "Tea",
];

const PACKAGINGS: [&str; 6] = [
    "24 - 12 oz bottles",
    "12 - 550 ml bottles",
    "40 - 100 g pkgs.",
    "10 boxes x 20 bags",
    "2 kg box",
    "12 - 1 lb pkgs.",
];

/// Four categories with ids 1, 2, 7 and 8.
pub fn sample_categories() -> Vec<Category> {
    [1, 2, 7, 8]
        .into_iter()
        .zip(CATEGORY_NAMES)
        .map(|(id, (name, description))| Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
        })
        .collect()
}

/// Fourteen products spread across [`sample_categories`]; enough for two
/// pages at the default page size.
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Chai", 1, "10 boxes x 20 bags", 1800, 39, false),
        product(2, "Chang", 1, "24 - 12 oz bottles", 1900, 17, false),
        product(3, "Aniseed Syrup", 2, "12 - 550 ml bottles", 1000, 13, false),
        product(4, "Chef Anton's Cajun Seasoning", 2, "48 - 6 oz jars", 2200, 53, false),
        product(5, "Chef Anton's Gumbo Mix", 2, "36 boxes", 2135, 0, true),
        product(7, "Uncle Bob's Organic Dried Pears", 7, "12 - 1 lb pkgs.", 3000, 15, false),
        product(10, "Ikura", 8, "12 - 200 ml jars", 3100, 31, false),
        product(13, "Konbu", 8, "2 kg box", 600, 24, false),
        product(14, "Tofu", 7, "40 - 100 g pkgs.", 2325, 35, false),
        product(18, "Carnarvon Tigers", 8, "16 kg pkg.", 6250, 42, false),
        product(24, "Guaraná Fantástica", 1, "12 - 355 ml cans", 450, 20, true),
        product(28, "Rössle Sauerkraut", 7, "25 - 825 g cans", 4560, 26, true),
        product(34, "Sasquatch Ale", 1, "24 - 12 oz bottles", 1400, 111, false),
        product(65, "Louisiana Fiery Hot Pepper Sauce", 2, "32 - 8 oz bottles", 2105, 76, false),
    ]
}

pub fn product(
    id: i64,
    name: &str,
    category: i64,
    quantity_per_unit: &str,
    unit_price_cents: i64,
    units_in_stock: i64,
    discontinued: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        category_id: CategoryId::new(category),
        quantity_per_unit: quantity_per_unit.to_owned(),
        unit_price_cents,
        units_in_stock,
        units_on_order: 0,
        reorder_level: 0,
        discontinued,
    }
}

/// Serializes categories the way the JSON datasets spell them.
pub fn categories_json(categories: &[Category]) -> Value {
    Value::Array(
        categories
            .iter()
            .map(|category| {
                json!({
                    "CategoryID": category.id.get(),
                    "CategoryName": category.name,
                    "Description": category.description,
                })
            })
            .collect(),
    )
}

/// Serializes products the way the JSON datasets spell them, prices as decimals.
pub fn products_json(products: &[Product]) -> Value {
    Value::Array(
        products
            .iter()
            .map(|product| {
                json!({
                    "ProductID": product.id.get(),
                    "ProductName": product.name,
                    "CategoryID": product.category_id.get(),
                    "QuantityPerUnit": product.quantity_per_unit,
                    "UnitPrice": product.unit_price_cents as f64 / 100.0,
                    "UnitsInStock": product.units_in_stock,
                    "UnitsOnOrder": product.units_on_order,
                    "ReorderLevel": product.reorder_level,
                    "Discontinued": product.discontinued,
                })
            })
            .collect(),
    )
}

/// Writes `categories.json` and `products.json` into a fresh temp dir. The
/// dir is deleted when the returned guard drops.
pub fn write_catalog_files(
    categories: &[Category],
    products: &[Product],
) -> Result<(tempfile::TempDir, PathBuf, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let categories_path = dir.path().join("categories.json");
    let products_path = dir.path().join("products.json");
    std::fs::write(
        &categories_path,
        serde_json::to_string_pretty(&categories_json(categories))?,
    )
    .with_context(|| format!("write {}", categories_path.display()))?;
    std::fs::write(
        &products_path,
        serde_json::to_string_pretty(&products_json(products))?,
    )
    .with_context(|| format!("write {}", products_path.display()))?;
    Ok((dir, categories_path, products_path))
}

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for catalogs larger than the fixtures.
#[derive(Debug, Clone, Copy)]
pub struct CatalogFaker {
    seed: u64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: if seed == 0 { 1 } else { seed },
        }
    }

    /// `category_count` categories numbered from 1 and `product_count`
    /// products assigned to them at random. Product ids start at 1.
    pub fn catalog(
        &self,
        category_count: usize,
        product_count: usize,
    ) -> (Vec<Category>, Vec<Product>) {
        let mut rng = DeterministicRng::new(self.seed);
        let category_count = category_count.max(1);

        let categories = (1..=category_count)
            .map(|index| Category {
                id: CategoryId::new(index as i64),
                name: format!("Category {index}"),
                description: String::new(),
            })
            .collect::<Vec<_>>();

        let products = (1..=product_count)
            .map(|index| {
                let adjective = PRODUCT_ADJECTIVES[rng.int_n(PRODUCT_ADJECTIVES.len())];
                let noun = PRODUCT_NOUNS[rng.int_n(PRODUCT_NOUNS.len())];
                Product {
                    id: ProductId::new(index as i64),
                    name: format!("{adjective} {noun} {index}"),
                    category_id: CategoryId::new(1 + rng.int_n(category_count) as i64),
                    quantity_per_unit: PACKAGINGS[rng.int_n(PACKAGINGS.len())].to_owned(),
                    unit_price_cents: 100 + rng.int_n(25_000) as i64,
                    units_in_stock: rng.int_n(130) as i64,
                    units_on_order: rng.int_n(4) as i64 * 10,
                    reorder_level: rng.int_n(6) as i64 * 5,
                    discontinued: rng.int_n(8) == 0,
                }
            })
            .collect();

        (categories, products)
    }
}
