// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::ids::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: CategoryId,
    pub quantity_per_unit: String,
    pub unit_price_cents: i64,
    pub units_in_stock: i64,
    pub units_on_order: i64,
    pub reorder_level: i64,
    pub discontinued: bool,
}

/// Columns of the product collection, named the way the datasets name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductField {
    ProductId,
    ProductName,
    CategoryId,
    QuantityPerUnit,
    UnitPrice,
    UnitsInStock,
    UnitsOnOrder,
    ReorderLevel,
    Discontinued,
}

impl ProductField {
    pub const ALL: [Self; 9] = [
        Self::ProductId,
        Self::ProductName,
        Self::CategoryId,
        Self::QuantityPerUnit,
        Self::UnitPrice,
        Self::UnitsInStock,
        Self::UnitsOnOrder,
        Self::ReorderLevel,
        Self::Discontinued,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductId => "ProductID",
            Self::ProductName => "ProductName",
            Self::CategoryId => "CategoryID",
            Self::QuantityPerUnit => "QuantityPerUnit",
            Self::UnitPrice => "UnitPrice",
            Self::UnitsInStock => "UnitsInStock",
            Self::UnitsOnOrder => "UnitsOnOrder",
            Self::ReorderLevel => "ReorderLevel",
            Self::Discontinued => "Discontinued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductId => "Product ID",
            Self::ProductName => "Product Name",
            Self::CategoryId => "Category ID",
            Self::QuantityPerUnit => "Quantity per Unit",
            Self::UnitPrice => "Price",
            Self::UnitsInStock => "Units in Stock",
            Self::UnitsOnOrder => "Units on Order",
            Self::ReorderLevel => "Reorder Level",
            Self::Discontinued => "Discontinued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Money(i64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Ordering between values of the same kind. `Null` sorts before any value.
    /// Values of different kinds are not comparable.
    pub fn cmp_value(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, _) => Some(Ordering::Less),
            (_, Self::Null) => Some(Ordering::Greater),
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(right)),
            (Self::Money(left), Self::Money(right)) => Some(left.cmp(right)),
            (Self::Bool(left), Self::Bool(right)) => Some(left.cmp(right)),
            (Self::Text(left), Self::Text(right)) => Some(
                left.to_lowercase()
                    .cmp(&right.to_lowercase())
                    .then_with(|| left.cmp(right)),
            ),
            _ => None,
        }
    }

    /// Total order used for sorting mixed columns: same-kind values compare
    /// naturally, otherwise values group by kind.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
            .unwrap_or_else(|| self.kind_rank().cmp(&other.kind_rank()))
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) => 2,
            Self::Money(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<CategoryId> for FieldValue {
    fn from(value: CategoryId) -> Self {
        Self::Integer(value.get())
    }
}

/// A record the query evaluator can read fields from.
pub trait Record {
    fn field_value(&self, field: ProductField) -> FieldValue;
}

impl Record for Product {
    fn field_value(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::ProductId => FieldValue::Integer(self.id.get()),
            ProductField::ProductName => FieldValue::Text(self.name.clone()),
            ProductField::CategoryId => FieldValue::Integer(self.category_id.get()),
            ProductField::QuantityPerUnit => FieldValue::Text(self.quantity_per_unit.clone()),
            ProductField::UnitPrice => FieldValue::Money(self.unit_price_cents),
            ProductField::UnitsInStock => FieldValue::Integer(self.units_in_stock),
            ProductField::UnitsOnOrder => FieldValue::Integer(self.units_on_order),
            ProductField::ReorderLevel => FieldValue::Integer(self.reorder_level),
            ProductField::Discontinued => FieldValue::Bool(self.discontinued),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: ProductField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn asc(field: ProductField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(field: ProductField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}
