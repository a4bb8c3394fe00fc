// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{CategoryId, FieldValue, ProductField, SortSpec};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub field: ProductField,
    pub operator: FilterOperator,
    pub value: FieldValue,
    pub ignore_case: bool,
}

impl FilterDescriptor {
    pub fn new(
        field: ProductField,
        operator: FilterOperator,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
            ignore_case: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterLogic {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterNode {
    Descriptor(FilterDescriptor),
    Composite(CompositeFilter),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeFilter {
    pub logic: FilterLogic,
    pub filters: Vec<FilterNode>,
}

impl CompositeFilter {
    /// The dropdown's filter: one `CategoryID eq <id>` predicate under `and`.
    pub fn category(category: CategoryId) -> Self {
        Self {
            logic: FilterLogic::And,
            filters: vec![FilterNode::Descriptor(FilterDescriptor::new(
                ProductField::CategoryId,
                FilterOperator::Eq,
                category,
            ))],
        }
    }

    /// Returns the descriptors at the top level, skipping nested composites.
    pub fn descriptors(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.iter().filter_map(|node| match node {
            FilterNode::Descriptor(descriptor) => Some(descriptor),
            FilterNode::Composite(_) => None,
        })
    }
}

/// Sort, filter and window applied to the product collection before a page
/// is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingSpec {
    pub sort: Vec<SortSpec>,
    pub filter: Option<CompositeFilter>,
    pub skip: usize,
    pub take: usize,
}

impl Default for PagingSpec {
    fn default() -> Self {
        Self::new(vec![SortSpec::asc(ProductField::ProductName)], DEFAULT_PAGE_SIZE)
    }
}

impl PagingSpec {
    pub fn new(sort: Vec<SortSpec>, take: usize) -> Self {
        Self {
            sort,
            filter: None,
            skip: 0,
            take: take.max(1),
        }
    }

    fn page_size(&self) -> usize {
        self.take.max(1)
    }

    /// Zero-based page the current `skip` falls on.
    pub fn page_index(&self) -> usize {
        self.skip / self.page_size()
    }

    /// Number of pages for `total` records. An empty collection still has one
    /// (empty) page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size()).max(1)
    }

    pub fn with_skip(&self, skip: usize) -> Self {
        Self {
            skip,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: Vec<SortSpec>) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    pub fn first_page(&self) -> Self {
        self.with_skip(0)
    }

    pub fn previous_page(&self) -> Self {
        self.with_skip(self.page_index().saturating_sub(1) * self.page_size())
    }

    pub fn next_page(&self, total: usize) -> Self {
        let last = self.page_count(total) - 1;
        let next = (self.page_index() + 1).min(last);
        self.with_skip(next * self.page_size())
    }

    pub fn last_page(&self, total: usize) -> Self {
        self.with_skip((self.page_count(total) - 1) * self.page_size())
    }

    /// Pulls an out-of-range `skip` back to the start of the last page so a
    /// shrunken collection never renders an empty page past its end.
    pub fn clamped(&self, total: usize) -> Self {
        if self.skip < total || self.skip == 0 {
            return self.clone();
        }
        self.last_page(total)
    }
}
