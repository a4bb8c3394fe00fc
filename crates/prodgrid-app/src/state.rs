// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CategoryId, CompositeFilter, PagingSpec, Product};

/// Everything the screen needs to know about what the user picked.
///
/// The record is only changed through the transitions below; each one takes
/// the current state by value and returns the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub selected_category: Option<CategoryId>,
    pub paging: PagingSpec,
    pub detail_visible: bool,
    pub selected_row: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CategorySelected(Option<CategoryId>),
    PagingChanged(PagingSpec),
    RowSelected(Product),
    DetailClosed,
}

impl ViewEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::CategorySelected(_) => "category_selected",
            Self::PagingChanged(_) => "paging_changed",
            Self::RowSelected(_) => "row_selected",
            Self::DetailClosed => "detail_closed",
        }
    }
}

impl ViewState {
    pub fn new(paging: PagingSpec) -> Self {
        Self {
            paging,
            ..Self::default()
        }
    }

    /// Sets or clears the category filter. Sort and page size are kept; the
    /// window always goes back to the first page.
    pub fn on_category_selected(self, category: Option<CategoryId>) -> Self {
        let paging = PagingSpec {
            filter: category.map(CompositeFilter::category),
            skip: 0,
            ..self.paging
        };
        Self {
            selected_category: category,
            paging,
            ..self
        }
    }

    /// Takes the grid's paging as-is.
    pub fn on_paging_changed(self, paging: PagingSpec) -> Self {
        Self { paging, ..self }
    }

    pub fn on_row_selected(self, row: Product) -> Self {
        Self {
            detail_visible: true,
            selected_row: Some(row),
            ..self
        }
    }

    pub fn on_detail_closed(self) -> Self {
        Self {
            detail_visible: false,
            selected_row: None,
            ..self
        }
    }

    /// Runs the transition for `event` and records the resulting state.
    pub fn apply(self, event: ViewEvent) -> Self {
        let name = event.name();
        let next = match event {
            ViewEvent::CategorySelected(category) => self.on_category_selected(category),
            ViewEvent::PagingChanged(paging) => self.on_paging_changed(paging),
            ViewEvent::RowSelected(row) => self.on_row_selected(row),
            ViewEvent::DetailClosed => self.on_detail_closed(),
        };
        tracing::debug!(
            event = name,
            category = ?next.selected_category.map(CategoryId::get),
            sort = ?next.paging.sort,
            filtered = next.paging.filter.is_some(),
            skip = next.paging.skip,
            take = next.paging.take,
            detail_visible = next.detail_visible,
            selected_product = ?next.selected_row.as_ref().map(|row| row.id.get()),
            "view state changed"
        );
        next
    }
}
