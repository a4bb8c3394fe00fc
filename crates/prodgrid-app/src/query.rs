// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{
    CompositeFilter, FieldValue, FilterDescriptor, FilterLogic, FilterNode, FilterOperator,
    PagingSpec, Record, SortDirection, SortSpec,
};

/// One page of records plus the number of records that matched the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataResult<R> {
    pub data: Vec<R>,
    pub total: usize,
}

/// Filters, sorts and pages `records` according to `paging`.
///
/// `total` counts every record that passed the filter, before the page window
/// is applied. Sorting is stable, so records that compare equal on every sort
/// key keep their source order.
pub fn process<R: Record + Clone>(records: &[R], paging: &PagingSpec) -> DataResult<R> {
    let mut matched = records
        .iter()
        .filter(|record| {
            paging
                .filter
                .as_ref()
                .is_none_or(|filter| composite_matches(*record, filter))
        })
        .collect::<Vec<_>>();
    let total = matched.len();

    if !paging.sort.is_empty() {
        matched.sort_by(|left, right| compare_records(*left, *right, &paging.sort));
    }

    let data = matched
        .into_iter()
        .skip(paging.skip)
        .take(paging.take)
        .cloned()
        .collect();
    DataResult { data, total }
}

/// Applies only the filter part of `paging`.
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    filter: Option<&CompositeFilter>,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| filter.is_none_or(|filter| composite_matches(*record, filter)))
        .collect()
}

fn compare_records<R: Record>(left: &R, right: &R, sorts: &[SortSpec]) -> Ordering {
    for sort in sorts {
        let order = left
            .field_value(sort.field)
            .sort_cmp(&right.field_value(sort.field));
        let order = match sort.direction {
            SortDirection::Asc => order,
            SortDirection::Desc => order.reverse(),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    Ordering::Equal
}

pub fn composite_matches<R: Record>(record: &R, filter: &CompositeFilter) -> bool {
    // An empty composite places no constraint.
    if filter.filters.is_empty() {
        return true;
    }
    let mut nodes = filter.filters.iter().map(|node| match node {
        FilterNode::Descriptor(descriptor) => descriptor_matches(record, descriptor),
        FilterNode::Composite(composite) => composite_matches(record, composite),
    });
    match filter.logic {
        FilterLogic::And => nodes.all(|matched| matched),
        FilterLogic::Or => nodes.any(|matched| matched),
    }
}

pub fn descriptor_matches<R: Record>(record: &R, descriptor: &FilterDescriptor) -> bool {
    let value = record.field_value(descriptor.field);
    let expected = &descriptor.value;
    let ordering = || compare(&value, expected, descriptor.ignore_case);

    match descriptor.operator {
        FilterOperator::IsNull => value.is_null(),
        FilterOperator::IsNotNull => !value.is_null(),
        FilterOperator::IsEmpty => value.as_text().is_some_and(str::is_empty),
        FilterOperator::IsNotEmpty => value.as_text().is_some_and(|text| !text.is_empty()),
        FilterOperator::Eq => ordering() == Some(Ordering::Equal),
        FilterOperator::Neq => ordering() != Some(Ordering::Equal),
        FilterOperator::Lt => ordering() == Some(Ordering::Less),
        FilterOperator::Lte => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
        FilterOperator::Gt => ordering() == Some(Ordering::Greater),
        FilterOperator::Gte => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
        FilterOperator::Contains => {
            text_pair(&value, expected, descriptor.ignore_case)
                .is_some_and(|(haystack, needle)| haystack.contains(&needle))
        }
        FilterOperator::DoesNotContain => {
            text_pair(&value, expected, descriptor.ignore_case)
                .is_some_and(|(haystack, needle)| !haystack.contains(&needle))
        }
        FilterOperator::StartsWith => {
            text_pair(&value, expected, descriptor.ignore_case)
                .is_some_and(|(haystack, needle)| haystack.starts_with(&needle))
        }
        FilterOperator::EndsWith => {
            text_pair(&value, expected, descriptor.ignore_case)
                .is_some_and(|(haystack, needle)| haystack.ends_with(&needle))
        }
    }
}

fn compare(value: &FieldValue, expected: &FieldValue, ignore_case: bool) -> Option<Ordering> {
    match (value, expected) {
        (FieldValue::Text(left), FieldValue::Text(right)) if !ignore_case => Some(left.cmp(right)),
        (FieldValue::Text(left), FieldValue::Text(right)) => {
            Some(left.to_lowercase().cmp(&right.to_lowercase()))
        }
        _ => value.cmp_value(expected),
    }
}

fn text_pair(
    value: &FieldValue,
    expected: &FieldValue,
    ignore_case: bool,
) -> Option<(String, String)> {
    let (haystack, needle) = (value.as_text()?, expected.as_text()?);
    if ignore_case {
        Some((haystack.to_lowercase(), needle.to_lowercase()))
    } else {
        Some((haystack.to_owned(), needle.to_owned()))
    }
}
