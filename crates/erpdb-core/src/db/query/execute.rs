use crate::{
    db::{
        direction::Direction,
        query::{Page, PageLimits, QueryError, QueryParams},
    },
    record::Record,
    schema::{Schema, SortKey},
    value,
};

/// Run a query over a collection snapshot.
///
/// Steps, in order: categorical filters, free-text search, sort, then the
/// page slice. `total` counts rows after filtering and before slicing.
/// Pages past the end yield an empty `data`.
pub fn execute(
    records: Vec<Record>,
    schema: &'static Schema,
    params: &QueryParams,
    limits: PageLimits,
) -> Result<Page<Record>, QueryError> {
    let page_size = resolve_page_size(params.page_size, limits)?;
    let page = params.page.max(1);
    let sort_key = resolve_sort(schema, params)?;

    let mut filters = Vec::with_capacity(params.filters.len());
    for filter in &params.filters {
        if !schema.is_filterable(&filter.field) {
            return Err(QueryError::UnknownFilterField {
                collection: schema.collection,
                field: filter.field.clone(),
            });
        }
        if !filter.is_all() {
            filters.push(filter);
        }
    }

    let needle = params
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<Record> = records
        .into_iter()
        .filter(|record| {
            filters
                .iter()
                .all(|f| value::matches_literal(record.get(&f.field), &f.value))
        })
        .filter(|record| {
            needle
                .as_deref()
                .is_none_or(|needle| schema.search_matches(record, needle))
        })
        .collect();

    let (key, direction) = sort_key;
    rows.sort_by(|a, b| {
        direction.apply(value::compare(key.accessor.read(a), key.accessor.read(b)))
    });

    let total = rows.len();
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let data = rows
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Ok(Page {
        data,
        total,
        current_page: page,
        page_size,
        total_pages: Page::<Record>::page_count(total, page_size),
    })
}

fn resolve_page_size(requested: Option<u32>, limits: PageLimits) -> Result<u32, QueryError> {
    match requested {
        Some(0) => Err(QueryError::InvalidPageSize),
        Some(size) => Ok(size.min(limits.max_page_size.max(1))),
        None => Ok(limits.default_page_size.max(1)),
    }
}

fn resolve_sort(
    schema: &'static Schema,
    params: &QueryParams,
) -> Result<(&'static SortKey, Direction), QueryError> {
    let (name, direction) = match &params.sort {
        Some(sort) => (sort.key.as_str(), sort.direction),
        None => schema.default_sort,
    };

    schema
        .sort_key(name)
        .map(|key| (key, direction))
        .ok_or_else(|| QueryError::UnknownSortKey {
            collection: schema.collection,
            key: name.to_string(),
        })
}
