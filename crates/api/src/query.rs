//! Shared query parameter types for collection handlers.

use serde::Deserialize;

use flowgate_core::ordering::OrderBy;
use flowgate_core::paging::Paging;
use flowgate_core::where_clause::WhereClause;

use crate::error::ApiResult;

/// Generic collection parameters (`?where=&orderBy=&maxItems=&skipCount=`).
///
/// Range validation of the paging window happens in the engine; the
/// `where` and `orderBy` strings are parsed here so handlers work with
/// typed values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParams {
    pub skip_count: Option<i64>,
    pub max_items: Option<i64>,
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    pub order_by: Option<String>,
}

impl CollectionParams {
    pub fn paging(&self) -> Paging {
        Paging::new(self.skip_count.unwrap_or(0), self.max_items)
    }

    pub fn parse_where(&self) -> ApiResult<Option<WhereClause>> {
        Ok(self
            .where_clause
            .as_deref()
            .map(WhereClause::parse)
            .transpose()?)
    }

    pub fn parse_order_by(&self) -> ApiResult<Option<OrderBy>> {
        Ok(self
            .order_by
            .as_deref()
            .map(OrderBy::parse)
            .transpose()?)
    }
}

/// The `?select=` parameter of selective updates: a comma-separated
/// property list.
#[derive(Debug, Default, Deserialize)]
pub struct SelectParams {
    pub select: Option<String>,
}

impl SelectParams {
    pub fn fields(&self) -> Option<Vec<String>> {
        self.select.as_deref().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }
}
