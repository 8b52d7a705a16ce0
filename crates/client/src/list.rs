//! Wire envelope parsing.
//!
//! Collections arrive as `{ "list": { "entries": [{ "entry": ... }],
//! "pagination": ... } }`, singletons as `{ "entry": ... }`. A missing
//! envelope field is a contract violation and fails the call.
//!
//! `hasMoreItems` is recomputed here from
//! `skipCount + count < totalItems` rather than trusted; a divergent
//! server flag is corrected and logged, never propagated. A `count` that
//! disagrees with the number of entries, on the other hand, is a
//! malformed response.

use serde::de::DeserializeOwned;
use serde_json::Value;

use flowgate_core::paging::{PagedList, Pagination};

use crate::error::ClientError;

pub(crate) fn parse_paged_list<T: DeserializeOwned>(
    body: &Value,
) -> Result<PagedList<T>, ClientError> {
    let list = body
        .get("list")
        .ok_or_else(|| ClientError::malformed("response has no 'list' object"))?;
    let entries = list
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::malformed("response list has no 'entries' array"))?;
    let pagination: Pagination = list
        .get("pagination")
        .cloned()
        .ok_or_else(|| ClientError::malformed("response list has no 'pagination' object"))
        .and_then(|raw| {
            serde_json::from_value(raw)
                .map_err(|e| ClientError::malformed(format!("invalid pagination: {e}")))
        })?;

    let mut items = Vec::with_capacity(entries.len());
    for envelope in entries {
        let entry = envelope
            .get("entry")
            .ok_or_else(|| ClientError::malformed("entry envelope has no 'entry' object"))?;
        let item: T = serde_json::from_value(entry.clone())
            .map_err(|e| ClientError::malformed(format!("invalid entry: {e}")))?;
        items.push(item);
    }

    let count = items.len() as i64;
    if pagination.count != count {
        return Err(ClientError::malformed(format!(
            "pagination count {} does not match {} entries",
            pagination.count, count
        )));
    }
    let derived = Pagination::from_window(pagination.total_items, pagination.skip_count, count);
    if derived.has_more_items != pagination.has_more_items {
        tracing::warn!(
            reported = pagination.has_more_items,
            derived = derived.has_more_items,
            skip_count = pagination.skip_count,
            count,
            total_items = pagination.total_items,
            "Server-reported hasMoreItems diverges from the paging invariant; using the derived value"
        );
    }
    Ok(PagedList {
        items,
        pagination: derived,
    })
}

pub(crate) fn parse_entry<T: DeserializeOwned>(body: &Value) -> Result<T, ClientError> {
    let entry = body
        .get("entry")
        .ok_or_else(|| ClientError::malformed("response has no 'entry' object"))?;
    serde_json::from_value(entry.clone())
        .map_err(|e| ClientError::malformed(format!("invalid entry: {e}")))
}
