//! Shared response envelope types.
//!
//! Collections go out as `{ "list": { "entries": [{ "entry": ... }],
//! "pagination": ... } }`, singletons as `{ "entry": ... }`. Use these
//! instead of ad-hoc `serde_json::json!` so the envelope shape is typed.

use serde::Serialize;

use flowgate_core::paging::{PagedList, Pagination};

/// Standard `{ "entry": T }` singleton envelope.
#[derive(Debug, Serialize)]
pub struct EntryBody<T: Serialize> {
    pub entry: T,
}

/// Standard `{ "list": { "entries", "pagination" } }` collection envelope.
#[derive(Debug, Serialize)]
pub struct ListBody<T: Serialize> {
    pub list: ListPayload<T>,
}

#[derive(Debug, Serialize)]
pub struct ListPayload<T: Serialize> {
    pub pagination: Pagination,
    pub entries: Vec<EntryBody<T>>,
}

impl<T: Serialize> From<PagedList<T>> for ListBody<T> {
    fn from(page: PagedList<T>) -> Self {
        ListBody {
            list: ListPayload {
                pagination: page.pagination,
                entries: page
                    .items
                    .into_iter()
                    .map(|entry| EntryBody { entry })
                    .collect(),
            },
        }
    }
}
