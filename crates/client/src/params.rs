/// Filter, sort and paging parameters for collection calls.
///
/// ```ignore
/// let params = ListParams::new()
///     .where_clause("(status = 'active')")
///     .order_by("startedAt DESC")
///     .max_items(20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    where_clause: Option<String>,
    order_by: Option<String>,
    skip_count: Option<i64>,
    max_items: Option<i64>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    pub fn skip_count(mut self, skip: i64) -> Self {
        self.skip_count = Some(skip);
        self
    }

    pub fn max_items(mut self, max: i64) -> Self {
        self.max_items = Some(max);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(clause) = &self.where_clause {
            query.push(("where", clause.clone()));
        }
        if let Some(order) = &self.order_by {
            query.push(("orderBy", order.clone()));
        }
        if let Some(skip) = self.skip_count {
            query.push(("skipCount", skip.to_string()));
        }
        if let Some(max) = self.max_items {
            query.push(("maxItems", max.to_string()));
        }
        query
    }
}
