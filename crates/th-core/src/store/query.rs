//! Client-side where/order/limit evaluation

use super::Document;
use serde_json::Value;
use std::cmp::Ordering;

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals value (missing fields count as null)
    Eq,
    /// Field differs from value
    Ne,
    /// Field is null or missing; the filter value is ignored
    IsNull,
}

/// A single where-clause
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    /// Check a document against this filter
    pub fn matches(&self, record: &Document) -> bool {
        let field = record.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            FilterOp::Eq => field == &self.value,
            FilterOp::Ne => field != &self.value,
            FilterOp::IsNull => field.is_null(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Order-by clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

/// A list query: all filters must match, then sort, then limit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    /// Query matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Add an inequality filter
    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Ne,
            value: value.into(),
        });
        self
    }

    /// Require the field to be null or absent
    pub fn is_null(mut self, field: impl Into<String>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::IsNull,
            value: Value::Null,
        });
        self
    }

    /// Sort ascending by a field
    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            direction: OrderDirection::Asc,
        });
        self
    }

    /// Sort descending by a field
    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            direction: OrderDirection::Desc,
        });
        self
    }

    /// Keep at most `limit` records
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a document against every filter
    pub fn matches(&self, record: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Evaluate the query over a full collection
    ///
    /// The sort is stable, so records comparing equal keep store order.
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut out: Vec<Document> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            out.sort_by(|a, b| {
                let av = a.get(&order.field).unwrap_or(&Value::Null);
                let bv = b.get(&order.field).unwrap_or(&Value::Null);
                let ord = compare_values(av, bv);
                match order.direction {
                    OrderDirection::Asc => ord,
                    OrderDirection::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values used for sorting
///
/// null < bool < number < string < array < object. Strings compare
/// lexicographically, which orders RFC 3339 UTC timestamps chronologically.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs() -> Vec<Document> {
        vec![
            json!({
                "id": "a",
                "post_id": "p1",
                "score": 3,
                "parent_id": null,
                "created_at": "2024-01-01T10:00:00Z"
            }),
            json!({
                "id": "b",
                "post_id": "p1",
                "score": -1,
                "parent_id": "a",
                "created_at": "2024-01-01T09:00:00Z"
            }),
            json!({"id": "c", "post_id": "p2", "score": 7, "created_at": "2024-01-02T00:00:00Z"}),
            json!({
                "id": "d",
                "post_id": "p1",
                "score": 3,
                "parent_id": "a",
                "created_at": "2024-01-01T11:00:00Z"
            }),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn ids(records: &[Document]) -> Vec<&str> {
        records.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_store_order() {
        let all = docs();
        assert_eq!(ids(&Query::new().apply(&all)), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_eq_and_ne_filters() {
        let all = docs();
        let q = Query::new().eq("post_id", "p1").ne("id", "b");
        assert_eq!(ids(&q.apply(&all)), vec!["a", "d"]);
    }

    #[test]
    fn test_is_null_treats_missing_as_null() {
        let all = docs();
        let q = Query::new().is_null("parent_id");
        assert_eq!(ids(&q.apply(&all)), vec!["a", "c"]);
    }

    #[test]
    fn test_order_by_timestamp_string() {
        let all = docs();
        let q = Query::new().eq("post_id", "p1").order_asc("created_at");
        assert_eq!(ids(&q.apply(&all)), vec!["b", "a", "d"]);
    }

    #[test]
    fn test_order_desc_is_stable_for_ties() {
        let all = docs();
        let q = Query::new().order_desc("score");
        assert_eq!(ids(&q.apply(&all)), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_limit_applies_after_sort() {
        let all = docs();
        let q = Query::new().order_desc("score").limit(2);
        assert_eq!(ids(&q.apply(&all)), vec!["c", "a"]);
        assert!(Query::new().limit(0).apply(&all).is_empty());
    }

    #[test]
    fn test_compare_values_mixed_types() {
        assert_eq!(compare_values(&json!(null), &json!(1)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!(1), &json!("1")), Ordering::Less);
    }
}
