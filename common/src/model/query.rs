use serde::{Deserialize, Serialize};

/// Admin-curated SQL statement. `sql_text` may contain `?` positional slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sql_text: String,
}

/// Outcome of running a saved query.
///
/// Execution failures are reported through `error` (the SQLite message,
/// verbatim) rather than as a failed request; `columns` and `rows` are then
/// empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRun {
    pub name: String,
    pub sql_text: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub error: Option<String>,
}
