use serde::{Deserialize, Serialize};

/// A row of the append-only report archive, joined with the display name of
/// the template that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: i64,
    pub template_id: Option<i64>,
    pub template_name: Option<String>,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
    pub format: String,
    /// Human-readable description of the inputs, e.g. `year_hot | year=2015 | N=10`.
    pub parameters: String,
    pub content: String,
}

/// One line of the language breakdown report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStat {
    pub original_language: Option<String>,
    pub movie_count: i64,
    pub avg_rating: Option<f64>,
    pub avg_popularity: Option<f64>,
    pub total_votes: Option<i64>,
}

/// Response of the language structure report: the raw breakdown plus the
/// rendered HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStructure {
    pub stats: Vec<LanguageStat>,
    pub report_html: String,
}
