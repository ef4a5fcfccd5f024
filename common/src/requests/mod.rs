//! Form payloads accepted by the report and catalog endpoints.
//!
//! Fields arrive as raw strings from HTML forms; the backend decides how each
//! one is parsed and which defaults apply.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotTopNForm {
    /// `all`, `year` or `range`.
    pub time_type: Option<String>,
    pub year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub n: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearHotForm {
    pub year: Option<String>,
    pub n: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScoreForm {
    pub min_rating: Option<String>,
    pub min_votes: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HiddenGemsForm {
    pub min_rating: Option<String>,
    pub max_popularity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeWindowForm {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub n: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunQueryForm {
    pub param: Option<String>,
}

/// Manual single-row insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddMovieForm {
    pub title: Option<String>,
    pub lang: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<String>,
    pub vote_average: Option<String>,
    pub vote_count: Option<String>,
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieSearchForm {
    pub title_keyword: Option<String>,
    pub language: Option<String>,
    pub release_year: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub min_popularity: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: crate::model::datasource::ImportMode,
}
