use serde::{Deserialize, Serialize};

/// A catalog row ready to be inserted into `movies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub original_language: Option<String>,
    /// Normalised to `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub total_movies: i64,
    pub language_count: i64,
    pub avg_rating: f64,
    pub avg_popularity: f64,
    pub top5: Vec<MovieSummary>,
}

/// Dashboard figures for the "hot movies" section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotSummary {
    pub year: i32,
    pub top_movie_title: Option<String>,
    pub max_popularity: f64,
    /// Average rating of the movies above the 70th popularity percentile.
    pub avg_rating: f64,
    /// Average popularity per release month, January first.
    pub monthly_avg: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub original_language: Option<String>,
    pub release_year: Option<i32>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    pub movie_count: i64,
    pub avg_rating: Option<f64>,
    pub avg_popularity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub movies: Vec<SearchHit>,
    pub stats: SearchStats,
}
