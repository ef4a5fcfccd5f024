pub mod admin;
pub mod data_sources;
pub mod movies;
pub mod queries;
pub mod reports;
pub mod templates;
