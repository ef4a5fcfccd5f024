pub mod datasource;
pub mod movie;
pub mod query;
pub mod report;
pub mod template;
