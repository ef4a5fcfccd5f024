use serde::{Deserialize, Serialize};

/// How a bulk import treats rows already in the catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Keep existing rows and add the new ones.
    #[default]
    Append,
    /// Clear the catalog first.
    Replace,
}

/// Result of a successful CSV import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub imported: usize,
    /// Hex MD5 of the imported bytes.
    pub source_md5: String,
}
