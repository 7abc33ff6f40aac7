//! Expense categories.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Closed set of expense categories. Unknown stored values fall back to
/// `Other` when rows are read back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Healthcare,
    Shopping,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "food" => Ok(Self::Food),
            "transportation" => Ok(Self::Transportation),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "healthcare" => Ok(Self::Healthcare),
            "shopping" => Ok(Self::Shopping),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid expense category: {other}"
            ))),
        }
    }
}
