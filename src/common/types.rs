use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::error::IndexError;

/// Row identifiers are dense and zero-based; the loader hands them out in file order.
pub type RowId = u32;

/// Result of evaluating a predicate tree: duplicates collapsed, ascending order.
pub type RowSet = BTreeSet<RowId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Int64,
    Float64,
    String,
    Date,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int64 => "integer",
            DataType::Float64 => "double",
            DataType::String => "string",
            DataType::Date => "date",
        };
        f.write_str(name)
    }
}

impl FromStr for DataType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(DataType::Int64),
            "double" | "float" => Ok(DataType::Float64),
            "string" | "text" => Ok(DataType::String),
            "date" => Ok(DataType::Date),
            other => Err(IndexError::UnknownDataType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_parses_header_spellings() {
        assert_eq!("integer".parse::<DataType>().unwrap(), DataType::Int64);
        assert_eq!(" Double ".parse::<DataType>().unwrap(), DataType::Float64);
        assert_eq!("TEXT".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("date".parse::<DataType>().unwrap(), DataType::Date);
    }

    #[test]
    fn unknown_datatype_is_rejected() {
        let err = "blob".parse::<DataType>().unwrap_err();
        assert_eq!(err, IndexError::UnknownDataType("blob".into()));
    }

    #[test]
    fn datatype_display_matches_header_names() {
        assert_eq!(DataType::Int64.to_string(), "integer");
        assert_eq!(DataType::Date.to_string(), "date");
    }
}
