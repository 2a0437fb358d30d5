pub mod types;
pub mod value;

pub use types::{DataType, RowId, RowSet};
pub use value::Value;
