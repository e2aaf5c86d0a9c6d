//! The standard cleaning operations.
//!
//! Every operation takes the frame by value together with the resolved
//! column names and returns the transformed frame. Columns whose runtime type
//! does not fit the operation are skipped, as are empty column lists.

mod cast;
mod duplicates;
mod filter;
mod nulls;
mod stats;
mod text;

pub use cast::{cast_type, polars_dtype, value_type_of};
pub use duplicates::drop_duplicates;
pub use filter::filter_rows;
pub use nulls::{drop_nulls, fill_nulls};
pub use stats::{remove_outliers, standardize};
pub use text::{lowercase, replace, trim_whitespace, uppercase};
