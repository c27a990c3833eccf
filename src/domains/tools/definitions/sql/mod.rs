//! SQL access tools: raw read/write statements and schema inspection.
//!
//! - `guard`: statement policy checks shared by the tools below
//! - `read_query` / `write_query`: pass-through statements
//! - `list_tables` / `describe_table`: schema inspection

pub mod describe_table;
pub mod guard;
pub mod list_tables;
pub mod read_query;
pub mod write_query;

pub use describe_table::{DescribeTableParams, DescribeTableTool};
pub use list_tables::ListTablesTool;
pub use read_query::{QueryParams, ReadQueryTool};
pub use write_query::WriteQueryTool;
