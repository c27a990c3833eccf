//! Tool definitions module.
//!
//! One file per tool, grouped by the data they touch:
//! - `ranking/`: monthly leaderboard
//! - `fixtures/`: guesses per fixture, upcoming and finished fixtures
//! - `memo/`: insight memo writes
//! - `sql/`: raw statements and schema inspection

pub mod fixtures;
pub mod memo;
pub mod ranking;
pub mod sql;

pub use fixtures::{FinishedGamesStatsTool, GameGuessesTool, NextFixturesTool};
pub use memo::AppendInsightTool;
pub use ranking::MonthTopUserTool;
pub use sql::{DescribeTableTool, ListTablesTool, ReadQueryTool, WriteQueryTool};
