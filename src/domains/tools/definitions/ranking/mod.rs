//! Ranking tools: leaderboard queries over `userPoints`.

pub mod month_top_user;

pub use month_top_user::{MonthTopUserParams, MonthTopUserTool};
