//! Fixture tools: guesses per fixture, upcoming fixtures and finished games.
//!
//! - `game_guesses`: guesses placed on one fixture found by name
//! - `next_fixtures`: the next fixtures with guess statistics
//! - `finished_games`: finished fixtures with final score and every guess

pub mod common;
pub mod finished_games;
pub mod game_guesses;
pub mod next_fixtures;

pub use finished_games::{FinishedGamesStatsParams, FinishedGamesStatsTool};
pub use game_guesses::{GameGuessesParams, GameGuessesTool};
pub use next_fixtures::NextFixturesTool;
