//! Guess statistics.
//!
//! Pure functions over the guesses of one fixture: average scoreline,
//! home/draw/away tally and the most guessed scorelines. No I/O; every
//! function accepts an empty slice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many scorelines `top_scorelines` keeps unless told otherwise.
pub const DEFAULT_TOP_SCORELINES: usize = 3;

/// A goal pair, rendered as `"H x A"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub const fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.home, self.away)
    }
}

/// Predicted outcome counts. Always sums to the number of guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeTally {
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
}

impl OutcomeTally {
    pub fn total(&self) -> usize {
        self.home_wins + self.draws + self.away_wins
    }
}

/// A scoreline and how many guesses picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorelineCount {
    pub score: String,
    pub count: usize,
}

/// Mean predicted goals per side, each rounded half away from zero.
/// An empty input yields `0 x 0`.
pub fn average_scoreline(guesses: &[Scoreline]) -> Scoreline {
    if guesses.is_empty() {
        return Scoreline::default();
    }

    let count = guesses.len() as f64;
    let (home, away) = guesses.iter().fold((0u64, 0u64), |(h, a), g| {
        (h + u64::from(g.home), a + u64::from(g.away))
    });

    Scoreline {
        home: (home as f64 / count).round() as u32,
        away: (away as f64 / count).round() as u32,
    }
}

pub fn outcome_tally(guesses: &[Scoreline]) -> OutcomeTally {
    guesses
        .iter()
        .fold(OutcomeTally::default(), |mut tally, guess| {
            match guess.home.cmp(&guess.away) {
                std::cmp::Ordering::Greater => tally.home_wins += 1,
                std::cmp::Ordering::Equal => tally.draws += 1,
                std::cmp::Ordering::Less => tally.away_wins += 1,
            }
            tally
        })
}

/// The `n` most guessed scorelines, by count descending.
///
/// Ties keep the order in which the scorelines first appear in `guesses`.
pub fn top_scorelines(guesses: &[Scoreline], n: usize) -> Vec<ScorelineCount> {
    let mut counts: Vec<(Scoreline, usize)> = Vec::new();
    for guess in guesses {
        match counts.iter_mut().find(|(score, _)| score == guess) {
            Some((_, count)) => *count += 1,
            None => counts.push((*guess, 1)),
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(n)
        .map(|(score, count)| ScorelineCount {
            score: score.to_string(),
            count,
        })
        .collect()
}
