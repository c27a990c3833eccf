//! Response rendering.
//!
//! Tools answer with a Portuguese narrative text block and, where the tool
//! has a data contract, the same data as structured content. A zero-result
//! answer is always a sentence, never an empty content list.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use crate::core::store::Row;
use crate::core::time_window::MonthWindow;
use crate::domains::models::{FinishedGame, FixtureRow, GuessRow, TopUserRow, UpcomingGame};

pub const NO_UPCOMING_FIXTURES: &str = "Nenhum jogo futuro encontrado.";
pub const NO_FINISHED_FIXTURES: &str = "Nenhum jogo finalizado encontrado.";

/// A successful text-only result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// A successful result carrying a narrative and a JSON payload.
pub fn structured_result<T: Serialize>(text: impl Into<String>, payload: &T) -> CallToolResult {
    let text = text.into();
    match serde_json::to_value(payload) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(text)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            text_result(text)
        }
    }
}

pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

// ============================================================================
// Narratives
// ============================================================================

pub fn month_top_user(window: &MonthWindow, top: Option<&TopUserRow>) -> String {
    match top {
        Some(user) => {
            let who = match &user.email {
                Some(email) => format!("{} ({})", user.name, email),
                None => user.name.clone(),
            };
            format!(
                "Top de {}/{}: {} com {} pontos.",
                window.month, window.year, who, user.total_points
            )
        }
        None => format!("Nenhum ponto encontrado em {}/{}.", window.month, window.year),
    }
}

pub fn fixture_not_found(team_name: &str, date: Option<&str>) -> String {
    match date {
        Some(date) => format!("Nenhum jogo encontrado com '{}' na data {}.", team_name, date),
        None => format!("Nenhum jogo futuro encontrado com '{}'.", team_name),
    }
}

pub fn game_guesses(fixture: &FixtureRow, guesses: &[GuessRow]) -> String {
    if guesses.is_empty() {
        return format!(
            "Nenhum palpite registrado para {} ({}).",
            fixture.name, fixture.start
        );
    }

    let mut text = format!(
        "Palpites para {} ({}): {}\n",
        fixture.name,
        fixture.start,
        guesses.len()
    );
    for (idx, guess) in guesses.iter().enumerate() {
        let author = guess
            .user_name
            .clone()
            .unwrap_or_else(|| format!("usuário {}", guess.user_id));
        text.push_str(&format!(
            "  {}. {}: {} x {} (criado em: {})\n",
            idx + 1,
            author,
            guess.home_goals,
            guess.away_goals,
            guess.created_at
        ));
    }
    text
}

pub fn upcoming_games(games: &[UpcomingGame]) -> String {
    if games.is_empty() {
        return NO_UPCOMING_FIXTURES.to_string();
    }

    let mut text = String::from("update_upcoming_games\n");
    for game in games {
        text.push_str(&format!("\nJogo: {} x {}\n", game.home, game.away));
        text.push_str(&format!(
            "Data: {}\nCampeonato: {}\n",
            game.date, game.championship
        ));
        text.push_str(&format!(
            "Palpites: {}\nMédia de placar: {}\n",
            game.guesses, game.avg_score
        ));
        text.push_str("Estatísticas:\n");
        for stat in &game.stats {
            text.push_str(&format!("  - {}: {}\n", stat.label, stat.value));
        }
        text.push_str("Placar mais apostado:\n");
        for score in &game.most_guessed_scores {
            text.push_str(&format!("  - {}: {}\n", score.score, score.count));
        }
    }
    text
}

pub fn finished_games(games: &[FinishedGame]) -> String {
    if games.is_empty() {
        return NO_FINISHED_FIXTURES.to_string();
    }

    let mut text = String::new();
    for (idx, game) in games.iter().enumerate() {
        text.push_str(&format!("Jogo {}: {}\n", idx + 1, game.match_name));
        if let Some(league) = &game.league {
            text.push_str(&format!("Campeonato: {}\n", league));
        }
        text.push_str(&format!("Data/Hora: {}\n", game.match_date_time));
        text.push_str(&format!(
            "Placar final: {}\n",
            game.final_score.as_deref().unwrap_or("indisponível")
        ));
        text.push_str(&format!("Total de palpites: {}\n", game.guesses_count));
        text.push_str(&format!("Palpites exatos: {}\n", game.exact_guesses));
        if !game.guesses.is_empty() {
            text.push_str("Palpites:\n");
            for (n, guess) in game.guesses.iter().enumerate() {
                text.push_str(&format!(
                    "  {}. {} x {} (id: {}, criado em: {})\n",
                    n + 1,
                    guess.home_goals,
                    guess.away_goals,
                    guess.guess_id,
                    guess.created_at
                ));
            }
        }
        text.push('\n');
    }
    text
}

/// Rows as pretty-printed JSON.
pub fn rows_json(rows: &[Row]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}
