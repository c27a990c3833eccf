//! Statement policy checks.
//!
//! These run before anything reaches the store: the read tool only accepts
//! read statements, the write tool never accepts them, and neither accepts
//! more than one statement.

use crate::domains::tools::error::ToolError;

/// Leading keywords of statements that only read.
pub const READ_VERBS: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "WITH"];

/// Keywords that make a statement change data or files when they appear
/// outside parentheses. `UPDATE` right after `FOR` is a row lock, not a write.
const WRITE_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "REPLACE", "DROP", "ALTER", "CREATE", "TRUNCATE", "RENAME",
    "GRANT", "REVOKE", "OUTFILE", "DUMPFILE",
];

/// Copy of `sql` with comments turned into spaces and quoted text into `0`.
///
/// Executable comments (`/*! ... */`, `/*M! ... */`) are run by the server,
/// so their body is kept as code and only the delimiters are dropped.
fn mask(sql: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut in_executable = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '\'' | '"' | '`' => {
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\\' && c != '`' {
                        i += 2;
                    } else if chars[i] == c {
                        break;
                    } else {
                        i += 1;
                    }
                }
                out.push_str(" 0 ");
            }
            '#' => {
                i = skip_line(&chars, i);
                out.push(' ');
                continue;
            }
            // `--` only opens a comment when followed by whitespace or the end.
            '-' if next == Some('-')
                && chars.get(i + 2).is_none_or(|c| c.is_whitespace() || c.is_control()) =>
            {
                i = skip_line(&chars, i);
                out.push(' ');
                continue;
            }
            '/' if next == Some('*') => {
                let rest: String = chars[i + 2..].iter().take(2).collect();
                if rest.starts_with('!') || rest.starts_with("M!") {
                    i += if rest.starts_with('!') { 3 } else { 4 };
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    in_executable = true;
                    out.push(' ');
                    continue;
                }
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 1;
                out.push(' ');
            }
            '*' if in_executable && next == Some('/') => {
                in_executable = false;
                i += 1;
                out.push(' ');
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the newline ending the comment that starts at `i`.
fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

/// Words outside any parentheses, upper-cased, up to the first `;`.
/// A `,` at the outer level is reported as its own token.
fn top_level_tokens(masked: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut word = String::new();

    for c in masked.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            if depth == 0 {
                word.push(c);
            }
            continue;
        }
        if !word.is_empty() {
            tokens.push(word.to_ascii_uppercase());
            word.clear();
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => tokens.push(",".to_string()),
            ';' if depth == 0 => break,
            _ => {}
        }
    }
    tokens
}

/// The statement a `WITH` clause leads into.
///
/// Walks `WITH [RECURSIVE] name [(cols)] AS (...) [, ...]` at the outer
/// level and returns the first word that is not part of the CTE list.
fn verb_after_with(tokens: &[String]) -> Option<&str> {
    let mut expect_name = true;
    for token in tokens.iter().skip(1) {
        match token.as_str() {
            "RECURSIVE" if expect_name => {}
            "," => expect_name = true,
            "AS" => {}
            _ if expect_name => expect_name = false,
            verb => return Some(verb),
        }
    }
    None
}

/// First keyword of the statement, upper-cased.
pub fn leading_verb(sql: &str) -> Option<String> {
    let masked = mask(sql);
    let verb: String = masked
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if verb.is_empty() {
        None
    } else {
        Some(verb.to_ascii_uppercase())
    }
}

/// Whether the statement only reads.
///
/// The leading verb must be a read verb, a `WITH` must lead into a
/// `SELECT`, and no write keyword may appear outside parentheses.
pub fn is_read_statement(sql: &str) -> bool {
    let Some(verb) = leading_verb(sql) else {
        return false;
    };
    if !READ_VERBS.contains(&verb.as_str()) {
        return false;
    }

    let tokens = top_level_tokens(&mask(sql));
    if verb == "WITH" && verb_after_with(&tokens) != Some("SELECT") {
        return false;
    }

    !tokens.iter().enumerate().any(|(idx, token)| {
        WRITE_KEYWORDS.contains(&token.as_str())
            && !(token == "UPDATE" && idx > 0 && tokens[idx - 1] == "FOR")
    })
}

/// Whether anything but whitespace or comments follows a `;` outside quotes.
pub fn has_multiple_statements(sql: &str) -> bool {
    mask(sql)
        .split_once(';')
        .is_some_and(|(_, tail)| tail.chars().any(|c| !c.is_whitespace() && c != ';'))
}

fn single_statement(sql: &str) -> Result<(), ToolError> {
    if leading_verb(sql).is_none() {
        return Err(ToolError::invalid_arguments("empty statement"));
    }
    if has_multiple_statements(sql) {
        return Err(ToolError::invalid_arguments(
            "only one statement per call is accepted",
        ));
    }
    Ok(())
}

/// Accept a single read statement.
pub fn ensure_read(sql: &str) -> Result<(), ToolError> {
    single_statement(sql)?;
    if !is_read_statement(sql) {
        return Err(ToolError::invalid_arguments(format!(
            "read-query only accepts read statements ({})",
            READ_VERBS.join(", ")
        )));
    }
    Ok(())
}

/// Accept a single statement that is not a pure read.
pub fn ensure_write(sql: &str) -> Result<(), ToolError> {
    single_statement(sql)?;
    if is_read_statement(sql) {
        return Err(ToolError::invalid_arguments(
            "write-query does not accept read statements",
        ));
    }
    Ok(())
}

/// Accept a plain table identifier (`[A-Za-z0-9_]+`).
pub fn ensure_identifier(name: &str) -> Result<(), ToolError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "'{}' is not a valid table name",
            name
        )))
    }
}
