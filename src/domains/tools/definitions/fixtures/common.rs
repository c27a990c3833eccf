//! Queries shared by the fixture tools.

use std::collections::HashMap;

use crate::core::store::{QueryExecutor, QueryParam, StoreError, decode_rows, placeholders};
use crate::domains::models::FixtureGuessRow;

/// Load the guesses of several fixtures in one statement, grouped by
/// fixture id. Within a fixture, guesses keep creation order.
pub async fn guesses_by_fixture(
    store: &dyn QueryExecutor,
    fixture_ids: &[i64],
) -> Result<HashMap<i64, Vec<FixtureGuessRow>>, StoreError> {
    if fixture_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT g.id AS id, g.fixtureId AS fixtureId, g.homeGoals AS homeGoals, \
         g.awayGoals AS awayGoals, g.createdAt AS createdAt \
         FROM guesses g \
         WHERE g.fixtureId IN ({}) \
         ORDER BY g.createdAt ASC, g.id ASC",
        placeholders(fixture_ids.len())
    );
    let params: Vec<QueryParam> = fixture_ids.iter().map(|&id| QueryParam::from(id)).collect();

    let rows = decode_rows::<FixtureGuessRow>(store.fetch(&sql, &params).await?)?;

    let mut grouped: HashMap<i64, Vec<FixtureGuessRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.fixture_id).or_default().push(row);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::fake::FakeExecutor;
    use serde_json::json;

    #[tokio::test]
    async fn test_no_fixtures_skips_the_store() {
        let store = FakeExecutor::new();
        let grouped = guesses_by_fixture(&store, &[]).await.unwrap();
        assert!(grouped.is_empty());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_groups_by_fixture_in_order() {
        let store = FakeExecutor::new().with_rows(vec![
            json!({"id": 1, "fixtureId": 10, "homeGoals": 1, "awayGoals": 0, "createdAt": "2025-01-01 10:00:00"}),
            json!({"id": 2, "fixtureId": 11, "homeGoals": 2, "awayGoals": 2, "createdAt": "2025-01-01 11:00:00"}),
            json!({"id": 3, "fixtureId": 10, "homeGoals": 0, "awayGoals": 3, "createdAt": "2025-01-01 12:00:00"}),
        ]);
        let grouped = guesses_by_fixture(&store, &[10, 11]).await.unwrap();

        let ids: Vec<_> = grouped[&10].iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(grouped[&11].len(), 1);

        let calls = store.calls();
        assert!(calls[0].sql.contains("IN (?, ?)"));
        assert_eq!(calls[0].params, vec![QueryParam::Int(10), QueryParam::Int(11)]);
    }
}
