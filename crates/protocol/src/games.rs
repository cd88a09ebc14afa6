//! "Connections" puzzle games: four categories of four clues each.

use serde::{Deserialize, Serialize};

/// Number of categories in a game, and of clues in a category.
pub const GROUP_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionGameRow {
    pub category_name: String,
    pub category_clues: Vec<String>,
}

impl Default for ConnectionGameRow {
    fn default() -> Self {
        Self {
            category_name: String::new(),
            category_clues: vec![String::new(); GROUP_SIZE],
        }
    }
}

impl ConnectionGameRow {
    fn is_set(&self) -> bool {
        !self.category_name.is_empty()
            && self.category_clues.len() == GROUP_SIZE
            && self.category_clues.iter().all(|clue| !clue.is_empty())
    }
}

/// Body of `POST /games/connections`, built up field by field by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConnectionsGame {
    pub puzzle_name: String,
    pub connection_categories: Vec<ConnectionGameRow>,
}

impl Default for CreateConnectionsGame {
    fn default() -> Self {
        Self {
            puzzle_name: String::new(),
            connection_categories: vec![ConnectionGameRow::default(); GROUP_SIZE],
        }
    }
}

impl CreateConnectionsGame {
    /// Whether every field is filled in: a puzzle name, exactly four
    /// categories, each with a name and exactly four non-empty clues.
    pub fn is_set(&self) -> bool {
        !self.puzzle_name.is_empty()
            && self.connection_categories.len() == GROUP_SIZE
            && self.connection_categories.iter().all(ConnectionGameRow::is_set)
    }
}

/// A stored game including its solution, as returned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsGame {
    #[serde(rename = "_id")]
    pub id: String,
    pub connection_categories: Vec<ConnectionGameRow>,
    pub puzzle_name: String,
    pub slug: String,
    pub author_id: String,
    pub creation_datetime: i64,
}

/// Listing entry for a game, without its solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalConnectionsGame {
    pub id: String,
    pub puzzle_name: String,
    pub slug: String,
    pub author_id: String,
    pub creation_datetime: i64,
}

/// A game as served to a player: all sixteen clues, shuffled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayConnectionGame {
    pub id: String,
    pub author_id: String,
    pub scrambled_clues: Vec<String>,
    pub puzzle_name: String,
    pub slug: String,
    pub creation_datetime: i64,
}

/// Outcome of guessing one row. `row_name` is only revealed on a correct guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrySolveRow {
    #[serde(default)]
    pub row_name: Option<String>,
    pub correct_guess: bool,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CreateConnectionsGame {
        CreateConnectionsGame {
            puzzle_name: "Weekly".into(),
            connection_categories: (0..GROUP_SIZE)
                .map(|row| ConnectionGameRow {
                    category_name: format!("row {row}"),
                    category_clues: (0..GROUP_SIZE).map(|c| format!("clue {row}-{c}")).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn blank_form_is_not_set() {
        let game = CreateConnectionsGame::default();
        assert_eq!(game.connection_categories.len(), GROUP_SIZE);
        assert!(game.connection_categories.iter().all(|r| r.category_clues.len() == GROUP_SIZE));
        assert!(!game.is_set());
    }

    #[test]
    fn filled_form_is_set() {
        assert!(filled().is_set());
    }

    #[test]
    fn any_missing_field_unsets() {
        let mut game = filled();
        game.puzzle_name.clear();
        assert!(!game.is_set());

        let mut game = filled();
        game.connection_categories.pop();
        assert!(!game.is_set());

        let mut game = filled();
        game.connection_categories[2].category_name.clear();
        assert!(!game.is_set());

        let mut game = filled();
        game.connection_categories[1].category_clues[3].clear();
        assert!(!game.is_set());

        let mut game = filled();
        game.connection_categories[0].category_clues.push("extra".into());
        assert!(!game.is_set());
    }
}
