use {
    super::ApiClient,
    crate::Error,
    homelab_protocol::{
        ConnectionsGame, CreateConnectionsGame, MinimalConnectionsGame, PlayConnectionGame,
        TrySolveRow,
    },
};

const CONNECTIONS: [&str; 2] = ["games", "connections"];

impl ApiClient {
    /// `POST /games/connections`. An incomplete game is refused before any
    /// request is made.
    pub async fn create_connections_game(
        &self,
        game: &CreateConnectionsGame,
    ) -> Result<ConnectionsGame, Error> {
        if !game.is_set() {
            return Err(Error::Validation(
                "a game needs a name and four named categories of four clues".into(),
            ));
        }
        self.post(&CONNECTIONS, game).await
    }

    /// `GET /games/connections`: games authored by other users.
    pub async fn list_connection_games_for_others(
        &self,
    ) -> Result<Vec<MinimalConnectionsGame>, Error> {
        self.get(&CONNECTIONS).await
    }

    /// `GET /games/connections/mine`
    pub async fn list_my_connection_games(&self) -> Result<Vec<MinimalConnectionsGame>, Error> {
        self.get(&["games", "connections", "mine"]).await
    }

    /// `GET /games/connections/play/{slug}`
    pub async fn get_connection_game_to_play(&self, slug: &str) -> Result<PlayConnectionGame, Error> {
        self.get(&["games", "connections", "play", slug]).await
    }

    /// `PUT /games/connections/play/{slug}/try_solve` with a guess of one row.
    pub async fn try_solve_connection_game_row(
        &self,
        slug: &str,
        guess: &[String],
    ) -> Result<TrySolveRow, Error> {
        self.put(&["games", "connections", "play", slug, "try_solve"], guess)
            .await
    }
}
