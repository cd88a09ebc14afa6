//! CLI subcommands for Connections puzzle games.

use std::io::{BufRead, Write};

use {
    anyhow::Result,
    clap::Subcommand,
    homelab_client::HomelabClient,
    homelab_protocol::{PlayConnectionGame, games::GROUP_SIZE},
};

use crate::request_failed;

#[derive(Subcommand)]
pub enum GamesAction {
    /// List games to play (or your own with --mine).
    List {
        #[arg(long)]
        mine: bool,
    },
    /// Play a game interactively: guess four clues at a time.
    Play { slug: String },
}

pub async fn handle_games(client: &HomelabClient, action: GamesAction) -> Result<()> {
    let api = client.api();
    match action {
        GamesAction::List { mine } => {
            let games = if mine {
                api.list_my_connection_games().await
            } else {
                api.list_connection_games_for_others().await
            }
            .map_err(request_failed)?;

            if games.is_empty() {
                println!("No games found.");
            }
            for game in &games {
                println!("  {:<32} {:<24} by {}", game.puzzle_name, game.slug, game.author_id);
            }
            Ok(())
        },
        GamesAction::Play { slug } => {
            let game = api
                .get_connection_game_to_play(&slug)
                .await
                .map_err(request_failed)?;
            play(client, game).await
        },
    }
}

async fn play(client: &HomelabClient, game: PlayConnectionGame) -> Result<()> {
    let mut remaining = game.scrambled_clues.clone();
    let mut solved = 0;
    let stdin = std::io::stdin();

    println!("{}", game.puzzle_name);
    while !remaining.is_empty() {
        println!();
        for (i, clue) in remaining.iter().enumerate() {
            println!("  {:>2}. {clue}", i + 1);
        }
        print!("Pick {GROUP_SIZE} numbers (blank to quit): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
        let picks = match parse_picks(&line, remaining.len()) {
            Ok(picks) => picks,
            Err(msg) => {
                println!("{msg}");
                continue;
            },
        };

        let guess: Vec<String> = picks.iter().map(|&i| remaining[i].clone()).collect();
        let result = client
            .api()
            .try_solve_connection_game_row(&game.slug, &guess)
            .await
            .map_err(request_failed)?;

        if result.correct_guess {
            solved += 1;
            println!(
                "Correct: {}",
                result.row_name.as_deref().unwrap_or("(unnamed category)")
            );
            remaining.retain(|clue| !guess.contains(clue));
        } else {
            println!("Not a category.");
        }
    }

    println!("Solved {solved} of {GROUP_SIZE} categories.");
    Ok(())
}

/// Parse a line of 1-based clue numbers into distinct 0-based indices.
fn parse_picks(line: &str, available: usize) -> Result<Vec<usize>, String> {
    let mut picks = Vec::with_capacity(GROUP_SIZE);
    for token in line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        let n: usize = token
            .parse()
            .map_err(|_| format!("'{token}' is not a number"))?;
        if n == 0 || n > available {
            return Err(format!("{n} is out of range 1-{available}"));
        }
        if picks.contains(&(n - 1)) {
            return Err(format!("{n} picked twice"));
        }
        picks.push(n - 1);
    }
    if picks.len() != GROUP_SIZE {
        return Err(format!("pick exactly {GROUP_SIZE} clues"));
    }
    Ok(picks)
}
