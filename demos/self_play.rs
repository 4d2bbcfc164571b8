extern crate draughts_mcts;

use clap::Parser;
use draughts_mcts::boards::checkerboard::{CheckerBoard, CheckerType};
use draughts_mcts::boards::english_draughts::EnglishDraughts;
use draughts_mcts::game::{Game, GameOutcome, Player};
use draughts_mcts::mcts::MonteCarloTreeSearch;
use draughts_mcts::random::SeededRandomGenerator;
use flexi_logger::Logger;
use log::info;

/// Lets the search play English draughts against itself.
#[derive(Parser, Debug)]
#[command(name = "self_play")]
struct Config {
    /// Thinking time per move, in milliseconds
    #[arg(short = 'm', long, default_value_t = 500)]
    millis: u64,

    /// Number of rows and columns of the board
    #[arg(short = 's', long, default_value_t = 8)]
    size: usize,

    /// Stop the game after this many plies
    #[arg(long, default_value_t = 300)]
    max_plies: u32,

    /// Seed of the random playouts
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let mut game = EnglishDraughts::new(config.size)?;
    println!("{}", render(game.board()));

    while game.get_outcome() == GameOutcome::InProgress && game.turn() <= config.max_plies {
        // a fresh tree for every real move
        let mut mcts = MonteCarloTreeSearch::builder(game.clone())
            .with_random_generator(SeededRandomGenerator::new(config.seed + u64::from(game.turn())))
            .with_terminal_backpropagation(true)
            .build();
        mcts.iterate_for_millis(config.millis);

        for child in mcts.children_stats() {
            info!(
                "  {} : {:.3} ({}/{})",
                game.notation(&child.game_move),
                child.score,
                child.wins,
                child.visits
            );
        }

        let Some(best_move) = mcts.get_best_move().cloned() else {
            break;
        };
        println!(
            "{}. {} plays {} after {} iterations",
            game.turn(),
            name(game.get_current_player()),
            game.notation(&best_move),
            mcts.iterations()
        );
        game.play(&best_move)?;
        println!("{}", render(game.board()));
    }

    match game.get_outcome() {
        GameOutcome::Win(player) => println!("{} win", name(player)),
        GameOutcome::Draw => println!("Draw"),
        GameOutcome::InProgress => println!("Stopped after {} plies", config.max_plies),
    }
    Ok(())
}

fn name(player: Player) -> &'static str {
    match player {
        Player::One => "Whites",
        Player::Two => "Blacks",
    }
}

/// Draws the board with `o`/`x` for men and `O`/`X` for kings, squares numbered on the right.
fn render(board: &CheckerBoard) -> String {
    let half = board.size() / 2;
    let mut text = String::new();
    for row in 0..board.size() {
        let first = row * half + 1;
        for square in first..first + half {
            let symbol = match board.get(square) {
                CheckerType::Empty => '.',
                CheckerType::WhiteMan => 'o',
                CheckerType::BlackMan => 'x',
                CheckerType::WhiteKing => 'O',
                CheckerType::BlackKing => 'X',
            };
            if row % 2 == 0 {
                text.push_str(&format!("  {symbol} "));
            } else {
                text.push_str(&format!("{symbol}   "));
            }
        }
        text.push_str(&format!("   {first}-{}\n", first + half - 1));
    }
    text
}
