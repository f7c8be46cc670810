// Simple command-line application to play chess
//
// Enter moves as two square names, like `e2 e4`. The first square is selected, and its legal
// destinations are shown before the move is attempted.

use kestrel::{board::PrettyStyle, Coord, GameState, MoveStatus};
use std::io::{self, BufRead, Write};

fn parse_squares(s: &str) -> Option<(Coord, Coord)> {
    let mut iter = s.split_ascii_whitespace();
    let src = iter.next()?.parse().ok()?;
    let dst = iter.next()?.parse().ok()?;
    match iter.next() {
        Some(_) => None,
        None => Some((src, dst)),
    }
}

fn main() {
    let mut stdin = io::stdin().lock();

    let mut game = GameState::new();

    loop {
        if let Some(outcome) = game.outcome() {
            println!("{}", game.pretty(PrettyStyle::Ascii));
            println!("Game finished: {}", outcome);
            break;
        }

        println!("{}", game.pretty(PrettyStyle::Ascii));
        print!("{} move: ", game.turn().name());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }

        let (src, dst) = match parse_squares(s.trim()) {
            Some(squares) => squares,
            None => {
                println!("Expected two squares, like `e2 e4`");
                println!();
                continue;
            }
        };

        let targets = game.select(src);
        let targets: Vec<_> = targets.iter().map(|c| c.to_string()).collect();
        println!("Legal destinations from {}: [{}]", src, targets.join(", "));

        match game.try_move(src, dst) {
            MoveStatus::Applied(applied) => {
                if let Some(piece) = applied.captured {
                    println!("Captured {:?}", piece);
                }
                if applied.promote {
                    println!("Pawn promoted to queen");
                }
            }
            MoveStatus::Deselected => println!("Illegal move {}{}", src, dst),
        }
        println!();
    }
}
