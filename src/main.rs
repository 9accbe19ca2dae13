//////////////////////////
// main.rs
//////////////////////////
//
// 10x10 chess between two peers. One player hosts a room and hands out the
// invite link, the other joins with it. Each side keeps its own copy of the
// rules and the whole game state is sent across after every move.

use anyhow::Result;
use colored::Colorize;
use log::{info, warn};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

use peer_chess::game::{parse_move, parse_square, square_name};
use peer_chess::legal::all_legal_moves;
use peer_chess::session::{ClickOutcome, Session};
use peer_chess::transport::{ChannelEvent, EventReceiver};
use peer_chess::types::Color;
use peer_chess::{host, join, Config};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::load()?;

    println!("{}", "Welcome to peer chess, 10x10 edition!".bright_yellow().bold());
    let mut input = BufReader::new(stdin()).lines();

    loop {
        println!("\nCommands:");
        println!("  host              - Open a room and wait for an opponent (you play White)");
        println!("  join <link>       - Join a room from an invite link (you play Black)");
        println!("  local             - Play both sides on this terminal");
        println!("  quit              - Exit");

        let Some(line) = input.next_line().await? else {
            break;
        };
        let cmd = line.trim();

        match cmd {
            "quit" => break,
            "" => continue,
            "local" => {
                let mut session: Session = Session::local();
                play(&mut session, None, &mut input).await?;
            }
            "host" => match host(&config).await {
                Ok((room, channel, events)) => {
                    println!("Invite link: {}", room.invite_link().green());
                    let mut session = Session::with_peer(Color::White, channel);
                    session.mark_waiting();
                    play(&mut session, Some(events), &mut input).await?;
                    drop(room);
                }
                Err(e) => println!("Could not open a room: {}", e),
            },
            c if c.starts_with("join ") => {
                let link = c.trim_start_matches("join ").trim();
                match join(link, &config).await {
                    Ok((channel, events)) => {
                        let mut session = Session::with_peer(Color::Black, channel);
                        play(&mut session, Some(events), &mut input).await?;
                    }
                    Err(e) => {
                        warn!("Could not join {}: {}", link, e);
                        println!("No connection, starting an offline game instead.");
                        let mut session: Session = Session::local();
                        session.mark_offline();
                        play(&mut session, None, &mut input).await?;
                    }
                }
            }
            _ => println!("Unknown command: {}", cmd),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_game_help() {
    println!("\nIn game:");
    println!("  <square>          - Select a piece or move the selected one (e.g. 'b2')");
    println!("  <from><to>        - Move in one go (e.g. 'b2b4')");
    println!("  moves             - List legal moves for the side to move");
    println!("  history           - Show the move record");
    println!("  board             - Redraw the board");
    println!("  reset             - Start over (both peers)");
    println!("  leave             - Back to the main menu");
}

fn redraw(session: &Session) {
    println!("\n{}", session.view());
    if let Some(color) = session.local_color() {
        println!("You are {} ({:?})", color, session.status());
        if !session.owns_turn() && !session.state().is_over() {
            println!("{}", "Waiting for the opponent's move...".bright_blue());
        }
    }
}

async fn recv_event(events: &mut Option<EventReceiver>) -> Option<ChannelEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn play(session: &mut Session, mut events: Option<EventReceiver>, input: &mut Input) -> Result<()> {
    print_game_help();
    redraw(session);

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if !handle_line(session, line.trim()) {
                    info!("Leaving game");
                    return Ok(());
                }
            }
            event = recv_event(&mut events) => {
                match event {
                    Some(event) => session.handle_event(event),
                    None => {
                        events = None;
                        session.mark_offline();
                    }
                }
                redraw(session);
            }
        }
    }
}

/// Returns false when the player leaves the game.
fn handle_line(session: &mut Session, line: &str) -> bool {
    match line {
        "" => {}
        "leave" | "quit" => return false,
        "board" => redraw(session),
        "help" => print_game_help(),
        "reset" => {
            session.reset();
            redraw(session);
        }
        "history" => {
            let history = &session.state().history;
            if history.is_empty() {
                println!("No moves yet");
            }
            for (i, record) in history.iter().enumerate() {
                println!("#{} {}", history.len() - i, record);
            }
        }
        "moves" => {
            let state = session.state();
            let moves: Vec<String> = all_legal_moves(state.turn, &state.board)
                .into_iter()
                .map(|(from, to)| format!("{}{}", square_name(from), square_name(to)))
                .collect();
            println!("{} legal moves: {}", moves.len(), moves.join(" "));
        }
        text => {
            let outcome = if let Ok(square) = parse_square(text) {
                session.select_or_move(square)
            } else if let Ok((from, to)) = parse_move(text) {
                match session.select_or_move(from) {
                    ClickOutcome::Selected => session.select_or_move(to),
                    other => other,
                }
            } else {
                println!("Unknown input: {}", text);
                return true;
            };
            if outcome == ClickOutcome::Ignored {
                if session.state().is_over() {
                    println!("{}", "The game is over, type 'reset' to play again".bright_red());
                } else {
                    println!("{}", "Not your move right now".bright_red());
                }
            }
            redraw(session);
        }
    }
    true
}
