use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use slytherin_common::games::snake::{
    GameSession, SessionEvent, SessionSnapshot, SessionStatus,
};
use slytherin_common::log;
use slytherin_common::storage::KeyValueStore;

use crate::input::{parse_command, RunnerCommand};
use crate::text_view::render_frame;

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::FoodEaten { food_type, score } => {
            log!("Ate {:?}, score {}", food_type, score);
        }
        SessionEvent::FoodExpired { expired, next } => {
            log!("{:?} food expired, next is {:?}", expired, next);
        }
        SessionEvent::GameOver(summary) => {
            log!(
                "{} finished with {} ({:?}); personal best {}, highest {}",
                summary.player_name,
                summary.score,
                summary.reason,
                summary.leaderboard.best_for_player,
                summary.leaderboard.highest_score
            );
        }
    }
}

struct FrameWriter {
    enabled: bool,
    last: Option<SessionSnapshot>,
}

impl FrameWriter {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: None,
        }
    }

    /// Prints only when something visible changed, or when forced.
    fn show(&mut self, snapshot: SessionSnapshot, force: bool) {
        if !self.enabled {
            return;
        }
        let changed = match self.last {
            Some(ref last) => {
                last.snake != snapshot.snake
                    || last.food != snapshot.food
                    || last.status != snapshot.status
                    || last.level != snapshot.level
                    || last.food_blinking != snapshot.food_blinking
            }
            None => true,
        };
        if changed || force {
            println!("{}", render_frame(&snapshot));
        }
        self.last = Some(snapshot);
    }
}

/// Owns the session and serializes every mutation: the countdown-resolution
/// interval feeds wall time into [`GameSession::advance`], stdin commands go
/// through [`GameSession::handle_input`]. Returns on `quit`, Ctrl+C, or once
/// stdin has closed and the game is no longer running.
pub async fn run<S: KeyValueStore>(mut session: GameSession<S>, render: bool) {
    let resolution = session
        .settings()
        .countdown_resolution()
        .min(session.settings().tick_interval())
        .max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(resolution);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut commands = spawn_stdin_reader();
    let mut stdin_open = true;
    let mut frames = FrameWriter::new(render);
    let mut last_advance = Instant::now();

    frames.show(session.snapshot(), true);
    log!("Enter commands: w/a/s/d, p, n, level <n>, name <text>, show, q");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let events = session.advance(now - last_advance);
                last_advance = now;
                events.iter().for_each(log_event);
                frames.show(session.snapshot(), false);
            }
            line = commands.recv(), if stdin_open => {
                let Some(line) = line else {
                    log!("Input closed");
                    stdin_open = false;
                    continue;
                };
                let Some(command) = parse_command(&line) else {
                    log!("Unknown command: {}", line.trim());
                    continue;
                };

                // Time up to now belongs before the input.
                let now = Instant::now();
                session.advance(now - last_advance).iter().for_each(log_event);
                last_advance = now;

                match command {
                    RunnerCommand::Input(event) => {
                        session.handle_input(event).iter().for_each(log_event);
                        frames.show(session.snapshot(), false);
                    }
                    RunnerCommand::Show => frames.show(session.snapshot(), true),
                    RunnerCommand::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log!("Interrupted");
                break;
            }
        }

        // Nothing can resume a paused game once input is gone.
        if !stdin_open && session.status() != SessionStatus::Running {
            break;
        }
    }

    log!(
        "Exiting with score {}, highest {}",
        session.score(),
        session.leaderboard().highest_score()
    );
}
