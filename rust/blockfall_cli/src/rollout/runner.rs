// src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use blockfall_engine::{Bot, Game, GameConfig, RandomPolicy, Session, SessionConfig};

use super::sinks::{GameRecord, RolloutSink};
use super::stats::{FinalReport, RolloutStats, board_features};

/// Fixed internal cadence (in pieces) for progress-bar live message updates.
const LIVE_EVERY: u64 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Heuristic,
    Random,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Heuristic => "heuristic",
            PolicyKind::Random => "random",
        }
    }

    fn bot(self, seed: u64) -> Bot {
        match self {
            PolicyKind::Heuristic => Bot::heuristic(),
            PolicyKind::Random => Bot::new(Box::new(RandomPolicy::new(seed))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    /// Games to play back to back.
    pub games: u64,
    /// Seeds the bag; game N's bot (random policy) uses base_seed + N.
    pub base_seed: u64,
    pub game: GameConfig,
    pub session: SessionConfig,
    pub policy: PolicyKind,
    /// A game that reaches this many pieces is scored and cut. 0 = no cap.
    pub max_pieces: u64,

    // ---------------- output ----------------
    /// 0 = final summary only, 1 = progress bar.
    pub verbosity: u8,

    // ---------------- rendering ----------------
    /// If Some(ms): render after every piece; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct Runner {
    cfg: RunnerConfig,
    /// Per-game output, if any.
    sink: Option<Box<dyn RolloutSink>>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Option<Box<dyn RolloutSink>>) -> Self {
        Self { cfg, sink }
    }

    pub fn run(&mut self) -> Result<FinalReport> {
        let cfg = self.cfg.clone();

        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.games);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>6}/{len:<6} games  {elapsed_precise}  {msg}",
                )?
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();

        let game = Game::with_config(cfg.game, cfg.base_seed)?;
        let mut session = Session::with_bot(game, cfg.policy.bot(cfg.base_seed), cfg.session);

        let mut total_rows_finished: u64 = 0;
        let mut total_score_finished: u64 = 0;
        let mut virtual_ms: u64 = 0;

        for game_id in 0..cfg.games {
            if game_id > 0 {
                session.reset(Some(cfg.policy.bot(cfg.base_seed.wrapping_add(game_id))));
            } else {
                session.start();
            }
            let started_ms = session.now_ms();

            if cfg.render_ms.is_some() {
                println!("=== game {game_id} ===");
                print!("{}", session.game().render_ascii());
            }

            let mut placed = 0u64;
            loop {
                let g = session.game();
                if g.is_ended() || (cfg.max_pieces > 0 && g.pieces_placed() >= cfg.max_pieces) {
                    break;
                }
                if session.step().is_none() {
                    break;
                }

                let g = session.game();
                if g.pieces_placed() == placed {
                    continue;
                }
                placed = g.pieces_placed();
                stats.on_piece(g.grid());

                if let Some(ms) = cfg.render_ms {
                    println!("t={}ms piece={} rows={}", session.now_ms(), placed, g.rows_cleared());
                    print!("{}", g.render_ascii());
                    if ms > 0 {
                        std::thread::sleep(Duration::from_millis(ms));
                    }
                }

                let live_rows = total_rows_finished + g.rows_cleared();
                let live_score = total_score_finished + g.score();

                if stats.pieces_done % LIVE_EVERY == 0 {
                    if let Some(ref pb) = pb {
                        pb.set_message(stats.live_msg(
                            stats.rows_per_piece(live_rows),
                            stats.score_per_piece(live_score),
                        ));
                    }
                }
            }

            let g = session.game();
            let game_ms = session.now_ms() - started_ms;
            total_rows_finished += g.rows_cleared();
            total_score_finished += g.score();
            virtual_ms += game_ms;
            stats.on_game_end(g.score());

            if let Some(sink) = self.sink.as_mut() {
                let board = board_features(g.grid());
                let rec = GameRecord {
                    game: game_id,
                    score: g.score(),
                    rows: g.rows_cleared(),
                    pieces: g.pieces_placed(),
                    topped_out: g.is_ended(),
                    virtual_ms: game_ms,
                    max_h: board.max_h,
                    holes: board.holes,
                };
                for line in sink.on_game(&rec) {
                    match pb {
                        Some(ref pb) => pb.println(line),
                        None => println!("{line}"),
                    }
                }
            }

            if cfg.render_ms.is_some() {
                println!(
                    "=== game {} over: score={} rows={} pieces={} topped_out={} ===",
                    game_id,
                    g.score(),
                    g.rows_cleared(),
                    g.pieces_placed(),
                    g.is_ended()
                );
            }
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(stats.final_report(
            cfg.policy.name(),
            total_rows_finished,
            total_score_finished,
            virtual_ms,
        ))
    }
}
