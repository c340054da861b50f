// src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use anyhow::{Result, bail};
use clap::Parser;

use crate::rollout::{GameTableSink, JsonLinesSink, PolicyKind, RolloutSink, Runner, RunnerConfig};
use blockfall_engine::{GameConfig, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "blockfall_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Games to play back to back.
    #[arg(long, default_value_t = 10)]
    games: u64,

    /// Base RNG seed. If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: heuristic | random
    #[arg(long, default_value = "heuristic")]
    policy: String,

    /// Cut a game after this many pieces (0 = play until it tops out).
    #[arg(long, default_value_t = 1000)]
    max_pieces: u64,

    // ---------------- board ----------------
    #[arg(long, default_value_t = blockfall_engine::engine::DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = blockfall_engine::engine::DEFAULT_VISIBLE_HEIGHT)]
    height: i32,

    /// Delay between two bot decisions, in virtual ms.
    #[arg(long, default_value_t = blockfall_engine::engine::BOT_DELAY_MS)]
    bot_delay: u64,

    // ---------------- visualization ----------------
    /**
     * Render the board as ASCII after every piece; value is sleep in ms.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Per-game output: table | jsonl. Omit for none.
    #[arg(long, value_name = "format")]
    per_game: Option<String>,

    /// Print the final report as JSON instead of the one-line summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let base_seed = args.seed.unwrap_or(12345);

    let policy = match args.policy.as_str() {
        "heuristic" => PolicyKind::Heuristic,
        "random" => PolicyKind::Random,
        other => bail!("unknown policy {other:?} (expected heuristic | random)"),
    };

    let sink: Option<Box<dyn RolloutSink>> = match args.per_game.as_deref() {
        None => None,
        Some("table") => Some(Box::new(GameTableSink::new(20))),
        Some("jsonl") => Some(Box::new(JsonLinesSink)),
        Some(other) => bail!("unknown per-game format {other:?} (expected table | jsonl)"),
    };

    let game = GameConfig {
        width: args.width,
        visible_height: args.height,
        ..GameConfig::default()
    }
    .validate()?;

    let cfg = RunnerConfig {
        games: args.games,
        base_seed,
        game,
        session: SessionConfig {
            bot_delay_ms: args.bot_delay,
        },
        policy,
        max_pieces: args.max_pieces,

        verbosity: args.verbosity,

        render_ms: args.render,
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "DONE: policy={} games={} pieces={} elapsed={:.3}s pieces/s={:.1} virtual={}ms avg_len={:.2} max_len={} best_score={} rows/piece={:.3} score/piece={:.2} avg_max_h={:.2} avg_h={:.2} avg_holes={:.2} total_score={} total_rows={}",
        report.policy,
        report.games_finished,
        report.pieces_done,
        report.elapsed_s,
        report.pieces_per_s,
        report.virtual_ms,
        report.avg_game_len,
        report.max_game_len,
        report.best_score,
        report.rows_per_piece,
        report.score_per_piece,
        report.avg_max_h,
        report.avg_h,
        report.avg_holes,
        report.total_score,
        report.total_rows,
    );
    Ok(())
}
