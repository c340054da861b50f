// src/rollout/sinks.rs
#![forbid(unsafe_code)]

use serde::Serialize;

/// Outcome of one finished game, as handed to a sink.
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub game: u64,
    pub score: u64,
    pub rows: u64,
    pub pieces: u64,
    /// False when the game was cut at the piece cap instead.
    pub topped_out: bool,
    pub virtual_ms: u64,
    /// Board shape at the end of the game.
    pub max_h: i32,
    pub holes: u32,
}

/// Turns finished games into output lines. The runner decides where the lines
/// go (through the progress bar when one is live).
pub trait RolloutSink {
    fn on_game(&mut self, rec: &GameRecord) -> Vec<String>;
}

struct Column {
    title: &'static str,
    width: usize,
    cell: fn(&GameRecord) -> String,
}

const COLUMNS: &[Column] = &[
    Column { title: "game", width: 6, cell: |r| r.game.to_string() },
    Column { title: "score", width: 10, cell: |r| r.score.to_string() },
    Column { title: "rows", width: 7, cell: |r| r.rows.to_string() },
    Column { title: "pieces", width: 7, cell: |r| r.pieces.to_string() },
    Column {
        title: "end",
        width: 6,
        cell: |r| (if r.topped_out { "top" } else { "cap" }).to_string(),
    },
    Column {
        title: "virt_s",
        width: 9,
        cell: |r| format!("{:.1}", r.virtual_ms as f64 / 1000.0),
    },
    Column { title: "maxH", width: 5, cell: |r| r.max_h.to_string() },
    Column { title: "holes", width: 6, cell: |r| r.holes.to_string() },
];

fn join_columns(f: impl Fn(&Column) -> String) -> String {
    COLUMNS
        .iter()
        .map(|c| format!("{:>w$}", f(c), w = c.width))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One aligned row per game; the header repeats every `header_every` games.
pub struct GameTableSink {
    header_every: u64,
    games_seen: u64,
}

impl GameTableSink {
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: header_every.max(1),
            games_seen: 0,
        }
    }

    fn header(&self) -> [String; 2] {
        let titles = join_columns(|c| c.title.to_string());
        let rule = "-".repeat(titles.len());
        [titles, rule]
    }
}

impl RolloutSink for GameTableSink {
    fn on_game(&mut self, rec: &GameRecord) -> Vec<String> {
        let mut out = Vec::with_capacity(3);
        if self.games_seen % self.header_every == 0 {
            out.extend(self.header());
        }
        self.games_seen += 1;
        out.push(join_columns(|c| (c.cell)(rec)));
        out
    }
}

/// One JSON object per game, for piping into other tools.
pub struct JsonLinesSink;

impl RolloutSink for JsonLinesSink {
    fn on_game(&mut self, rec: &GameRecord) -> Vec<String> {
        match serde_json::to_string(rec) {
            Ok(line) => vec![line],
            Err(_) => Vec::new(),
        }
    }
}
