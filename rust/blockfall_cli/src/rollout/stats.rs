// src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use serde::Serialize;

use blockfall_engine::Grid;

/// Cheap board summary taken after every placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoardFeatures {
    pub max_h: i32,
    pub avg_h: f32,
    /// Empty cells below their column's top.
    pub holes: u32,
    /// Sum of absolute height differences between neighboring columns.
    pub bump: u32,
}

pub fn board_features(grid: &Grid) -> BoardFeatures {
    let (max_h, avg_h) = grid.height_metrics();
    let heights: Vec<i32> = (0..grid.width()).map(|x| grid.column_height(x)).collect();

    let holes: u32 = heights
        .iter()
        .enumerate()
        .map(|(x, &h)| (0..h).filter(|&y| !grid.is_settled_at(x as i32, y)).count() as u32)
        .sum();
    let bump: u32 = heights
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]))
        .sum();

    BoardFeatures {
        max_h,
        avg_h,
        holes,
        bump,
    }
}

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub games_finished: u64,
    pub game_len: u64,
    pub game_len_sum: u64,
    pub game_len_max: u64,
    pub best_score: u64,

    pub pieces_done: u64,

    pub sum_max_h: f64,
    pub sum_avg_h: f64,
    pub max_h_worst: i32,
    pub sum_holes: f64,
    pub sum_bump: f64,

    t0: Instant,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            games_finished: 0,
            game_len: 0,
            game_len_sum: 0,
            game_len_max: 0,
            best_score: 0,
            pieces_done: 0,
            sum_max_h: 0.0,
            sum_avg_h: 0.0,
            max_h_worst: 0,
            sum_holes: 0.0,
            sum_bump: 0.0,
            t0: Instant::now(),
        }
    }

    /// Call once per settled piece.
    pub fn on_piece(&mut self, grid: &Grid) {
        self.pieces_done += 1;
        self.game_len += 1;

        let f = board_features(grid);
        self.sum_max_h += f64::from(f.max_h);
        self.sum_avg_h += f64::from(f.avg_h);
        self.max_h_worst = self.max_h_worst.max(f.max_h);
        self.sum_holes += f64::from(f.holes);
        self.sum_bump += f64::from(f.bump);
    }

    /// Call when a game ends (topped out or hit the piece cap), before the reset.
    pub fn on_game_end(&mut self, score: u64) {
        self.games_finished += 1;
        self.game_len_sum += self.game_len;
        self.game_len_max = self.game_len_max.max(self.game_len);
        self.best_score = self.best_score.max(score);
        self.game_len = 0;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    fn per_piece(&self, total: f64) -> f64 {
        if self.pieces_done > 0 {
            total / self.pieces_done as f64
        } else {
            0.0
        }
    }

    pub fn pieces_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.pieces_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn avg_game_len(&self) -> f64 {
        if self.games_finished > 0 {
            self.game_len_sum as f64 / self.games_finished as f64
        } else {
            0.0
        }
    }

    pub fn avg_max_h(&self) -> f64 {
        self.per_piece(self.sum_max_h)
    }

    pub fn avg_avg_h(&self) -> f64 {
        self.per_piece(self.sum_avg_h)
    }

    pub fn avg_holes(&self) -> f64 {
        self.per_piece(self.sum_holes)
    }

    pub fn avg_bump(&self) -> f64 {
        self.per_piece(self.sum_bump)
    }

    pub fn rows_per_piece(&self, live_total_rows: u64) -> f64 {
        self.per_piece(live_total_rows as f64)
    }

    pub fn score_per_piece(&self, live_total_score: u64) -> f64 {
        self.per_piece(live_total_score as f64)
    }

    pub fn live_msg(&self, rpp: f64, spp: f64) -> String {
        format!(
            "pps={:.1} games={} avg_len={:.1} best={} rows/pc={:.3} score/pc={:.2} maxH={} avgHol={:.2}",
            self.pieces_per_sec(),
            self.games_finished,
            self.avg_game_len(),
            self.best_score,
            rpp,
            spp,
            self.max_h_worst,
            self.avg_holes(),
        )
    }

    pub fn final_report(
        &self,
        policy_name: &str,
        total_rows: u64,
        total_score: u64,
        virtual_ms: u64,
    ) -> FinalReport {
        FinalReport {
            policy: policy_name.to_string(),
            games_finished: self.games_finished,
            pieces_done: self.pieces_done,
            elapsed_s: self.elapsed_secs(),
            pieces_per_s: self.pieces_per_sec(),
            virtual_ms,
            avg_game_len: self.avg_game_len(),
            max_game_len: self.game_len_max,
            best_score: self.best_score,
            rows_per_piece: self.rows_per_piece(total_rows),
            score_per_piece: self.score_per_piece(total_score),
            max_h_worst: self.max_h_worst,
            avg_max_h: self.avg_max_h(),
            avg_h: self.avg_avg_h(),
            avg_holes: self.avg_holes(),
            avg_bump: self.avg_bump(),
            total_score,
            total_rows,
        }
    }
}

/// End-of-run summary; printed as one line or as JSON with `--json`.
#[derive(Clone, Debug, Serialize)]
pub struct FinalReport {
    pub policy: String,

    pub games_finished: u64,
    pub pieces_done: u64,
    pub elapsed_s: f64,
    pub pieces_per_s: f64,
    /// Simulated time summed over all games.
    pub virtual_ms: u64,

    pub avg_game_len: f64,
    pub max_game_len: u64,
    pub best_score: u64,

    pub rows_per_piece: f64,
    pub score_per_piece: f64,

    pub max_h_worst: i32,
    pub avg_max_h: f64,
    pub avg_h: f64,
    pub avg_holes: f64,
    pub avg_bump: f64,

    pub total_score: u64,
    pub total_rows: u64,
}
