// rust/engine/src/session/mod.rs
#![forbid(unsafe_code)]

//! Host loop around a `Game`: the gravity cadence, the bot cadence and pending
//! lock-ins, all driven from one virtual clock.

mod scheduler;

pub use scheduler::{Scheduler, Timer};

use crate::engine::{BOT_DELAY_MS, Command, Game, PieceId, TickOutcome};
use crate::policy::{Bot, MovePlan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between two bot decisions.
    pub bot_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bot_delay_ms: BOT_DELAY_MS,
        }
    }
}

/// What a fired timer did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    Gravity(TickOutcome),
    Bot(Option<MovePlan>),
    Lock { piece: PieceId, locked: bool },
}

pub struct Session {
    game: Game,
    bot: Option<Bot>,
    scheduler: Scheduler,
    config: SessionConfig,
}

impl Session {
    pub fn new(game: Game, config: SessionConfig) -> Self {
        Self {
            game,
            bot: None,
            scheduler: Scheduler::new(),
            config,
        }
    }

    pub fn with_bot(game: Game, bot: Bot, config: SessionConfig) -> Self {
        let mut s = Self::new(game, config);
        s.bot = Some(bot);
        s
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn has_bot(&self) -> bool {
        self.bot.is_some()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    fn running(&self) -> bool {
        !self.game.is_paused() && !self.game.is_ended()
    }

    /// Arms both loops. Gravity fires immediately so the first piece spawns
    /// without waiting a full tick.
    pub fn start(&mut self) {
        self.arm(0);
    }

    fn arm(&mut self, gravity_delay_ms: u64) {
        if !self.running() {
            return;
        }
        self.scheduler.schedule(gravity_delay_ms, Timer::Gravity);
        if self.bot.is_some() {
            self.scheduler.schedule(self.config.bot_delay_ms, Timer::Bot);
        }
    }

    /// Fires the next timer. `None` once nothing is armed.
    pub fn step(&mut self) -> Option<SessionEvent> {
        let timer = self.scheduler.pop()?;
        Some(self.fire(timer))
    }

    /// Fires every timer due at or before `deadline_ms`, then leaves the clock there.
    pub fn run_until(&mut self, deadline_ms: u64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.scheduler.pop_until(deadline_ms) {
            events.push(self.fire(timer));
        }
        self.game.set_clock(self.scheduler.now_ms());
        events
    }

    fn fire(&mut self, timer: Timer) -> SessionEvent {
        self.game.set_clock(self.scheduler.now_ms());
        match timer {
            Timer::Gravity => {
                let outcome = self.game.advance();
                if let TickOutcome::LockPending { piece, delay_ms } = outcome {
                    self.scheduler.schedule(delay_ms, Timer::Lock(piece));
                }
                if self.running() {
                    self.scheduler.schedule(self.game.rate_ms(), Timer::Gravity);
                }
                SessionEvent::Gravity(outcome)
            }
            Timer::Bot => {
                let plan = match self.bot.as_mut() {
                    Some(bot) => bot.choose_move(&mut self.game),
                    None => None,
                };
                if self.running() && self.bot.is_some() {
                    self.scheduler.schedule(self.config.bot_delay_ms, Timer::Bot);
                }
                SessionEvent::Bot(plan)
            }
            Timer::Lock(piece) => SessionEvent::Lock {
                piece,
                locked: self.game.try_lock(piece),
            },
        }
    }

    /// Input-layer entry point. `Pause` goes through `pause` so the timers follow.
    pub fn command(&mut self, cmd: Command) -> bool {
        self.game.set_clock(self.scheduler.now_ms());
        match cmd {
            Command::Pause => {
                self.pause();
                true
            }
            other => self.game.apply(other),
        }
    }

    /// Toggles pause. Pausing drops every timer (pending lock-ins included) and
    /// freezes the rate; resuming re-arms both loops at the frozen rate.
    pub fn pause(&mut self) -> bool {
        let paused = self.game.pause();
        if paused {
            self.scheduler.cancel_all();
        } else {
            let rate = self.game.rate_ms();
            self.arm(rate);
        }
        paused
    }

    /// Back to a fresh game with `bot` attached (or none), loops re-armed.
    pub fn reset(&mut self, bot: Option<Bot>) {
        self.scheduler.cancel_all();
        self.game.reset();
        self.bot = bot;
        self.start();
    }
}
