// rust/engine/tests/session_scheduling.rs
#![forbid(unsafe_code)]

/**
 * Session (host loop) tests.
 *
 * Purpose:
 * - Pin the timer semantics around a game: gravity cadence, bot cadence,
 *   deferred lock-ins, pause/resume and reset.
 *
 * How the tests work:
 * - Everything runs on the session's virtual clock; no real time passes.
 */
use blockfall_engine::{
    Bot, Command, Game, Session, SessionConfig, SessionEvent, TickOutcome, Timer,
};

fn plain_session(seed: u64) -> Session {
    let mut s = Session::new(Game::new(seed), SessionConfig::default());
    s.start();
    s
}

#[test]
fn first_gravity_tick_spawns_immediately_then_follows_the_rate() {
    let mut s = plain_session(1);

    let ev = s.step().expect("gravity armed");
    assert!(matches!(ev, SessionEvent::Gravity(TickOutcome::Spawned { .. })));
    assert_eq!(s.now_ms(), 0);
    assert_eq!(s.game().rate_ms(), 999);
    assert_eq!(s.scheduler().next_due(), Some(999));

    let ev = s.step().expect("gravity re-armed");
    assert_eq!(ev, SessionEvent::Gravity(TickOutcome::Falling));
    assert_eq!(s.now_ms(), 999);
    assert_eq!(s.scheduler().next_due(), Some(999 + 998));
}

#[test]
fn grounded_piece_locks_after_the_deferred_lock_timer() {
    let mut s = plain_session(2);
    let events = s.run_until(40_000);

    let locked: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Lock { piece, locked } => Some((*piece, *locked)),
            _ => None,
        })
        .collect();
    assert!(locked.iter().any(|&(_, ok)| ok));
    assert!(s.game().pieces_placed() >= 1);
    assert_eq!(s.now_ms(), 40_000);
}

#[test]
fn stale_lock_timer_is_a_noop_after_a_hard_drop() {
    let mut s = plain_session(3);

    let mut pending = None;
    for _ in 0..64 {
        if let Some(SessionEvent::Gravity(TickOutcome::LockPending { piece, .. })) = s.step() {
            pending = Some(piece);
            break;
        }
    }
    let piece = pending.expect("piece grounded");
    assert!(s.scheduler().is_armed(Timer::Lock(piece)));

    assert!(s.command(Command::HardDrop));
    assert_eq!(s.game().pieces_placed(), 1);

    loop {
        match s.step().expect("timers armed") {
            SessionEvent::Lock { piece: p, locked } => {
                assert_eq!(p, piece);
                assert!(!locked);
                break;
            }
            _ => continue,
        }
    }
    assert_eq!(s.game().pieces_placed(), 1);
}

#[test]
fn pause_cancels_timers_and_resume_rearms_at_frozen_rate() {
    let mut s = Session::with_bot(Game::new(4), Bot::heuristic(), SessionConfig::default());
    s.start();
    s.run_until(250);
    let rate = s.game().rate_ms();

    assert!(s.command(Command::Pause));
    assert!(s.game().is_paused());
    assert_eq!(s.scheduler().pending(), 0);
    assert!(s.step().is_none());
    assert!(s.run_until(10_000).is_empty());
    assert_eq!(s.game().rate_ms(), rate);

    assert!(!s.pause());
    assert!(s.scheduler().is_armed(Timer::Gravity));
    assert!(s.scheduler().is_armed(Timer::Bot));
    assert_eq!(s.scheduler().next_due(), Some(10_000 + 10));
}

#[test]
fn bot_cadence_places_one_piece_per_successful_decision() {
    let mut s = Session::with_bot(Game::new(7), Bot::heuristic(), SessionConfig::default());
    s.start();
    let events = s.run_until(205);

    let decisions = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Bot(Some(_))))
        .count() as u64;
    let bot_fires = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Bot(_)))
        .count();

    assert_eq!(bot_fires, 20);
    assert!(decisions > 0);
    assert_eq!(s.game().pieces_placed(), decisions);
}

#[test]
fn loops_stop_rearming_once_the_game_ends() {
    let mut s = Session::with_bot(
        Game::new(5),
        Bot::new(Box::new(blockfall_engine::RandomPolicy::new(5))),
        SessionConfig::default(),
    );
    s.start();
    let mut fired = 0;
    while s.step().is_some() {
        fired += 1;
        assert!(fired < 1_000_000, "random bot never topped out");
    }
    assert!(s.game().is_ended());
    assert_eq!(s.scheduler().pending(), 0);
}

#[test]
fn reset_clears_the_game_swaps_the_bot_and_rearms() {
    let mut s = Session::with_bot(Game::new(6), Bot::heuristic(), SessionConfig::default());
    s.start();
    s.run_until(300);
    assert!(s.game().pieces_placed() > 0);

    s.reset(None);
    assert!(!s.has_bot());
    assert_eq!(s.game().pieces_placed(), 0);
    assert!(s.game().active().is_none());
    assert_eq!(s.scheduler().pending(), 1);
    assert!(s.scheduler().is_armed(Timer::Gravity));

    s.reset(Some(Bot::heuristic()));
    assert!(s.has_bot());
    assert_eq!(s.scheduler().pending(), 2);
}

#[test]
fn input_commands_are_stamped_with_the_session_clock() {
    let mut s = plain_session(9);
    s.step();
    s.run_until(1_234);
    assert!(s.command(Command::MoveLeft));
    assert_eq!(s.game().clock_ms(), 1_234);
    assert_eq!(s.game().active().expect("active").last_moved_ms(), 1_234);
}
