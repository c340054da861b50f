// rust/engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::Game;
use crate::policy::search::MovePlan;

/// Policy chooses a placement for the current state.
///
/// Returns `None` if there is no active piece or nothing reachable. Planning is
/// read-only; `Bot` executes the plan through the game's command surface.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn plan(&mut self, g: &Game) -> Option<MovePlan>;
}
