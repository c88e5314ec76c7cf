//! One simulation frame
//!
//! Order within a frame is fixed: due timers, input aggregation, position
//! integration, then trigger detection.

use super::input::InputState;
use super::state::SimState;

/// Advance the simulation to `now` (milliseconds, host clock)
pub fn tick(state: &mut SimState, input: &InputState, now: f64) {
    debug_assert!(now >= state.now, "host clock went backwards");
    state.now = now;

    state.fire_due_timers(now);

    let movement = input.movement(&state.config);
    integrate(state, movement);

    if state.is_teleporting() {
        return;
    }
    if let Some(source) = state.find_trigger(now).map(|p| p.id.clone()) {
        state.begin_teleport(source.as_str(), now);
    }
}

/// Move the player by `movement`, clamped to the arena, and accrue distance
pub fn integrate(state: &mut SimState, movement: glam::Vec2) {
    state.player_pos = state.clamp_to_arena(state.player_pos + movement);
    state.record_movement();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::pads::{Pad, PadColor, PadSet};
    use glam::Vec2;

    const FRAME_MS: f64 = 16.0;

    fn arena() -> SimState {
        let pads = PadSet::new(vec![
            Pad::new("A", 80.0, 80.0, "B", PadColor::Cyan, "α"),
            Pad::new("B", 680.0, 380.0, "A", PadColor::Cyan, "α"),
        ])
        .unwrap();
        SimState::new(SimConfig::default(), pads, 0.0)
    }

    #[test]
    fn test_held_key_moves_every_tick() {
        let mut state = arena();
        let mut input = InputState::new();
        input.key_down("d");
        for i in 1..=10 {
            tick(&mut state, &input, i as f64 * FRAME_MS);
        }
        assert_eq!(state.player_pos, Vec2::new(440.0, 250.0));
        assert!((state.stats.distance_traveled - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_at_walls() {
        let mut state = arena();
        state.place_player(Vec2::new(770.0, 2.0));
        let mut input = InputState::new();
        input.key_down("d");
        input.key_down("w");
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.player_pos, Vec2::new(772.0, 0.0));
        tick(&mut state, &input, 2.0 * FRAME_MS);
        assert_eq!(state.player_pos, Vec2::new(772.0, 0.0));
    }

    #[test]
    fn test_wall_push_accrues_nothing() {
        let mut state = arena();
        state.place_player(Vec2::new(0.0, 0.0));
        let mut input = InputState::new();
        input.key_down("a");
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.stats.distance_traveled, 0.0);
    }

    #[test]
    fn test_walking_onto_pad_triggers() {
        let mut state = arena();
        // A's center is (105,105); start 40 units to its right
        state.place_player(Vec2::new(105.0 + 40.0 - 14.0, 91.0));
        let mut input = InputState::new();
        input.key_down("arrowleft");
        tick(&mut state, &input, FRAME_MS);
        assert!(!state.is_teleporting(), "36 units away");
        tick(&mut state, &input, 2.0 * FRAME_MS);
        assert!(state.is_teleporting());
        assert_eq!(state.stats.usage("A"), 1);
    }

    #[test]
    fn test_no_trigger_while_teleporting() {
        let mut state = arena();
        state.place_player(Vec2::new(91.0, 91.0));
        let input = InputState::new();
        tick(&mut state, &input, 0.0);
        assert_eq!(state.stats.total_teleports, 1);
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.stats.total_teleports, 1);
    }
}
