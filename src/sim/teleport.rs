//! Teleport trigger detection and the staged teleport sequence
//!
//! A trigger runs stage one immediately, then each timer advances the
//! sequence by one stage and schedules the next, relative to its own due
//! time so late frames do not stretch the sequence.

use glam::Vec2;

use super::pads::{Pad, PadId};
use super::schedule::{Timer, TimerAction};
use super::state::{ActiveTeleport, PlayerPhase, SimEvent, SimState, TeleportStage};

impl SimState {
    /// First pad (in set order) the player is standing on that may fire now
    pub fn find_trigger(&self, now: f64) -> Option<&Pad> {
        let center = self.player_center();
        let pad_size = self.config.pad_size;
        self.pads.iter().find(|pad| {
            !pad.locked
                && self.last_arrived.as_ref() != Some(&pad.id)
                && self.cooldowns.is_ready(pad.id.as_str(), now)
                && center.distance(pad.center(pad_size)) < self.config.proximity
        })
    }

    /// Where the player's top-left goes so its center sits on the pad's center
    pub fn arrival_position(&self, pad: &Pad) -> Vec2 {
        pad.position + Vec2::splat(self.config.pad_size / 2.0 - self.config.player_size / 2.0)
    }

    /// Start a teleport from `source`. Returns false, changing nothing, if the
    /// pad or its target does not exist.
    pub fn begin_teleport(&mut self, source: &str, now: f64) -> bool {
        let Some((source, target)) = self
            .pads
            .get(source)
            .and_then(|s| self.pads.target_of(s).map(|t| (s.clone(), t.id.clone())))
        else {
            log::warn!("Teleport from {} ignored: pad or target missing", source);
            return false;
        };

        if let Some(timer) = self.active.take().and_then(|prev| prev.pending) {
            self.scheduler.cancel(timer);
        }

        self.phase = PlayerPhase::Teleporting;
        self.spawn_effect(source.position, now);

        self.stats.total_teleports += 1;
        *self.stats.pad_usage.entry(source.id.clone()).or_insert(0) += 1;
        self.cooldowns
            .start_pair(&source.id, &target, now, self.config.cooldown_ms);

        self.set_message(format!(
            "Teleported {} → {} · Cooldown active",
            source.id, target
        ));
        log::info!(
            "Teleport #{} {} -> {} at {:.0}ms",
            self.stats.total_teleports,
            source.id,
            target,
            now
        );

        let pending = self.scheduler.schedule(
            now + self.config.arrive_delay_ms,
            TimerAction::Arrive {
                target: target.clone(),
            },
        );
        self.active = Some(ActiveTeleport {
            source: source.id.clone(),
            target: target.clone(),
            started_at: now,
            stage: TeleportStage::Departed,
            pending: Some(pending),
        });
        self.push_event(SimEvent::TeleportStarted {
            source: source.id,
            target,
        });
        true
    }

    /// Fire every timer due at or before `now`, earliest first
    pub fn fire_due_timers(&mut self, now: f64) {
        while let Some(timer) = self.scheduler.pop_due(now) {
            self.apply_timer(timer);
        }
    }

    fn apply_timer(&mut self, timer: Timer) {
        match timer.action {
            TimerAction::ExpireEffect { effect_id } => {
                self.effects.retain(|e| e.id != effect_id);
                log::debug!("Effect {} expired", effect_id);
            }
            TimerAction::Arrive { target } => self.arrive(&target, timer.due),
            TimerAction::FinishTeleport => self.finish(timer.due),
            TimerAction::ClearArrivalMarker { pad } => self.clear_marker(&pad),
        }
    }

    fn advance_stage(&mut self, stage: TeleportStage, next: Option<(f64, TimerAction)>) {
        let pending = next.map(|(due, action)| self.scheduler.schedule(due, action));
        if let Some(active) = self.active.as_mut() {
            debug_assert!(stage > active.stage, "teleport stages only move forward");
            active.stage = stage;
            active.pending = pending;
        }
    }

    fn arrive(&mut self, target: &PadId, at: f64) {
        let Some(pad) = self.pads.get(target.as_str()) else {
            return;
        };
        let landing = self.arrival_position(pad);
        let effect_pos = pad.position;

        self.player_pos = landing;
        self.last_arrived = Some(target.clone());
        self.spawn_effect(effect_pos, at);
        self.push_event(SimEvent::PlayerArrived { pad: target.clone() });
        log::debug!("Arrived at {} ({:.0}ms)", target, at);

        self.advance_stage(
            TeleportStage::Arrived,
            Some((at + self.config.settle_delay_ms, TimerAction::FinishTeleport)),
        );
    }

    fn finish(&mut self, at: f64) {
        self.phase = PlayerPhase::Idle;
        let Some(pad) = self.active.as_ref().map(|a| a.target.clone()) else {
            return;
        };
        self.push_event(SimEvent::TeleportFinished { pad: pad.clone() });
        self.advance_stage(
            TeleportStage::Settled,
            Some((
                at + self.config.marker_clear_delay_ms,
                TimerAction::ClearArrivalMarker { pad },
            )),
        );
    }

    fn clear_marker(&mut self, pad: &PadId) {
        if self.last_arrived.as_ref() == Some(pad) {
            self.last_arrived = None;
        }
        if self.active.as_ref().is_some_and(|a| &a.target == pad) {
            self.active = None;
        }
        log::debug!("Pad {} can trigger again", pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::pads::{Pad, PadColor, PadSet};

    fn two_pads() -> PadSet {
        PadSet::new(vec![
            Pad::new("A", 80.0, 80.0, "B", PadColor::Cyan, "α"),
            Pad::new("B", 680.0, 380.0, "A", PadColor::Cyan, "α"),
        ])
        .unwrap()
    }

    fn on_pad(state: &mut SimState, id: &str) {
        let pad = state.pads.get(id).unwrap().clone();
        let pos = state.arrival_position(&pad);
        state.place_player(pos);
    }

    #[test]
    fn test_trigger_requires_proximity() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        state.place_player(Vec2::new(400.0, 250.0));
        assert!(state.find_trigger(0.0).is_none());

        // 34 units right of A's center
        state.place_player(Vec2::new(105.0 + 34.0 - 14.0, 105.0 - 14.0));
        assert_eq!(state.find_trigger(0.0).unwrap().id.as_str(), "A");

        // exactly at the threshold does not count
        state.place_player(Vec2::new(105.0 + 35.0 - 14.0, 105.0 - 14.0));
        assert!(state.find_trigger(0.0).is_none());
    }

    #[test]
    fn test_locked_pad_never_triggers() {
        let pads = PadSet::new(vec![
            Pad::new("A", 80.0, 80.0, "B", PadColor::Gold, "δ").gated(1),
            Pad::new("B", 680.0, 380.0, "A", PadColor::Gold, "δ").gated(1),
        ])
        .unwrap();
        let mut state = SimState::new(SimConfig::default(), pads, 0.0);
        on_pad(&mut state, "A");
        assert!(state.find_trigger(0.0).is_none());
    }

    #[test]
    fn test_begin_teleport_stage_one() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        on_pad(&mut state, "A");
        assert!(state.begin_teleport("A", 1000.0));

        assert!(state.is_teleporting());
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].position, Vec2::new(80.0, 80.0));
        assert_eq!(state.cooldowns.expiry("A"), Some(6000.0));
        assert_eq!(state.cooldowns.expiry("B"), Some(6000.0));
        assert_eq!(state.stats.total_teleports, 1);
        assert_eq!(state.stats.usage("A"), 1);
        assert_eq!(state.stats.usage("B"), 0);
        assert_eq!(
            state.message.as_ref().unwrap().text,
            "Teleported A → B · Cooldown active"
        );
        assert_eq!(
            state.drain_events(),
            vec![SimEvent::TeleportStarted {
                source: "A".into(),
                target: "B".into()
            }]
        );
    }

    #[test]
    fn test_unknown_source_is_noop() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        assert!(!state.begin_teleport("Z", 0.0));
        assert_eq!(state.stats.total_teleports, 0);
        assert!(state.scheduler.is_empty());
        assert!(!state.is_teleporting());
    }

    #[test]
    fn test_stages_advance_on_schedule() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        on_pad(&mut state, "A");
        state.begin_teleport("A", 0.0);

        state.fire_due_timers(199.0);
        assert_eq!(state.active.as_ref().unwrap().stage, TeleportStage::Departed);

        state.fire_due_timers(200.0);
        assert_eq!(state.player_pos, Vec2::new(691.0, 391.0));
        assert_eq!(state.last_arrived.as_ref().unwrap().as_str(), "B");
        assert_eq!(state.effects.len(), 2);
        assert!(state.is_teleporting());

        state.fire_due_timers(500.0);
        assert!(!state.is_teleporting());
        assert_eq!(state.active.as_ref().unwrap().stage, TeleportStage::Settled);

        state.fire_due_timers(600.0);
        assert_eq!(state.effects.len(), 1, "departure effect expired");

        state.fire_due_timers(800.0);
        assert!(state.last_arrived.is_none());
        assert!(state.active.is_none());
        assert!(state.effects.is_empty());
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_late_frame_does_not_stretch_sequence() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        state.begin_teleport("A", 0.0);
        // one very late frame covers the whole sequence
        state.fire_due_timers(2000.0);
        assert!(!state.is_teleporting());
        assert!(state.last_arrived.is_none());
        assert!(state.active.is_none());
    }

    #[test]
    fn test_new_trigger_cancels_previous_stage_timer() {
        let config = SimConfig {
            cooldown_ms: 0.0,
            ..Default::default()
        };
        let mut state = SimState::new(config, two_pads(), 0.0);
        state.begin_teleport("A", 0.0);
        state.fire_due_timers(500.0);
        // settled, clear-marker timer pending
        let old = state.active.as_ref().unwrap().pending.unwrap();
        state.begin_teleport("A", 500.0);
        assert!(!state.scheduler.is_pending(old));
        assert_eq!(state.active.as_ref().unwrap().stage, TeleportStage::Departed);
    }

    #[test]
    fn test_arrival_jump_counts_as_distance() {
        let mut state = SimState::new(SimConfig::default(), two_pads(), 0.0);
        on_pad(&mut state, "A");
        state.begin_teleport("A", 0.0);
        state.fire_due_timers(200.0);
        assert_eq!(state.stats.distance_traveled, 0.0);
        // accrued on the next movement record, from the pre-jump baseline
        state.record_movement();
        // hypot(600, 300)
        assert!((state.stats.distance_traveled - 670.82).abs() < 1e-2);
    }
}
