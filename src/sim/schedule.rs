//! Frame-offset scheduled events
//!
//! Staggered bursts and sequenced reward drops are queued here instead of
//! running on wall-clock timers. Events are keyed to the simulation frame
//! counter, so pausing freezes them and restart/exit drops them wholesale.

use glam::Vec2;

use super::state::{Fragment, Projectile};

/// Work deferred to a later frame
#[derive(Debug, Clone)]
pub enum ScheduledAction {
    /// Spawn enemy projectiles (one step of a staggered burst)
    EnemyShots { owner: u32, shots: Vec<Projectile> },
    /// Spawn environmental hazards
    Hazards { owner: u32, hazards: Vec<Fragment> },
    /// Drop a random reward pickup
    RewardDrop { pos: Vec2 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: u64,
    seq: u64,
    action: ScheduledAction,
}

/// Deterministic queue drained once per frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run `delay` frames after `now` (0 = next drain)
    pub fn schedule(&mut self, now: u64, delay: u32, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: now + delay as u64,
            seq,
            action,
        });
    }

    /// Remove and return every action due at or before `now`, in (due, insertion) order
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let mut due: Vec<Scheduled> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.action).collect()
    }

    /// Drop the pending shots and hazards fired by entity `owner`; reward drops stay
    pub fn cancel_owner(&mut self, owner: u32) {
        let before = self.pending.len();
        self.pending.retain(|s| match &s.action {
            ScheduledAction::EnemyShots { owner: o, .. }
            | ScheduledAction::Hazards { owner: o, .. } => *o != owner,
            ScheduledAction::RewardDrop { .. } => true,
        });
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            log::debug!("Cancelled {} scheduled attacks from entity {}", cancelled, owner);
        }
    }

    /// Cancel everything pending
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelled {} scheduled events", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_at(x: f32) -> ScheduledAction {
        ScheduledAction::RewardDrop {
            pos: Vec2::new(x, 0.0),
        }
    }

    fn xs(actions: &[ScheduledAction]) -> Vec<f32> {
        actions
            .iter()
            .map(|a| match a {
                ScheduledAction::RewardDrop { pos } => pos.x,
                _ => -1.0,
            })
            .collect()
    }

    #[test]
    fn test_drains_in_due_then_insertion_order() {
        let mut queue = EventQueue::new();
        queue.schedule(10, 5, drop_at(1.0));
        queue.schedule(10, 2, drop_at(2.0));
        queue.schedule(10, 2, drop_at(3.0));

        assert!(queue.drain_due(11).is_empty());
        assert_eq!(xs(&queue.drain_due(12)), vec![2.0, 3.0]);
        assert_eq!(queue.len(), 1);
        assert_eq!(xs(&queue.drain_due(100)), vec![1.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_owner_keeps_rewards_and_other_owners() {
        let mut queue = EventQueue::new();
        let shots = |owner| ScheduledAction::EnemyShots {
            owner,
            shots: Vec::new(),
        };
        queue.schedule(0, 5, shots(7));
        queue.schedule(0, 6, drop_at(1.0));
        queue.schedule(0, 7, ScheduledAction::Hazards {
            owner: 7,
            hazards: Vec::new(),
        });
        queue.schedule(0, 8, shots(9));

        queue.cancel_owner(7);
        assert_eq!(queue.len(), 2);
        let remaining = queue.drain_due(100);
        assert!(matches!(remaining[0], ScheduledAction::RewardDrop { .. }));
        assert!(matches!(remaining[1], ScheduledAction::EnemyShots { owner: 9, .. }));
    }

    #[test]
    fn test_clear_cancels_pending() {
        let mut queue = EventQueue::new();
        queue.schedule(0, 30, drop_at(1.0));
        queue.clear();
        assert!(queue.drain_due(1000).is_empty());
    }
}
