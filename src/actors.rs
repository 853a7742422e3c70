/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;

/// Absolute combo accumulator cap; attack chains are authored up to 5 stages
pub const ATTACK_COMMAND_MAX: f32 = 5.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub cur: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { cur: max, max }
    }

    /// Saturating damage; never drops below zero
    pub fn damage(&mut self, amount: f32) {
        self.cur = (self.cur - amount).clamp(0.0, self.max);
    }

    /// Fill ratio for the health bar UI
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.cur / self.max
    }

    pub fn depleted(&self) -> bool {
        self.cur <= 0.0
    }
}

/// Action resource; enemy attacks are gated on it
#[derive(Component, Debug, Clone, Copy)]
pub struct Stamina {
    pub cur: f32,
    pub max: f32,
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self { cur: max, max }
    }

    /// Signed update, saturating at both ends
    pub fn update(&mut self, delta: f32) {
        self.cur = (self.cur + delta).clamp(0.0, self.max);
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.cur >= cost
    }
}

/// Combo attack accumulator, shared between player input and enemy AI
///
/// The animator reads it as the "Attack" float parameter; each authored
/// attack clip fires when the value crosses its stage threshold.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AttackCommand(pub f32);

impl AttackCommand {
    /// Register one attack press, then clamp by the attack clip currently
    /// playing (stage 1 caps at 2, 2 at 3, 3 at 4). Stage N can only chain
    /// into stage N+1, so the accumulator never runs ahead of the animation.
    pub fn bump(&mut self, stage: i32) {
        self.0 += 1.0;
        match stage {
            1 => self.0 = self.0.clamp(0.0, 2.0),
            2 => self.0 = self.0.clamp(0.0, 3.0),
            3 => self.0 = self.0.clamp(0.0, 4.0),
            _ => {}
        }
        self.0 = self.0.clamp(0.0, ATTACK_COMMAND_MAX);
    }

    /// Drain toward zero over time
    pub fn decay(&mut self, rate: f32, dt: f32) {
        if self.0 > 0.0 {
            self.0 = (self.0 - rate * dt).clamp(0.0, ATTACK_COMMAND_MAX);
        }
    }
}

/// Terminal state; inserted exactly once, never removed
#[derive(Component)]
pub struct Dead;

/// Detection-layer tag; actors carrying it show up in hostile searches
#[derive(Component)]
pub struct TargetLayer;

/// Physics hand-off marker for a dead actor; the render/physics side
/// swaps the animated pose for loose bodies when it sees this
#[derive(Component)]
pub struct Ragdoll;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamina_saturates_both_ends() {
        let mut s = Stamina::new(1.0);
        s.update(100.0);
        assert_eq!(s.cur, 1.0);
        s.update(-100.0);
        assert_eq!(s.cur, 0.0);
        s.update(0.075);
        assert_eq!(s.cur, 0.075);
        s.update(f32::MAX);
        assert_eq!(s.cur, 1.0);
    }

    #[test]
    fn test_health_damage_saturates_at_zero() {
        let mut h = Health::new(100.0);
        h.damage(10.0);
        assert_eq!(h.cur, 90.0);
        h.damage(1000.0);
        assert_eq!(h.cur, 0.0);
        assert!(h.depleted());
        h.damage(10.0);
        assert_eq!(h.cur, 0.0);
    }

    #[test]
    fn test_health_ratio() {
        let mut h = Health::new(100.0);
        assert_eq!(h.ratio(), 1.0);
        h.damage(40.0);
        assert_eq!(h.ratio(), 0.6);
    }

    #[test]
    fn test_attack_command_stage_caps() {
        // Stage 1 clip playing: accumulator tops out at 2
        let mut c = AttackCommand(0.0);
        for _ in 0..10 {
            c.bump(1);
        }
        assert_eq!(c.0, 2.0);

        let mut c = AttackCommand(0.0);
        for _ in 0..10 {
            c.bump(2);
        }
        assert_eq!(c.0, 3.0);

        let mut c = AttackCommand(0.0);
        for _ in 0..10 {
            c.bump(3);
        }
        assert_eq!(c.0, 4.0);
    }

    #[test]
    fn test_attack_command_absolute_cap() {
        // No clip playing (stage 0): only the absolute cap applies
        let mut c = AttackCommand(0.0);
        for _ in 0..20 {
            c.bump(0);
        }
        assert_eq!(c.0, ATTACK_COMMAND_MAX);
    }

    #[test]
    fn test_attack_command_decay_clamps_at_zero() {
        let mut c = AttackCommand(1.0);
        c.decay(3.0, 10.0);
        assert_eq!(c.0, 0.0);

        // Already empty: decay is a no-op
        c.decay(3.0, 1.0);
        assert_eq!(c.0, 0.0);
    }
}
