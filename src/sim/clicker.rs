//! Duck clicker: tap for coins, spend them on per-click upgrades
//!
//! Has no canvas and no frame loop. Every click is a discrete command; the
//! floating "+N" ripples and the button shake are short-lived effects the
//! host removes on a timer, so each one carries an id the timer can name.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::CoinSink;
use crate::tuning::{ClickerTuning, UpgradeSpec};

/// Identifies one transient effect (ripple or shake); never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// A floating "+N" at the click position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEffect {
    pub id: EffectId,
    /// Position relative to the clicked element
    pub pos: Vec2,
    pub amount: u64,
}

/// What a click produced, with the timers the host must arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub earned: u64,
    pub ripple: EffectId,
    pub shake: EffectId,
    pub ripple_ms: u32,
    pub shake_ms: u32,
}

/// An upgrade line with its current price and how many were bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub bonus: u64,
    pub cost: u64,
    pub count: u32,
}

impl From<&UpgradeSpec> for Upgrade {
    fn from(spec: &UpgradeSpec) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            bonus: spec.bonus,
            cost: spec.cost,
            count: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clicker {
    pub clicks: u64,
    /// Spendable clicker balance
    pub coins: u64,
    pub per_click: u64,
    pub upgrades: Vec<Upgrade>,
    effects: Vec<ClickEffect>,
    shake: Option<EffectId>,
    next_effect: u64,
    cost_growth_tenths: u64,
    effect_lifetime_ms: u32,
    shake_ms: u32,
}

impl Clicker {
    pub fn new(tuning: &ClickerTuning) -> Self {
        Self {
            clicks: 0,
            coins: 0,
            per_click: 1,
            upgrades: tuning.upgrades.iter().map(Upgrade::from).collect(),
            effects: Vec::new(),
            shake: None,
            next_effect: 0,
            cost_growth_tenths: tuning.cost_growth_tenths,
            effect_lifetime_ms: tuning.effect_lifetime_ms,
            shake_ms: tuning.shake_ms,
        }
    }

    fn next_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect);
        self.next_effect += 1;
        id
    }

    /// Register a click at `pos` and pay out the per-click income
    pub fn click(&mut self, pos: Vec2, sink: &mut dyn CoinSink) -> ClickOutcome {
        self.clicks += 1;
        self.coins += self.per_click;
        sink.coins_earned(u32::try_from(self.per_click).unwrap_or(u32::MAX));

        let ripple = self.next_id();
        self.effects.push(ClickEffect {
            id: ripple,
            pos,
            amount: self.per_click,
        });
        // A new shake supersedes any running one
        let shake = self.next_id();
        self.shake = Some(shake);

        ClickOutcome {
            earned: self.per_click,
            ripple,
            shake,
            ripple_ms: self.effect_lifetime_ms,
            shake_ms: self.shake_ms,
        }
    }

    /// Buy one level of the upgrade at `index`
    ///
    /// Returns false (and changes nothing) when the index is unknown or the
    /// balance can't cover the price.
    pub fn buy_upgrade(&mut self, index: usize) -> bool {
        let growth = self.cost_growth_tenths;
        let Some(upgrade) = self.upgrades.get_mut(index) else {
            log::warn!("No clicker upgrade at index {}", index);
            return false;
        };
        if self.coins < upgrade.cost {
            log::debug!(
                "Can't afford {} ({} < {})",
                upgrade.id,
                self.coins,
                upgrade.cost
            );
            return false;
        }

        self.coins -= upgrade.cost;
        self.per_click += upgrade.bonus;
        upgrade.count += 1;
        upgrade.cost = upgrade.cost.saturating_mul(growth) / 10;
        log::info!(
            "Bought {} #{}: {} per click, next costs {}",
            upgrade.id,
            upgrade.count,
            self.per_click,
            upgrade.cost
        );
        true
    }

    /// Remove the ripple or end the shake named by `id`
    ///
    /// Stale ids (already expired, or a shake superseded by a newer click)
    /// are ignored and return false.
    pub fn expire(&mut self, id: EffectId) -> bool {
        if self.shake == Some(id) {
            self.shake = None;
            return true;
        }
        let before = self.effects.len();
        self.effects.retain(|e| e.id != id);
        self.effects.len() != before
    }

    /// Drop every effect at once (view teardown)
    pub fn clear_effects(&mut self) {
        self.effects.clear();
        self.shake = None;
    }

    pub fn effects(&self) -> &[ClickEffect] {
        &self.effects
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Whether the upgrade at `index` can be bought right now
    pub fn can_afford(&self, index: usize) -> bool {
        self.upgrades
            .get(index)
            .is_some_and(|u| self.coins >= u.cost)
    }
}

/// Scheduled removal handles (timer ids) keyed by effect
///
/// The host registers a handle when it arms a timer, forgets it when the
/// timer fires, and drains the rest to cancel them on teardown.
#[derive(Debug, Clone)]
pub struct PendingRemovals<H> {
    entries: Vec<(EffectId, H)>,
}

impl<H> Default for PendingRemovals<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> PendingRemovals<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EffectId, handle: H) {
        self.entries.push((id, handle));
    }

    /// The timer for `id` ran; stop tracking it
    pub fn fired(&mut self, id: EffectId) -> Option<H> {
        let index = self.entries.iter().position(|(e, _)| *e == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Every outstanding handle, leaving the registry empty
    pub fn drain(&mut self) -> Vec<H> {
        self.entries.drain(..).map(|(_, h)| h).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clicker() -> Clicker {
        Clicker::new(&ClickerTuning::default())
    }

    #[test]
    fn test_three_clicks() {
        let mut c = clicker();
        let mut earned = Vec::new();
        for i in 0..3 {
            let outcome = c.click(Vec2::new(i as f32, 0.0), &mut |n: u32| earned.push(n));
            assert_eq!(outcome.earned, 1);
            assert_eq!(outcome.ripple_ms, 700);
            assert_eq!(outcome.shake_ms, 200);
        }
        assert_eq!((c.coins, c.clicks), (3, 3));
        assert_eq!(earned, vec![1, 1, 1]);
        assert_eq!(c.effects().len(), 3);
    }

    #[test]
    fn test_buy_beak() {
        let mut c = clicker();
        c.coins = 60;
        assert!(c.buy_upgrade(0));
        assert_eq!(c.per_click, 3);
        assert_eq!(c.coins, 10);
        assert_eq!(c.upgrades[0].cost, 110);
        assert_eq!(c.upgrades[0].count, 1);

        let outcome = c.click(Vec2::ZERO, &mut |_: u32| {});
        assert_eq!(outcome.earned, 3);
        assert_eq!(c.coins, 13);
    }

    #[test]
    fn test_unaffordable_purchase_changes_nothing() {
        let mut c = clicker();
        c.coins = 49;
        let before = c.clone();
        assert!(!c.can_afford(0));
        assert!(!c.buy_upgrade(0));
        assert!(!c.buy_upgrade(42));
        assert_eq!(c.coins, before.coins);
        assert_eq!(c.per_click, before.per_click);
        assert_eq!(c.upgrades, before.upgrades);
    }

    #[test]
    fn test_cost_growth_floors() {
        let mut c = clicker();
        c.coins = 1_000_000;
        let mut costs = Vec::new();
        for _ in 0..4 {
            costs.push(c.upgrades[1].cost);
            assert!(c.buy_upgrade(1));
        }
        assert_eq!(costs, vec![200, 440, 968, 2129]);
        assert_eq!(c.per_click, 1 + 4 * 5);
    }

    #[test]
    fn test_expire_ripple_and_shake() {
        let mut c = clicker();
        let first = c.click(Vec2::ZERO, &mut |_: u32| {});
        let second = c.click(Vec2::ONE, &mut |_: u32| {});
        assert!(c.is_shaking());

        // The first shake was superseded
        assert!(!c.expire(first.shake));
        assert!(c.is_shaking());
        assert!(c.expire(second.shake));
        assert!(!c.is_shaking());

        assert!(c.expire(first.ripple));
        assert!(!c.expire(first.ripple));
        assert_eq!(c.effects().len(), 1);
        assert_eq!(c.effects()[0].id, second.ripple);

        c.clear_effects();
        assert!(c.effects().is_empty());
    }

    #[test]
    fn test_pending_removals() {
        let mut pending = PendingRemovals::new();
        pending.insert(EffectId(1), 10);
        pending.insert(EffectId(2), 20);
        pending.insert(EffectId(3), 30);

        assert_eq!(pending.fired(EffectId(2)), Some(20));
        assert_eq!(pending.fired(EffectId(2)), None);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.drain(), vec![10, 30]);
        assert!(pending.is_empty());
    }

    proptest! {
        #[test]
        fn prop_every_click_pays_exactly_once(
            actions in prop::collection::vec(0usize..6, 1..300),
        ) {
            let mut c = clicker();
            let mut paid: u64 = 0;
            let mut ids = Vec::new();
            for action in actions {
                if action < 4 {
                    let before = c.coins;
                    let bought = c.buy_upgrade(action);
                    prop_assert_eq!(bought, c.coins != before);
                } else {
                    let per_click = c.per_click;
                    let outcome = c.click(Vec2::ZERO, &mut |n: u32| paid += u64::from(n));
                    prop_assert_eq!(outcome.earned, per_click);
                    ids.push(outcome.ripple);
                    ids.push(outcome.shake);
                }
            }
            let spent: u64 = c
                .upgrades
                .iter()
                .zip(ClickerTuning::default().upgrades.iter())
                .map(|(u, spec)| {
                    let mut cost = spec.cost;
                    let mut total = 0;
                    for _ in 0..u.count {
                        total += cost;
                        cost = cost * 22 / 10;
                    }
                    total
                })
                .sum();
            prop_assert_eq!(c.coins + spent, paid);
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
