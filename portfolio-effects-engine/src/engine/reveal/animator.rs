use std::collections::HashMap;

use bevy::prelude::*;

use crate::engine::config::effects_config::EffectsConfig;
use crate::engine::reveal::easing::RevealEasing;
use crate::engine::reveal::intersection::{IntersectionTracker, RegionRect};
use crate::engine::reveal::options::RevealConfig;
use crate::rpc::web_rpc::WebRpcInterface;

/// Host-side identifier of a revealed region.
#[derive(Component, Debug, Clone)]
pub struct RevealRegion {
    pub id: String,
}

/// Lookup from host region id to its entity.
#[derive(Resource, Default, Debug)]
pub struct RegionIndex {
    by_id: HashMap<String, Entity>,
}

impl RegionIndex {
    pub fn get(&self, id: &str) -> Option<Entity> {
        self.by_id.get(id).copied()
    }

    pub fn insert(&mut self, id: String, entity: Entity) -> Option<Entity> {
        self.by_id.insert(id, entity)
    }

    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        self.by_id.remove(id)
    }
}

/// Visibility flag of one region. Only ever moves from hidden to visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealState {
    pub visible: bool,
}

/// Rendered appearance of a region at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    pub opacity: f32,
    /// Translation from the final position, in page pixels (x right, y down).
    pub offset: Vec2,
}

/// One-shot entrance transition for a single region.
#[derive(Component, Debug, Clone)]
pub struct RevealAnimator {
    config: RevealConfig,
    easing: RevealEasing,
    state: RevealState,
    /// Seconds since the region entered the viewport.
    elapsed: f32,
    immediate: bool,
    last_reported: Option<RevealFrame>,
    completion_reported: bool,
}

impl RevealAnimator {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            easing: RevealEasing::default(),
            state: RevealState::default(),
            elapsed: 0.0,
            immediate: false,
            last_reported: None,
            completion_reported: false,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Start the transition. Returns false if it already started.
    pub fn enter(&mut self) -> bool {
        if self.state.visible {
            return false;
        }
        self.state.visible = true;
        true
    }

    /// Jump straight to the final frame, skipping the animation.
    pub fn enter_immediately(&mut self) -> bool {
        if !self.enter() {
            return false;
        }
        self.immediate = true;
        true
    }

    /// Advance the clock of a started transition.
    pub fn advance(&mut self, delta_secs: f32) {
        if self.state.visible && !self.immediate && delta_secs > 0.0 {
            self.elapsed += delta_secs;
        }
    }

    /// Linear progress through the transition, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if !self.state.visible {
            return 0.0;
        }
        if self.immediate {
            return 1.0;
        }

        let active = self.elapsed - self.config.delay;
        if active < 0.0 {
            return 0.0;
        }
        if self.config.duration <= 0.0 {
            return 1.0;
        }
        (active / self.config.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.state.visible && self.progress() >= 1.0
    }

    pub fn frame(&self) -> RevealFrame {
        let eased = self.easing.ease(self.progress());
        let start = self.config.direction.initial_offset(self.config.distance);
        RevealFrame {
            opacity: eased,
            offset: start * (1.0 - eased),
        }
    }

    /// Frame to publish, if it differs from the last one published.
    fn take_changed_frame(&mut self) -> Option<RevealFrame> {
        let frame = self.frame();
        if self.last_reported == Some(frame) {
            return None;
        }
        self.last_reported = Some(frame);
        Some(frame)
    }
}

/// Host mounted or unmounted a region. Applied in arrival order.
#[derive(Event, Debug, Clone)]
pub enum RegionLifecycleEvent {
    Register {
        region: String,
        rect: RegionRect,
        config: RevealConfig,
    },
    Unregister {
        region: String,
    },
}

/// A region's tracker fired.
#[derive(Event, Debug, Clone, Copy)]
pub struct RegionEnteredEvent {
    pub entity: Entity,
    /// Set when observation is unavailable and the region should skip animation.
    pub immediate: bool,
}

/// Mount and unmount regions in the order the host sent them.
///
/// Registering an id that is still armed re-measures it in place; once its
/// transition has started the existing state is kept.
pub fn apply_region_lifecycle(
    mut commands: Commands,
    mut events: EventReader<RegionLifecycleEvent>,
    mut index: ResMut<RegionIndex>,
    mut regions: Query<(Option<&mut IntersectionTracker>, &mut RevealAnimator)>,
    config: Res<EffectsConfig>,
) {
    for event in events.read() {
        match event {
            RegionLifecycleEvent::Register {
                region,
                rect,
                config: reveal,
            } => {
                if let Some(existing) = index.get(region) {
                    if let Ok((armed, mut animator)) = regions.get_mut(existing) {
                        match armed {
                            Some(mut tracker) => {
                                tracker.rect = *rect;
                                *animator = RevealAnimator::new(*reveal);
                                debug!("Region '{}' re-measured", region);
                            }
                            None => debug!("Region '{}' already revealing, kept", region),
                        }
                        continue;
                    }
                    // Spawned earlier in this batch, nothing has run on it yet.
                    commands.entity(existing).despawn();
                }

                let entity = commands
                    .spawn((
                        RevealRegion { id: region.clone() },
                        IntersectionTracker::new(*rect, config.intersection),
                        RevealAnimator::new(*reveal),
                    ))
                    .id();
                index.insert(region.clone(), entity);

                debug!(
                    "Registered region '{}' ({:?}, delay {:.2}s)",
                    region, reveal.direction, reveal.delay
                );
            }
            RegionLifecycleEvent::Unregister { region } => match index.remove(region) {
                Some(entity) => {
                    commands.entity(entity).despawn();
                    debug!("Unregistered region '{}'", region);
                }
                None => debug!("Unregister for unknown region '{}' ignored", region),
            },
        }
    }
}

/// Start transitions for regions whose tracker fired. Repeat signals are no-ops.
pub fn start_reveal_animations(
    mut events: EventReader<RegionEnteredEvent>,
    mut animators: Query<(&RevealRegion, &mut RevealAnimator)>,
) {
    for event in events.read() {
        let Ok((region, mut animator)) = animators.get_mut(event.entity) else {
            continue;
        };

        let started = if event.immediate {
            animator.enter_immediately()
        } else {
            animator.enter()
        };

        if started {
            info!("Revealing region '{}'", region.id);
        }
    }
}

/// Advance running transitions and publish changed frames to the host.
pub fn advance_reveal_animations(
    time: Res<Time>,
    mut animators: Query<(&RevealRegion, &mut RevealAnimator)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let delta = time.delta_secs();
    let mut frames = Vec::new();
    let mut completed = Vec::new();

    for (region, mut animator) in &mut animators {
        if !animator.state().visible || animator.completion_reported {
            continue;
        }

        animator.advance(delta);

        if let Some(frame) = animator.take_changed_frame() {
            frames.push(serde_json::json!({
                "region": region.id,
                "opacity": frame.opacity,
                "x": frame.offset.x,
                "y": frame.offset.y
            }));
        }

        if animator.is_complete() {
            animator.completion_reported = true;
            completed.push(region.id.clone());
        }
    }

    if !frames.is_empty() {
        rpc_interface.send_notification("reveal_frames", serde_json::json!({ "frames": frames }));
    }

    if !completed.is_empty() {
        rpc_interface.send_notification(
            "reveal_completed",
            serde_json::json!({ "regions": completed }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reveal::options::RevealDirection;

    const FRAME_SECS: f32 = 1.0 / 60.0;

    #[test]
    fn test_hidden_frame_is_offset_and_transparent() {
        let animator = RevealAnimator::new(RevealConfig::default());
        let frame = animator.frame();

        assert!(!animator.state().visible);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.offset, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_hidden_animator_ignores_time() {
        let mut animator = RevealAnimator::new(RevealConfig::default());
        animator.advance(10.0);
        assert_eq!(animator.elapsed(), 0.0);
        assert_eq!(animator.progress(), 0.0);
    }

    #[test]
    fn test_opacity_rises_monotonically_to_one() {
        let mut animator = RevealAnimator::new(RevealConfig::default());
        assert!(animator.enter());

        let mut previous = animator.frame().opacity;
        assert_eq!(previous, 0.0);

        // Run well past the duration; opacity must never drop.
        for _ in 0..120 {
            animator.advance(FRAME_SECS);
            let opacity = animator.frame().opacity;
            assert!(opacity >= previous);
            previous = opacity;
        }

        assert!(animator.is_complete());
        assert_eq!(animator.frame().opacity, 1.0);
        assert_eq!(animator.frame().offset, Vec2::ZERO);
    }

    #[test]
    fn test_completes_after_duration() {
        let mut animator = RevealAnimator::new(RevealConfig::default());
        animator.enter();

        animator.advance(0.3);
        assert!(!animator.is_complete());
        let midway = animator.frame();
        assert!(midway.opacity > 0.0 && midway.opacity < 1.0);

        animator.advance(0.31);
        assert!(animator.is_complete());
    }

    #[test]
    fn test_delay_postpones_transition() {
        let config = RevealConfig::default().with_delay(0.5);
        let mut animator = RevealAnimator::new(config);
        animator.enter();

        animator.advance(0.4);
        assert_eq!(animator.frame().opacity, 0.0);

        animator.advance(0.2);
        assert!(animator.frame().opacity > 0.0);
    }

    #[test]
    fn test_duplicate_enter_does_not_restart() {
        let mut animator = RevealAnimator::new(RevealConfig::default());
        assert!(animator.enter());
        animator.advance(0.3);
        let before = animator.frame();

        assert!(!animator.enter());
        assert!(!animator.enter_immediately());
        assert!(animator.state().visible);
        assert_eq!(animator.elapsed(), 0.3);
        assert_eq!(animator.frame(), before);
    }

    #[test]
    fn test_immediate_enter_skips_animation() {
        let config = RevealConfig::default().with_direction(RevealDirection::Right);
        let mut animator = RevealAnimator::new(config);
        assert!(animator.enter_immediately());

        let frame = animator.frame();
        assert_eq!(frame.opacity, 1.0);
        assert_eq!(frame.offset, Vec2::ZERO);
        assert!(animator.is_complete());
    }

    #[test]
    fn test_zero_duration_jumps_once_delay_elapsed() {
        let config = RevealConfig {
            duration: 0.0,
            delay: 0.1,
            ..default()
        };
        let mut animator = RevealAnimator::new(config);
        animator.enter();
        assert_eq!(animator.progress(), 0.0);

        animator.advance(0.1);
        assert_eq!(animator.progress(), 1.0);
    }

    #[test]
    fn test_changed_frames_are_reported_once() {
        let mut animator = RevealAnimator::new(RevealConfig::default().with_delay(1.0));
        animator.enter();

        assert!(animator.take_changed_frame().is_some());
        // Still waiting on the delay: the frame is unchanged.
        animator.advance(0.1);
        assert!(animator.take_changed_frame().is_none());
    }

    #[test]
    fn test_region_index_replaces_entries() {
        let mut index = RegionIndex::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);

        assert_eq!(index.insert("hero".to_string(), first), None);
        assert_eq!(index.insert("hero".to_string(), second), Some(first));
        assert_eq!(index.get("hero"), Some(second));

        assert_eq!(index.remove("hero"), Some(second));
        assert_eq!(index.get("hero"), None);
    }
}
