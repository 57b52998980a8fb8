use bevy::prelude::*;
use constants::render_settings::{PARTICLE_COLOUR, PARTICLE_Z};

use crate::engine::particles::field::{Particle, ParticleFieldState};

/// Sprite drawing the particle with the matching id.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParticleSprite {
    pub id: u32,
}

/// Page pixels (origin top-left, y down) to 2D world space (origin centre, y up).
pub fn pixel_to_world(position: Vec2, extent: Vec2) -> Vec2 {
    Vec2::new(position.x - extent.x * 0.5, extent.y * 0.5 - position.y)
}

fn particle_colour(particle: &Particle) -> Color {
    PARTICLE_COLOUR.with_alpha(particle.opacity)
}

/// Mirror the particle field onto sprites: spawn on activation, follow every
/// tick, despawn on deactivation.
pub fn sync_particle_sprites(
    mut commands: Commands,
    state: Res<ParticleFieldState>,
    mut sprites: Query<(Entity, &ParticleSprite, &mut Transform)>,
) {
    let Some(field) = state.field() else {
        for (entity, _, _) in &sprites {
            commands.entity(entity).despawn();
        }
        return;
    };

    if sprites.iter().count() != field.particles().len() {
        for (entity, _, _) in &sprites {
            commands.entity(entity).despawn();
        }
        for particle in field.particles() {
            let position = pixel_to_world(particle.position, field.extent());
            commands.spawn((
                ParticleSprite { id: particle.id },
                Sprite::from_color(particle_colour(particle), Vec2::splat(particle.size)),
                Transform::from_translation(position.extend(PARTICLE_Z)),
            ));
        }
        return;
    }

    if !state.is_changed() {
        return;
    }

    let particles = field.particles();
    for (_, sprite, mut transform) in &mut sprites {
        if let Some(particle) = particles.get(sprite.id as usize) {
            let position = pixel_to_world(particle.position, field.extent());
            transform.translation = position.extend(PARTICLE_Z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_world_centres_viewport() {
        let extent = Vec2::new(800.0, 600.0);
        assert_eq!(pixel_to_world(Vec2::ZERO, extent), Vec2::new(-400.0, 300.0));
        assert_eq!(pixel_to_world(Vec2::new(400.0, 300.0), extent), Vec2::ZERO);
        assert_eq!(pixel_to_world(Vec2::new(800.0, 600.0), extent), Vec2::new(400.0, -300.0));
    }
}
