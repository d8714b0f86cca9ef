//! Visual particles (not gameplay-affecting)

use glam::Vec3;
use rand::Rng;
use serde::Serialize;

use super::pool::Pool;

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub rad: f32,
    /// Random velocity jitter per second
    pub turbulence: f32,
    pub life: f32,
    pub max_life: f32,
    pub start_color: u32,
    pub end_color: u32,
}

impl Particle {
    /// 0 at birth, 1 at death (for color interpolation)
    pub fn age_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            1.0
        } else {
            (1.0 - self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Random spread applied per emitted particle
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleSpread {
    pub pos: f32,
    pub vel: f32,
    pub rad: f32,
    pub life: f32,
}

/// Burst descriptor for [`emit`]
#[derive(Debug, Clone, Copy)]
pub struct ParticleDesc {
    pub count: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub rad: f32,
    pub life: f32,
    pub turbulence: f32,
    pub start_color: u32,
    pub end_color: u32,
    pub spread: ParticleSpread,
}

impl ParticleDesc {
    /// Dust kicked up when a tile is dug out or built
    pub fn dust(pos: Vec3, color: u32) -> Self {
        Self {
            count: 24,
            pos,
            vel: Vec3::new(0.0, 0.0, 0.5),
            rad: 0.05,
            life: 0.8,
            turbulence: 2.0,
            start_color: color,
            end_color: color & 0x00ff_ffff,
            spread: ParticleSpread {
                pos: 0.4,
                vel: 1.0,
                rad: 0.02,
                life: 0.4,
            },
        }
    }

    /// Splatter left by a dying entity
    pub fn splatter(pos: Vec3, color: u32) -> Self {
        Self {
            count: 12,
            pos,
            vel: Vec3::ZERO,
            rad: 0.03,
            life: 0.5,
            turbulence: 1.0,
            start_color: color,
            end_color: 0x0000_0000,
            spread: ParticleSpread {
                pos: 0.1,
                vel: 1.5,
                rad: 0.01,
                life: 0.2,
            },
        }
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..amount)
    } else {
        0.0
    }
}

fn jitter3<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> Vec3 {
    Vec3::new(jitter(rng, amount), jitter(rng, amount), jitter(rng, amount))
}

/// Emit a burst; particles past capacity are dropped. Returns how many were added.
pub fn emit<R: Rng + ?Sized>(
    particles: &mut Pool<Particle>,
    desc: &ParticleDesc,
    rng: &mut R,
) -> u32 {
    let mut added = 0;
    for _ in 0..desc.count {
        let life = (desc.life + jitter(rng, desc.spread.life)).max(0.01);
        let particle = Particle {
            pos: desc.pos + jitter3(rng, desc.spread.pos),
            vel: desc.vel + jitter3(rng, desc.spread.vel),
            rad: (desc.rad + jitter(rng, desc.spread.rad)).max(0.0),
            turbulence: desc.turbulence,
            life,
            max_life: life,
            start_color: desc.start_color,
            end_color: desc.end_color,
        };
        if particles.push(particle).is_err() {
            log::trace!("particle table full, dropped {} particles", desc.count - added);
            break;
        }
        added += 1;
    }
    added
}

/// Advance all particles by `dt` and remove the expired ones
pub fn update<R: Rng + ?Sized>(particles: &mut Pool<Particle>, rng: &mut R, dt: f32) {
    for p in particles.iter_mut() {
        p.vel += jitter3(rng, p.turbulence) * dt;
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    particles.swap_retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_respects_capacity() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Pool::with_capacity(10);
        let desc = ParticleDesc::dust(Vec3::ZERO, 0xffff_ffff);
        assert_eq!(emit(&mut particles, &desc, &mut rng), 10);
        assert_eq!(emit(&mut particles, &desc, &mut rng), 0);
        assert_eq!(particles.len(), 10);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Pool::with_capacity(64);
        emit(&mut particles, &ParticleDesc::splatter(Vec3::ONE, 0xff00_00ff), &mut rng);
        assert_eq!(particles.len(), 12);

        update(&mut particles, &mut rng, 0.1);
        assert_eq!(particles.len(), 12);
        assert!(particles.iter().all(|p| p.age_fraction() > 0.0));

        // longest possible life is 0.7s
        for _ in 0..10 {
            update(&mut particles, &mut rng, 0.1);
        }
        assert!(particles.is_empty());
    }
}
