//! Fixed timestep simulation tick
//!
//! One synchronous update per frame, in this order:
//! input → order sweep → AI → integration → collision → dead removal → particles.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ai;
use super::map::TileCoord;
use super::particle;
use super::path::Pathfinder;
use super::physics::{integrate, resolve_collisions};
use super::state::GameState;
use crate::config::{ConfigError, SimConfig};

/// Platform input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Camera pan keys (held)
    pub pan_up: bool,
    pub pan_down: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    /// Camera zoom keys (held)
    pub zoom_in: bool,
    pub zoom_out: bool,
    /// Issue the current order tool under the cursor (held)
    pub mouse_left: bool,
    /// Clear the order under the cursor (held)
    pub mouse_right: bool,
    /// Cursor position, already unprojected into world space
    pub mouse_world: Vec2,
    /// Wheel delta; negative steps to the next order tool
    pub scroll: f32,
}

/// Apply player input: camera movement, order tool selection and painting
pub fn apply_input(state: &mut GameState, input: &TickInput, config: &SimConfig, dt: f32) {
    let step = config.camera_speed * dt;
    let cam = &mut state.camera.pos;
    if input.pan_up {
        cam.y += step;
    }
    if input.pan_down {
        cam.y -= step;
    }
    if input.pan_left {
        cam.x -= step;
    }
    if input.pan_right {
        cam.x += step;
    }
    if input.zoom_in {
        cam.z -= step;
    }
    if input.zoom_out {
        cam.z += step;
    }

    let cursor = TileCoord::from_world(input.mouse_world);
    if input.mouse_left {
        state.map.issue_order(cursor.x, cursor.y, state.order_tool);
    }
    if input.mouse_right {
        state.map.clear_order(cursor.x, cursor.y);
    }

    if input.scroll != 0.0 {
        let step = if input.scroll < 0.0 { 1 } else { -1 };
        let tool = state.order_tool.cycle_tool(step);
        if tool != state.order_tool {
            log::info!("Order tool: {}", tool.info().name);
            state.order_tool = tool;
        }
    }
}

/// Advance the game state by one timestep
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    pathfinder: &mut Pathfinder,
    config: &SimConfig,
    rng: &mut R,
    input: &TickInput,
    dt: f32,
) {
    state.time_ticks += 1;

    apply_input(state, input, config, dt);
    state.map.sweep_satisfied_orders();

    ai::update(state, pathfinder, config, rng, dt);
    integrate(state.entities_mut(), config.damping, dt);
    resolve_collisions(state, dt);
    state.remove_dead(rng);

    particle::update(state.particles_mut(), rng, dt);
}

/// A running simulation: state plus the scratch buffers and RNG it ticks with
#[derive(Debug, Clone)]
pub struct Simulation {
    pub state: GameState,
    pathfinder: Pathfinder,
    rng: Pcg32,
    config: SimConfig,
}

impl Simulation {
    /// Validate `config` and generate a new world from it
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let state = GameState::generate(&config, &mut rng);
        Ok(Self::assemble(state, rng, config))
    }

    /// Run an existing state; the RNG is seeded from `config`
    pub fn with_state(state: GameState, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Pcg32::seed_from_u64(config.seed);
        Ok(Self::assemble(state, rng, config))
    }

    fn assemble(state: GameState, rng: Pcg32, config: SimConfig) -> Self {
        Self {
            pathfinder: Pathfinder::for_map(&state.map),
            state,
            rng,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(
            &mut self.state,
            &mut self.pathfinder,
            &self.config,
            &mut self.rng,
            input,
            dt,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::entity::{AiState, EntityKind};
    use crate::sim::map::{OrderKind, TileKind};
    use crate::sim::state::NO_ENTITY;

    fn open_sim(size: i32) -> Simulation {
        let mut state = GameState::new(size, 64, 1024);
        for y in 0..size {
            for x in 0..size {
                state.map.set_kind(x, y, TileKind::Dirt);
            }
        }
        Simulation::with_state(state, SimConfig::default()).unwrap()
    }

    #[test]
    fn test_worker_digs_out_far_corner() {
        let mut sim = open_sim(5);
        sim.state.map.set_kind(4, 4, TileKind::Rock);
        sim.state.map.issue_order(4, 4, OrderKind::DestroyTile);
        let worker = sim
            .state
            .spawn_entity(EntityKind::Worker, Vec2::new(0.5, 0.5), Vec2::ZERO)
            .unwrap();

        let input = TickInput::default();
        let mut done = false;
        for _ in 0..1200 {
            sim.tick(&input, SIM_DT);
            if sim.state.map.get_tile(4, 4).unwrap().order.is_none() {
                done = true;
                break;
            }
        }
        assert!(done, "order was never completed");

        let tile = sim.state.map.get_tile(4, 4).unwrap();
        assert_eq!(tile.kind, TileKind::Rock.info().destroy_result);
        assert_eq!(tile.assigned_worker_id, NO_ENTITY);
        assert_eq!(sim.state.find_entity(worker).unwrap().ai, AiState::Idle);
    }

    #[test]
    fn test_worker_builds_wall() {
        let mut sim = open_sim(6);
        sim.state.map.issue_order(5, 2, OrderKind::BuildRockWall);
        sim.state
            .spawn_entity(EntityKind::Worker, Vec2::new(0.5, 2.5), Vec2::ZERO);

        for _ in 0..1200 {
            sim.tick(&TickInput::default(), SIM_DT);
            if sim.state.map.get_tile(5, 2).unwrap().kind == TileKind::RockWall {
                break;
            }
        }
        let tile = sim.state.map.get_tile(5, 2).unwrap();
        assert_eq!(tile.kind, TileKind::RockWall);
        assert!(tile.order.is_none());
    }

    #[test]
    fn test_satisfied_order_swept_before_ai() {
        let mut sim = open_sim(4);
        // destroy on open ground is already satisfied
        sim.state.map.issue_order(3, 3, OrderKind::DestroyTile);
        let worker = sim
            .state
            .spawn_entity(EntityKind::Worker, Vec2::new(0.5, 0.5), Vec2::ZERO)
            .unwrap();
        sim.tick(&TickInput::default(), SIM_DT);
        assert!(sim.state.map.get_tile(3, 3).unwrap().order.is_none());
        assert_eq!(sim.state.find_entity(worker).unwrap().ai, AiState::Idle);
    }

    #[test]
    fn test_mouse_paints_and_clears_orders() {
        let mut sim = open_sim(8);
        sim.state.map.set_kind(2, 3, TileKind::Rock);
        let paint = TickInput {
            mouse_left: true,
            mouse_world: Vec2::new(2.7, 3.2),
            ..Default::default()
        };
        sim.tick(&paint, SIM_DT);
        assert_eq!(sim.state.map.get_tile(2, 3).unwrap().order, OrderKind::DestroyTile);

        let erase = TickInput {
            mouse_right: true,
            mouse_world: Vec2::new(2.1, 3.9),
            ..Default::default()
        };
        sim.tick(&erase, SIM_DT);
        assert!(sim.state.map.get_tile(2, 3).unwrap().order.is_none());

        // off-map cursor is ignored
        let off = TickInput {
            mouse_left: true,
            mouse_world: Vec2::new(-3.0, 40.0),
            ..Default::default()
        };
        sim.tick(&off, SIM_DT);
    }

    #[test]
    fn test_scroll_cycles_order_tool() {
        let mut sim = open_sim(4);
        assert_eq!(sim.state.order_tool, OrderKind::DestroyTile);
        let down = TickInput {
            scroll: -1.0,
            ..Default::default()
        };
        sim.tick(&down, SIM_DT);
        assert_eq!(sim.state.order_tool, OrderKind::BuildRockWall);
        sim.tick(&down, SIM_DT);
        assert_eq!(sim.state.order_tool, OrderKind::BuildRockWall);

        let up = TickInput {
            scroll: 1.0,
            ..Default::default()
        };
        sim.tick(&up, SIM_DT);
        assert_eq!(sim.state.order_tool, OrderKind::DestroyTile);
    }

    #[test]
    fn test_camera_pans() {
        let mut sim = open_sim(4);
        let start = sim.state.camera.pos;
        let input = TickInput {
            pan_right: true,
            pan_up: true,
            ..Default::default()
        };
        sim.tick(&input, 0.5);
        assert!((sim.state.camera.pos.x - (start.x + 4.0)).abs() < 1e-5);
        assert!((sim.state.camera.pos.y - (start.y + 4.0)).abs() < 1e-5);
    }

    #[test]
    fn test_guard_clears_pest() {
        let mut sim = open_sim(8);
        let pest = sim
            .state
            .spawn_entity(EntityKind::Pest, Vec2::new(6.5, 6.5), Vec2::ZERO)
            .unwrap();
        sim.state
            .spawn_entity(EntityKind::Guard, Vec2::new(1.5, 1.5), Vec2::ZERO);

        for _ in 0..2400 {
            sim.tick(&TickInput::default(), SIM_DT);
            if sim.state.find_entity(pest).is_none() {
                break;
            }
        }
        assert!(sim.state.find_entity(pest).is_none());
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig {
            map_size: 32,
            pest_attempts: 64,
            ..Default::default()
        };
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();
        let input = TickInput {
            mouse_left: true,
            mouse_world: Vec2::new(18.5, 16.5),
            ..Default::default()
        };
        for _ in 0..120 {
            a.tick(&input, SIM_DT);
            b.tick(&input, SIM_DT);
        }
        assert_eq!(a.state.entities(), b.state.entities());
        assert_eq!(a.state.map.tiles(), b.state.map.tiles());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let empty = SimConfig {
            map_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(empty.clone()),
            Err(ConfigError::Invalid(_))
        ));
        assert!(Simulation::with_state(GameState::new(4, 4, 4), empty).is_err());

        let huge = SimConfig {
            map_size: 70_000,
            ..Default::default()
        };
        assert!(Simulation::new(huge).is_err());
    }

    #[test]
    fn test_tick_accepts_any_rng() {
        let mut state = GameState::new(4, 4, 64);
        let mut pathfinder = Pathfinder::for_map(&state.map);
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        state.spawn_entity(EntityKind::Pest, Vec2::new(1.5, 1.5), Vec2::ZERO);
        let config = SimConfig::default();
        tick(
            &mut state,
            &mut pathfinder,
            &config,
            &mut rng,
            &TickInput::default(),
            SIM_DT,
        );
        assert_eq!(state.time_ticks, 1);
    }
}
