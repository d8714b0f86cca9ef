//! Tile grid, tile kinds and player orders
//!
//! Tile coordinates are frequently derived from unclamped world positions, so
//! every accessor bounds-checks and quietly ignores out-of-range cells.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::NO_ENTITY;

/// Integer grid coordinate of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a world position
    #[inline]
    pub fn from_world(pos: Vec2) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
        }
    }

    /// World position of the tile center
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    #[inline]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Terrain kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Rock,
    Dirt,
    Copper,
    /// Player-built wall
    RockWall,
}

/// Static per-kind tile properties
#[derive(Debug, Clone, Copy)]
pub struct TileInfo {
    pub is_wall: bool,
    pub color: u32,
    pub max_life: f32,
    /// Kind left behind when the tile is dug out
    pub destroy_result: TileKind,
}

const ROCK_INFO: TileInfo = TileInfo {
    is_wall: true,
    color: 0xff22_2222,
    max_life: 3.0,
    destroy_result: TileKind::Dirt,
};

const DIRT_INFO: TileInfo = TileInfo {
    is_wall: false,
    color: 0xff33_4566,
    max_life: 1.0,
    destroy_result: TileKind::Dirt,
};

const COPPER_INFO: TileInfo = TileInfo {
    is_wall: true,
    color: 0xff33_77bb,
    max_life: 5.0,
    destroy_result: TileKind::Dirt,
};

const ROCK_WALL_INFO: TileInfo = TileInfo {
    is_wall: true,
    color: 0xff55_5555,
    max_life: 4.0,
    destroy_result: TileKind::Dirt,
};

impl TileKind {
    pub fn info(self) -> &'static TileInfo {
        match self {
            TileKind::Rock => &ROCK_INFO,
            TileKind::Dirt => &DIRT_INFO,
            TileKind::Copper => &COPPER_INFO,
            TileKind::RockWall => &ROCK_WALL_INFO,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self.info().is_wall
    }
}

/// Player-issued tile orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderKind {
    #[default]
    None,
    DestroyTile,
    BuildRockWall,
}

/// Static per-kind order properties
#[derive(Debug, Clone, Copy)]
pub struct OrderInfo {
    pub name: &'static str,
    /// Order targets open ground (true) or a wall (false)
    pub on_ground: bool,
    pub cost: i32,
}

impl OrderKind {
    /// Orders selectable as a player tool, in scroll order
    pub const TOOLS: [OrderKind; 2] = [OrderKind::DestroyTile, OrderKind::BuildRockWall];

    pub fn info(self) -> OrderInfo {
        match self {
            OrderKind::None => OrderInfo {
                name: "none",
                on_ground: false,
                cost: 0,
            },
            OrderKind::DestroyTile => OrderInfo {
                name: "destroy tile",
                on_ground: false,
                cost: 0,
            },
            OrderKind::BuildRockWall => OrderInfo {
                name: "build rock wall",
                on_ground: true,
                cost: 50,
            },
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == OrderKind::None
    }

    /// Tile kind produced by fulfilling this order on a tile of `kind`
    pub fn result_kind(self, kind: TileKind) -> TileKind {
        match self {
            OrderKind::None => kind,
            OrderKind::DestroyTile => kind.info().destroy_result,
            OrderKind::BuildRockWall => TileKind::RockWall,
        }
    }

    /// True once a tile of `kind` no longer needs this order
    pub fn is_satisfied_by(self, kind: TileKind) -> bool {
        !self.is_none() && kind.is_wall() == self.info().on_ground
    }

    /// Step through [`Self::TOOLS`], clamping at both ends
    pub fn cycle_tool(self, step: i32) -> OrderKind {
        let current = Self::TOOLS.iter().position(|&t| t == self).unwrap_or(0) as i32;
        let next = (current + step).clamp(0, Self::TOOLS.len() as i32 - 1);
        Self::TOOLS[next as usize]
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub order: OrderKind,
    /// Id of the worker executing `order`, [`NO_ENTITY`] when unassigned
    pub assigned_worker_id: u32,
    pub remaining_life: f32,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            order: OrderKind::None,
            assigned_worker_id: NO_ENTITY,
            remaining_life: kind.info().max_life,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TileInfo {
        self.kind.info()
    }

    /// Reset to a fresh tile of `kind`, dropping any order
    fn reset(&mut self, kind: TileKind) {
        *self = Tile::new(kind);
    }
}

/// Square tile grid
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    size: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a `size`×`size` map filled with `fill`
    pub fn new(size: i32, fill: TileKind) -> Self {
        let size = size.max(0);
        Self {
            size,
            tiles: vec![Tile::new(fill); (size as usize).pow(2)],
        }
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| (y * self.size + x) as usize)
    }

    /// Row-major tile slice for rendering
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(move |i| &mut self.tiles[i])
    }

    #[inline]
    pub fn tile_at(&self, coord: TileCoord) -> Option<Tile> {
        self.get_tile(coord.x, coord.y)
    }

    /// False off-map and on walls
    #[inline]
    pub fn is_traversable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| !self.tiles[i].kind.is_wall())
    }

    /// Replace the tile at (x, y) with a fresh tile of `kind`
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) -> bool {
        match self.tile_mut(x, y) {
            Some(tile) => {
                tile.reset(kind);
                true
            }
            None => false,
        }
    }

    /// Attach an order to a tile. The current assignment, if any, is kept.
    pub fn issue_order(&mut self, x: i32, y: i32, order: OrderKind) -> bool {
        match self.tile_mut(x, y) {
            Some(tile) => {
                tile.order = order;
                if order.is_none() {
                    tile.assigned_worker_id = NO_ENTITY;
                }
                true
            }
            None => false,
        }
    }

    /// Drop a tile's order and its assignment together
    pub fn clear_order(&mut self, x: i32, y: i32) -> bool {
        match self.tile_mut(x, y) {
            Some(tile) => {
                tile.order = OrderKind::None;
                tile.assigned_worker_id = NO_ENTITY;
                true
            }
            None => false,
        }
    }

    /// Fulfil the tile's order: change its kind and reset order and assignment
    /// in one write. Returns the order applied, `None` if there was nothing to do.
    pub fn apply_order(&mut self, x: i32, y: i32) -> Option<OrderKind> {
        let tile = self.tile_mut(x, y)?;
        let order = tile.order;
        if order.is_none() {
            return None;
        }
        let result = order.result_kind(tile.kind);
        tile.reset(result);
        Some(order)
    }

    /// Clear every order whose tile already satisfies it. Returns how many.
    pub fn sweep_satisfied_orders(&mut self) -> usize {
        let mut cleared = 0;
        for tile in &mut self.tiles {
            if tile.order.is_satisfied_by(tile.kind) {
                tile.order = OrderKind::None;
                tile.assigned_worker_id = NO_ENTITY;
                cleared += 1;
            }
        }
        cleared
    }

    /// Iterate over (coordinate, tile) pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &Tile)> + '_ {
        let size = self.size;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (TileCoord::new(i as i32 % size, i as i32 / size), t))
    }
}
