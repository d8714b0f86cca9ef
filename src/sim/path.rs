//! Reusable breadth-first flood fill over the tile grid
//!
//! Visited state is a grid of generation stamps rather than booleans: a cell
//! counts as visited only if its stamp equals the current generation, so
//! starting a new search is a counter increment instead of a buffer clear.
//! Walls are never stamped; [`Pathfinder::push`] rejects them on sight.

use glam::Vec2;

use super::map::{Map, TileCoord};

/// Cardinal neighbor offsets in discovery order. Tie-breaks between equally
/// distant cells follow this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// What a flood-fill visitor wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// BFS scratch buffers, sized once for a map
#[derive(Debug, Clone)]
pub struct Pathfinder {
    size: i32,
    generation: u32,
    visited: Vec<u32>,
    queue: Vec<TileCoord>,
    head: usize,
}

impl Pathfinder {
    /// Allocate scratch buffers for a `size`×`size` map
    pub fn new(size: i32) -> Self {
        let cells = (size.max(0) as usize).pow(2);
        Self {
            size: size.max(0),
            generation: 0,
            visited: vec![0; cells],
            queue: Vec::with_capacity(cells),
            head: 0,
        }
    }

    pub fn for_map(map: &Map) -> Self {
        Self::new(map.size())
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[inline]
    fn index(&self, cell: TileCoord) -> Option<usize> {
        (cell.x >= 0 && cell.x < self.size && cell.y >= 0 && cell.y < self.size)
            .then(|| (cell.y * self.size + cell.x) as usize)
    }

    /// Start a new search at `source`.
    ///
    /// The source is stamped and enqueued even when it is a wall, so a search
    /// may start from a wall being dug. An off-map source leaves the queue
    /// empty.
    pub fn init(&mut self, source: TileCoord) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // stamps from 2^32 searches ago would alias the new generation
            self.visited.fill(0);
            self.generation = 1;
        }
        self.queue.clear();
        self.head = 0;

        if let Some(i) = self.index(source) {
            self.visited[i] = self.generation;
            self.queue.push(source);
        }
    }

    /// Enqueue `cell` if it is traversable and not yet visited this search
    pub fn push(&mut self, map: &Map, cell: TileCoord) -> bool {
        if !map.is_traversable(cell.x, cell.y) {
            return false;
        }
        let Some(i) = self.index(cell) else {
            return false;
        };
        if self.visited[i] == self.generation {
            return false;
        }
        self.visited[i] = self.generation;
        self.queue.push(cell);
        true
    }

    /// Dequeue the oldest cell
    pub fn pop(&mut self) -> Option<TileCoord> {
        let cell = self.queue.get(self.head).copied()?;
        self.head += 1;
        Some(cell)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head >= self.queue.len()
    }

    /// Whether `cell` was reached by the current search
    pub fn is_visited(&self, cell: TileCoord) -> bool {
        self.index(cell).is_some_and(|i| self.visited[i] == self.generation)
    }

    /// Flood outward from `source`.
    ///
    /// `visit(from, next)` is called for every on-map neighbor of each dequeued
    /// cell, walls included, before `next` is pushed. Returning [`Flow::Stop`]
    /// ends the search; the return value is the `(from, next)` pair that stopped it.
    pub fn flood<F>(
        &mut self,
        map: &Map,
        source: TileCoord,
        mut visit: F,
    ) -> Option<(TileCoord, TileCoord)>
    where
        F: FnMut(TileCoord, TileCoord) -> Flow,
    {
        self.init(source);
        while let Some(cell) = self.pop() {
            for offset in NEIGHBOR_OFFSETS {
                let next = cell.offset(offset);
                if !map.in_bounds(next.x, next.y) {
                    continue;
                }
                if visit(cell, next) == Flow::Stop {
                    return Some((cell, next));
                }
                self.push(map, next);
            }
        }
        None
    }

    /// Flood the whole region connected to `source` without a visitor.
    /// Afterwards [`Self::is_visited`] answers reachability from `source`.
    pub fn flood_region(&mut self, map: &Map, source: TileCoord) {
        self.flood(map, source, |_, _| Flow::Continue);
    }

    /// True when `to` can be reached from `from` through traversable tiles
    pub fn is_reachable(&mut self, map: &Map, from: TileCoord, to: TileCoord) -> bool {
        if !map.is_traversable(from.x, from.y) || !map.is_traversable(to.x, to.y) {
            return false;
        }
        if from == to {
            return true;
        }
        self.flood(map, from, |_, next| {
            if next == to && map.is_traversable(next.x, next.y) {
                Flow::Stop
            } else {
                Flow::Continue
            }
        })
        .is_some()
    }

    /// Unit vector steering a mover at `pos` one step along a shortest route
    /// to `goal`, or zero when there is no route.
    ///
    /// The flood runs from the goal; the first dequeued cell that has the
    /// mover's cell as a neighbor is the next step. The goal itself may be a
    /// wall (a tile being dug), the mover's cell must be open.
    pub fn direction_towards(&mut self, map: &Map, pos: Vec2, goal: TileCoord) -> Vec2 {
        let start = TileCoord::from_world(pos);
        if !map.in_bounds(goal.x, goal.y) || !map.is_traversable(start.x, start.y) {
            return Vec2::ZERO;
        }
        if start == goal {
            return (goal.center() - pos).normalize_or_zero();
        }
        match self.flood(map, goal, |_, next| {
            if next == start {
                Flow::Stop
            } else {
                Flow::Continue
            }
        }) {
            Some((step, _)) => (step.center() - pos).normalize_or_zero(),
            None => Vec2::ZERO,
        }
    }
}
