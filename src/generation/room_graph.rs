//! # Room Graph
//!
//! Roguelike base layout: a lattice of nodes, each either a room or a cross-shaped
//! junction, joined by straight tunnels to their horizontal and vertical neighbours.
//!
//! The grid starts solid and everything is carved out of it. Rooms become the regions
//! that receive fill patterns; junctions and tunnels are merged into corridor regions
//! that only carry spawn metadata.

use crate::generation::patterns::{FillKind, FilledRegion, SpawnCategory};
use crate::{config, ArenaError, ArenaResult, LevelGrid, Location, Region};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomGraphParams {
    /// Nodes along each axis
    pub number_of_nodes: Location,
    /// Size of the cell each node is centered in
    pub max_room_size: Location,
    /// Nominal room size before variance
    pub room_dimensions: Location,
    pub room_x_variance: i32,
    pub room_y_variance: i32,
    /// Cells between neighbouring node cells
    pub tunnel_length: i32,
    pub tunnel_thickness: i32,
    /// Chance that a node is a room rather than a junction
    pub percent_rooms: f64,
}

impl Default for RoomGraphParams {
    fn default() -> Self {
        Self {
            number_of_nodes: Location::new(3, 3),
            max_room_size: Location::new(11, 9),
            room_dimensions: Location::new(9, 7),
            room_x_variance: 2,
            room_y_variance: 2,
            tunnel_length: 4,
            tunnel_thickness: 2,
            percent_rooms: 0.7,
        }
    }
}

impl RoomGraphParams {
    pub fn validate(&self) -> ArenaResult<()> {
        let positive = [
            ("number_of_nodes.x", self.number_of_nodes.x),
            ("number_of_nodes.y", self.number_of_nodes.y),
            ("max_room_size.x", self.max_room_size.x),
            ("max_room_size.y", self.max_room_size.y),
            ("room_dimensions.x", self.room_dimensions.x),
            ("room_dimensions.y", self.room_dimensions.y),
            ("tunnel_length", self.tunnel_length),
            ("tunnel_thickness", self.tunnel_thickness),
        ];
        for (name, value) in positive {
            if value < 1 {
                return Err(ArenaError::Config(format!(
                    "{name} must be at least 1, got {value}"
                )));
            }
        }
        if self.room_x_variance < 0 || self.room_y_variance < 0 {
            return Err(ArenaError::Config("Room variance cannot be negative".to_string()));
        }
        if self.tunnel_thickness > self.max_room_size.x.min(self.max_room_size.y) {
            return Err(ArenaError::Config(format!(
                "tunnel_thickness {} does not fit in a {}x{} room cell",
                self.tunnel_thickness, self.max_room_size.x, self.max_room_size.y
            )));
        }
        if !(self.percent_rooms > 0.0 && self.percent_rooms <= 1.0) {
            return Err(ArenaError::Config(format!(
                "percent_rooms must be in (0, 1], got {}",
                self.percent_rooms
            )));
        }
        Ok(())
    }

    /// Distance between the origins of neighbouring node cells.
    pub fn stride(&self) -> Location {
        Location::new(
            self.max_room_size.x + self.tunnel_length,
            self.max_room_size.y + self.tunnel_length,
        )
    }

    /// Grid size that fits every node, with border walls on non-wrapping axes and a
    /// full-length wrap tunnel on wrapping ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::{Location, RoomGraphParams};
    ///
    /// let params = RoomGraphParams::default();
    /// assert_eq!(params.required_size(false, false), Location::new(43, 37));
    /// assert_eq!(params.required_size(true, false), Location::new(45, 37));
    /// ```
    pub fn required_size(&self, wrap_x: bool, wrap_y: bool) -> Location {
        let axis = |nodes: i32, cell: i32, wrap: bool| {
            if wrap {
                nodes * (cell + self.tunnel_length)
            } else {
                nodes * cell + (nodes - 1) * self.tunnel_length + 2
            }
        };
        Location::new(
            axis(self.number_of_nodes.x, self.max_room_size.x, wrap_x),
            axis(self.number_of_nodes.y, self.max_room_size.y, wrap_y),
        )
    }

    /// First row or column of the tunnel band through a cell starting at `start`.
    fn band_start(&self, start: i32, cell: i32) -> i32 {
        start + (cell - self.tunnel_thickness) / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeShape {
    Room(Region),
    Junction,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    cell: Region,
    shape: NodeShape,
}

impl Node {
    fn is_room(&self) -> bool {
        matches!(self.shape, NodeShape::Room(_))
    }

    /// The area tunnels attach to: the room itself, or the whole cell for a junction.
    fn footprint(&self) -> Region {
        match self.shape {
            NodeShape::Room(room) => room,
            NodeShape::Junction => self.cell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Carve {
    Room(Region),
    Corridor(Region),
    Hole(Location),
}

/// State of one room-graph run: the planned carve operations and the resulting regions.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    params: RoomGraphParams,
    carves: Vec<Carve>,
    cursor: usize,
    rooms: Vec<Region>,
    corridors: Vec<Region>,
    room_count: usize,
}

impl RoomGraph {
    pub fn new(params: RoomGraphParams) -> Self {
        Self {
            params,
            carves: Vec::new(),
            cursor: 0,
            rooms: Vec::new(),
            corridors: Vec::new(),
            room_count: 0,
        }
    }

    pub fn params(&self) -> &RoomGraphParams {
        &self.params
    }

    /// Fills the grid solid and plans the graph, re-rolling until at least one node
    /// is a room.
    pub fn initialize(&mut self, grid: &mut LevelGrid, rng: &mut StdRng) -> ArenaResult<()> {
        grid.fill_all(true);
        self.carves.clear();
        self.cursor = 0;
        self.rooms.clear();
        self.corridors.clear();
        self.room_count = 0;

        for attempt in 1..=config::MAX_GRAPH_ATTEMPTS {
            let nodes = self.roll_nodes(grid, rng);
            if nodes.values().any(Node::is_room) {
                log::debug!(
                    "Room graph planned on attempt {} with {} nodes",
                    attempt,
                    nodes.len()
                );
                self.plan(grid, &nodes);
                return Ok(());
            }
            log::trace!("Room graph attempt {} produced no rooms", attempt);
        }
        Err(ArenaError::GenerationFailed(format!(
            "No room fits a {}x{} grid after {} attempts",
            grid.width(),
            grid.height(),
            config::MAX_GRAPH_ATTEMPTS
        )))
    }

    fn roll_nodes(&self, grid: &LevelGrid, rng: &mut StdRng) -> BTreeMap<(i32, i32), Node> {
        let params = &self.params;
        let stride = params.stride();
        let origin = Location::new(
            if grid.wrap_x() { 0 } else { 1 },
            if grid.wrap_y() { 0 } else { 1 },
        );
        let limit = Location::new(
            if grid.wrap_x() { grid.width() - 1 } else { grid.width() - 2 },
            if grid.wrap_y() { grid.height() - 1 } else { grid.height() - 2 },
        );

        let mut nodes = BTreeMap::new();
        for j in 0..params.number_of_nodes.y {
            for i in 0..params.number_of_nodes.x {
                let top_left = origin + Location::new(i * stride.x, j * stride.y);
                let cell = Region::with_cells(
                    top_left,
                    params.max_room_size.x,
                    params.max_room_size.y,
                );
                if cell.right() > limit.x || cell.bottom() > limit.y {
                    log::trace!("Dropping node ({}, {}): cell {:?} out of bounds", i, j, cell);
                    continue;
                }
                let shape = if rng.gen_bool(params.percent_rooms) {
                    NodeShape::Room(self.roll_room(&cell, rng))
                } else {
                    NodeShape::Junction
                };
                nodes.insert((i, j), Node { cell, shape });
            }
        }
        nodes
    }

    fn roll_room(&self, cell: &Region, rng: &mut StdRng) -> Region {
        let params = &self.params;
        let t = params.tunnel_thickness;
        let vx = params.room_x_variance;
        let vy = params.room_y_variance;
        let columns = (params.room_dimensions.x + rng.gen_range(-vx..=vx)).clamp(t, params.max_room_size.x);
        let rows = (params.room_dimensions.y + rng.gen_range(-vy..=vy)).clamp(t, params.max_room_size.y);
        Region::with_cells(
            Location::new(
                cell.left() + (params.max_room_size.x - columns) / 2,
                cell.top() + (params.max_room_size.y - rows) / 2,
            ),
            columns,
            rows,
        )
    }

    /// Queues every carve operation and records room and corridor regions.
    ///
    /// A tunnel gets a hole only at an end that meets a room. Tunnels and junction
    /// openings are merged into one corridor area, so a junction end needs no hole.
    fn plan(&mut self, grid: &LevelGrid, nodes: &BTreeMap<(i32, i32), Node>) {
        let params = self.params.clone();
        let t = params.tunnel_thickness;
        let mut corridor_pieces = Vec::new();

        for node in nodes.values() {
            match node.shape {
                NodeShape::Room(room) => {
                    self.carves.push(Carve::Room(room));
                    self.rooms.push(room);
                }
                NodeShape::Junction => {
                    for piece in self.junction_pieces(&node.cell) {
                        self.carves.push(Carve::Corridor(piece));
                        corridor_pieces.push(piece);
                    }
                }
            }
        }

        for (&(i, j), a) in nodes {
            // East neighbour, or the first node of the row across the wrap seam.
            let east = nodes
                .get(&(i + 1, j))
                .map(|b| (b, 0))
                .or_else(|| grid.wrap_x().then(|| nodes.get(&(0, j)).map(|b| (b, grid.width()))).flatten());
            if let Some((b, shift)) = east {
                let band = params.band_start(a.cell.top(), params.max_room_size.y);
                let start = a.footprint().right() + 1;
                let end = b.footprint().left() - 1 + shift;
                if start <= end {
                    let tunnel = Region::from_corners(
                        Location::new(start, band),
                        Location::new(end, band + t - 1),
                    );
                    let middle = band + (t - 1) / 2;
                    self.queue_tunnel(grid, tunnel, &mut corridor_pieces);
                    if a.is_room() {
                        self.queue_hole(grid, Location::new(start, middle));
                    }
                    if b.is_room() {
                        self.queue_hole(grid, Location::new(end, middle));
                    }
                }
            }

            let south = nodes
                .get(&(i, j + 1))
                .map(|b| (b, 0))
                .or_else(|| grid.wrap_y().then(|| nodes.get(&(i, 0)).map(|b| (b, grid.height()))).flatten());
            if let Some((b, shift)) = south {
                let band = params.band_start(a.cell.left(), params.max_room_size.x);
                let start = a.footprint().bottom() + 1;
                let end = b.footprint().top() - 1 + shift;
                if start <= end {
                    let tunnel = Region::from_corners(
                        Location::new(band, start),
                        Location::new(band + t - 1, end),
                    );
                    let middle = band + (t - 1) / 2;
                    self.queue_tunnel(grid, tunnel, &mut corridor_pieces);
                    if a.is_room() {
                        self.queue_hole(grid, Location::new(middle, start));
                    }
                    if b.is_room() {
                        self.queue_hole(grid, Location::new(middle, end));
                    }
                }
            }
        }

        self.corridors = merge_corridors(corridor_pieces);
        log::debug!(
            "Room graph: {} rooms, {} corridor regions, {} carve steps",
            self.rooms.len(),
            self.corridors.len(),
            self.carves.len()
        );
    }

    /// A junction's cross: the full-width bar plus the arms above and below it.
    fn junction_pieces(&self, cell: &Region) -> Vec<Region> {
        let params = &self.params;
        let t = params.tunnel_thickness;
        let band_top = params.band_start(cell.top(), params.max_room_size.y);
        let band_left = params.band_start(cell.left(), params.max_room_size.x);

        let mut pieces = vec![Region::new(cell.left(), band_top, cell.width, t - 1)];
        if band_top > cell.top() {
            pieces.push(Region::from_corners(
                Location::new(band_left, cell.top()),
                Location::new(band_left + t - 1, band_top - 1),
            ));
        }
        if band_top + t <= cell.bottom() {
            pieces.push(Region::from_corners(
                Location::new(band_left, band_top + t),
                Location::new(band_left + t - 1, cell.bottom()),
            ));
        }
        pieces
    }

    fn queue_tunnel(&mut self, grid: &LevelGrid, tunnel: Region, pieces: &mut Vec<Region>) {
        for piece in split_at_seam(&tunnel, grid.width(), grid.height()) {
            self.carves.push(Carve::Corridor(piece));
            pieces.push(piece);
        }
    }

    fn queue_hole(&mut self, grid: &LevelGrid, loc: Location) {
        if let Some(hole) = grid.normalize(loc) {
            self.carves.push(Carve::Hole(hole));
        }
    }

    /// Executes one queued carve. Returns whether more remain.
    pub fn iterate(&mut self, grid: &mut LevelGrid) -> bool {
        if let Some(carve) = self.carves.get(self.cursor).copied() {
            match carve {
                Carve::Room(region) | Carve::Corridor(region) => grid.fill_region(&region, false),
                Carve::Hole(loc) => grid.add_hole(loc),
            }
            self.cursor += 1;
        }
        self.cursor < self.carves.len()
    }

    /// Publishes rooms first, then corridors, into the generator's region list.
    pub fn before_fill(&mut self, regions: &mut Vec<Region>) {
        regions.clear();
        regions.extend(self.rooms.iter().copied());
        regions.extend(self.corridors.iter().copied());
        self.room_count = self.rooms.len();
    }

    /// Only rooms receive fill patterns.
    pub fn applies_patterns(&self, index: usize) -> bool {
        index < self.room_count
    }

    /// Gives every corridor region a tunnel fill with spawn candidates.
    pub fn after_fill(&self, regions: &[Region], filled: &mut Vec<FilledRegion>) {
        let team_candidates: usize = filled
            .iter()
            .map(|region| region.spawns(SpawnCategory::TeamBase).len())
            .sum();
        let suppress_teams = team_candidates >= config::MAX_TEAMS;
        if suppress_teams {
            log::debug!(
                "Rooms already offer {} team bases; corridors get none",
                team_candidates
            );
        }

        for (index, region) in regions.iter().enumerate().skip(self.room_count) {
            let mut tunnel = FilledRegion::new(*region, FillKind::Tunnel);
            tunnel.region_index = Some(index);
            tunnel.add_spawn(SpawnCategory::Waypoint, *region);
            tunnel.add_spawn(SpawnCategory::Enemy, *region);
            tunnel.add_spawn_cell(SpawnCategory::Powerup, region.center());
            if !suppress_teams {
                tunnel.add_spawn_cell(SpawnCategory::TeamBase, region.center());
            }
            filled.push(tunnel);
        }
    }
}

/// Splits a region that runs past the right or bottom edge of the grid into its
/// in-bounds part and the part that wraps to the opposite side.
fn split_at_seam(region: &Region, width: i32, height: i32) -> Vec<Region> {
    let mut pieces = vec![*region];
    for (limit, horizontal) in [(width, true), (height, false)] {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| {
                let (low, high) = if horizontal {
                    (piece.left(), piece.right())
                } else {
                    (piece.top(), piece.bottom())
                };
                let shift = if horizontal {
                    Location::new(-limit, 0)
                } else {
                    Location::new(0, -limit)
                };
                if high < limit {
                    vec![piece]
                } else if low >= limit {
                    vec![piece.translate(shift)]
                } else if horizontal {
                    vec![
                        Region::from_corners(piece.top_left(), Location::new(limit - 1, piece.bottom())),
                        Region::from_corners(Location::new(0, piece.top()), Location::new(high - limit, piece.bottom())),
                    ]
                } else {
                    vec![
                        Region::from_corners(piece.top_left(), Location::new(piece.right(), limit - 1)),
                        Region::from_corners(Location::new(piece.left(), 0), Location::new(piece.right(), high - limit)),
                    ]
                }
            })
            .collect();
    }
    pieces
}

/// Repeatedly merges pairs of pieces that form a single rectangle.
fn merge_corridors(mut pieces: Vec<Region>) -> Vec<Region> {
    loop {
        let mut merged = None;
        'search: for i in 0..pieces.len() {
            for j in i + 1..pieces.len() {
                if let Some(combined) = Region::combine(&pieces[i], &pieces[j]) {
                    merged = Some((i, j, combined));
                    break 'search;
                }
            }
        }
        match merged {
            Some((i, j, combined)) => {
                pieces[i] = combined;
                pieces.remove(j);
            }
            None => return pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn all_rooms(nodes: Location) -> RoomGraphParams {
        RoomGraphParams {
            number_of_nodes: nodes,
            percent_rooms: 1.0,
            ..Default::default()
        }
    }

    fn run(params: &RoomGraphParams, wrap_x: bool, seed: u64) -> (LevelGrid, RoomGraph, Vec<Region>) {
        let size = params.required_size(wrap_x, false);
        let mut grid = LevelGrid::new(size.x, size.y, wrap_x, false);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = RoomGraph::new(params.clone());
        graph.initialize(&mut grid, &mut rng).unwrap();
        while graph.iterate(&mut grid) {}
        let mut regions = Vec::new();
        graph.before_fill(&mut regions);
        (grid, graph, regions)
    }

    #[test]
    fn test_two_by_two_rooms_have_four_tunnels() {
        let params = all_rooms(Location::new(2, 2));
        let (grid, graph, regions) = run(&params, false, 9);
        assert_eq!(graph.rooms.len(), 4);
        assert_eq!(graph.corridors.len(), 4);
        assert_eq!(regions.len(), 8);
        // Each tunnel between two rooms ends in a hole on both sides.
        assert_eq!(grid.holes().len(), 8);
        assert!(grid.is_connected());
        assert!((0..4).all(|i| graph.applies_patterns(i)));
        assert!(!graph.applies_patterns(4));
    }

    #[test]
    fn test_junctions_merge_with_their_tunnels() {
        let params = RoomGraphParams {
            number_of_nodes: Location::new(3, 1),
            percent_rooms: 1.0,
            ..Default::default()
        };
        let size = params.required_size(false, false);
        let grid = LevelGrid::new(size.x, size.y, false, false);
        let mut graph = RoomGraph::new(params.clone());
        let stride = params.stride();
        let mut nodes = BTreeMap::new();
        for i in 0..3 {
            let cell = Region::with_cells(
                Location::new(1 + i * stride.x, 1),
                params.max_room_size.x,
                params.max_room_size.y,
            );
            let shape = if i == 1 {
                NodeShape::Junction
            } else {
                NodeShape::Room(cell.inflate(-1, -1))
            };
            nodes.insert((i, 0), Node { cell, shape });
        }
        graph.plan(&grid, &nodes);

        // Tunnel + bar + tunnel fuse into one band; the two arms stay separate.
        assert_eq!(graph.corridors.len(), 3);
        let band = graph
            .corridors
            .iter()
            .max_by_key(|region| region.columns())
            .unwrap();
        assert_eq!(band.left(), nodes[&(0, 0)].footprint().right() + 1);
        assert_eq!(band.right(), nodes[&(2, 0)].footprint().left() - 1);
        assert_eq!(band.rows(), params.tunnel_thickness);
    }

    #[test]
    fn test_holes_only_where_tunnels_meet_rooms() {
        let params = all_rooms(Location::new(3, 1));
        let size = params.required_size(false, false);
        let grid = LevelGrid::new(size.x, size.y, false, false);
        let mut graph = RoomGraph::new(params.clone());
        let stride = params.stride();
        let mut nodes = BTreeMap::new();
        for i in 0..3 {
            let cell = Region::with_cells(
                Location::new(1 + i * stride.x, 1),
                params.max_room_size.x,
                params.max_room_size.y,
            );
            let shape = if i == 1 {
                NodeShape::Junction
            } else {
                NodeShape::Room(cell.inflate(-1, -1))
            };
            nodes.insert((i, 0), Node { cell, shape });
        }
        graph.plan(&grid, &nodes);

        let holes: Vec<Location> = graph
            .carves
            .iter()
            .filter_map(|carve| match carve {
                Carve::Hole(loc) => Some(*loc),
                _ => None,
            })
            .collect();
        // Two tunnels, each with one room end and one junction end.
        assert_eq!(holes.len(), 2);
        for hole in holes {
            assert!(graph
                .rooms
                .iter()
                .any(|room| hole.neighbors4().iter().any(|n| room.contains(*n))));
        }
    }

    #[test]
    fn test_wrap_tunnel_is_split_at_seam() {
        let params = RoomGraphParams {
            room_x_variance: 0,
            ..all_rooms(Location::new(2, 1))
        };
        let (grid, graph, _) = run(&params, true, 2);
        // Direct tunnel plus the wrap tunnel cut in two by the seam.
        assert_eq!(graph.corridors.len(), 3);
        assert!(graph.corridors.iter().any(|r| r.left() == 0));
        assert!(graph.corridors.iter().any(|r| r.right() == grid.width() - 1));
        assert!(grid.is_connected());
    }

    #[test]
    fn test_out_of_bounds_nodes_are_dropped() {
        let params = all_rooms(Location::new(3, 3));
        let size = params.required_size(false, false);
        let mut grid = LevelGrid::new(size.x - 5, size.y, false, false);
        let mut rng = StdRng::seed_from_u64(1);
        let mut graph = RoomGraph::new(params);
        graph.initialize(&mut grid, &mut rng).unwrap();
        assert_eq!(graph.rooms.len(), 6);
    }

    #[test]
    fn test_no_room_fits_is_an_error() {
        let params = all_rooms(Location::new(1, 1));
        let mut grid = LevelGrid::new(5, 5, false, false);
        let mut rng = StdRng::seed_from_u64(1);
        let mut graph = RoomGraph::new(params);
        assert!(matches!(
            graph.initialize(&mut grid, &mut rng),
            Err(ArenaError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_corridor_team_bases_suppressed_when_rooms_suffice() {
        let params = all_rooms(Location::new(2, 2));
        let (_, graph, regions) = run(&params, false, 3);
        let mut filled: Vec<FilledRegion> = (0..4)
            .map(|i| {
                let mut room = FilledRegion::new(regions[i], FillKind::Blank);
                room.add_spawn_cell(SpawnCategory::TeamBase, regions[i].center());
                room
            })
            .collect();
        graph.after_fill(&regions, &mut filled);
        assert_eq!(filled.len(), 8);
        assert!(filled[4..].iter().all(|f| f.kind == FillKind::Tunnel));
        assert!(filled[4..].iter().all(|f| f.has_spawns(SpawnCategory::TeamBase)));

        let mut crowded: Vec<FilledRegion> = (0..4)
            .map(|i| {
                let mut room = FilledRegion::new(regions[i], FillKind::Blank);
                for cell in regions[i].cells().take(2) {
                    room.add_spawn_cell(SpawnCategory::TeamBase, cell);
                }
                room
            })
            .collect();
        graph.after_fill(&regions, &mut crowded);
        assert!(crowded[4..].iter().all(|f| !f.has_spawns(SpawnCategory::TeamBase)));
    }

    #[test]
    fn test_split_at_seam() {
        let pieces = split_at_seam(&Region::new(8, 2, 4, 1), 10, 10);
        assert_eq!(pieces, vec![Region::new(8, 2, 1, 1), Region::new(0, 2, 2, 1)]);
        assert_eq!(split_at_seam(&Region::new(2, 2, 3, 3), 10, 10), vec![Region::new(2, 2, 3, 3)]);
    }
}
