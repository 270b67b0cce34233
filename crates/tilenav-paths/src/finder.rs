//! A* search over a [`MapTilePath`].

use std::collections::BinaryHeap;

use tilenav_core::CoordTile;

use crate::heuristic::{Heuristic, Manhattan};
use crate::map_path::MapTilePath;
use crate::movement::MovementTile;
use crate::mover::Mover;
use crate::node::{NO_PARENT, Node, NodeRef};
use crate::path::Path;

/// A* path finder for one map.
///
/// The finder owns its node array and open list and reuses them across
/// queries, so repeated searches do not allocate after warm-up. Searches
/// take `&mut self`: one finder serves one query at a time.
///
/// Moving from a tile costs the movement cost of that tile's category for
/// the mover: cost is charged for the tile being left, not the one entered.
pub struct PathFinder<H = Manhattan> {
    width: i32,
    height: i32,
    max_search_distance: u32,
    heuristic: H,
    nodes: Vec<Node>,
    generation: u32,
    seq: u64,
    open: BinaryHeap<NodeRef>,
}

impl<H: Heuristic> PathFinder<H> {
    /// Create a finder sized for `map`.
    ///
    /// A search gives up once a node `max_search_distance` steps away from
    /// the start has been discovered without reaching the goal.
    pub fn new(map: &MapTilePath, max_search_distance: u32, heuristic: H) -> Self {
        let width = map.in_tile_width();
        let height = map.in_tile_height();
        Self {
            width,
            height,
            max_search_distance,
            heuristic,
            nodes: vec![Node::default(); (width * height).max(0) as usize],
            generation: 0,
            seq: 0,
            open: BinaryHeap::new(),
        }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    pub fn set_heuristic(&mut self, heuristic: H) {
        self.heuristic = heuristic;
    }

    pub fn max_search_distance(&self) -> u32 {
        self.max_search_distance
    }

    pub fn set_max_search_distance(&mut self, distance: u32) {
        self.max_search_distance = distance;
    }

    /// Find a path for `mover` from its current tile to `(dtx, dty)`.
    ///
    /// With `ignore_ref`, tiles occupied by other objects are treated as free.
    /// Every step keeps the mover's whole footprint on unblocked tiles.
    ///
    /// A blocked destination next to (or under) the mover fails at once. A
    /// blocked destination farther away is replaced by the closest available
    /// tile around it, within the map's search radius, and the search runs
    /// against that tile. Returns `None` when no path exists or the search
    /// exceeds the maximum distance.
    pub fn find_path<M: Mover + ?Sized>(
        &mut self,
        map: &MapTilePath,
        mover: &M,
        dtx: i32,
        dty: i32,
        ignore_ref: bool,
    ) -> Option<Path> {
        self.fit(map);
        let start = mover.in_tile();
        if !map.contains(dtx, dty) || !map.contains(start.x, start.y) {
            log::debug!("mover {}: destination ({dtx}, {dty}) outside the map", mover.id());
            return None;
        }

        let mut target = CoordTile::new(dtx, dty);
        let mut last: Option<CoordTile> = None;
        while map.is_footprint_blocked(mover, target.x, target.y, ignore_ref) {
            if start.chebyshev(target) <= 1 {
                log::debug!("mover {}: blocked destination {target} is adjacent", mover.id());
                return None;
            }
            let substitute = map.closest_available_tile(
                mover,
                target.x,
                target.y,
                mover.in_tile_width(),
                mover.in_tile_height(),
                start.x,
                start.y,
                mover.in_tile_width(),
                mover.in_tile_height(),
                map.in_tile_radius(),
            )?;
            if last == Some(substitute) {
                return None;
            }
            log::debug!("mover {}: destination {target} blocked, trying {substitute}", mover.id());
            last = Some(substitute);
            target = substitute;
        }

        let path = self.search(map, mover, start, target, ignore_ref);
        match &path {
            Some(p) => log::debug!("mover {}: path {start} -> {target} in {} steps", mover.id(), p.len()),
            None => log::debug!("mover {}: no path {start} -> {target}", mover.id()),
        }
        path
    }

    // -----------------------------------------------------------------------
    // Search internals
    // -----------------------------------------------------------------------

    /// Resize the node cache when the map size changed.
    fn fit(&mut self, map: &MapTilePath) {
        if map.in_tile_width() == self.width && map.in_tile_height() == self.height {
            return;
        }
        self.width = map.in_tile_width();
        self.height = map.in_tile_height();
        self.nodes.clear();
        self.nodes
            .resize((self.width * self.height).max(0) as usize, Node::default());
        self.generation = 0;
    }

    #[inline]
    fn idx(&self, p: CoordTile) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    #[inline]
    fn point(&self, idx: usize) -> CoordTile {
        let w = self.width as usize;
        CoordTile::new((idx % w) as i32, (idx / w) as i32)
    }

    fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale nodes would look current, so reset them all.
            for n in self.nodes.iter_mut() {
                n.reset(0);
            }
            self.generation = 1;
        }
        self.generation
    }

    fn search<M: Mover + ?Sized>(
        &mut self,
        map: &MapTilePath,
        mover: &M,
        start: CoordTile,
        goal: CoordTile,
        ignore_ref: bool,
    ) -> Option<Path> {
        let start_idx = self.idx(start)?;
        let goal_idx = self.idx(goal)?;

        if start_idx == goal_idx {
            let mut path = Path::new();
            path.prepend_step(start.x, start.y);
            return Some(path);
        }

        let cur_gen = self.next_generation();
        self.open.clear();
        self.seq += 1;
        {
            let node = &mut self.nodes[start_idx];
            node.reset(cur_gen);
            node.cost = 0.0;
            node.heuristic = self.heuristic.cost(start.x, start.y, goal.x, goal.y);
            node.seq = self.seq;
            node.open = true;
            self.open.push(NodeRef {
                idx: start_idx,
                total: node.total(),
                seq: node.seq,
            });
        }

        let mut max_depth = 0;
        while max_depth < self.max_search_distance {
            let Some(current) = self.open.pop() else {
                break;
            };
            let ci = current.idx;

            // Skip stale entries.
            let node = &self.nodes[ci];
            if node.generation != cur_gen || !node.open || node.seq != current.seq {
                continue;
            }

            if ci == goal_idx {
                break;
            }

            let node = &mut self.nodes[ci];
            node.open = false;
            node.closed = true;
            max_depth = max_depth.max(self.expand(map, mover, ci, goal, ignore_ref));
        }

        let goal_node = &self.nodes[goal_idx];
        if goal_node.generation != cur_gen || goal_node.parent == NO_PARENT {
            return None;
        }

        let mut path = Path::new();
        let mut ci = goal_idx;
        while ci != start_idx && ci != NO_PARENT {
            let p = self.point(ci);
            path.prepend_step(p.x, p.y);
            ci = self.nodes[ci].parent;
        }
        path.prepend_step(start.x, start.y);
        Some(path)
    }

    /// Queue the neighbours of node `ci` that improve on their recorded
    /// cost. Returns the deepest depth assigned.
    fn expand<M: Mover + ?Sized>(
        &mut self,
        map: &MapTilePath,
        mover: &M,
        ci: usize,
        goal: CoordTile,
        ignore_ref: bool,
    ) -> u32 {
        let cp = self.point(ci);
        let Some(category) = map.category(cp.x, cp.y) else {
            return 0;
        };
        let step_cost = match map.cost(mover, cp.x, cp.y) {
            Ok(cost) => cost,
            Err(err) => {
                log::warn!("mover {}: {err} at {cp}, not leaving the tile", mover.id());
                return 0;
            }
        };
        let cur_gen = self.generation;
        let tentative = self.nodes[ci].cost + step_cost;
        let depth = self.nodes[ci].depth + 1;
        let mut max_depth = 0;

        for movement in MovementTile::DIRECTIONS {
            let (dx, dy) = movement.delta();
            let np = cp.shift(dx, dy);
            let Some(ni) = self.idx(np) else {
                continue;
            };
            if !mover.is_movement_allowed(category, movement)
                || map.is_footprint_blocked(mover, np.x, np.y, ignore_ref)
            {
                continue;
            }

            let n = &mut self.nodes[ni];
            if n.generation != cur_gen {
                n.reset(cur_gen);
            }
            if tentative < n.cost {
                // Better route found: drop it from open/closed so it is
                // queued again below.
                n.open = false;
                n.closed = false;
            }
            if n.open || n.closed {
                continue;
            }

            self.seq += 1;
            n.cost = tentative;
            n.heuristic = self.heuristic.cost(np.x, np.y, goal.x, goal.y);
            n.parent = ci;
            n.depth = depth;
            n.seq = self.seq;
            n.open = true;
            self.open.push(NodeRef {
                idx: ni,
                total: n.total(),
                seq: n.seq,
            });
            max_depth = max_depth.max(depth);
        }
        max_depth
    }
}

#[cfg(test)]
mod tests {
    use tilenav_core::{MapTileGroup, TileMap};

    use super::*;
    use crate::config::PathConfig;
    use crate::data::{PathCategory, PathData};
    use crate::heuristic::Euclidean;
    use crate::map_path::testing::{GROUND, WALL, map_from_ascii};
    use crate::mover::testing::TestMover;

    fn walker(x: i32, y: i32) -> TestMover {
        TestMover::new(1, x, y)
            .with_data(PathData::walkable("ground", 1.0))
            .with_data(PathData::blocking("wall"))
    }

    fn orthogonal(x: i32, y: i32) -> TestMover {
        TestMover::new(1, x, y)
            .with_data(PathData::new(
                "ground",
                1.0,
                false,
                [MovementTile::Up, MovementTile::Down, MovementTile::Left, MovementTile::Right],
            ))
            .with_data(PathData::blocking("wall"))
    }

    fn steps(path: &Path) -> Vec<(i32, i32)> {
        path.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn diagonal_path_on_open_ground() {
        let map = map_from_ascii(&["...", "...", "..."]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &walker(0, 0), 2, 2, false).unwrap();
        assert_eq!(steps(&path), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn orthogonal_only_path() {
        let map = map_from_ascii(&["...", "...", "..."]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &orthogonal(0, 0), 2, 2, false).unwrap();
        assert_eq!(path.len(), 5);
        for w in steps(&path).windows(2) {
            let d = (w[1].0 - w[0].0).abs() + (w[1].1 - w[0].1).abs();
            assert_eq!(d, 1);
        }
    }

    #[test]
    fn path_to_own_tile() {
        let map = map_from_ascii(&["..", ".."]);
        let mut finder = PathFinder::new(&map, 8, Euclidean);
        let path = finder.find_path(&map, &walker(1, 0), 1, 0, false).unwrap();
        assert_eq!(steps(&path), vec![(1, 0)]);
    }

    #[test]
    fn routes_around_walls() {
        let map = map_from_ascii(&[
            ".....",
            ".###.",
            ".#...",
            ".#.#.",
            ".....",
        ]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let mover = walker(2, 1);
        let path = finder.find_path(&map, &mover, 0, 4, false).unwrap();
        assert_eq!(path.first(), Some(CoordTile::new(2, 1)));
        assert_eq!(path.last(), Some(CoordTile::new(0, 4)));
        for p in path.iter() {
            assert_eq!(map.category(p.x, p.y), Some("ground"));
        }
    }

    #[test]
    fn unreachable_goal() {
        let map = map_from_ascii(&[".#.", ".#.", ".#."]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        assert!(finder.find_path(&map, &walker(0, 0), 2, 0, false).is_none());
        assert!(finder.find_path(&map, &walker(0, 0), 7, 0, false).is_none());
    }

    #[test]
    fn adjacent_blocked_destination_fails() {
        let mut map = map_from_ascii(&["...", "...", "..."]);
        map.add_object_id(1, 1, 9);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let mover = walker(0, 0);
        assert!(finder.find_path(&map, &mover, 1, 1, false).is_none());
        // ignoring occupants makes it reachable
        let path = finder.find_path(&map, &mover, 1, 1, true).unwrap();
        assert_eq!(path.last(), Some(CoordTile::new(1, 1)));
    }

    #[test]
    fn far_blocked_destination_redirects() {
        let mut map = map_from_ascii(&["......", "......", "......"]);
        map.add_object_id(5, 1, 9);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let path = finder.find_path(&map, &walker(0, 1), 5, 1, false).unwrap();
        assert_eq!(path.first(), Some(CoordTile::new(0, 1)));
        assert_eq!(path.last(), Some(CoordTile::new(4, 1)));
    }

    #[test]
    fn wall_destination_redirects_to_closest_ground() {
        let map = map_from_ascii(&["....#", "....#", "....#"]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let path = finder.find_path(&map, &walker(0, 1), 4, 1, false).unwrap();
        assert_eq!(path.last(), Some(CoordTile::new(3, 1)));
    }

    #[test]
    fn redirect_stays_within_the_map_radius() {
        let mut tiles = TileMap::new(8, 1, 16, 16);
        for tx in 0..8 {
            tiles.set_tile(tx, 0, if tx < 4 { GROUND } else { WALL });
        }
        let groups = MapTileGroup::new()
            .with_group("ground", [GROUND])
            .with_group("wall", [WALL]);
        let config = PathConfig::new(vec![
            PathCategory::new("ground", ["ground"]),
            PathCategory::new("wall", ["wall"]),
        ]);

        let map = MapTilePath::new(&tiles, &groups, &config).unwrap();
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let path = finder.find_path(&map, &walker(0, 0), 7, 0, false).unwrap();
        assert_eq!(path.last(), Some(CoordTile::new(3, 0)));

        tiles.set_in_tile_radius(3);
        let map = MapTilePath::new(&tiles, &groups, &config).unwrap();
        assert_eq!(map.in_tile_radius(), 3);
        assert!(finder.find_path(&map, &walker(0, 0), 7, 0, false).is_none());
    }

    #[test]
    fn large_mover_stays_on_the_map() {
        let map = map_from_ascii(&["....", "...."]);
        let mut mover = walker(0, 0);
        mover.size = (2, 2);
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &mover, 3, 1, false).unwrap();
        assert_eq!(steps(&path), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn tall_mover_squeezes_past_walls_only_where_it_fits() {
        let map = map_from_ascii(&["....", "....", "..#.", "...."]);
        let mut mover = walker(0, 0);
        mover.size = (1, 2);
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &mover, 3, 0, false).unwrap();
        assert_eq!(path.last(), Some(CoordTile::new(3, 0)));
        // the only column-2 position clear of the wall and the map top
        assert!(steps(&path).contains(&(2, 2)));
        for p in path.iter() {
            assert!(!map.is_footprint_blocked(&mover, p.x, p.y, false), "{p} is blocked");
        }
    }

    #[test]
    fn search_distance_bound() {
        let map = map_from_ascii(&["........"]);
        let mut finder = PathFinder::new(&map, 3, Manhattan::default());
        assert!(finder.find_path(&map, &walker(0, 0), 7, 0, false).is_none());
        assert!(finder.find_path(&map, &walker(0, 0), 3, 0, false).is_some());
        finder.set_max_search_distance(16);
        assert_eq!(finder.find_path(&map, &walker(0, 0), 7, 0, false).unwrap().len(), 8);
    }

    #[test]
    fn expensive_tiles_are_avoided() {
        let map = map_from_ascii(&[".....", ".mmm.", "....."]);
        let mover = walker(0, 1).with_data(PathData::walkable("mud", 10.0));
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &mover, 4, 1, false).unwrap();
        assert_eq!(path.len(), 5);
        assert!(path.iter().all(|p| map.category(p.x, p.y) == Some("ground")));
    }

    #[test]
    fn cost_is_charged_when_leaving_a_tile() {
        // Starting on mud costs the same whatever the route, so the cheapest
        // route is still the straight one over ground.
        let map = map_from_ascii(&["m...."]);
        let mover = TestMover::new(1, 0, 0)
            .with_data(PathData::new("ground", 1.0, false, [MovementTile::Right]))
            .with_data(PathData::new("mud", 10.0, false, [MovementTile::Right]));
        let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
        let path = finder.find_path(&map, &mover, 4, 0, false).unwrap();
        assert_eq!(path.len(), 5);

        // Ending on mud is free: its cost is only charged when leaving it.
        let map = map_from_ascii(&["....m"]);
        let path = finder.find_path(&map, &mover, 4, 0, false).unwrap();
        assert_eq!(path.last(), Some(CoordTile::new(4, 0)));
    }

    #[test]
    fn unknown_category_is_not_left() {
        let map = map_from_ascii(&["..."]);
        let mover = TestMover::new(1, 0, 0).with_data(PathData::blocking("wall"));
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        assert!(finder.find_path(&map, &mover, 2, 0, false).is_none());
    }

    #[test]
    fn repeated_queries_reuse_nodes() {
        let map = map_from_ascii(&["....", "....", "....", "...."]);
        let mut finder = PathFinder::new(&map, 64, Manhattan::default());
        let first = finder.find_path(&map, &walker(0, 0), 3, 3, false).unwrap();
        let _ = finder.find_path(&map, &walker(3, 0), 0, 3, false).unwrap();
        let again = finder.find_path(&map, &walker(0, 0), 3, 3, false).unwrap();
        assert_eq!(first, again);
        assert_eq!(finder.nodes.len(), 16);
    }
}
