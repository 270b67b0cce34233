//! Step-by-step mover driven along paths found by a [`PathFinder`].
//!
//! A [`Pathfindable`] is idle until given a destination. It then walks its
//! path one tile at a time: at each tile boundary it checks the next step
//! against the occupancy map, claims it, and interpolates its pixel position
//! toward it over the following updates.

use std::collections::{HashMap, HashSet};

use tilenav_core::{CoordTile, Range};

use crate::config::MoverConfig;
use crate::data::PathData;
use crate::error::PathError;
use crate::finder::PathFinder;
use crate::heuristic::Heuristic;
use crate::map_path::MapTilePath;
use crate::movement::MovementTile;
use crate::mover::{Mover, ObjectId};
use crate::path::Path;

/// Speed multiplier applied on diagonal steps.
pub const DIAGONAL_SPEED_FACTOR: f64 = 0.8;

/// Observer of a mover's progress.
///
/// Listeners are called synchronously, in registration order. They receive
/// plain values and cannot reach back into the mover during dispatch.
pub trait PathfindableListener {
    /// A new destination was accepted and movement starts from `from`.
    fn notify_start_move(&mut self, id: ObjectId, from: CoordTile, destination: CoordTile) {
        let _ = (id, from, destination);
    }

    /// The mover committed to the step from `old` to `new`.
    fn notify_moving(&mut self, id: ObjectId, old: CoordTile, new: CoordTile) {
        let _ = (id, old, new);
    }

    /// The mover stopped at `tile`, at its destination or as close as it
    /// could get.
    fn notify_arrived(&mut self, id: ObjectId, tile: CoordTile) {
        let _ = (id, tile);
    }
}

/// A mover following paths over a [`MapTilePath`].
///
/// Pixel positions are tile coordinates times the map's tile size, so the
/// pixel origin of tile `(tx, ty)` is `(tx * tile_width, ty * tile_height)`.
pub struct Pathfindable {
    id: ObjectId,
    data: HashMap<String, PathData>,
    size: (i32, i32),
    x: f64,
    y: f64,
    speed_x: f64,
    speed_y: f64,
    move_x: f64,
    move_y: f64,
    tile: CoordTile,
    /// Step being travelled to; `None` at a tile boundary.
    target: Option<CoordTile>,
    path: Option<Path>,
    /// Index of the last step reached.
    current_step: usize,
    destination: Option<CoordTile>,
    orientation: MovementTile,
    ignored_ids: HashSet<ObjectId>,
    shared_path_ids: HashSet<ObjectId>,
    destination_reached: bool,
    path_stopped: bool,
    path_stopped_requested: bool,
    moving: bool,
    path_found_changed: bool,
    recheck_pending: bool,
    listeners: Vec<Box<dyn PathfindableListener>>,
}

impl Pathfindable {
    /// Create an idle mover at tile `(0, 0)` with the traversal data of
    /// `config`. The mover claims no tile until [`set_location`](Self::set_location).
    ///
    /// Fails on an invalid cost or a repeated category.
    pub fn new(id: ObjectId, config: &MoverConfig) -> Result<Self, PathError> {
        config.validate()?;
        Ok(Self::with_data(id, config))
    }

    /// Like [`new`](Self::new), and also fails when `config` uses a category
    /// that `map` does not define.
    pub fn on_map(id: ObjectId, config: &MoverConfig, map: &MapTilePath) -> Result<Self, PathError> {
        map.validate_mover(config)?;
        Ok(Self::with_data(id, config))
    }

    fn with_data(id: ObjectId, config: &MoverConfig) -> Self {
        Self {
            id,
            data: config
                .data
                .iter()
                .map(|d| (d.name().to_string(), d.clone()))
                .collect(),
            size: (1, 1),
            x: 0.0,
            y: 0.0,
            speed_x: 1.0,
            speed_y: 1.0,
            move_x: 0.0,
            move_y: 0.0,
            tile: CoordTile::default(),
            target: None,
            path: None,
            current_step: 0,
            destination: None,
            orientation: MovementTile::None,
            ignored_ids: HashSet::new(),
            shared_path_ids: HashSet::new(),
            destination_reached: false,
            path_stopped: false,
            path_stopped_requested: false,
            moving: false,
            path_found_changed: false,
            recheck_pending: false,
            listeners: Vec::new(),
        }
    }

    /// Set the footprint in tiles. Values below one are raised to one.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = (width.max(1), height.max(1));
        self
    }

    pub fn add_listener(&mut self, listener: Box<dyn PathfindableListener>) {
        self.listeners.push(listener);
    }

    /// Place the mover on `(tx, ty)`, cancelling any path.
    ///
    /// The previous claim is released and the footprint at the new tile is
    /// claimed.
    pub fn set_location(&mut self, map: &mut MapTilePath, tx: i32, ty: i32) {
        map.remove_object_ids(self.claimed_area(), self.id);
        self.tile = CoordTile::new(tx, ty);
        self.x = f64::from(tx * map.tile_width());
        self.y = f64::from(ty * map.tile_height());
        self.target = None;
        self.path = None;
        self.current_step = 0;
        self.move_x = 0.0;
        self.move_y = 0.0;
        self.moving = false;
        self.path_found_changed = false;
        self.recheck_pending = false;
        map.add_object_ids(self.footprint(), self.id);
    }

    /// Speed in pixels per update at `extrp == 1`. Negative values are
    /// taken by magnitude.
    pub fn set_speed(&mut self, speed_x: f64, speed_y: f64) {
        self.speed_x = speed_x.abs();
        self.speed_y = speed_y.abs();
    }

    // -----------------------------------------------------------------------
    // Destination
    // -----------------------------------------------------------------------

    /// Head for `(tx, ty)`.
    ///
    /// When idle the path is computed now: on success movement starts and
    /// listeners get `notify_start_move`; on failure nothing changes and
    /// `false` is returned. While a path is being followed the change is
    /// recorded and applied at the next tile boundary, and `true` is
    /// returned.
    pub fn set_destination<H: Heuristic>(
        &mut self,
        map: &MapTilePath,
        finder: &mut PathFinder<H>,
        tx: i32,
        ty: i32,
    ) -> bool {
        let destination = CoordTile::new(tx, ty);
        if self.path.is_some() {
            log::trace!("mover {}: destination {destination} deferred", self.id);
            self.destination = Some(destination);
            self.path_found_changed = true;
            return true;
        }

        let Some(path) = finder.find_path(map, &*self, tx, ty, false) else {
            return false;
        };
        self.path = Some(path);
        self.current_step = 0;
        self.destination = Some(destination);
        self.destination_reached = false;
        self.path_stopped = false;
        self.path_stopped_requested = false;
        self.path_found_changed = false;
        self.recheck_pending = false;

        let (id, from) = (self.id, self.tile);
        for listener in &mut self.listeners {
            listener.notify_start_move(id, from, destination);
        }
        true
    }

    /// Whether a path to `(tx, ty)` exists right now. Changes nothing.
    pub fn is_path_available<H: Heuristic>(
        &self,
        map: &MapTilePath,
        finder: &mut PathFinder<H>,
        tx: i32,
        ty: i32,
    ) -> bool {
        finder.find_path(map, self, tx, ty, false).is_some()
    }

    /// Stop at the next tile boundary.
    pub fn stop_moves(&mut self) {
        self.path_stopped_requested = true;
    }

    // -----------------------------------------------------------------------
    // Ignored and shared ids
    // -----------------------------------------------------------------------

    pub fn clear_ignored_id(&mut self) {
        self.ignored_ids.clear();
    }

    /// Add `id` to, or remove it from, the ids that never block this mover.
    pub fn set_ignore_id(&mut self, id: ObjectId, ignore: bool) {
        if ignore {
            self.ignored_ids.insert(id);
        } else {
            self.ignored_ids.remove(&id);
        }
    }

    /// Movers sharing this mover's path. When only they block the next
    /// step, the mover routes around them instead of stopping. The mover's
    /// own id is left out.
    pub fn set_shared_path_ids(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        let own = self.id;
        self.shared_path_ids = ids.into_iter().filter(|&id| id != own).collect();
    }

    pub fn shared_path_ids(&self) -> &HashSet<ObjectId> {
        &self.shared_path_ids
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Advance the mover by one frame scaled by `extrp`.
    ///
    /// At a tile boundary a deferred destination is applied first, then a
    /// stop request, then arrival, and only then is the next step claimed.
    /// Movement toward the claimed step follows in the same call.
    pub fn update<H: Heuristic>(&mut self, map: &mut MapTilePath, finder: &mut PathFinder<H>, extrp: f64) {
        self.moving = false;
        self.move_x = 0.0;
        self.move_y = 0.0;
        if self.path.is_none() {
            return;
        }
        if self.target.is_none() && !self.begin_step(map, finder) {
            return;
        }
        self.move_toward_target(map, extrp);
    }

    /// Prepare the next step. Returns whether a step was claimed.
    fn begin_step<H: Heuristic>(&mut self, map: &mut MapTilePath, finder: &mut PathFinder<H>) -> bool {
        if self.path_found_changed {
            self.path_found_changed = false;
            if !self.recompute(map, finder) {
                self.finish();
                return false;
            }
        }
        if self.path_stopped_requested {
            self.finish();
            return false;
        }

        let mut rerouted = false;
        loop {
            let next = self.current_step + 1;
            let Some(step) = self.path.as_ref().and_then(|p| p.step(next)) else {
                self.finish();
                return false;
            };
            if map.is_footprint_blocked(&*self, step.x, step.y, true) {
                log::debug!("mover {}: step {step} does not fit on the map, stopping", self.id);
                self.path_stopped_requested = true;
                self.finish();
                return false;
            }
            let area = Range::footprint(step, self.size.0, self.size.1);
            let blockers = map.blocking_ids(&*self, area);
            if blockers.is_empty() {
                self.commit(map, step, area);
                return true;
            }

            let shared_only = blockers.iter().all(|id| self.shared_path_ids.contains(id));
            if shared_only && !rerouted {
                rerouted = true;
                if self.recompute(map, finder) {
                    log::trace!("mover {}: rerouted around {blockers:?}", self.id);
                    continue;
                }
            }

            let is_last = self.path.as_ref().is_some_and(|p| next + 1 >= p.len());
            if is_last || self.recheck_pending {
                log::debug!("mover {}: step {step} blocked by {blockers:?}, stopping", self.id);
                self.path_stopped_requested = true;
                self.finish();
            } else {
                log::trace!("mover {}: step {step} blocked by {blockers:?}, waiting", self.id);
                self.recheck_pending = true;
            }
            return false;
        }
    }

    /// Search again toward the current destination from the current tile.
    fn recompute<H: Heuristic>(&mut self, map: &MapTilePath, finder: &mut PathFinder<H>) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };
        match finder.find_path(map, &*self, destination.x, destination.y, false) {
            Some(path) => {
                self.path = Some(path);
                self.current_step = 0;
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, map: &mut MapTilePath, step: CoordTile, area: Range) {
        map.move_object_ids(self.footprint(), area, self.id);
        let old = self.tile;
        self.orientation = MovementTile::from_delta(step.x - old.x, step.y - old.y);
        self.target = Some(step);
        self.recheck_pending = false;
        log::trace!("mover {}: {old} -> {step} ({})", self.id, self.orientation);

        let id = self.id;
        for listener in &mut self.listeners {
            listener.notify_moving(id, old, step);
        }
    }

    fn move_toward_target(&mut self, map: &MapTilePath, extrp: f64) {
        let Some(target) = self.target else {
            return;
        };
        let factor = if self.orientation.is_diagonal() {
            DIAGONAL_SPEED_FACTOR
        } else {
            1.0
        };
        let goal_x = f64::from(target.x * map.tile_width());
        let goal_y = f64::from(target.y * map.tile_height());
        let (move_x, arrived_x) = approach(self.x, goal_x, self.speed_x * factor * extrp);
        let (move_y, arrived_y) = approach(self.y, goal_y, self.speed_y * factor * extrp);
        self.move_x = move_x;
        self.move_y = move_y;
        self.x = if arrived_x { goal_x } else { self.x + move_x };
        self.y = if arrived_y { goal_y } else { self.y + move_y };
        self.moving = move_x != 0.0 || move_y != 0.0;

        if !(arrived_x && arrived_y) {
            return;
        }
        self.tile = target;
        self.target = None;
        self.current_step += 1;
        if self.path_found_changed {
            return;
        }
        let at_end = self.path.as_ref().is_none_or(|p| self.current_step + 1 >= p.len());
        if at_end || self.path_stopped_requested {
            self.finish();
        }
    }

    /// End the current path where the mover stands.
    fn finish(&mut self) {
        self.path = None;
        self.target = None;
        self.current_step = 0;
        self.move_x = 0.0;
        self.move_y = 0.0;
        self.moving = false;
        self.destination_reached = true;
        self.path_stopped = self.path_stopped_requested;
        self.path_stopped_requested = false;
        self.path_found_changed = false;
        self.recheck_pending = false;
        log::debug!("mover {}: arrived at {}", self.id, self.tile);

        let (id, tile) = (self.id, self.tile);
        for listener in &mut self.listeners {
            listener.notify_arrived(id, tile);
        }
    }

    /// Tiles held in the occupancy map: the footprint at the step being
    /// travelled to, or at the current tile.
    fn claimed_area(&self) -> Range {
        Range::footprint(self.target.unwrap_or(self.tile), self.size.0, self.size.1)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn destination(&self) -> Option<CoordTile> {
        self.destination
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_destination_reached(&self) -> bool {
        self.destination_reached
    }

    /// Whether the last path ended on a stop request or a blocked step.
    pub fn is_path_stopped(&self) -> bool {
        self.path_stopped
    }

    pub fn move_x(&self) -> f64 {
        self.move_x
    }

    pub fn move_y(&self) -> f64 {
        self.move_y
    }

    /// Direction of the last committed step.
    pub fn orientation(&self) -> MovementTile {
        self.orientation
    }

    /// Horizontal pixel position.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical pixel position.
    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Mover for Pathfindable {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn in_tile_x(&self) -> i32 {
        self.tile.x
    }

    fn in_tile_y(&self) -> i32 {
        self.tile.y
    }

    fn in_tile_width(&self) -> i32 {
        self.size.0
    }

    fn in_tile_height(&self) -> i32 {
        self.size.1
    }

    fn path_data(&self, category: &str) -> Option<&PathData> {
        self.data.get(category)
    }

    fn is_ignored_id(&self, id: ObjectId) -> bool {
        self.ignored_ids.contains(&id)
    }
}

/// Move from `from` toward `to` by at most `reach`. Returns the applied
/// delta and whether `to` is reached, overshoot included.
fn approach(from: f64, to: f64, reach: f64) -> (f64, bool) {
    let reach = reach.max(0.0);
    let delta = to - from;
    if delta.abs() <= reach {
        (delta, true)
    } else {
        (reach.copysign(delta), false)
    }
}
