use tilenav_core::Transformable;

use crate::category::CollisionCategory;
use crate::config::CollisionConfig;
use crate::error::CollisionError;
use crate::map_collision::{CollisionResult, MapTileCollision};

/// Observer of tile collisions.
pub trait TileCollidableListener {
    /// A sweep of `category` hit a tile surface.
    fn notify_tile_collided(&mut self, result: &CollisionResult, category: &CollisionCategory);
}

/// Collision driver of one object: sweeps each of its categories after a
/// move and reports the hits.
pub struct TileCollidable {
    categories: Vec<CollisionCategory>,
    enabled: bool,
    listeners: Vec<Box<dyn TileCollidableListener>>,
}

impl TileCollidable {
    pub fn new(categories: Vec<CollisionCategory>) -> Self {
        Self {
            categories,
            enabled: true,
            listeners: Vec::new(),
        }
    }

    /// Driver sweeping the categories of `config` named in `names`, in that
    /// order.
    pub fn from_config(config: &CollisionConfig, names: &[&str]) -> Result<Self, CollisionError> {
        let categories = names
            .iter()
            .map(|&name| {
                config
                    .category(name)
                    .cloned()
                    .ok_or_else(|| CollisionError::UnknownCategory(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(categories))
    }

    pub fn add_listener(&mut self, listener: Box<dyn TileCollidableListener>) {
        self.listeners.push(listener);
    }

    pub fn categories(&self) -> &[CollisionCategory] {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut [CollisionCategory] {
        &mut self.categories
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Sweep every category against `map` for the last movement of
    /// `transformable`.
    ///
    /// Each hit is sent to every listener, in registration order, and
    /// returned in category order. Nothing is swept while disabled.
    pub fn update<T: Transformable + ?Sized>(
        &mut self,
        map: &MapTileCollision,
        transformable: &T,
    ) -> Vec<CollisionResult> {
        if !self.enabled {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for category in &self.categories {
            let Some(result) = map.compute_collision(transformable, category) else {
                continue;
            };
            for listener in &mut self.listeners {
                listener.notify_tile_collided(&result, category);
            }
            hits.push(result);
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tilenav_core::{MapTileGroup, TileMap, Transform};

    use super::*;

    const JSON: &str = r#"{
        "formulas": [
            { "name": "top",
              "range": { "output": "Y", "min_x": 0, "max_x": 16, "min_y": 0, "max_y": 16 },
              "function": { "type": "linear", "a": 0.0, "b": 16.0 } }
        ],
        "groups": [ { "name": "floor", "group": "ground", "formulas": ["top"] } ],
        "categories": [
            { "name": "left_foot", "axis": "Y", "offset_x": 0, "groups": ["floor"] },
            { "name": "right_foot", "axis": "Y", "offset_x": 20, "groups": ["floor"] }
        ]
    }"#;

    struct Log(&'static str, Rc<RefCell<Vec<String>>>);

    impl TileCollidableListener for Log {
        fn notify_tile_collided(&mut self, result: &CollisionResult, category: &CollisionCategory) {
            self.1
                .borrow_mut()
                .push(format!("{} {} {:?}", self.0, category.name(), result.y()));
        }
    }

    fn setup() -> (MapTileCollision, CollisionConfig) {
        let config = CollisionConfig::from_json(JSON).unwrap();
        let mut map = TileMap::new(2, 2, 16, 16);
        map.set_tile(0, 0, 0);
        let groups = MapTileGroup::new().with_group("ground", [0]);
        (MapTileCollision::new(&map, &groups, &config).unwrap(), config)
    }

    #[test]
    fn hits_are_reported_per_category_in_order() {
        let (map, config) = setup();
        let mut collidable = TileCollidable::from_config(&config, &["left_foot", "right_foot"]).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        collidable.add_listener(Box::new(Log("a", log.clone())));
        collidable.add_listener(Box::new(Log("b", log.clone())));

        let mut t = Transform::new(4.0, 24.0);
        t.move_location(1.0, 0.0, -12.0);
        let hits = collidable.update(&map, &t);

        // the right foot stands over the empty tile
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].y(), Some(16.0));
        assert_eq!(
            *log.borrow(),
            vec!["a left_foot Some(16.0)".to_string(), "b left_foot Some(16.0)".to_string()]
        );
    }

    #[test]
    fn disabled_sweeps_nothing() {
        let (map, config) = setup();
        let mut collidable = TileCollidable::from_config(&config, &["left_foot"]).unwrap();
        collidable.set_enabled(false);
        let mut t = Transform::new(4.0, 24.0);
        t.move_location(1.0, 0.0, -12.0);
        assert!(collidable.update(&map, &t).is_empty());
        collidable.set_enabled(true);
        assert_eq!(collidable.update(&map, &t).len(), 1);
    }

    #[test]
    fn unknown_category_name() {
        let (_, config) = setup();
        assert!(matches!(
            TileCollidable::from_config(&config, &["head"]),
            Err(CollisionError::UnknownCategory(c)) if c == "head"
        ));
    }
}
