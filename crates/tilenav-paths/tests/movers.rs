use tilenav_core::{CoordTile, MapTileGroup, TileMap};
use tilenav_paths::{
    Manhattan, MapTilePath, Mover, MoverConfig, PathCategory, PathConfig, PathData, PathFinder,
    Pathfindable,
};

fn open_map(width: i32, height: i32) -> MapTilePath {
    let mut map = TileMap::new(width, height, 16, 16);
    map.fill(0);
    let groups = MapTileGroup::new().with_group("ground", [0]);
    let config = PathConfig::new(vec![PathCategory::new("ground", ["ground"])]);
    MapTilePath::new(&map, &groups, &config).unwrap()
}

fn mover(map: &mut MapTilePath, id: u32, tx: i32, ty: i32) -> Pathfindable {
    let config = MoverConfig::new(vec![PathData::walkable("ground", 1.0)]);
    let mut mover = Pathfindable::on_map(id, &config, map).unwrap();
    mover.set_location(map, tx, ty);
    mover
}

fn holders(map: &MapTilePath, tile: CoordTile) -> Vec<u32> {
    let mut ids: Vec<_> = map.object_ids(tile.x, tile.y).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn second_mover_stops_next_to_occupied_destination() {
    let mut map = open_map(6, 3);
    let mut finder = PathFinder::new(&map, 64, Manhattan::default());
    let mut first = mover(&mut map, 1, 0, 1);
    let mut second = mover(&mut map, 2, 0, 0);

    assert!(first.set_destination(&map, &mut finder, 5, 1));
    while !first.is_destination_reached() {
        first.update(&mut map, &mut finder, 4.0);
    }
    assert_eq!(first.in_tile(), CoordTile::new(5, 1));

    // The destination is now held by the first mover: the search redirects.
    assert!(second.set_destination(&map, &mut finder, 5, 1));
    let end = second.path().and_then(|p| p.last()).unwrap();
    assert_ne!(end, CoordTile::new(5, 1));
    assert_eq!(end.chebyshev(CoordTile::new(5, 1)), 1);
    while !second.is_destination_reached() {
        second.update(&mut map, &mut finder, 4.0);
    }
    assert_eq!(second.in_tile(), end);
    assert_eq!(holders(&map, end), vec![2]);
    assert_eq!(holders(&map, CoordTile::new(5, 1)), vec![1]);
}

#[test]
fn movers_racing_to_one_tile_never_share_it() {
    let mut map = open_map(7, 4);
    let mut finder = PathFinder::new(&map, 64, Manhattan::default());
    let mut a = mover(&mut map, 1, 0, 0);
    let mut b = mover(&mut map, 2, 0, 3);

    assert!(a.set_destination(&map, &mut finder, 6, 2));
    assert!(b.set_destination(&map, &mut finder, 6, 2));
    for _ in 0..2000 {
        if a.is_destination_reached() && b.is_destination_reached() {
            break;
        }
        a.update(&mut map, &mut finder, 2.0);
        b.update(&mut map, &mut finder, 2.0);
    }
    assert!(a.is_destination_reached() && b.is_destination_reached());
    assert_ne!(a.in_tile(), b.in_tile());
    assert_eq!(holders(&map, a.in_tile()), vec![1]);
    assert_eq!(holders(&map, b.in_tile()), vec![2]);
    let total: usize = (0..4)
        .flat_map(|ty| (0..7).map(move |tx| CoordTile::new(tx, ty)))
        .map(|p| holders(&map, p).len())
        .sum();
    assert_eq!(total, 2);
}

#[test]
fn shared_group_movers_reach_their_targets() {
    let mut map = open_map(8, 3);
    let mut finder = PathFinder::new(&map, 64, Manhattan::default());
    let mut a = mover(&mut map, 1, 0, 1);
    let mut b = mover(&mut map, 2, 7, 1);
    a.set_shared_path_ids([1, 2]);
    b.set_shared_path_ids([1, 2]);

    assert!(a.set_destination(&map, &mut finder, 7, 0));
    assert!(b.set_destination(&map, &mut finder, 0, 2));
    for _ in 0..2000 {
        if a.is_destination_reached() && b.is_destination_reached() {
            break;
        }
        a.update(&mut map, &mut finder, 1.0);
        b.update(&mut map, &mut finder, 1.0);
    }
    assert!(a.is_destination_reached() && b.is_destination_reached());
    assert_ne!(a.in_tile(), b.in_tile());
    assert_eq!(holders(&map, a.in_tile()), vec![1]);
    assert_eq!(holders(&map, b.in_tile()), vec![2]);
}

#[test]
fn large_mover_walks_around_a_standing_mover() {
    let mut map = open_map(8, 4);
    let mut finder = PathFinder::new(&map, 64, Manhattan::new(1.0));
    let _stander = mover(&mut map, 1, 3, 1);
    let config = MoverConfig::new(vec![PathData::walkable("ground", 1.0)]);
    let mut big = Pathfindable::on_map(2, &config, &map).unwrap().with_size(2, 2);
    big.set_location(&mut map, 0, 0);

    assert!(big.set_destination(&map, &mut finder, 6, 0));
    let claimed = |map: &MapTilePath| {
        (0..4)
            .flat_map(|ty| (0..8).map(move |tx| CoordTile::new(tx, ty)))
            .filter(|&p| holders(map, p).contains(&2))
            .count()
    };
    for _ in 0..2000 {
        if big.is_destination_reached() {
            break;
        }
        big.update(&mut map, &mut finder, 2.0);
        // the whole footprint stays on the map and off the other mover
        assert_eq!(claimed(&map), 4);
        assert_eq!(holders(&map, CoordTile::new(3, 1)), vec![1]);
    }
    assert!(big.is_destination_reached());
    assert!(!big.is_path_stopped());
    assert_eq!(big.in_tile(), CoordTile::new(6, 0));
}
