use quadcluster::geodesy::{MERCATOR_LATITUDE_LIMIT, tile_for};
use quadcluster::{
    ClusterService, GeoBounds, GeoPoint, MemoryLocationStore, QuadKey, QuadclusterError,
    STORAGE_ZOOM, TileCountSource, TileCounts, ZoomLevel, cluster, decode, quad_key_for,
};

/// Test 1: Mercator latitude limit and the antimeridian land on the grid edge
#[test]
fn test_extreme_coordinates_hit_grid_edges() {
    for level in [1, 4, 12, STORAGE_ZOOM as i32, 23] {
        let zoom = ZoomLevel::new(level).unwrap();
        let last = zoom.max_tile_index();

        let north_west = tile_for(&GeoPoint::new(MERCATOR_LATITUDE_LIMIT, -180.0), zoom).unwrap();
        assert_eq!((north_west.x(), north_west.y()), (0, 0), "zoom {}", level);

        let south_east = tile_for(&GeoPoint::new(-MERCATOR_LATITUDE_LIMIT, 180.0), zoom).unwrap();
        assert_eq!((south_east.x(), south_east.y()), (last, last), "zoom {}", level);

        let east = tile_for(&GeoPoint::new(0.0, 180.0), zoom).unwrap();
        assert_eq!(east.x(), last);
    }
}

/// Test 2: Latitudes past the Mercator limit are rejected, not clamped
#[test]
fn test_beyond_mercator_limit() {
    for latitude in [85.0512, 85.06, 89.9, -85.06, -90.0] {
        let result = quad_key_for(&GeoPoint::new(latitude, 0.0), ZoomLevel::STORAGE);
        assert!(
            matches!(result, Err(QuadclusterError::InvalidCoordinate(_))),
            "latitude {}",
            latitude
        );
    }

    let result = quad_key_for(&GeoPoint::new(0.0, -180.0001), ZoomLevel::STORAGE);
    assert!(matches!(result, Err(QuadclusterError::InvalidCoordinate(_))));
}

/// Test 3: Zoom validation at every entry point
#[test]
fn test_zoom_rejections() {
    assert!(matches!(
        ZoomLevel::new(-1),
        Err(QuadclusterError::InvalidZoom(_))
    ));
    assert!(matches!(
        ZoomLevel::for_clustering(STORAGE_ZOOM as i32 + 1),
        Err(QuadclusterError::InvalidZoom(_))
    ));

    let finer = ZoomLevel::new(STORAGE_ZOOM as i32 + 1).unwrap();
    assert!(matches!(
        cluster(&TileCounts::default(), finer),
        Err(QuadclusterError::InvalidZoom(_))
    ));

    let service = ClusterService::new(MemoryLocationStore::new());
    let sw = GeoPoint::new(-10.0, -10.0);
    let ne = GeoPoint::new(10.0, 10.0);
    assert!(matches!(
        service.clusters_within(sw, ne, -5),
        Err(QuadclusterError::InvalidZoom(_))
    ));
    assert!(matches!(
        service.clusters_within(sw, ne, STORAGE_ZOOM as i32 + 1),
        Err(QuadclusterError::InvalidZoom(_))
    ));
}

/// Test 4: Empty inputs produce empty listings
#[test]
fn test_empty_inputs() {
    let service = ClusterService::new(MemoryLocationStore::new());
    let clusters = service
        .clusters_within(GeoPoint::new(-50.0, -50.0), GeoPoint::new(50.0, 50.0), 5)
        .unwrap();
    assert!(clusters.is_empty());
    assert_eq!(
        service
            .clusters_json(GeoPoint::new(-50.0, -50.0), GeoPoint::new(50.0, 50.0), 5)
            .unwrap(),
        "{}"
    );
}

/// Test 5: Points on the viewport edge do not qualify
#[test]
fn test_viewport_edges_excluded() {
    let store = MemoryLocationStore::new();
    store.insert("south-west corner", GeoPoint::new(10.0, 20.0)).unwrap();
    store.insert("north edge", GeoPoint::new(11.0, 20.5)).unwrap();
    store.insert("east edge", GeoPoint::new(10.5, 21.0)).unwrap();
    store.insert("inside", GeoPoint::new(10.5, 20.5)).unwrap();

    let bounds = GeoBounds::new(GeoPoint::new(10.0, 20.0), GeoPoint::new(11.0, 21.0));
    let counts = store.counts_within(&bounds, ZoomLevel::STORAGE).unwrap();
    assert_eq!(counts.values().sum::<u64>(), 1);

    let expected = quad_key_for(&GeoPoint::new(10.5, 20.5), ZoomLevel::STORAGE).unwrap();
    assert_eq!(counts[expected.as_str()], 1);
}

/// Test 6: Whole world at zoom 0 is a single cluster
#[test]
fn test_zoom_zero_whole_world() {
    let store = MemoryLocationStore::new();
    store.insert("north-west", GeoPoint::new(60.0, -120.0)).unwrap();
    store.insert("south-east", GeoPoint::new(-45.0, 170.0)).unwrap();
    store.insert("null island", GeoPoint::new(0.0, 0.0)).unwrap();

    let service = ClusterService::new(store);
    let clusters = service
        .clusters_within(GeoPoint::new(-85.0, -180.0), GeoPoint::new(85.0, 180.0), 0)
        .unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[""].count, 3);
}

/// Test 7: Storage zoom gives one cluster per occupied storage tile
#[test]
fn test_storage_zoom_no_aggregation() {
    let store = MemoryLocationStore::new();
    let position = GeoPoint::new(48.85837, 2.294481);
    store.insert("tower a", position).unwrap();
    store.insert("tower b", position).unwrap();
    store.insert("elsewhere", GeoPoint::new(48.8606, 2.3376)).unwrap();

    let service = ClusterService::new(store);
    let clusters = service
        .clusters_within(GeoPoint::new(48.0, 2.0), GeoPoint::new(49.0, 3.0), STORAGE_ZOOM as i32)
        .unwrap();

    assert_eq!(clusters.len(), 2);
    let key = quad_key_for(&position, ZoomLevel::STORAGE).unwrap();
    assert_eq!(clusters[key.as_str()].count, 2);
}

/// Test 8: Malformed quadkeys
#[test]
fn test_malformed_quadkeys() {
    for key in ["x", "0124", "01 2", "00000000000000000000000"] {
        let result = decode(key);
        if key.len() <= 23 && key.chars().all(|c| ('0'..='3').contains(&c)) {
            assert!(result.is_ok(), "key {:?}", key);
        } else {
            assert!(
                matches!(result, Err(QuadclusterError::InvalidQuadKey(_))),
                "key {:?}",
                key
            );
        }
    }

    assert!(QuadKey::parse("0".repeat(24)).is_err());
    assert!("0123".parse::<QuadKey>().is_ok());
}

/// Test 9: Huge counts do not overflow
#[test]
fn test_count_saturation() {
    let counts: TileCounts = [("00", u64::MAX), ("01", 10)]
        .into_iter()
        .map(|(k, c)| (QuadKey::parse(k).unwrap(), c))
        .collect();

    let clusters = cluster(&counts, ZoomLevel::new(1).unwrap()).unwrap();
    assert_eq!(clusters["0"].count, u64::MAX);
}
