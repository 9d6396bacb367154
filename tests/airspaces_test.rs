use airspaces::{
    AircraftState, Airspace, AirspaceActivity, AirspaceAltitude, AirspaceEntry, Airspaces,
    AtmosphericPressure, Config, GeoPoint, UncertainAltitude,
};
use claims::{assert_err, assert_none, assert_ok, assert_some, assert_some_eq};
use insta::assert_compact_debug_snapshot;

fn circle(name: &str, lat: f64, lon: f64, radius: f64) -> Airspace {
    Airspace::circle(name, GeoPoint::from_degrees(lat, lon), radius)
}

fn square(name: &str, lat: f64, lon: f64, half_size: f64) -> Airspace {
    Airspace::polygon(
        name,
        vec![
            GeoPoint::from_degrees(lat - half_size, lon - half_size),
            GeoPoint::from_degrees(lat - half_size, lon + half_size),
            GeoPoint::from_degrees(lat + half_size, lon + half_size),
            GeoPoint::from_degrees(lat + half_size, lon - half_size),
        ],
    )
}

fn names<'a>(entries: impl Iterator<Item = &'a AirspaceEntry>) -> Vec<&'a str> {
    let mut names: Vec<_> = entries.map(|entry| entry.airspace().name()).collect();
    names.sort_unstable();
    names
}

fn find<'a>(airspaces: &'a Airspaces, name: &str) -> &'a AirspaceEntry {
    airspaces
        .iter()
        .find(|entry| entry.airspace().name() == name)
        .unwrap()
}

#[test]
fn range_query_returns_the_two_nearby_circles() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(circle("west", 45.0, 7.0, 2_000.0)));
    assert_ok!(airspaces.add(circle("east", 45.0, 7.2, 2_000.0)));
    assert_ok!(airspaces.add(circle("far", 46.0, 8.0, 2_000.0)));
    airspaces.optimise();

    let between = GeoPoint::from_degrees(45.0, 7.1);
    assert_eq!(names(airspaces.query_within_range(between, 7_000.0)), ["east", "west"]);
    assert!(names(airspaces.query_within_range(between, 3_000.0)).is_empty());
}

#[test]
fn ground_levels_resolve_agl_bounds() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(
        circle("agl", 45.0, 7.0, 2_000.0)
            .with_vertical(AirspaceAltitude::agl(500.0), AirspaceAltitude::msl(3_000.0))
    ));
    airspaces.optimise();
    assert_none!(find(&airspaces, "agl").base_altitude());

    airspaces.set_ground_levels(&|_: GeoPoint| Some(1_000.0));
    assert_some_eq!(find(&airspaces, "agl").base_altitude(), 1_500.0);
    assert_some_eq!(find(&airspaces, "agl").top_altitude(), 3_000.0);
}

#[test]
fn visit_intersecting_reports_crossed_polygon_once() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(square("crossed", 45.0, 7.0, 0.1)));
    assert_ok!(airspaces.add(square("missed", 45.5, 7.0, 0.1)));
    airspaces.optimise();

    let mut visited = Vec::new();
    airspaces.visit_intersecting(
        GeoPoint::from_degrees(45.0, 6.7),
        GeoPoint::from_degrees(45.0, 7.3),
        false,
        |entry| visited.push(entry.airspace().name().to_owned()),
    );
    assert_eq!(visited, ["crossed"]);
}

#[test]
fn staged_airspaces_are_invisible() {
    let mut airspaces = Airspaces::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);
    assert_ok!(airspaces.add(circle("staged", 45.0, 7.0, 2_000.0)));

    assert_eq!(airspaces.len(), 0);
    assert_eq!(airspaces.staged_len(), 1);
    assert!(!airspaces.is_indexed());
    assert_eq!(airspaces.query_inside(location).count(), 0);
    assert_eq!(airspaces.query_within_range(location, 10_000.0).count(), 0);
    assert_none!(airspaces.find_nearest(location, |_: &AirspaceEntry| true));

    airspaces.optimise();
    assert_eq!(airspaces.len(), 1);
    assert!(airspaces.is_indexed());
    assert_eq!(names(airspaces.query_inside(location)), ["staged"]);

    // Adding more keeps the indexed ones visible
    assert_ok!(airspaces.add(circle("second", 45.0, 7.0, 500.0)));
    assert_eq!(names(airspaces.query_inside(location)), ["staged"]);
    airspaces.optimise();
    assert_eq!(names(airspaces.query_inside(location)), ["second", "staged"]);
}

#[test]
fn change_counter_increases_with_every_mutation() {
    let mut airspaces = Airspaces::new();
    let mut last = airspaces.serial();
    let mut check = |airspaces: &Airspaces| {
        assert!(airspaces.serial() > last, "{} <= {last}", airspaces.serial());
        last = airspaces.serial();
    };

    assert_ok!(airspaces.add(circle("a", 45.0, 7.0, 2_000.0)));
    check(&airspaces);
    airspaces.optimise();
    check(&airspaces);
    assert!(airspaces.set_flight_levels(AtmosphericPressure::hectopascal(1020.0)));
    check(&airspaces);
    airspaces.set_activity(AirspaceActivity::MONDAY);
    check(&airspaces);
    airspaces.set_ground_levels(&|_: GeoPoint| Some(300.0));
    check(&airspaces);
    airspaces.set_ground_levels(&|_: GeoPoint| Some(300.0));
    check(&airspaces);
    airspaces.clear();
    check(&airspaces);
    assert_ok!(airspaces.add(circle("b", 45.0, 7.0, 2_000.0)));
    check(&airspaces);
}

#[test]
fn unchanged_pressure_is_a_noop() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(
        circle("fl", 45.0, 7.0, 2_000.0)
            .with_vertical(AirspaceAltitude::flight_level(65.0), AirspaceAltitude::flight_level(95.0))
    ));
    airspaces.optimise();

    let pressure = AtmosphericPressure::hectopascal(998.0);
    assert!(airspaces.set_flight_levels(pressure));
    let serial = airspaces.serial();
    let base = assert_some!(find(&airspaces, "fl").base_altitude());

    assert!(!airspaces.set_flight_levels(pressure));
    assert_eq!(airspaces.serial(), serial);
    assert_some_eq!(airspaces.pressure(), pressure);

    // Low pressure pulls flight levels down
    assert!(base < 65.0 * 30.48);

    assert!(airspaces.set_flight_levels(AtmosphericPressure::standard()));
    let base = assert_some!(find(&airspaces, "fl").base_altitude());
    assert!((base - 65.0 * 30.48).abs() < 1e-6);
}

#[test]
fn inactive_airspaces_are_filtered_from_queries() {
    let mut airspaces = Airspaces::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);
    assert_ok!(airspaces.add(circle("weekend", 45.0, 7.0, 2_000.0).with_days(AirspaceActivity::WEEKEND)));
    assert_ok!(airspaces.add(circle("always", 45.0, 7.0, 3_000.0)));
    airspaces.optimise();

    airspaces.set_activity(AirspaceActivity::MONDAY);
    assert_eq!(names(airspaces.query_inside(location)), ["always"]);
    assert_eq!(names(airspaces.query_within_range(location, 100.0)), ["always"]);
    assert_eq!(airspaces.len(), 2);
    assert!(!find(&airspaces, "weekend").is_active());

    airspaces.set_activity(AirspaceActivity::SATURDAY);
    assert_eq!(names(airspaces.query_inside(location)), ["always", "weekend"]);
}

#[test]
fn activity_applies_to_airspaces_added_later() {
    let mut airspaces = Airspaces::new();
    airspaces.set_activity(AirspaceActivity::SUNDAY);
    assert_ok!(airspaces.add(circle("weekdays", 45.0, 7.0, 2_000.0).with_days(AirspaceActivity::WEEKDAYS)));
    airspaces.optimise();

    assert_eq!(airspaces.query_inside(GeoPoint::from_degrees(45.0, 7.0)).count(), 0);
}

#[test]
fn aircraft_inside_checks_altitude() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(
        circle("band", 45.0, 7.0, 5_000.0)
            .with_vertical(AirspaceAltitude::msl(1_000.0), AirspaceAltitude::msl(2_000.0))
    ));
    assert_ok!(airspaces.add(
        circle("terrain", 45.0, 7.0, 5_000.0)
            .with_vertical(AirspaceAltitude::ground(), AirspaceAltitude::msl(1_200.0))
    ));
    airspaces.optimise();

    let location = GeoPoint::from_degrees(45.01, 7.01);
    let at = |altitude| AircraftState::new(location, altitude);

    assert_eq!(names(airspaces.query_inside_aircraft(at(1_100.0))), ["band", "terrain"]);
    assert_eq!(names(airspaces.query_inside_aircraft(at(1_500.0))), ["band"]);
    assert!(names(airspaces.query_inside_aircraft(at(2_500.0))).is_empty());

    // Ground level known: below the terrain is outside
    airspaces.set_ground_levels(&|_: GeoPoint| Some(600.0));
    assert!(names(airspaces.query_inside_aircraft(at(500.0))).is_empty());
    assert_eq!(names(airspaces.query_inside_aircraft(at(700.0))), ["terrain"]);
}

#[test]
fn uncertain_altitude_policy() {
    let airspace = circle("terrain", 45.0, 7.0, 5_000.0)
        .with_vertical(AirspaceAltitude::agl(300.0), AirspaceAltitude::msl(2_000.0));
    let state = AircraftState::new(GeoPoint::from_degrees(45.0, 7.0), 1_000.0);

    let mut include = Airspaces::new();
    assert_ok!(include.add(airspace.clone()));
    include.optimise();
    assert_eq!(include.query_inside_aircraft(state).count(), 1);

    let mut exclude = Airspaces::with_config(Config {
        uncertain_altitude: UncertainAltitude::Exclude,
        ..Config::default()
    });
    assert_ok!(exclude.add(airspace));
    exclude.optimise();
    assert_eq!(exclude.query_inside_aircraft(state).count(), 0);

    exclude.set_ground_levels(&|_: GeoPoint| Some(400.0));
    assert_eq!(exclude.query_inside_aircraft(state).count(), 1);
}

#[test]
fn rejected_airspace_is_not_stored() {
    let mut airspaces = Airspaces::new();
    let serial = airspaces.serial();
    let a = GeoPoint::from_degrees(45.0, 7.0);
    let b = GeoPoint::from_degrees(45.1, 7.0);

    let error = assert_err!(airspaces.add(Airspace::polygon("line", vec![a, b])));
    assert_compact_debug_snapshot!(error, @"DegeneratePolygon { points: 2 }");
    insta::assert_snapshot!(error, @"Polygon airspace needs at least 3 distinct points, got 2");

    let error = assert_err!(airspaces.add(Airspace::circle("dot", a, -1.0)));
    assert_compact_debug_snapshot!(error, @"InvalidRadius { radius: -1.0 }");

    assert_eq!(airspaces.staged_len(), 0);
    assert_eq!(airspaces.serial(), serial);
    airspaces.optimise();
    assert!(airspaces.is_empty());
}

#[test]
fn query_intersecting_path() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(square("crossed", 45.0, 7.0, 0.1)));
    assert_ok!(airspaces.add(circle("around start", 45.0, 6.7, 3_000.0)));
    assert_ok!(airspaces.add(square("missed", 45.5, 7.0, 0.1)));
    airspaces.optimise();

    let start = GeoPoint::from_degrees(45.0, 6.7);
    let end = GeoPoint::from_degrees(45.0, 7.3);
    assert_eq!(names(airspaces.query_intersecting(start, end)), ["around start", "crossed"]);

    let mut visited = Vec::new();
    airspaces.visit_intersecting(start, end, true, |entry| {
        visited.push(entry.airspace().name().to_owned())
    });
    visited.sort_unstable();
    assert_eq!(visited, ["around start", "crossed"]);
}

#[test]
fn range_query_has_no_false_negatives() {
    let mut airspaces = Airspaces::with_config(Config {
        leaf_capacity: 4,
        ..Config::default()
    });
    for row in 0..20 {
        for column in 0..20 {
            let lat = 44.0 + f64::from(row) * 0.1;
            let lon = 6.0 + f64::from(column) * 0.13;
            let name = format!("{row}/{column}");
            let airspace = if (row + column) % 2 == 0 {
                circle(&name, lat, lon, 1_500.0 + f64::from(column) * 100.0)
            } else {
                square(&name, lat, lon, 0.02)
            };
            assert_ok!(airspaces.add(airspace));
        }
    }
    airspaces.optimise();
    assert_eq!(airspaces.len(), 400);

    for step in 0..25 {
        let location = GeoPoint::from_degrees(
            43.9 + f64::from(step) * 0.087,
            5.9 + f64::from(step) * 0.113,
        );
        let range = 2_000.0 + f64::from(step) * 1_000.0;

        let expected = names(
            airspaces
                .iter()
                .filter(|entry| entry.airspace().distance(location) <= range),
        );
        assert_eq!(names(airspaces.query_within_range(location, range)), expected);

        let expected = names(airspaces.iter().filter(|entry| entry.airspace().inside(location)));
        assert_eq!(names(airspaces.query_inside(location)), expected);
    }
}

#[test]
fn path_queries_have_no_false_negatives() {
    let mut airspaces = Airspaces::with_config(Config {
        leaf_capacity: 4,
        ..Config::default()
    });
    for row in 0..15 {
        for column in 0..15 {
            let lat = 44.0 + f64::from(row) * 0.1;
            let lon = 6.0 + f64::from(column) * 0.13;
            let name = format!("{row}/{column}");
            let airspace = if (row + column) % 2 == 0 {
                circle(&name, lat, lon, 1_000.0 + f64::from(row) * 150.0)
            } else {
                square(&name, lat, lon, 0.015 + f64::from(column) * 0.001)
            };
            assert_ok!(airspaces.add(airspace));
        }
    }
    airspaces.optimise();

    // Short and long paths in every direction, some starting inside
    for step in 0..100 {
        let step = f64::from(step);
        let start = GeoPoint::from_degrees(
            43.95 + (step * 0.0371) % 1.5,
            5.95 + (step * 0.0573) % 1.9,
        );
        let heading = step * 0.61;
        let length = 0.02 + (step * 0.013) % 0.6;
        let end = GeoPoint::from_degrees(
            start.lat_degrees() + length * heading.cos(),
            start.lon_degrees() + length * heading.sin(),
        );

        let expected = names(airspaces.iter().filter(|entry| {
            let airspace = entry.airspace();
            airspace.intersects(start, end) || airspace.inside(start)
        }));

        let mut visited = Vec::new();
        airspaces.visit_intersecting(start, end, true, |entry| {
            visited.push(entry.airspace().name().to_owned())
        });
        visited.sort_unstable();
        assert_eq!(visited, expected, "path {start:?} -> {end:?}");

        assert_eq!(names(airspaces.query_intersecting(start, end)), expected);
    }
}

#[test]
fn find_nearest_airspace() {
    let mut airspaces = Airspaces::new();
    assert_ok!(airspaces.add(circle("a", 45.0, 7.0, 1_000.0)));
    assert_ok!(airspaces.add(circle("b", 45.0, 7.5, 1_000.0)));
    airspaces.optimise();

    let nearest = assert_some!(airspaces.find_nearest(GeoPoint::from_degrees(45.0, 7.4), |_: &AirspaceEntry| true));
    assert_eq!(nearest.airspace().name(), "b");
}
