use airspaces::{
    AircraftInside, AircraftState, Airspace, AirspaceActivity, AirspaceAltitude, AirspaceEntry,
    Airspaces, AirspacesView, AlwaysTrue, AtmosphericPressure, GeoPoint, HeightRange,
    SharedAirspaces,
};
use claims::{assert_ok, assert_some};
use std::sync::Arc;
use std::thread;

fn master() -> Airspaces {
    let mut airspaces = Airspaces::new();
    for (name, lat, lon) in [
        ("home", 45.0, 7.0),
        ("north", 45.1, 7.0),
        ("east", 45.0, 7.15),
        ("distant", 46.0, 7.0),
    ] {
        assert_ok!(airspaces.add(
            Airspace::circle(name, GeoPoint::from_degrees(lat, lon), 2_000.0)
                .with_vertical(AirspaceAltitude::msl(0.0), AirspaceAltitude::flight_level(75.0))
        ));
    }
    airspaces.optimise();
    airspaces
}

fn names(view: &AirspacesView) -> Vec<&str> {
    let mut names: Vec<_> = view.iter().map(|entry| entry.airspace().name()).collect();
    names.sort_unstable();
    names
}

#[test]
fn synchronise_is_idempotent() {
    let master = master();
    let mut view = AirspacesView::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);

    assert!(view.synchronise_with(&master, location, 20_000.0, AlwaysTrue));
    assert_eq!(names(&view), ["east", "home", "north"]);
    let serial = view.serial();

    assert!(!view.synchronise_with(&master, location, 20_000.0, AlwaysTrue));
    assert_eq!(view.serial(), serial);
    assert_eq!(names(&view), ["east", "home", "north"]);
}

#[test]
fn synchronise_follows_the_aircraft() {
    let master = master();
    let mut view = AirspacesView::new();

    view.synchronise_with(&master, GeoPoint::from_degrees(45.0, 7.0), 5_000.0, AlwaysTrue);
    assert_eq!(names(&view), ["home"]);

    let serial = view.serial();
    assert!(view.synchronise_with(&master, GeoPoint::from_degrees(45.9, 7.0), 10_000.0, AlwaysTrue));
    assert_eq!(names(&view), ["distant"]);
    assert!(view.serial() > serial);

    // Queries on the view see the new content
    let location = GeoPoint::from_degrees(46.0, 7.0);
    assert_eq!(view.query_inside(location).count(), 1);
    assert_eq!(view.query_inside(GeoPoint::from_degrees(45.0, 7.0)).count(), 0);
}

#[test]
fn view_shares_airspaces_with_master() {
    let master = master();
    let mut view = AirspacesView::new();
    view.synchronise_with(&master, GeoPoint::from_degrees(45.0, 7.0), 5_000.0, AlwaysTrue);

    let in_view = assert_some!(view.iter().next());
    let in_master = assert_some!(master.iter().find(|entry| entry.airspace().name() == "home"));
    assert!(Arc::ptr_eq(in_view.shared(), in_master.shared()));
}

#[test]
fn synchronise_applies_condition() {
    let master = master();
    let mut view = AirspacesView::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);

    let not_north = |entry: &AirspaceEntry| entry.airspace().name() != "north";
    view.synchronise_with(&master, location, 20_000.0, not_north);
    assert_eq!(names(&view), ["east", "home"]);

    let inside = AircraftInside::new(AircraftState::new(location, 500.0));
    view.synchronise_with(&master, location, 20_000.0, inside);
    assert_eq!(names(&view), ["home"]);

    view.synchronise_with(&master, location, 20_000.0, HeightRange::new(5_000.0, 6_000.0));
    assert!(view.is_empty());
}

#[test]
fn synchronise_refreshes_resolved_state() {
    let mut master = master();
    let mut view = AirspacesView::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);
    view.synchronise_with(&master, location, 5_000.0, AlwaysTrue);
    let before = assert_some!(view.iter().next().and_then(|entry| entry.top_altitude()));

    master.set_flight_levels(AtmosphericPressure::hectopascal(1030.0));
    assert!(view.synchronise_with(&master, location, 5_000.0, AlwaysTrue));
    let after = assert_some!(view.iter().next().and_then(|entry| entry.top_altitude()));
    assert!(after > before);

    // The master's activity filter carries over to the view
    master.set_activity(AirspaceActivity::empty());
    assert!(view.synchronise_with(&master, location, 5_000.0, AlwaysTrue));
    assert!(view.is_empty());
}

#[test]
fn synchronise_settles_with_nan_altitudes() {
    let mut master = Airspaces::new();
    assert_ok!(master.add(
        Airspace::circle("agl", GeoPoint::from_degrees(45.0, 7.0), 2_000.0)
            .with_vertical(AirspaceAltitude::agl(300.0), AirspaceAltitude::msl(f64::NAN))
    ));
    master.optimise();
    master.set_ground_levels(&|_: GeoPoint| Some(f64::NAN));

    let mut view = AirspacesView::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);
    assert!(view.synchronise_with(&master, location, 5_000.0, AlwaysTrue));
    let serial = view.serial();

    assert!(!view.synchronise_with(&master, location, 5_000.0, AlwaysTrue));
    assert_eq!(view.serial(), serial);
}

#[test]
fn synchronise_after_master_clear() {
    let mut master = master();
    let mut view = AirspacesView::new();
    let location = GeoPoint::from_degrees(45.0, 7.0);
    view.synchronise_with(&master, location, 20_000.0, AlwaysTrue);

    master.clear();
    assert!(view.synchronise_with(&master, location, 20_000.0, AlwaysTrue));
    assert!(view.is_empty());

    // Nothing left to pick up
    view.clear();
    assert!(!view.synchronise_with(&master, location, 20_000.0, AlwaysTrue));
}

#[test]
fn synchronise_from_another_thread() {
    let shared = SharedAirspaces::new(master());
    let location = GeoPoint::from_degrees(45.0, 7.0);

    let warnings = {
        let shared = shared.clone();
        thread::spawn(move || {
            let mut view = AirspacesView::new();
            let mut changes = 0;
            for _ in 0..10 {
                changes += usize::from(view.synchronise_in_range(&shared, location, 20_000.0, AlwaysTrue));
            }
            (changes, view.len())
        })
    };

    {
        let mut master = shared.write();
        assert_ok!(master.add(Airspace::circle("late", location, 500.0)));
        master.optimise();
    }

    let (changes, len) = warnings.join().unwrap();
    assert!((1..=2).contains(&changes), "{changes} changes");
    assert!((3..=4).contains(&len), "{len} airspaces");

    let mut view = AirspacesView::new();
    view.synchronise_in_range(&shared, location, 20_000.0, AlwaysTrue);
    assert_eq!(view.len(), 4);
}
