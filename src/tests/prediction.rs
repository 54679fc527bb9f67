//! End to end sweep: catalog to refined pass list.
use crate::prelude::{CancelToken, Catalog, Config, Duration, Predictor, Unit};
use crate::tests::{
    init_logger, iss_elements, test_catalog, test_site, GEO_NAME, ISS_LINE1, ISS_LINE2, ISS_NAME,
};

use std::f64::consts::PI;
use std::io::BufReader;

fn predictor() -> Predictor {
    Predictor::new(Config::default(), test_catalog())
}

#[test]
fn iss_daily_sweep() {
    init_logger();

    let predictor = predictor();
    let start = iss_elements().epoch;

    let events = predictor.predict(
        &[ISS_NAME.to_string()],
        test_site(),
        start,
        &CancelToken::new(),
    );

    // a mid-latitude site sees the ISS several times a day
    assert!(!events.is_empty(), "no pass over 24 h");
    assert!(events.len() <= 10, "{} passes over 24 h", events.len());

    for event in &events {
        assert_eq!(event.satellite, ISS_NAME);

        assert!(event.start.time < event.max.time, "rise after peak");
        assert!(event.max.time < event.end.time, "peak after set");
        // peak sits exactly halfway between the refined crossings
        assert_eq!(
            event.max.time,
            event.start.time + (event.end.time - event.start.time) * 0.5,
        );

        // refined crossings sit on the horizon
        assert!(event.start.elevation_rad.abs() < 1E-3);
        assert!(event.end.elevation_rad.abs() < 1E-3);
        assert!(event.max.elevation_rad > 0.0);

        for point in [&event.start, &event.max, &event.end] {
            assert!((0.0..2.0 * PI).contains(&point.azimuth_rad));
        }

        // LEO passes last minutes, not hours
        let minutes = event.duration().to_unit(Unit::Minute);
        assert!((0.1..20.0).contains(&minutes), "{} min pass", minutes);
    }

    for pair in events.windows(2) {
        assert!(pair[0].start.time <= pair[1].start.time, "ranking broken");
    }
}

#[test]
fn peak_filter_discards_low_passes() {
    init_logger();

    let cfg = Config::default().with_min_elevation_deg(89.9);
    let predictor = Predictor::new(cfg, test_catalog());

    let events = predictor.predict(
        &[ISS_NAME.to_string()],
        test_site(),
        iss_elements().epoch,
        &CancelToken::new(),
    );

    assert!(events.is_empty(), "near-zenith filter retained {:?}", events);
}

#[test]
fn geostationary_yields_no_events() {
    init_logger();

    let predictor = predictor();

    let events = predictor.predict(
        &[GEO_NAME.to_string()],
        test_site(),
        iss_elements().epoch,
        &CancelToken::new(),
    );

    assert!(events.is_empty());
}

#[test]
fn unknown_name_is_skipped() {
    init_logger();

    let predictor = predictor();

    let events = predictor.predict(
        &["NOT IN CATALOG".to_string(), ISS_NAME.to_string()],
        test_site(),
        iss_elements().epoch,
        &CancelToken::new(),
    );

    // the unknown name does not abort the sweep
    assert!(!events.is_empty());
}

#[test]
fn cancelled_before_start() {
    init_logger();

    let predictor = predictor();

    let token = CancelToken::new();
    token.cancel();

    let events = predictor.predict(
        &[ISS_NAME.to_string()],
        test_site(),
        iss_elements().epoch,
        &token,
    );

    assert!(events.is_empty());
}

#[test]
fn cancelled_mid_sweep_returns_early() {
    init_logger();

    // several clones of the same vehicle keep satellites queued while
    // the token flips mid-sweep
    let names: Vec<String> = (0..4).map(|i| format!("ISS CLONE {}", i)).collect();

    let mut text = String::new();
    for name in &names {
        text.push_str(&format!("{}\n{}\n{}\n", name, ISS_LINE1, ISS_LINE2));
    }
    let catalog = Catalog::from_reader(BufReader::new(text.as_bytes())).unwrap();

    let cfg = Config::default().with_horizon(Duration::from_days(30.0));
    let predictor = Predictor::new(cfg, catalog);
    let start = iss_elements().epoch;

    let complete = predictor.predict(&names, test_site(), start, &CancelToken::new());
    assert!(!complete.is_empty());

    let token = CancelToken::new();
    let canceller = {
        let token = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(1));
            token.cancel();
        })
    };

    let partial = predictor.predict(&names, test_site(), start, &token);
    canceller.join().unwrap();

    // the interrupted sweep gave up queued satellites, keeping only
    // fully computed windows
    assert!(partial.len() < complete.len());
    for event in &partial {
        assert!(event.start.time < event.max.time);
        assert!(event.max.time < event.end.time);
    }
}

#[test]
fn sweep_starts_no_earlier_than_element_epoch() {
    init_logger();

    let predictor = predictor();
    let epoch = iss_elements().epoch;

    // requesting a window opening before the epoch clamps to it
    let events = predictor.predict(
        &[ISS_NAME.to_string()],
        test_site(),
        epoch - 12.0 * Unit::Hour,
        &CancelToken::new(),
    );

    assert!(!events.is_empty());
    for event in &events {
        assert!(event.start.time >= epoch);
    }
}
