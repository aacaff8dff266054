//! Kernel-free crescent visibility estimates and their invariants.

use chrono::{TimeZone, Utc};
use hilal::hilal::Hilal;
use hilal::visibility::OdehZone;

#[test]
fn test_mecca_evening_of_conjunction_not_visible() {
    // 2025-03-29 18:00 UTC: the Moon is barely seven hours past
    // conjunction; from Mecca the crescent cannot be seen.
    let hilal = Hilal::new();
    let estimate = hilal
        .moon_visibility_estimate(
            Utc.with_ymd_and_hms(2025, 3, 29, 18, 0, 0).unwrap(),
            21.4225,
            39.8262,
        )
        .unwrap();

    assert!(
        matches!(estimate.odeh.zone, OdehZone::C | OdehZone::D),
        "zone {} (V = {})",
        estimate.odeh.zone,
        estimate.odeh.v
    );
    assert!(!estimate.odeh.visible_naked_eye);
}

#[test]
fn test_london_next_evening_is_visible() {
    // 2025-03-30 around 19:10 UTC: the Moon is 32 hours old, ten degrees
    // up with the Sun well below the horizon; an easy naked-eye crescent.
    let hilal = Hilal::new();
    let estimate = hilal
        .moon_visibility_estimate(
            Utc.with_ymd_and_hms(2025, 3, 30, 19, 10, 0).unwrap(),
            51.5074,
            -0.1278,
        )
        .unwrap();

    assert!(estimate.arcv > 10.0, "arcv {}", estimate.arcv);
    assert!(estimate.yallop.q > 0.0, "q {}", estimate.yallop.q);
    assert!(estimate.yallop.visible_naked_eye);
    assert!(matches!(estimate.odeh.zone, OdehZone::A | OdehZone::B));
}

#[test]
fn test_estimate_field_invariants() {
    let hilal = Hilal::new();
    for (lat, lon) in [
        (51.5074, -0.1278),
        (21.4225, 39.8262),
        (-33.8688, 151.2093),
        (64.1466, -21.9426),
    ] {
        for hour in [15, 18, 21] {
            let estimate = hilal
                .moon_visibility_estimate(
                    Utc.with_ymd_and_hms(2025, 3, 30, hour, 0, 0).unwrap(),
                    lat,
                    lon,
                )
                .unwrap();

            assert!((0.0..=180.0).contains(&estimate.arcl));
            assert!(estimate.daz > -180.0 && estimate.daz <= 180.0);
            assert!(estimate.width_arcmin >= 0.0);
            assert!(estimate.yallop.q.is_finite());
            assert!(estimate.odeh.v.is_finite());
            assert!((-90.0..=90.0).contains(&estimate.moon_altitude));
            assert!((-90.0..=90.0).contains(&estimate.sun_altitude));
        }
    }
}

#[test]
fn test_visibility_improves_across_evenings() {
    // Same site, same hour, one lunation day apart: the crescent score
    // must improve from the day of conjunction to the next two evenings.
    let hilal = Hilal::new();
    let mut previous_v = f64::NEG_INFINITY;
    for day in [29, 30, 31] {
        let estimate = hilal
            .moon_visibility_estimate(
                Utc.with_ymd_and_hms(2025, 3, day, 18, 45, 0).unwrap(),
                51.5074,
                -0.1278,
            )
            .unwrap();
        assert!(
            estimate.odeh.v > previous_v,
            "day {day}: V {} after {previous_v}",
            estimate.odeh.v
        );
        previous_v = estimate.odeh.v;
    }
}

#[test]
fn test_yallop_odeh_agree_on_extremes() {
    let hilal = Hilal::new();

    // Hopeless case: hours past conjunction.
    let hopeless = hilal
        .moon_visibility_estimate(
            Utc.with_ymd_and_hms(2025, 3, 29, 15, 0, 0).unwrap(),
            21.4225,
            39.8262,
        )
        .unwrap();
    assert!(!hopeless.yallop.visible_naked_eye);
    assert!(!hopeless.odeh.visible_naked_eye);

    // Easy case: a two-day-old moon after sunset.
    let easy = hilal
        .moon_visibility_estimate(
            Utc.with_ymd_and_hms(2025, 3, 31, 19, 30, 0).unwrap(),
            51.5074,
            -0.1278,
        )
        .unwrap();
    assert!(easy.yallop.visible_naked_eye);
    assert!(easy.odeh.visible_with_optical_aid);
}
