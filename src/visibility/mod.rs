//! Crescent geometry and the Yallop / Odeh visibility criteria.
//!
//! Both criteria compare the arc of vision (ARCV) against a cubic of the
//! topocentric crescent width W fitted to centuries of sighting records;
//! they differ in scaling and in the category boundaries.

use std::fmt;

use crate::bodies::crescent_width_arcmin;
use crate::constants::{ArcMin, Degree, Vec3};
use crate::hilal_errors::HilalError;
use crate::math::{angular_separation, normalize_deg_signed};
use crate::observers::AzAlt;

/// The fitted limiting arc of vision for a crescent of width `w`
/// arc-minutes, in degrees.
pub fn arcv_min(w: ArcMin) -> Degree {
    11.8371 - 6.3226 * w + 0.7319 * w * w - 0.1018 * w * w * w
}

/// The five classical crescent quantities at best time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrescentGeometry {
    /// Arc of light: topocentric Sun-Moon elongation, degrees, `[0, 180]`.
    pub arcl: Degree,
    /// Arc of vision: Moon minus Sun airless altitude, degrees.
    pub arcv: Degree,
    /// Sun minus Moon azimuth, degrees, `(-180, 180]`.
    pub daz: Degree,
    /// Topocentric crescent width, arc-minutes.
    pub width_arcmin: ArcMin,
    /// Moonset minus sunset, minutes.
    pub lag_minutes: f64,
}

/// Assemble the geometry from the per-body azimuth/altitude pairs and the
/// topocentric vectors, all evaluated at the same instant.
///
/// Arguments
/// ---------
/// * `moon_airless`, `sun_airless`: azimuth/altitude without refraction.
/// * `moon_topocentric`, `sun_topocentric`: observer-to-body GCRS vectors
///   in km.
/// * `lag_minutes`: moonset minus sunset.
pub fn assemble_geometry(
    moon_airless: &AzAlt,
    sun_airless: &AzAlt,
    moon_topocentric: &Vec3,
    sun_topocentric: &Vec3,
    lag_minutes: f64,
) -> Result<CrescentGeometry, HilalError> {
    let arcl = angular_separation(moon_topocentric, sun_topocentric)?;
    let arcv = moon_airless.altitude - sun_airless.altitude;
    let daz = normalize_deg_signed(sun_airless.azimuth - moon_airless.azimuth);
    let width_arcmin = crescent_width_arcmin(moon_topocentric, arcl);

    Ok(CrescentGeometry {
        arcl,
        arcv,
        daz,
        width_arcmin,
        lag_minutes,
    })
}

/// Yallop's visibility categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YallopCategory {
    /// Easily visible to the naked eye.
    A,
    /// Visible under perfect atmospheric conditions.
    B,
    /// May need optical aid to find the crescent first.
    C,
    /// Needs optical aid throughout.
    D,
    /// Not visible even with a telescope.
    E,
    /// Below the Danjon limit; no crescent forms.
    F,
}

impl fmt::Display for YallopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            YallopCategory::A => "A",
            YallopCategory::B => "B",
            YallopCategory::C => "C",
            YallopCategory::D => "D",
            YallopCategory::E => "E",
            YallopCategory::F => "F",
        };
        write!(f, "{label}")
    }
}

/// Yallop test value and category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YallopResult {
    /// `q = (ARCV - arcv_min(W')) / 10`.
    pub q: f64,
    pub category: YallopCategory,
    /// Category A or B.
    pub visible_naked_eye: bool,
    /// Category A through D (C and D only with optical aid).
    pub visible_with_optical_aid: bool,
}

/// Score a crescent with Yallop's q-test.
pub fn yallop_score(arcv: Degree, width: ArcMin) -> YallopResult {
    let q = (arcv - arcv_min(width)) / 10.0;
    let category = if q > 0.216 {
        YallopCategory::A
    } else if q > -0.014 {
        YallopCategory::B
    } else if q > -0.160 {
        YallopCategory::C
    } else if q > -0.232 {
        YallopCategory::D
    } else if q > -0.293 {
        YallopCategory::E
    } else {
        YallopCategory::F
    };

    YallopResult {
        q,
        category,
        visible_naked_eye: matches!(category, YallopCategory::A | YallopCategory::B),
        visible_with_optical_aid: !matches!(category, YallopCategory::E | YallopCategory::F),
    }
}

/// Odeh's visibility zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdehZone {
    /// Visible to the naked eye.
    A,
    /// Visible with optical aid, possibly by naked eye.
    B,
    /// Visible with optical aid only.
    C,
    /// Not visible.
    D,
}

impl fmt::Display for OdehZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OdehZone::A => "A",
            OdehZone::B => "B",
            OdehZone::C => "C",
            OdehZone::D => "D",
        };
        write!(f, "{label}")
    }
}

/// Odeh test value and zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdehResult {
    /// `V = ARCV - arcv_min(W)`.
    pub v: f64,
    pub zone: OdehZone,
    /// Zone A.
    pub visible_naked_eye: bool,
    /// Zone A, B or C.
    pub visible_with_optical_aid: bool,
}

/// Score a crescent with Odeh's V-test.
pub fn odeh_score(arcv: Degree, width: ArcMin) -> OdehResult {
    let v = arcv - arcv_min(width);
    let zone = if v >= 5.65 {
        OdehZone::A
    } else if v >= 2.00 {
        OdehZone::B
    } else if v >= -0.96 {
        OdehZone::C
    } else {
        OdehZone::D
    };

    OdehResult {
        v,
        zone,
        visible_naked_eye: matches!(zone, OdehZone::A),
        visible_with_optical_aid: !matches!(zone, OdehZone::D),
    }
}
