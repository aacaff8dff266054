use nalgebra::{Matrix3, Vector3};

pub const EPS: f64 = 1e-6;
pub const J2000: f64 = 2_451_545.0; // J2000 epoch as a Julian Date (TT)
pub const DAYS_PER_CENTURY: f64 = 36_525.0;
pub const RADEG: f64 = std::f64::consts::PI / 180.0; // Degrees -> radians conversion factor
pub const RADSEC: f64 = std::f64::consts::PI / 648_000.0; // arcsecond -> radians conversion factor

// Constants
pub const DPI: f64 = 2. * std::f64::consts::PI;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const AU: f64 = 149_597_870.7;

/// TT - TAI offset, exact by definition (seconds)
pub const TT_MINUS_TAI: f64 = 32.184;

/// Earth ellipsoid constants (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0; // Earth equatorial radius in meter
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;
pub const EARTH_ECC_SQUARED: f64 = 2.0 * EARTH_FLATTENING - EARTH_FLATTENING * EARTH_FLATTENING;

/// Mean lunar radius in km (IAU)
pub const MOON_RADIUS_KM: f64 = 1737.4;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// Altitude of the upper limb at rise/set, refraction included (degrees)
pub const RISE_SET_ALTITUDE: f64 = -0.8333;

// NAIF body ids used by the DE442S kernel
pub const NAIF_SSB: i32 = 0;
pub const NAIF_EMB: i32 = 3;
pub const NAIF_SUN: i32 = 10;
pub const NAIF_MOON: i32 = 301;
pub const NAIF_EARTH: i32 = 399;
pub const NAIF_FRAME_J2000: i32 = 1;

// type def
pub type Degree = f64;
pub type Radian = f64;
pub type ArcSec = f64;
pub type ArcMin = f64;
pub type Kilometer = f64;
pub type Meter = f64;
/// Julian Date
pub type JulianDate = f64;
/// Ephemeris time: TDB seconds past J2000
pub type EphemerisTime = f64;

/// 3-vector of doubles; km for positions, km/s for velocities
pub type Vec3 = Vector3<f64>;
/// Row-major 3x3 matrix of doubles
pub type Mat3 = Matrix3<f64>;
