//! # hilal
//!
//! Lunar crescent visibility from first principles: a binary DE442S
//! (DAF/SPK) ephemeris reader, the UTC/TAI/TT/TDB time-scale chain, the
//! IAU 2006/2000B celestial-to-terrestrial transformation, a WGS84
//! topocentric observer model, rise/set event search, and the Yallop and
//! Odeh crescent visibility criteria.
//!
//! The high-level entry point is [`hilal::Hilal`]:
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use hilal::hilal::{Hilal, KernelSource, SightingOptions};
//! use hilal::observers::Observer;
//!
//! let mut engine = Hilal::new();
//! let bytes = std::fs::read("de442s.bsp")?;
//! engine.init_kernel(bytes, KernelSource::File("de442s.bsp".into()))?;
//!
//! let observer = Observer::new(51.5074, -0.1278, 10.0)?;
//! let report = engine.sighting_report(
//!     NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(),
//!     &observer,
//!     &SightingOptions::default(),
//! )?;
//! if let Some(yallop) = report.yallop {
//!     println!("q = {:.3}, category {}", yallop.q, yallop.category);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Without a kernel the facade falls back to the built-in Meeus series
//! for phase, position, illumination and rough visibility estimates.

pub mod bodies;
pub mod constants;
pub mod events;
pub mod frames;
pub mod hilal;
pub mod hilal_errors;
pub mod math;
pub mod observers;
pub mod spk;
pub mod time_scales;
pub mod visibility;

pub use crate::hilal::{Hilal, KernelSource, SightingOptions};
pub use crate::hilal_errors::HilalError;
pub use crate::observers::Observer;
