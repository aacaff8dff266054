//! Binary DAF/SPK ephemeris kernel reader.
//!
//! [`SpkKernel`] owns the raw kernel bytes and a read-only index of
//! segments keyed by `(target, center)`. Queries decode the one Chebyshev
//! record covering the requested epoch on demand, so a kernel is cheap to
//! share behind an `Arc` and a query allocates one small coefficient
//! vector.
//!
//! A kernel rarely stores every pair directly; [`SpkKernel::state`] chains
//! segments (Moon and Earth via the Earth-Moon barycenter, the Sun via the
//! solar-system barycenter) to synthesize the pairs the crescent pipeline
//! asks for.

pub mod daf_header;
pub mod records;
pub mod summary;

pub use daf_header::DafHeader;
pub use records::ChebRecord;
pub use summary::{SegmentDirectory, SpkSegment};

use std::collections::HashMap;
use std::fmt;
use std::ops::{Neg, Sub};

use crate::constants::{EphemerisTime, Vec3, NAIF_EARTH, NAIF_EMB, NAIF_MOON, NAIF_SSB, NAIF_SUN};
use crate::hilal_errors::HilalError;

/// Position (km) and velocity (km/s) of one body relative to another,
/// in the ICRF/J2000 frame SPK kernels are published in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: self.position - rhs.position,
            velocity: self.velocity - rhs.velocity,
        }
    }
}

impl Neg for StateVector {
    type Output = StateVector;

    fn neg(self) -> StateVector {
        StateVector {
            position: -self.position,
            velocity: -self.velocity,
        }
    }
}

/// A parsed SPK kernel: the raw bytes plus a segment index.
pub struct SpkKernel {
    buffer: Vec<u8>,
    header: DafHeader,
    index: HashMap<(i32, i32), Vec<SpkSegment>>,
}

impl SpkKernel {
    /// Parse a kernel from its raw bytes.
    ///
    /// Arguments
    /// ---------
    /// * `buffer`: the complete file contents (the buffer is kept; records
    ///   are decoded lazily from it).
    ///
    /// Return
    /// ------
    /// * The indexed kernel, or [`HilalError::KernelParse`] when the file
    ///   record, the summary chain, or a segment directory is inconsistent.
    pub fn parse(buffer: Vec<u8>) -> Result<SpkKernel, HilalError> {
        let header = DafHeader::parse(&buffer)?;
        let segments = summary::parse_segments(&buffer, &header)?;

        if segments.is_empty() {
            return Err(HilalError::KernelParse(
                "kernel contains no type 2 or type 3 segments".into(),
            ));
        }

        let mut index: HashMap<(i32, i32), Vec<SpkSegment>> = HashMap::new();
        for segment in segments {
            index
                .entry((segment.target, segment.center))
                .or_default()
                .push(segment);
        }

        Ok(SpkKernel {
            buffer,
            header,
            index,
        })
    }

    /// The parsed file record.
    pub fn header(&self) -> &DafHeader {
        &self.header
    }

    /// The `(target, center)` pairs directly present in the kernel.
    pub fn pairs(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.index.keys().copied()
    }

    /// Common coverage interval of the segments for a direct pair.
    pub fn coverage(&self, target: i32, center: i32) -> Option<(f64, f64)> {
        let segments = self.index.get(&(target, center))?;
        let start = segments.iter().map(|s| s.start_et).fold(f64::INFINITY, f64::min);
        let end = segments.iter().map(|s| s.end_et).fold(f64::NEG_INFINITY, f64::max);
        Some((start, end))
    }

    /// State from a directly-stored segment, without chaining.
    ///
    /// Return
    /// ------
    /// * `Ok(None)` when the kernel has no segment for the pair,
    ///   [`HilalError::OutOfRange`] when segments exist but none covers
    ///   `et`, `Ok(Some(state))` otherwise.
    fn direct_state(
        &self,
        target: i32,
        center: i32,
        et: EphemerisTime,
    ) -> Result<Option<StateVector>, HilalError> {
        let Some(segments) = self.index.get(&(target, center)) else {
            return Ok(None);
        };

        let segment = segments
            .iter()
            .find(|s| et >= s.start_et && et <= s.end_et)
            .ok_or(HilalError::OutOfRange { et, target, center })?;

        let record =
            ChebRecord::decode(&self.buffer, self.header.endianness, segment, et)?;
        let n_coeff = segment.coefficients_per_component();
        let (position, velocity) = match segment.data_type {
            3 => record.evaluate_type3(et, n_coeff),
            _ => record.evaluate_type2(et, n_coeff),
        };
        Ok(Some(StateVector { position, velocity }))
    }

    /// Require a direct pair; a missing pair becomes a `NoSegmentPath` for
    /// the original `(want_target, want_center)` request.
    fn require_direct(
        &self,
        target: i32,
        center: i32,
        et: EphemerisTime,
        want_target: i32,
        want_center: i32,
    ) -> Result<StateVector, HilalError> {
        self.direct_state(target, center, et)?
            .ok_or(HilalError::NoSegmentPath {
                target: want_target,
                center: want_center,
            })
    }

    /// State of `target` relative to `center` at `et`, chaining segments
    /// when the pair is not stored directly.
    ///
    /// Chaining strategies, tried after the direct lookup:
    ///
    /// | request | synthesis |
    /// |---|---|
    /// | Moon / Earth | (Moon, EMB) - (Earth, EMB) |
    /// | Earth / Moon | negation of the above |
    /// | Sun / Earth | (Sun, SSB) - ((EMB, SSB) - (Earth, EMB)) |
    /// | Earth / Sun | negation of the above |
    /// | generic (a, b) | (a, SSB) - (b, SSB) |
    ///
    /// Return
    /// ------
    /// * The chained state, [`HilalError::NoSegmentPath`] when no strategy
    ///   applies, or [`HilalError::OutOfRange`] from any contributing
    ///   segment lookup.
    pub fn state(
        &self,
        target: i32,
        center: i32,
        et: EphemerisTime,
    ) -> Result<StateVector, HilalError> {
        if let Some(state) = self.direct_state(target, center, et)? {
            return Ok(state);
        }

        match (target, center) {
            (NAIF_MOON, NAIF_EARTH) => {
                let moon = self.require_direct(NAIF_MOON, NAIF_EMB, et, target, center)?;
                let earth = self.require_direct(NAIF_EARTH, NAIF_EMB, et, target, center)?;
                Ok(moon - earth)
            }
            (NAIF_EARTH, NAIF_MOON) => {
                let moon = self.require_direct(NAIF_MOON, NAIF_EMB, et, target, center)?;
                let earth = self.require_direct(NAIF_EARTH, NAIF_EMB, et, target, center)?;
                Ok(earth - moon)
            }
            (NAIF_SUN, NAIF_EARTH) => {
                let sun = self.require_direct(NAIF_SUN, NAIF_SSB, et, target, center)?;
                let emb = self.require_direct(NAIF_EMB, NAIF_SSB, et, target, center)?;
                let earth = self.require_direct(NAIF_EARTH, NAIF_EMB, et, target, center)?;
                Ok(sun - (emb - earth))
            }
            (NAIF_EARTH, NAIF_SUN) => {
                let sun = self.require_direct(NAIF_SUN, NAIF_SSB, et, target, center)?;
                let emb = self.require_direct(NAIF_EMB, NAIF_SSB, et, target, center)?;
                let earth = self.require_direct(NAIF_EARTH, NAIF_EMB, et, target, center)?;
                Ok((emb - earth) - sun)
            }
            (a, b) => {
                let a_ssb = self
                    .direct_state(a, NAIF_SSB, et)?
                    .ok_or(HilalError::NoSegmentPath { target, center })?;
                let b_ssb = self
                    .direct_state(b, NAIF_SSB, et)?
                    .ok_or(HilalError::NoSegmentPath { target, center })?;
                Ok(a_ssb - b_ssb)
            }
        }
    }
}

impl fmt::Display for SpkKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        let mut pairs: Vec<_> = self.index.keys().copied().collect();
        pairs.sort_unstable();
        for (target, center) in pairs {
            for segment in &self.index[&(target, center)] {
                write!(f, "{segment}")?;
            }
        }
        Ok(())
    }
}
