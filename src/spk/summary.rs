//! Summary-record chain: the directory of segments inside a DAF/SPK file.
//!
//! Summary records form a doubly-linked list of 1024-byte records starting
//! at `FWARD`. Each holds up to 25 summaries (for SPK's `ND=2`, `NI=6`
//! layout); a summary describes one contiguous-time block of Chebyshev
//! records for a `(target, center)` pair.

use nom::number::complete::{f64 as nom_f64, i32 as nom_i32};
use nom::number::Endianness;
use nom::IResult;
use std::fmt;

use crate::hilal_errors::HilalError;
use crate::spk::daf_header::{DafHeader, DAF_RECORD_SIZE};

/// One segment of an SPK kernel: a `(target, center)` pair, its time span,
/// its data type and the address range of its Chebyshev data.
#[derive(Debug, PartialEq, Clone)]
pub struct SpkSegment {
    /// Start of coverage, ET seconds past J2000 TDB.
    pub start_et: f64,
    /// End of coverage, ET seconds past J2000 TDB.
    pub end_et: f64,
    /// NAIF id of the body the segment describes.
    pub target: i32,
    /// NAIF id of the center the states are relative to.
    pub center: i32,
    /// Reference frame id (1 = J2000).
    pub frame_id: i32,
    /// SPK data type: 2 (Chebyshev position) or 3 (position + velocity).
    pub data_type: i32,
    /// First address of the segment data (1-based double-precision words).
    pub initial_addr: i32,
    /// Last address of the segment data (1-based double-precision words).
    pub final_addr: i32,
    /// Decoded four-double directory at the tail of the segment.
    pub directory: SegmentDirectory,
}

/// Directory footer of a type 2/3 segment: the last four doubles of the
/// segment data.
#[derive(Debug, PartialEq, Clone)]
pub struct SegmentDirectory {
    /// ET of the start of the first record (seconds past J2000 TDB).
    pub init: f64,
    /// Time span of each record in seconds.
    pub intlen: f64,
    /// Record size in double-precision words (not bytes).
    pub rsize: usize,
    /// Number of records in the segment.
    pub n_records: usize,
}

impl SpkSegment {
    /// Record index covering `et`, clamped to the valid range.
    pub fn record_index(&self, et: f64) -> usize {
        let idx = ((et - self.directory.init) / self.directory.intlen).floor();
        (idx.max(0.0) as usize).min(self.directory.n_records.saturating_sub(1))
    }

    /// Byte offset of record `idx` inside the kernel buffer.
    pub fn record_offset(&self, idx: usize) -> usize {
        (self.initial_addr as usize - 1) * 8 + idx * self.directory.rsize * 8
    }

    /// Number of Chebyshev coefficients per component.
    pub fn coefficients_per_component(&self) -> usize {
        let per_record = self.directory.rsize - 2;
        match self.data_type {
            3 => per_record / 6,
            _ => per_record / 3,
        }
    }
}

fn parse_directory_values(
    input: &[u8],
    endianness: Endianness,
) -> IResult<&[u8], (f64, f64, f64, f64)> {
    let (input, init) = nom_f64(endianness)(input)?;
    let (input, intlen) = nom_f64(endianness)(input)?;
    let (input, rsize) = nom_f64(endianness)(input)?;
    let (input, n) = nom_f64(endianness)(input)?;
    Ok((input, (init, intlen, rsize, n)))
}

fn parse_control_area(input: &[u8], endianness: Endianness) -> IResult<&[u8], (f64, f64, f64)> {
    let (input, next) = nom_f64(endianness)(input)?;
    let (input, prev) = nom_f64(endianness)(input)?;
    let (input, nsum) = nom_f64(endianness)(input)?;
    Ok((input, (next, prev, nsum)))
}

fn parse_summary_fields(
    input: &[u8],
    endianness: Endianness,
) -> IResult<&[u8], (f64, f64, i32, i32, i32, i32, i32, i32)> {
    let (input, start_et) = nom_f64(endianness)(input)?;
    let (input, end_et) = nom_f64(endianness)(input)?;
    let (input, target) = nom_i32(endianness)(input)?;
    let (input, center) = nom_i32(endianness)(input)?;
    let (input, frame_id) = nom_i32(endianness)(input)?;
    let (input, data_type) = nom_i32(endianness)(input)?;
    let (input, initial_addr) = nom_i32(endianness)(input)?;
    let (input, final_addr) = nom_i32(endianness)(input)?;
    Ok((
        input,
        (
            start_et,
            end_et,
            target,
            center,
            frame_id,
            data_type,
            initial_addr,
            final_addr,
        ),
    ))
}

/// Decode the four-double directory footer of a segment.
fn parse_directory(
    buffer: &[u8],
    endianness: Endianness,
    final_addr: i32,
) -> Result<SegmentDirectory, HilalError> {
    let end_byte = final_addr as usize * 8;
    if final_addr < 4 || end_byte > buffer.len() {
        return Err(HilalError::KernelParse(format!(
            "segment directory at address {final_addr} is outside the file"
        )));
    }
    let dir_bytes = &buffer[end_byte - 32..end_byte];

    let (_, (init, intlen, rsize, n)) = parse_directory_values(dir_bytes, endianness)
        .map_err(|e| HilalError::KernelParse(format!("segment directory: {e}")))?;

    if !(intlen > 0.0 && rsize >= 4.0 && n >= 1.0) {
        return Err(HilalError::KernelParse(format!(
            "implausible segment directory: init={init} intlen={intlen} rsize={rsize} n={n}"
        )));
    }

    Ok(SegmentDirectory {
        init,
        intlen,
        rsize: rsize as usize,
        n_records: n as usize,
    })
}

/// Walk the summary-record linked list and decode every type 2/3 segment.
///
/// Arguments
/// ---------
/// * `buffer`: the whole kernel file.
/// * `header`: the parsed file record (gives `FWARD` and the byte order).
///
/// Return
/// ------
/// * All Chebyshev segments in file order. Segments of unsupported data
///   types are skipped: the kernels this crate targets (DE442S) only carry
///   types 2 and 3, and an unrelated extra segment must not make the whole
///   kernel unusable.
pub fn parse_segments(buffer: &[u8], header: &DafHeader) -> Result<Vec<SpkSegment>, HilalError> {
    let endianness = header.endianness;
    let summary_size = header.summary_size();
    let mut segments = Vec::new();

    let mut record_number = header.fward as usize;
    let mut visited = 0usize;

    while record_number != 0 {
        // Guard against a corrupted next-pointer loop.
        visited += 1;
        if visited > 10_000 {
            return Err(HilalError::KernelParse(
                "summary record chain does not terminate".into(),
            ));
        }

        let start = (record_number - 1) * DAF_RECORD_SIZE;
        let end = start + DAF_RECORD_SIZE;
        if end > buffer.len() {
            return Err(HilalError::KernelParse(format!(
                "summary record {record_number} is outside the file"
            )));
        }
        let record = &buffer[start..end];

        let (_, (next, _prev, nsum)) = parse_control_area(record, endianness)
            .map_err(|e| HilalError::KernelParse(format!("summary control area: {e}")))?;

        let nsum = nsum as usize;
        if 24 + nsum * summary_size > DAF_RECORD_SIZE {
            return Err(HilalError::KernelParse(format!(
                "summary record {record_number} claims {nsum} summaries"
            )));
        }

        for i in 0..nsum {
            let offset = 24 + i * summary_size;
            let (_, (start_et, end_et, target, center, frame_id, data_type, initial_addr, final_addr)) =
                parse_summary_fields(&record[offset..offset + summary_size], endianness)
                    .map_err(|e| HilalError::KernelParse(format!("summary {i}: {e}")))?;

            if start_et >= end_et {
                return Err(HilalError::KernelParse(format!(
                    "segment ({target}, {center}) has an empty time span"
                )));
            }
            if data_type != 2 && data_type != 3 {
                continue;
            }

            let directory = parse_directory(buffer, endianness, final_addr)?;
            let per_record = directory.rsize.saturating_sub(2);
            let stride = if data_type == 3 { 6 } else { 3 };
            if per_record == 0 || per_record % stride != 0 {
                return Err(HilalError::KernelParse(format!(
                    "segment ({target}, {center}) type {data_type} has rsize {}",
                    directory.rsize
                )));
            }

            segments.push(SpkSegment {
                start_et,
                end_et,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
                directory,
            });
        }

        record_number = next as usize;
    }

    Ok(segments)
}

impl fmt::Display for SpkSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.data_type {
            2 => "Chebyshev position",
            3 => "Chebyshev position and velocity",
            _ => "unsupported",
        };
        let fields = [
            ("target", self.target.to_string()),
            ("center", self.center.to_string()),
            ("frame_id", self.frame_id.to_string()),
            ("data_type", format!("{} ({kind})", self.data_type)),
            ("start_et", format!("{:.3} s", self.start_et)),
            ("end_et", format!("{:.3} s", self.end_et)),
            ("records", self.directory.n_records.to_string()),
            ("interval", format!("{:.0} s", self.directory.intlen)),
        ];

        let label_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
        let value_width = fields.iter().map(|(_, v)| v.len()).max().unwrap_or(10);
        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(f, "{border}")?;
        for (label, value) in fields {
            writeln!(f, "| {label:<label_width$} | {value:<value_width$} |")?;
        }
        writeln!(f, "{border}")
    }
}
