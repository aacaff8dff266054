//! DAF (Double Precision Array File) file record parsing.
//!
//! A DAF container (for us, always an SPK ephemeris kernel) starts with a
//! fixed 1024-byte file record holding the summary layout (`ND`/`NI`), the
//! record numbers of the first and last summary records (`FWARD`/`BWARD`),
//! the first free address, and two descriptive strings.
//!
//! # Endianness
//!
//! DAF files ship in both `LTL-IEEE` and `BIG-IEEE` flavors and the file
//! record does not lead with a marker that is byte-order independent, so the
//! order is detected by probing: `ND` is read little-endian first, and when
//! the value is outside the plausible `[1, 100]` range the read is retried
//! big-endian. Every later read of the file uses the detected order.

use nom::bytes::complete::take;
use nom::number::complete::i32 as nom_i32;
use nom::number::Endianness;
use nom::IResult;
use std::fmt;

use crate::hilal_errors::HilalError;

/// Size of one DAF record in bytes.
pub const DAF_RECORD_SIZE: usize = 1024;

/// In-memory representation of the DAF/SPK file record.
///
/// String fields are trimmed of trailing padding.
#[derive(Debug, PartialEq, Clone)]
pub struct DafHeader {
    /// 8-byte identifier, `"DAF/SPK"` for an ephemeris kernel.
    pub idword: String,
    /// 60-byte, padded internal kernel name.
    pub internal_filename: String,
    /// Number of double-precision components in each summary (ND, 2 for SPK).
    pub nd: i32,
    /// Number of integer components in each summary (NI, 6 for SPK).
    pub ni: i32,
    /// Record index of the first summary record (forward pointer, 1-based).
    pub fward: i32,
    /// Record index of the last summary record (backward pointer, 1-based).
    pub bward: i32,
    /// First free address (in double-precision words, 1-based).
    pub free: i32,
    /// Platform tag describing the numeric representation (e.g. `LTL-IEEE`).
    pub locfmt: String,
    /// Detected byte order of the file.
    pub endianness: Endianness,
}

/// Probe `ND` at byte offset 8 to detect the byte order of the file.
fn detect_endianness(input: &[u8]) -> Result<Endianness, HilalError> {
    if input.len() < 12 {
        return Err(HilalError::KernelParse(
            "file shorter than the 1024-byte DAF file record".into(),
        ));
    }
    let nd_bytes: [u8; 4] = input[8..12].try_into().expect("4-byte slice");
    let nd_le = i32::from_le_bytes(nd_bytes);
    if (1..=100).contains(&nd_le) {
        return Ok(Endianness::Little);
    }
    let nd_be = i32::from_be_bytes(nd_bytes);
    if (1..=100).contains(&nd_be) {
        return Ok(Endianness::Big);
    }
    Err(HilalError::KernelParse(format!(
        "ND field decodes to {nd_le} (LE) / {nd_be} (BE); not a DAF file"
    )))
}

fn parse_fields(input: &[u8], endianness: Endianness) -> IResult<&[u8], DafHeader> {
    let (input, id_word) = take(8usize)(input)?; // "DAF/SPK "
    let (input, nd) = nom_i32(endianness)(input)?; // ND
    let (input, ni) = nom_i32(endianness)(input)?; // NI
    let (input, ifname) = take(60usize)(input)?; // internal file name
    let (input, fward) = nom_i32(endianness)(input)?; // forward ptr
    let (input, bward) = nom_i32(endianness)(input)?; // backward ptr
    let (input, free) = nom_i32(endianness)(input)?; // first free address
    let (input, locfmt) = take(8usize)(input)?; // location format

    Ok((
        input,
        DafHeader {
            idword: String::from_utf8_lossy(id_word).trim().to_string(),
            internal_filename: String::from_utf8_lossy(ifname).trim().to_string(),
            nd,
            ni,
            fward,
            bward,
            free,
            locfmt: String::from_utf8_lossy(locfmt).trim().to_string(),
            endianness,
        },
    ))
}

impl DafHeader {
    /// Parse the file record at the start of `input`.
    ///
    /// Arguments
    /// ---------
    /// * `input`: the kernel bytes, at least one full DAF record long.
    ///
    /// Return
    /// ------
    /// * The parsed header with the detected byte order, or
    ///   [`HilalError::KernelParse`] when the magic string, `ND`, or the
    ///   summary pointers are inconsistent.
    pub fn parse(input: &[u8]) -> Result<DafHeader, HilalError> {
        if input.len() < DAF_RECORD_SIZE {
            return Err(HilalError::KernelParse(
                "file shorter than the 1024-byte DAF file record".into(),
            ));
        }

        let endianness = detect_endianness(input)?;
        let (_, header) = parse_fields(input, endianness)
            .map_err(|e| HilalError::KernelParse(format!("file record: {e}")))?;

        if !header.idword.starts_with("DAF/SPK") {
            return Err(HilalError::KernelParse(format!(
                "bad id word '{}'; expected DAF/SPK",
                header.idword
            )));
        }
        if header.fward < 2 || header.bward < header.fward {
            return Err(HilalError::KernelParse(format!(
                "inconsistent summary pointers fward={} bward={}",
                header.fward, header.bward
            )));
        }

        Ok(header)
    }

    /// Byte length of one summary in a summary record: `ND*8 + NI*4`.
    pub fn summary_size(&self) -> usize {
        self.nd as usize * 8 + self.ni as usize * 4
    }
}

impl fmt::Display for DafHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 18;
        const VALUE_WIDTH: usize = 50;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );

        let order = match self.endianness {
            Endianness::Big => "big-endian",
            _ => "little-endian",
        };

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "DAF File Record",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;

        for (label, value) in [
            ("ID Word", self.idword.clone()),
            ("Internal Name", self.internal_filename.clone()),
            ("ND (doubles)", self.nd.to_string()),
            ("NI (integers)", self.ni.to_string()),
            ("Forward Ptr", self.fward.to_string()),
            ("Backward Ptr", self.bward.to_string()),
            ("Free Addr", self.free.to_string()),
            ("Binary Format", format!("{} ({order})", self.locfmt)),
        ] {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }

        writeln!(f, "{border}")
    }
}
