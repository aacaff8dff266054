//! Synthetic in-memory DAF/SPK kernels for integration tests.
//!
//! Every segment models straight-line motion `p(t) = p0 + v * t`, which a
//! degree-1 Chebyshev record represents exactly: evaluation, velocities
//! and segment chaining can all be checked against closed-form values.

// Not every test binary uses every helper.
#![allow(dead_code)]

/// One synthetic segment.
#[derive(Debug, Clone)]
pub struct KernelSegment {
    pub target: i32,
    pub center: i32,
    /// 2 (position) or 3 (position + velocity).
    pub data_type: i32,
    /// Start of coverage, ET seconds.
    pub start_et: f64,
    /// Record span in seconds.
    pub intlen: f64,
    pub n_records: usize,
    /// Position at et = 0, km.
    pub p0: [f64; 3],
    /// Constant velocity, km/s.
    pub v: [f64; 3],
}

impl KernelSegment {
    pub fn end_et(&self) -> f64 {
        self.start_et + self.intlen * self.n_records as f64
    }

    fn rsize(&self) -> usize {
        // mid, radius + 2 coefficients per component.
        let components = if self.data_type == 3 { 6 } else { 3 };
        2 + 2 * components
    }

    /// Exact position at `et`.
    pub fn position_at(&self, et: f64) -> [f64; 3] {
        [
            self.p0[0] + self.v[0] * et,
            self.p0[1] + self.v[1] * et,
            self.p0[2] + self.v[2] * et,
        ]
    }
}

struct Writer {
    bytes: Vec<u8>,
    big_endian: bool,
}

impl Writer {
    fn push_f64(&mut self, value: f64) {
        if self.big_endian {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn push_i32(&mut self, value: i32) {
        if self.big_endian {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Build a complete kernel file image.
///
/// One summary record per segment, linked through the `next` pointers, so
/// multi-record summary walking is exercised whenever more than one
/// segment is present.
pub fn build_kernel(segments: &[KernelSegment], big_endian: bool) -> Vec<u8> {
    let n = segments.len();
    assert!(n > 0, "a kernel needs at least one segment");

    // Record 1: file record. Records 2..=n+1: summary records. Data after.
    let data_start_record = n + 2;
    let data_start_word = (data_start_record - 1) * 1024 / 8 + 1;

    // Assign addresses.
    let mut addresses = Vec::with_capacity(n);
    let mut word = data_start_word;
    for segment in segments {
        let n_words = segment.n_records * segment.rsize() + 4;
        addresses.push((word as i32, (word + n_words - 1) as i32));
        word += n_words;
    }

    let mut w = Writer {
        bytes: Vec::new(),
        big_endian,
    };

    // File record.
    w.bytes.extend_from_slice(b"DAF/SPK ");
    w.push_i32(2); // ND
    w.push_i32(6); // NI
    let mut name = [b' '; 60];
    name[..9].copy_from_slice(b"TEST KRNL");
    w.bytes.extend_from_slice(&name);
    w.push_i32(2); // FWARD
    w.push_i32((n + 1) as i32); // BWARD
    w.push_i32(word as i32); // FREE
    if big_endian {
        w.bytes.extend_from_slice(b"BIG-IEEE");
    } else {
        w.bytes.extend_from_slice(b"LTL-IEEE");
    }
    w.bytes.resize(1024, 0);

    // Summary records, one per segment.
    for (i, segment) in segments.iter().enumerate() {
        let record_start = w.bytes.len();
        let next = if i + 1 < n { (i + 3) as f64 } else { 0.0 };
        let prev = if i == 0 { 0.0 } else { (i + 1) as f64 };
        w.push_f64(next);
        w.push_f64(prev);
        w.push_f64(1.0); // one summary in this record

        w.push_f64(segment.start_et);
        w.push_f64(segment.end_et());
        w.push_i32(segment.target);
        w.push_i32(segment.center);
        w.push_i32(1); // frame: J2000
        w.push_i32(segment.data_type);
        w.push_i32(addresses[i].0);
        w.push_i32(addresses[i].1);

        w.bytes.resize(record_start + 1024, 0);
    }

    // Segment data.
    for segment in segments {
        let radius = segment.intlen / 2.0;
        for record in 0..segment.n_records {
            let t0 = segment.start_et + segment.intlen * record as f64;
            let mid = t0 + radius;

            w.push_f64(mid);
            w.push_f64(radius);
            // Position coefficients: p(mid) + v*radius*T_1(x).
            for axis in 0..3 {
                w.push_f64(segment.p0[axis] + segment.v[axis] * mid);
                w.push_f64(segment.v[axis] * radius);
            }
            if segment.data_type == 3 {
                // Velocity coefficients: the constant velocity itself.
                for axis in 0..3 {
                    w.push_f64(segment.v[axis]);
                    w.push_f64(0.0);
                }
            }
        }
        // Directory footer.
        w.push_f64(segment.start_et);
        w.push_f64(segment.intlen);
        w.push_f64(segment.rsize() as f64);
        w.push_f64(segment.n_records as f64);
    }

    w.bytes
}

/// A DE442S-shaped kernel: the four pairs the sighting pipeline needs,
/// with small round numbers for hand checking.
pub fn earth_moon_sun_kernel(big_endian: bool) -> (Vec<KernelSegment>, Vec<u8>) {
    let segments = vec![
        KernelSegment {
            target: 301,
            center: 3,
            data_type: 2,
            start_et: 0.0,
            intlen: 86_400.0,
            n_records: 4,
            p0: [380_000.0, 12_000.0, -4_000.0],
            v: [0.5, -0.2, 0.1],
        },
        KernelSegment {
            target: 399,
            center: 3,
            data_type: 2,
            start_et: 0.0,
            intlen: 86_400.0,
            n_records: 4,
            p0: [-4_500.0, -150.0, 50.0],
            v: [-0.006, 0.002, -0.001],
        },
        KernelSegment {
            target: 3,
            center: 0,
            data_type: 2,
            start_et: 0.0,
            intlen: 172_800.0,
            n_records: 2,
            p0: [1.4e8, 4.0e7, 1.5e7],
            v: [-8.0, 27.0, 11.0],
        },
        KernelSegment {
            target: 10,
            center: 0,
            data_type: 2,
            start_et: 0.0,
            intlen: 172_800.0,
            n_records: 2,
            p0: [300_000.0, -500_000.0, -200_000.0],
            v: [0.001, 0.002, -0.003],
        },
    ];
    let bytes = build_kernel(&segments, big_endian);
    (segments, bytes)
}
