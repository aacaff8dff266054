use thiserror::Error;

#[derive(Error, Debug)]
pub enum HilalError {
    #[error("Invalid SPK kernel: {0}")]
    KernelParse(String),

    #[error("No segment path from body {target} to center {center} in the loaded kernel")]
    NoSegmentPath { target: i32, center: i32 },

    #[error("Epoch {et} s past J2000 is outside the coverage of segment ({target}, {center})")]
    OutOfRange { et: f64, target: i32, center: i32 },

    #[error("Cannot normalize a zero-length vector")]
    ZeroVector,

    #[error("Invalid leap second kernel: {0}")]
    LskParse(String),

    #[error("Observer coordinates must be finite: {0}")]
    InvalidObserver(#[from] ordered_float::FloatIsNan),
}
