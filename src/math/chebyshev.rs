//! Chebyshev series evaluation via the Clenshaw recurrence.
//!
//! SPK ephemeris records store positions as Chebyshev expansions of degree
//! 10-15. The Clenshaw form is used instead of the naive power series: the
//! explicit `T_k` recurrence loses accuracy at high degree, while Clenshaw
//! stays stable across the whole `[-1, 1]` interval.

/// Evaluate a Chebyshev expansion `sum(c_k * T_k(x))` at normalized
/// `x` in `[-1, 1]`.
///
/// Arguments
/// ---------
/// * `coeffs`: coefficients `[c_0, c_1, ..., c_n]`.
/// * `x`: normalized evaluation point.
///
/// Return
/// ------
/// * The value of the expansion at `x`.
pub fn clenshaw(coeffs: &[f64], x: f64) -> f64 {
    let n = coeffs.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return coeffs[0];
    }

    let two_x = 2.0 * x;
    let mut b_k1 = 0.0; // b_{k+1}
    let mut b_k2 = 0.0; // b_{k+2}

    for k in (1..n).rev() {
        let b_k = coeffs[k] + two_x * b_k1 - b_k2;
        b_k2 = b_k1;
        b_k1 = b_k;
    }

    coeffs[0] + x * b_k1 - b_k2
}

/// Evaluate a Chebyshev expansion and its derivative at normalized `x`.
///
/// The derivative recurrence is obtained by differentiating Clenshaw's:
///
/// ```text
/// b_k = c_k + 2x*b_{k+1} - b_{k+2}
/// d_k = 2*b_{k+1} + 2x*d_{k+1} - d_{k+2}
/// value      = c_0 + x*b_1 - b_2
/// derivative = b_1 + x*d_1 - d_2
/// ```
///
/// The derivative is with respect to the *normalized* variable; callers
/// evaluating an SPK record rescale by `1/radius` to get a rate per
/// physical second.
///
/// Return
/// ------
/// * `(value, d/dx)` of the expansion at `x`.
pub fn clenshaw_with_derivative(coeffs: &[f64], x: f64) -> (f64, f64) {
    let n = coeffs.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    if n == 1 {
        return (coeffs[0], 0.0);
    }

    let two_x = 2.0 * x;
    let mut b_k1 = 0.0;
    let mut b_k2 = 0.0;
    let mut d_k1 = 0.0;
    let mut d_k2 = 0.0;

    for k in (1..n).rev() {
        let d_k = 2.0 * b_k1 + two_x * d_k1 - d_k2;
        let b_k = coeffs[k] + two_x * b_k1 - b_k2;
        d_k2 = d_k1;
        d_k1 = d_k;
        b_k2 = b_k1;
        b_k1 = b_k;
    }

    let value = coeffs[0] + x * b_k1 - b_k2;
    let derivative = b_k1 + x * d_k1 - d_k2;
    (value, derivative)
}
