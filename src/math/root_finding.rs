//! Brent's method and a scan-and-refine multi-root search.
//!
//! Event timing needs the instant where an altitude function crosses a
//! threshold to about half a second over a window of several hours. Brent's
//! combination of inverse quadratic interpolation, secant steps and
//! bisection fallback converges superlinearly on these smooth functions
//! while never leaving the bracket.

/// Iteration cap for [`brent`]. Altitude functions reach the 0.5 s event
/// tolerance in well under 64 iterations from a 600 s bracket.
const MAX_ITERATIONS: usize = 64;

/// Roots closer than this (in the abscissa unit) are considered duplicates
/// by [`find_roots`].
const DEDUP_SPACING: f64 = 1e-6;

/// Locate a sign change of `f` inside `[x1, x2]` with Brent's method.
///
/// Arguments
/// ---------
/// * `f`: the function to solve; must be continuous on `[x1, x2]`.
/// * `x1`, `x2`: bracket endpoints.
/// * `tol`: absolute tolerance on the bracket width at termination.
///
/// Return
/// ------
/// * `Some(root)` once the bracket shrinks below the tolerance (or an exact
///   zero is hit), `None` when `f(x1)` and `f(x2)` have the same sign: an
///   unbracketed call is not an error, it reports "no root here".
pub fn brent<F: Fn(f64) -> f64>(f: F, x1: f64, x2: f64, tol: f64) -> Option<f64> {
    let mut a = x1;
    let mut b = x2;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa.signum() == fb.signum() {
        return None;
    }

    // c is the last accepted point on the far side of the sign change.
    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = b - a;

    for _ in 0..MAX_ITERATIONS {
        if (fb > 0.0) == (fc > 0.0) {
            // b and c no longer bracket: pull c back to a.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Some(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Interpolation attempt: secant when only two points are
            // distinct, inverse quadratic through (a, b, c) otherwise.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q0 = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q0 * (q0 - r) - (b - a) * (r - 1.0)),
                    (q0 - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                // Interpolation accepted.
                e = d;
                d = p / q;
            } else {
                // Falls outside the safe region: bisect.
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
    }

    Some(b)
}

/// Find every sign change of `f` on `[a, b]` by scanning `steps` equal
/// sub-intervals and refining each bracket with [`brent`].
///
/// Duplicate roots (closer than 1e-6) coming from adjacent sub-intervals
/// are collapsed. Roots are returned in increasing order.
pub fn find_roots<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, steps: usize) -> Vec<f64> {
    let mut roots: Vec<f64> = Vec::new();
    if steps == 0 || b <= a {
        return roots;
    }

    let h = (b - a) / steps as f64;
    let mut x0 = a;
    let mut f0 = f(x0);

    for i in 1..=steps {
        let x1 = a + h * i as f64;
        let f1 = f(x1);

        if f0 == 0.0 || f0.signum() != f1.signum() {
            if let Some(root) = brent(&f, x0, x1, 1e-9 * (b - a).abs().max(1.0)) {
                let duplicate = roots
                    .last()
                    .is_some_and(|last| (last - root).abs() < DEDUP_SPACING);
                if !duplicate {
                    roots.push(root);
                }
            }
        }

        x0 = x1;
        f0 = f1;
    }

    roots
}
