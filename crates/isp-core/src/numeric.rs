/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Fixed-count bisection on a bracket `[lo, hi]`.
///
/// `go_up(x)` returns true when the root lies above `x`. No early exit: the
/// bracket is halved exactly `iterations` times and the final midpoint is
/// returned, so the result is a pure function of the inputs.
pub fn bisect_fixed<F>(mut lo: Real, mut hi: Real, iterations: usize, mut go_up: F) -> Real
where
    F: FnMut(Real) -> bool,
{
    for _ in 0..iterations {
        let mid = 0.5 * (lo + hi);
        if go_up(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Piecewise-linear interpolation on ascending `xs`, clamped at both ends.
pub fn interp_linear_clamped(x: Real, xs: &[Real], ys: &[Real]) -> Real {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return Real::NAN;
    }
    if n == 1 || x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = segment_index(x, xs);
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}

/// Three-point quadratic interpolation on ascending `xs`, extrapolating past
/// the ends with the outermost window.
pub fn interp_quadratic(x: Real, xs: &[Real], ys: &[Real]) -> Real {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 3 {
        return interp_linear_clamped(x, xs, ys);
    }
    let j = segment_index(x, xs).min(n - 3);
    let (x0, x1, x2) = (xs[j], xs[j + 1], xs[j + 2]);
    let (y0, y1, y2) = (ys[j], ys[j + 1], ys[j + 2]);
    let l0 = (x - x1) * (x - x2) / ((x0 - x1) * (x0 - x2));
    let l1 = (x - x0) * (x - x2) / ((x1 - x0) * (x1 - x2));
    let l2 = (x - x0) * (x - x1) / ((x2 - x0) * (x2 - x1));
    y0 * l0 + y1 * l1 + y2 * l2
}

// Index of the segment [xs[i], xs[i+1]] holding x, clamped to valid segments.
fn segment_index(x: Real, xs: &[Real]) -> usize {
    let n = xs.len();
    match xs.iter().rposition(|&xi| xi <= x) {
        Some(i) => i.min(n - 2),
        None => 0,
    }
}
