// Lanczos approximation for the log-gamma function on the complex plane.
// Ported from statrs (MIT license), based on:
// "An Analysis of the Lanczos Gamma Approximation", Glendon Ralph Pugh, 2004 p. 116

use num_complex::Complex64;

const GAMMA_R: f64 = 10.900511;

const GAMMA_DK: &[f64] = &[
    2.48574089138753565546e-5,
    1.05142378581721974210,
    -3.45687097222016235469,
    4.51227709466894823700,
    -2.98285225323576655721,
    1.05639711577126713077,
    -1.95428773191645869583e-1,
    1.70970543404441224307e-2,
    -5.71926117404305781283e-4,
    4.63399473359905636708e-6,
    -2.71994908488607703910e-9,
];

const LN_TWO_SQRT_E_OVER_PI: f64 = 0.620_782_237_635_245_2;

/// Distance from a non-positive integer below which an argument is a pole.
pub const POLE_TOLERANCE: f64 = 1e-10;

/// Returns the non-positive integer `-k` when `z` lies on a pole of `Γ`.
pub fn pole_index(z: Complex64) -> Option<u64> {
    if z.re > POLE_TOLERANCE || z.im.abs() > POLE_TOLERANCE {
        return None;
    }
    let k = (-z.re).round();
    if (z.re + k).abs() <= POLE_TOLERANCE {
        Some(k as u64)
    } else {
        None
    }
}

#[inline]
fn ln_gamma_lanczos(z: Complex64) -> Complex64 {
    let s = GAMMA_DK
        .iter()
        .enumerate()
        .skip(1)
        .fold(Complex64::new(GAMMA_DK[0], 0.0), |s, (i, &dk)| {
            s + dk / (z + (i as f64 - 1.0))
        });

    s.ln() + LN_TWO_SQRT_E_OVER_PI + (z - 0.5) * ((z - 0.5 + GAMMA_R) / std::f64::consts::E).ln()
}

/// Principal-sheet-agnostic `ln Γ(z)` for complex `z`.
///
/// The imaginary part is only defined modulo `2π`, which is all a ratio
/// `exp(ln Γ(a) - ln Γ(b))` needs. Arguments with `Re z < 1/2` are shifted
/// right with `Γ(z) = Γ(z + k) / (z (z + 1) ... (z + k - 1))`, so large
/// imaginary parts never pass through `sin(πz)`.
///
/// Returns `None` on a pole (see [`POLE_TOLERANCE`]).
pub fn ln_gamma(z: Complex64) -> Option<Complex64> {
    if !(z.re.is_finite() && z.im.is_finite()) {
        return None;
    }
    if pole_index(z).is_some() {
        return None;
    }
    if z.re >= 0.5 {
        return Some(ln_gamma_lanczos(z));
    }

    let shift = (0.5 - z.re).ceil() as usize;
    let log_rising = (0..shift).fold(Complex64::new(0.0, 0.0), |acc, j| acc + (z + j as f64).ln());
    Some(ln_gamma_lanczos(z + shift as f64) - log_rising)
}

/// `Γ(a) / Γ(b)` evaluated in log space.
///
/// A pole in `b` makes the ratio vanish; a pole in `a` is reported as `None`.
pub fn gamma_ratio(a: Complex64, b: Complex64) -> Option<Complex64> {
    let ln_a = ln_gamma(a)?;
    match ln_gamma(b) {
        Some(ln_b) => Some((ln_a - ln_b).exp()),
        None if pole_index(b).is_some() => Some(Complex64::new(0.0, 0.0)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn gamma(z: Complex64) -> Complex64 {
        ln_gamma(z).unwrap().exp()
    }

    #[test]
    fn ln_gamma_known_values() {
        assert!(ln_gamma(Complex64::new(1.0, 0.0)).unwrap().norm() < 1e-14);
        assert!(ln_gamma(Complex64::new(2.0, 0.0)).unwrap().norm() < 1e-14);
        assert!((gamma(Complex64::new(5.0, 0.0)).re - 24.0).abs() < 1e-11);
        // Gamma(0.5) = sqrt(pi)
        assert!((gamma(Complex64::new(0.5, 0.0)).re - PI.sqrt()).abs() < 1e-14);
        // Gamma(-0.5) = -2*sqrt(pi)
        let g = gamma(Complex64::new(-0.5, 0.0));
        assert!((g.re + 2.0 * PI.sqrt()).abs() < 1e-13);
        assert!(g.im.abs() < 1e-13);
    }

    #[test]
    fn real_axis_matches_statrs() {
        for &x in &[0.5, 0.75, 1.3, 2.5, 7.25, 20.0, 143.5] {
            let ours = ln_gamma(Complex64::new(x, 0.0)).unwrap();
            let reference = statrs::function::gamma::ln_gamma(x);
            assert!(
                (ours.re - reference).abs() < 1e-12 * reference.abs().max(1.0),
                "x={x} ours={} statrs={reference}",
                ours.re
            );
            assert!(ours.im.abs() < 1e-14);
        }
    }

    #[test]
    fn recurrence_holds_off_the_real_axis() {
        let z = Complex64::new(0.3, 2.7);
        let lhs = gamma(z + 1.0);
        let rhs = z * gamma(z);
        assert!((lhs - rhs).norm() < 1e-12 * lhs.norm());
    }

    #[test]
    fn reflection_formula_holds() {
        let z = Complex64::new(0.25, -1.3);
        let product = gamma(z) * gamma(Complex64::new(1.0, 0.0) - z);
        let expected = PI / (z * PI).sin();
        assert!((product - expected).norm() < 1e-12 * expected.norm());
    }

    #[test]
    fn modulus_on_critical_line_at_large_imaginary_part() {
        // |Γ(1/2 + iy)|^2 = π / cosh(πy)
        for &y in &[10.0, 50.0, 150.0] {
            let ln_g = ln_gamma(Complex64::new(0.5, y)).unwrap();
            let ln_cosh = PI * y + (-2.0 * PI * y).exp().ln_1p() - 2.0_f64.ln();
            let expected = 0.5 * (PI.ln() - ln_cosh);
            assert!(
                (ln_g.re - expected).abs() < 1e-10 * expected.abs().max(1.0),
                "y={y} got={} expected={expected}",
                ln_g.re
            );
        }
    }

    #[test]
    fn poles_are_detected() {
        assert!(ln_gamma(Complex64::new(0.0, 0.0)).is_none());
        assert!(ln_gamma(Complex64::new(-3.0, 0.0)).is_none());
        assert_eq!(pole_index(Complex64::new(-2.0, 0.0)), Some(2));
        assert_eq!(pole_index(Complex64::new(-2.0, 1e-3)), None);
        assert!(ln_gamma(Complex64::new(-3.0, 1e-3)).is_some());
    }

    #[test]
    fn ratio_vanishes_on_denominator_pole() {
        let ratio = gamma_ratio(Complex64::new(1.5, 0.0), Complex64::new(-1.0, 0.0)).unwrap();
        assert_eq!(ratio, Complex64::new(0.0, 0.0));
        assert!(gamma_ratio(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)).is_none());
    }
}
