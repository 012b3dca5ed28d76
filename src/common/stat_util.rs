//! Statistical helpers for contingency-table tests.
use tracing::debug;


/// Two doubles closer than this are treated as equal.
pub const EPSILON: f64 = 1e-6;


const GAMMA_ITMAX: usize = 1000;
const GAMMA_EPS: f64 = 3e-7;
const GAMMA_FPMIN: f64 = 1e-30;


const LANCZOS_COF: [f64; 6] = [
    76.18009172947146,
    -86.50532032941677,
    24.01409824083091,
    -1.231739572450155,
    0.1208650973866179e-2,
    -0.5395239384953e-5,
];


/// Returns `true` if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn equal_doubles(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}


/// Returns `ln x`, or `0` when `x` is (numerically) zero.
#[inline]
pub fn safe_log(x: f64) -> f64 {
    if equal_doubles(x, 0f64) { 0f64 } else { x.ln() }
}


/// Divides `num` by `denom`, returning `0` when `denom` is zero.
#[inline]
pub fn safe_divide(num: f64, denom: f64) -> f64 {
    if equal_doubles(denom, 0f64) { 0f64 } else { num / denom }
}


/// Rounds `x` to `places` decimal places.
#[inline]
pub fn round_to(x: f64, places: i32) -> f64 {
    let mul = 10f64.powi(places);
    (x * mul).round() / mul
}


/// Degrees of freedom of an `r × c` contingency table.
#[inline]
pub fn degrees_of_freedom(table: &[Vec<f64>]) -> usize {
    match table.first() {
        None => 0,
        Some(row) => {
            let r = table.len();
            let c = row.len();
            r.saturating_sub(1) * c.saturating_sub(1)
        },
    }
}


/// Computes the G-statistic `2 Σ O ln(O / E)`
/// of a contingency table given as rows of observed counts.
pub fn g_statistic(table: &[Vec<f64>]) -> f64 {
    let n_rows = table.len();
    if n_rows == 0 { return 0f64; }
    let n_cols = table.iter()
        .map(|row| row.len())
        .max()
        .unwrap_or(0);

    let mut row_margins = vec![0f64; n_rows];
    let mut col_margins = vec![0f64; n_cols];
    let mut n = 0f64;
    for (i, row) in table.iter().enumerate() {
        for (j, &o) in row.iter().enumerate() {
            row_margins[i] += o;
            col_margins[j] += o;
            n += o;
        }
    }

    let mut g = 0f64;
    for (i, row) in table.iter().enumerate() {
        for (j, &o) in row.iter().enumerate() {
            let expected = safe_divide(row_margins[i] * col_margins[j], n);
            g += o * safe_log(safe_divide(o, expected));
        }
    }

    2f64 * g
}


/// Returns the upper-tail probability of `x`
/// under a chi-square distribution with `dof` degrees of freedom.
///
/// Returns `1.0` when `dof == 0`, when `x` is zero,
/// or when the incomplete gamma function does not converge.
pub fn chi_square_p(x: f64, dof: usize) -> f64 {
    if dof == 0 || equal_doubles(x, 0f64) { return 1f64; }
    let x = x.abs();

    let a = dof as f64 * 0.5;
    match gamma_incomplete(a, x * 0.5) {
        Some(p) => 1f64 - p,
        None => {
            debug!(x, dof, "incomplete gamma did not converge");
            1f64
        },
    }
}


/// Regularized lower incomplete gamma function `P(a, x)`.
/// Uses the series expansion for `x < a + 1`
/// and the continued fraction otherwise.
/// Returns `None` on invalid arguments or when neither converges.
pub fn gamma_incomplete(a: f64, x: f64) -> Option<f64> {
    if x < 0f64 || a <= 0f64 { return None; }
    if equal_doubles(x, 0f64) { return Some(0f64); }

    let gln = gamma_ln(a);

    if x < a + 1f64 {
        let mut ap = a;
        let mut sum = 1f64 / a;
        let mut del = sum;
        for _ in 1..=GAMMA_ITMAX {
            ap += 1f64;
            del *= x / ap;
            sum += del;
            if del.abs() < GAMMA_EPS * sum.abs() {
                return Some(sum * (-x + a * x.ln() - gln).exp());
            }
        }
        None
    } else {
        let mut b = x + 1f64 - a;
        let mut c = 1f64 / GAMMA_FPMIN;
        let mut d = 1f64 / b;
        let mut h = d;
        for i in 1..=GAMMA_ITMAX {
            let i = i as f64;
            let an = -i * (i - a);
            b += 2f64;
            d = an * d + b;
            if d.abs() < GAMMA_FPMIN { d = GAMMA_FPMIN; }
            c = b + an / c;
            if c.abs() < GAMMA_FPMIN { c = GAMMA_FPMIN; }
            d = 1f64 / d;
            let del = d * c;
            h *= del;
            if (del - 1f64).abs() < GAMMA_EPS {
                let q = (-x + a * x.ln() - gln).exp() * h;
                return Some(1f64 - q);
            }
        }
        None
    }
}


/// `ln Γ(x)` by the Lanczos approximation.
pub fn gamma_ln(x: f64) -> f64 {
    let mut y = x;
    let mut tmp = x + 5.5;
    tmp -= (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for cof in LANCZOS_COF {
        y += 1f64;
        ser += cof / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}


/// Gaussian density at `x`.
#[inline]
pub fn gaussian(mean: f64, sigma: f64, x: f64) -> f64 {
    let multiplier = 1f64 / (sigma * (2f64 * std::f64::consts::PI).sqrt());
    let exponent = -((x - mean) * (x - mean)) / (2f64 * sigma * sigma);
    multiplier * exponent.exp()
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn g_statistic_of_two_by_two_table() {
        let table = vec![vec![10f64, 30f64], vec![20f64, 40f64]];
        let g = g_statistic(&table);
        assert!((g - 0.8044).abs() < 1e-3, "g = {g}");
        assert_eq!(round_to(g, 1), 0.8);
    }


    #[test]
    fn g_statistic_of_empty_table_is_zero() {
        assert_eq!(g_statistic(&[]), 0f64);
    }


    #[test]
    fn g_statistic_of_ragged_table() {
        // A missing cell counts as zero.
        let ragged = vec![vec![10f64], vec![20f64, 40f64]];
        let padded = vec![vec![10f64, 0f64], vec![20f64, 40f64]];
        assert_eq!(g_statistic(&ragged), g_statistic(&padded));
    }


    #[test]
    fn chi_square_p_edge_cases() {
        assert_eq!(chi_square_p(3.0, 0), 1f64);
        assert_eq!(chi_square_p(0.0, 3), 1f64);
    }


    #[test]
    fn chi_square_p_known_values() {
        // 3.841 is the 95% quantile for one degree of freedom.
        let p = chi_square_p(3.841459, 1);
        assert!((p - 0.05).abs() < 1e-4, "p = {p}");

        // 5.991 is the 95% quantile for two degrees of freedom.
        let p = chi_square_p(5.991465, 2);
        assert!((p - 0.05).abs() < 1e-4, "p = {p}");

        // Large statistics use the continued fraction branch.
        let p = chi_square_p(20.0, 1);
        assert!(p < 1e-4 && p > 0f64, "p = {p}");
    }


    #[test]
    fn gamma_ln_matches_factorials() {
        // Γ(5) = 24
        assert!((gamma_ln(5.0) - 24f64.ln()).abs() < 1e-8);
        // Γ(0.5) = √π
        let expected = std::f64::consts::PI.sqrt().ln();
        assert!((gamma_ln(0.5) - expected).abs() < 1e-8);
    }


    #[test]
    fn safe_helpers() {
        assert_eq!(safe_log(0f64), 0f64);
        assert_eq!(safe_divide(3f64, 0f64), 0f64);
        assert_eq!(safe_divide(3f64, 2f64), 1.5);
        assert_eq!(round_to(0.65625, 2), 0.66);
        assert_eq!(degrees_of_freedom(&[vec![1.0, 2.0], vec![3.0, 4.0]]), 1);
    }
}
