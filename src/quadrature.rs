//! Gauss-Legendre integration points on the reference element [-1, 1].
//!
//! Scheme `s` integrates with `s + 1` sample points and is exact for
//! polynomials up to degree `2s + 1`.

/// One abscissa/weight pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaussPoint {
    pub xi: f32,
    pub weight: f32,
}

const fn gp(xi: f32, weight: f32) -> GaussPoint {
    GaussPoint { xi, weight }
}

const SCHEME_0: [GaussPoint; 1] = [gp(0.0, 2.0)];

const SCHEME_1: [GaussPoint; 2] = [
    gp(-0.577_350_26, 1.0), // -1/sqrt(3)
    gp(0.577_350_26, 1.0),
];

const SCHEME_2: [GaussPoint; 3] = [
    gp(-0.774_596_7, 0.555_555_56), // -sqrt(3/5), 5/9
    gp(0.0, 0.888_888_9),           // 8/9
    gp(0.774_596_7, 0.555_555_56),
];

const SCHEME_3: [GaussPoint; 4] = [
    gp(-0.861_136_3, 0.347_854_85),
    gp(-0.339_981_04, 0.652_145_15),
    gp(0.339_981_04, 0.652_145_15),
    gp(0.861_136_3, 0.347_854_85),
];

/// Highest supported scheme index.
pub const MAX_SCHEME: usize = 3;

/// Integration points for `scheme`, or `None` when the scheme is out of table
/// range. Index `i` of the returned slice matches abscissa `i` of the scheme.
pub fn points(scheme: usize) -> Option<&'static [GaussPoint]> {
    match scheme {
        0 => Some(&SCHEME_0),
        1 => Some(&SCHEME_1),
        2 => Some(&SCHEME_2),
        3 => Some(&SCHEME_3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_interval_length() {
        for scheme in 0..=MAX_SCHEME {
            let pts = points(scheme).unwrap();
            assert_eq!(pts.len(), scheme + 1);
            let sum: f32 = pts.iter().map(|p| p.weight).sum();
            assert!(
                (sum - 2.0).abs() < 1e-6,
                "scheme {scheme}: weights sum to {sum}, expected 2"
            );
        }
    }

    #[test]
    fn integrates_cubic_exactly_from_scheme_1() {
        // f(x) = x^3 + x^2 over [-1, 1] has integral 2/3.
        for scheme in 1..=MAX_SCHEME {
            let pts = points(scheme).unwrap();
            let integral: f32 = pts
                .iter()
                .map(|p| (p.xi * p.xi * p.xi + p.xi * p.xi) * p.weight)
                .sum();
            assert!(
                (integral - 2.0 / 3.0).abs() < 1e-5,
                "scheme {scheme}: got {integral}"
            );
        }
    }

    #[test]
    fn abscissae_are_symmetric_and_sorted() {
        for scheme in 0..=MAX_SCHEME {
            let pts = points(scheme).unwrap();
            for pair in pts.windows(2) {
                assert!(pair[0].xi < pair[1].xi);
            }
            for (a, b) in pts.iter().zip(pts.iter().rev()) {
                assert!((a.xi + b.xi).abs() < 1e-7);
                assert!((a.weight - b.weight).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn out_of_range_scheme_is_rejected() {
        assert!(points(MAX_SCHEME + 1).is_none());
        assert!(points(usize::MAX).is_none());
    }
}
