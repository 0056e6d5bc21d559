// Weight algebra shared by every weighted operation.

use crate::FstError;

/// Arc and final weight. Its meaning is given by the automaton's [`Semiring`].
pub type Weight = f64;

/// Quantization step used when comparing or hashing weights.
pub const DELTA: Weight = 1.0 / 1024.0;

/// The weight semirings supported by the engine.
///
/// Every variant satisfies the semiring laws: `plus` is commutative and
/// associative with identity `zero`, `times` is associative with identity
/// `one`, `times` distributes over `plus` and `zero` annihilates `times`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Semiring {
    /// `(min, +, +inf, 0)`.
    #[default]
    Tropical,
    /// `(-log(e^-a + e^-b), +, +inf, 0)`.
    Log,
    /// `(+, *, 0, 1)` over probabilities.
    Real,
    /// `(or, and, 0, 1)` over `{0, 1}`.
    Boolean,
}

impl Semiring {
    #[inline]
    pub fn zero(self) -> Weight {
        match self {
            Semiring::Tropical | Semiring::Log => Weight::INFINITY,
            Semiring::Real | Semiring::Boolean => 0.0,
        }
    }

    #[inline]
    pub fn one(self) -> Weight {
        match self {
            Semiring::Tropical | Semiring::Log => 0.0,
            Semiring::Real | Semiring::Boolean => 1.0,
        }
    }

    #[inline]
    pub fn plus(self, a: Weight, b: Weight) -> Weight {
        match self {
            Semiring::Tropical => a.min(b),
            Semiring::Log => {
                if a == Weight::INFINITY {
                    b
                } else if b == Weight::INFINITY {
                    a
                } else {
                    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                    lo - (-(hi - lo)).exp().ln_1p()
                }
            }
            Semiring::Real => a + b,
            Semiring::Boolean => {
                if a != 0.0 || b != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    #[inline]
    pub fn times(self, a: Weight, b: Weight) -> Weight {
        match self {
            Semiring::Tropical | Semiring::Log => {
                if a == Weight::INFINITY || b == Weight::INFINITY {
                    Weight::INFINITY
                } else {
                    a + b
                }
            }
            Semiring::Real => a * b,
            Semiring::Boolean => {
                if a != 0.0 && b != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Left division: the weight `c` such that `times(b, c) == a`.
    ///
    /// Dividing by `zero` yields `zero`. Used to normalize residual weights
    /// in weighted subset construction.
    #[inline]
    pub fn divide(self, a: Weight, b: Weight) -> Weight {
        if self.is_zero(b) {
            return self.zero();
        }
        match self {
            Semiring::Tropical | Semiring::Log => {
                if a == Weight::INFINITY {
                    Weight::INFINITY
                } else {
                    a - b
                }
            }
            Semiring::Real => a / b,
            Semiring::Boolean => a,
        }
    }

    /// Natural order: `true` when `a` is strictly preferred over `b`.
    ///
    /// Lower cost wins in tropical and log; higher value wins in real and
    /// boolean.
    #[inline]
    pub fn less_than(self, a: Weight, b: Weight) -> bool {
        match self {
            Semiring::Tropical | Semiring::Log => a < b,
            Semiring::Real | Semiring::Boolean => a > b,
        }
    }

    #[inline]
    pub fn is_zero(self, w: Weight) -> bool {
        self.approx_eq(w, self.zero())
    }

    #[inline]
    pub fn is_one(self, w: Weight) -> bool {
        self.approx_eq(w, self.one())
    }

    /// Weight equality up to [`DELTA`].
    #[inline]
    pub fn approx_eq(self, a: Weight, b: Weight) -> bool {
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        (a - b).abs() <= DELTA
    }

    /// Integer key for hashing a weight; weights within [`DELTA`] of each
    /// other usually share a key.
    #[inline]
    pub fn quantize(self, w: Weight) -> i64 {
        if w == Weight::INFINITY {
            i64::MAX
        } else if w == Weight::NEG_INFINITY {
            i64::MIN
        } else {
            (w / DELTA).round() as i64
        }
    }

    /// `plus(a, a) == a` for every weight.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Semiring::Tropical | Semiring::Boolean)
    }

    /// `plus(a, b)` is always either `a` or `b` (needed by best-path search).
    pub fn has_path_property(self) -> bool {
        matches!(self, Semiring::Tropical | Semiring::Boolean)
    }

    pub fn name(self) -> &'static str {
        match self {
            Semiring::Tropical => "tropical",
            Semiring::Log => "log",
            Semiring::Real => "real",
            Semiring::Boolean => "boolean",
        }
    }

    /// Parse a semiring from its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tropical" => Some(Semiring::Tropical),
            "log" => Some(Semiring::Log),
            "real" => Some(Semiring::Real),
            "boolean" => Some(Semiring::Boolean),
            _ => None,
        }
    }

    /// Identifier stored in the binary header.
    pub fn id(self) -> u8 {
        match self {
            Semiring::Tropical => 0,
            Semiring::Log => 1,
            Semiring::Real => 2,
            Semiring::Boolean => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, FstError> {
        match id {
            0 => Ok(Semiring::Tropical),
            1 => Ok(Semiring::Log),
            2 => Ok(Semiring::Real),
            3 => Ok(Semiring::Boolean),
            other => Err(FstError::InvalidSemiring(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Semiring; 4] = [
        Semiring::Tropical,
        Semiring::Log,
        Semiring::Real,
        Semiring::Boolean,
    ];

    /// Weights drawn from a range that keeps every semiring well away from
    /// floating-point cancellation.
    fn weight_for(sr: Semiring) -> BoxedStrategy<Weight> {
        match sr {
            Semiring::Tropical | Semiring::Log => prop_oneof![
                (0u32..64).prop_map(|n| n as Weight / 8.0),
                Just(Weight::INFINITY),
            ]
            .boxed(),
            Semiring::Real => (0u32..16).prop_map(|n| n as Weight / 4.0).boxed(),
            Semiring::Boolean => prop_oneof![Just(0.0), Just(1.0)].boxed(),
        }
    }

    fn triple(sr: Semiring) -> impl Strategy<Value = (Weight, Weight, Weight)> {
        (weight_for(sr), weight_for(sr), weight_for(sr))
    }

    fn check_laws(sr: Semiring, a: Weight, b: Weight, c: Weight) -> Result<(), TestCaseError> {
        prop_assert!(sr.approx_eq(sr.plus(a, sr.zero()), a));
        prop_assert!(sr.approx_eq(sr.times(a, sr.one()), a));
        prop_assert!(sr.approx_eq(sr.times(a, sr.zero()), sr.zero()));
        prop_assert!(sr.approx_eq(sr.plus(a, b), sr.plus(b, a)));
        prop_assert!(sr.approx_eq(sr.plus(sr.plus(a, b), c), sr.plus(a, sr.plus(b, c))));
        prop_assert!(sr.approx_eq(sr.times(sr.times(a, b), c), sr.times(a, sr.times(b, c))));
        prop_assert!(sr.approx_eq(
            sr.times(a, sr.plus(b, c)),
            sr.plus(sr.times(a, b), sr.times(a, c))
        ));
        Ok(())
    }

    proptest! {
        #[test]
        fn tropical_laws((a, b, c) in triple(Semiring::Tropical)) {
            check_laws(Semiring::Tropical, a, b, c)?;
        }

        #[test]
        fn log_laws((a, b, c) in triple(Semiring::Log)) {
            check_laws(Semiring::Log, a, b, c)?;
        }

        #[test]
        fn real_laws((a, b, c) in triple(Semiring::Real)) {
            check_laws(Semiring::Real, a, b, c)?;
        }

        #[test]
        fn boolean_laws((a, b, c) in triple(Semiring::Boolean)) {
            check_laws(Semiring::Boolean, a, b, c)?;
        }
    }

    #[test]
    fn divide_inverts_times() {
        for sr in [Semiring::Tropical, Semiring::Log, Semiring::Real] {
            let a = 3.0;
            let b = 1.5;
            assert!(sr.approx_eq(sr.times(b, sr.divide(a, b)), a), "{}", sr.name());
        }
    }

    #[test]
    fn divide_by_zero_is_zero() {
        for sr in ALL {
            assert!(sr.is_zero(sr.divide(sr.one(), sr.zero())));
        }
    }

    #[test]
    fn log_plus_of_equal_costs() {
        let w = Semiring::Log.plus(1.0, 1.0);
        assert!((w - (1.0 - 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn ordering_prefers_cheaper_or_likelier() {
        assert!(Semiring::Tropical.less_than(1.0, 2.0));
        assert!(Semiring::Real.less_than(0.9, 0.1));
        assert!(Semiring::Boolean.less_than(1.0, 0.0));
    }

    #[test]
    fn id_round_trip() {
        for sr in ALL {
            assert_eq!(Semiring::from_id(sr.id()).unwrap(), sr);
            assert_eq!(Semiring::from_name(sr.name()), Some(sr));
        }
        assert!(matches!(Semiring::from_id(9), Err(FstError::InvalidSemiring(9))));
    }

    #[test]
    fn quantize_collapses_nearby_weights() {
        let sr = Semiring::Tropical;
        assert_eq!(sr.quantize(0.1 + 0.2), sr.quantize(0.3));
        assert_eq!(sr.quantize(Weight::INFINITY), i64::MAX);
    }
}
