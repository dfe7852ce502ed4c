//! # Per-actor fuel-amount profiles.
//!
//! [`FuelDemand`] decides how much of each fuel an actor requests per
//! transaction. Vehicles typically draw a small pseudo-random amount per
//! round; refillers supply large fixed amounts.

use rand::Rng;

/// How an actor sizes its per-transaction fuel amounts.
#[derive(Clone, Copy, Debug)]
pub enum FuelDemand {
    /// The same amounts every round (typical for refillers).
    Fixed {
        /// Nitrogen units per transaction.
        nitrogen: u32,
        /// Quantum units per transaction.
        quantum: u32,
    },

    /// Uniformly random amounts in `[0, max]` per round (typical for vehicles).
    Uniform {
        /// Upper bound for nitrogen units.
        nitrogen_max: u32,
        /// Upper bound for quantum units.
        quantum_max: u32,
    },
}

impl FuelDemand {
    /// Draws the `(nitrogen, quantum)` amounts for one transaction.
    pub fn sample(&self) -> (u32, u32) {
        match *self {
            FuelDemand::Fixed { nitrogen, quantum } => (nitrogen, quantum),
            FuelDemand::Uniform {
                nitrogen_max,
                quantum_max,
            } => {
                let mut rng = rand::rng();
                (
                    rng.random_range(0..=nitrogen_max),
                    rng.random_range(0..=quantum_max),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_is_constant() {
        let demand = FuelDemand::Fixed {
            nitrogen: 400,
            quantum: 300,
        };
        for _ in 0..5 {
            assert_eq!(demand.sample(), (400, 300));
        }
    }

    #[test]
    fn test_uniform_stays_in_bounds() {
        let demand = FuelDemand::Uniform {
            nitrogen_max: 100,
            quantum_max: 50,
        };
        for _ in 0..100 {
            let (n, q) = demand.sample();
            assert!(n <= 100);
            assert!(q <= 50);
        }
    }

    #[test]
    fn test_uniform_zero_bound() {
        let demand = FuelDemand::Uniform {
            nitrogen_max: 0,
            quantum_max: 0,
        };
        assert_eq!(demand.sample(), (0, 0));
    }
}
