use crate::error::{SimError, SimResult};
use nalgebra::{DMatrix, DVector};

/// Dense LU solve of the no-penetration system.
#[derive(Debug, Clone, Copy)]
pub struct LinearSolver {
    /// Largest acceptable condition estimate
    pub max_condition: f64,
}

impl LinearSolver {
    pub fn new(max_condition: f64) -> Self {
        Self { max_condition }
    }

    /// Solve `M Γ = -(v_kinematic + v_wake)`.
    pub fn solve(
        &self,
        step: usize,
        matrix: &DMatrix<f64>,
        kinematic_normal: &DVector<f64>,
        wake_normal: &DVector<f64>,
    ) -> SimResult<DVector<f64>> {
        let n = matrix.nrows();
        if matrix.ncols() != n {
            return Err(SimError::DimensionMismatch {
                context: "influence matrix columns",
                expected: n,
                found: matrix.ncols(),
            });
        }
        for rhs_part in [kinematic_normal, wake_normal] {
            if rhs_part.len() != n {
                return Err(SimError::DimensionMismatch {
                    context: "normal velocity vector",
                    expected: n,
                    found: rhs_part.len(),
                });
            }
        }

        let rhs = -(kinematic_normal + wake_normal);
        let lu = matrix.clone().lu();
        let condition = condition_estimate(&lu.u());
        if !(condition <= self.max_condition) {
            return Err(SimError::SingularSystem { step, condition });
        }

        match lu.solve(&rhs) {
            Some(gamma) if gamma.iter().all(|g| g.is_finite()) => Ok(gamma),
            _ => Err(SimError::SingularSystem { step, condition }),
        }
    }
}

/// Ratio of the largest to the smallest pivot magnitude; infinite when a pivot vanishes.
pub fn condition_estimate(u: &DMatrix<f64>) -> f64 {
    let pivots = u.diagonal().map(f64::abs);
    if pivots.is_empty() {
        return 1.0;
    }
    let max = pivots.max();
    let min = pivots.min();
    if min == 0.0 || !min.is_finite() || !max.is_finite() {
        f64::INFINITY
    } else {
        max / min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_well_posed_system_with_negated_rhs() {
        let m = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
        let kin = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        let wake = DVector::from_vec(vec![0.5, 0.0, -1.0]);
        let gamma = LinearSolver::new(1.0e12).solve(0, &m, &kin, &wake).unwrap();
        let residual = &m * &gamma + (&kin + &wake);
        assert!(residual.amax() < 1e-12);
    }

    #[test]
    fn zero_rhs_returns_zero_solution() {
        let m = DMatrix::<f64>::identity(4, 4) * 2.0;
        let zero = DVector::zeros(4);
        let gamma = LinearSolver::new(1.0e12).solve(0, &m, &zero, &zero).unwrap();
        assert!(gamma.iter().all(|g| *g == 0.0));
    }

    #[test]
    fn singular_matrix_reports_step() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let v = DVector::from_vec(vec![1.0, 1.0]);
        let err = LinearSolver::new(1.0e12).solve(9, &m, &v, &v).unwrap_err();
        match err {
            SimError::SingularSystem { step, condition } => {
                assert_eq!(step, 9);
                assert!(condition > 1.0e12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ill_conditioned_matrix_is_rejected() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0e-9]);
        let v = DVector::from_vec(vec![1.0, 1.0]);
        assert!(LinearSolver::new(1.0e6).solve(1, &m, &v, &v).is_err());
        assert!(LinearSolver::new(1.0e12).solve(1, &m, &v, &v).is_ok());
    }

    #[test]
    fn mismatched_rhs_is_rejected() {
        let m = DMatrix::<f64>::identity(3, 3);
        let v = DVector::zeros(2);
        assert!(matches!(
            LinearSolver::new(1.0e12).solve(0, &m, &v, &v),
            Err(SimError::DimensionMismatch { .. })
        ));
    }
}
