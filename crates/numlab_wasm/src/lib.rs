//! WASM bindings for `numlab_core`.
//!
//! Every solver entry point resolves to a serialised `MethodResult`, including when the
//! expression fails to parse or the solver rejects its input. Only marshalling failures
//! between JS and Rust reject with an error value.

mod expression;
mod linear;
mod marshal;
mod methods;

pub use expression::{evaluate_expression, validate_expression};
pub use linear::solve_linear_system;
pub use methods::{differentiate, find_root, integrate};

#[cfg(test)]
mod tests {
    use super::validate_expression;
    use crate::methods::run_root;
    use numlab_core::settings::{IterationSettings, RootMethod, RootRequest};
    use numlab_core::SolveError;

    #[test]
    fn validation_matches_solver_outcome() {
        let request = RootRequest {
            method: RootMethod::Newton { x0: 1.0 },
            settings: IterationSettings::default(),
        };

        assert!(validate_expression("x^2 - 2"));
        let result = run_root("x^2 - 2", &request);
        assert!(result.converged());
        let root = result.scalar().expect("scalar result");
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-4);

        assert!(!validate_expression("x^2 -"));
        let result = run_root("x^2 -", &request);
        assert!(!result.converged());
        assert!(result.iterations().is_empty());
        assert!(matches!(result.error(), Some(SolveError::Domain(_))));
    }
}
