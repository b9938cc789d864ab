use std::error::Error;
use std::fmt::Debug;

use crate::core::{Solution, SolutionType};

/// The trait to define an optimisation problem. A problem provides the sizes and the bounds used
/// to create the [`Solution`] and the functions to evaluate the objectives and constraints of a
/// solution. All the objectives are minimised.
///
/// # Example
/// ```
/// use std::error::Error;
/// use optipop::core::{NumericView, Problem, Solution};
///
/// #[derive(Debug)]
/// struct Parabola;
///
/// impl Problem for Parabola {
///     fn name(&self) -> String {
///         "Parabola".to_string()
///     }
///     fn number_of_variables(&self) -> usize {
///         1
///     }
///     fn number_of_objectives(&self) -> usize {
///         1
///     }
///     fn lower_bound(&self, _index: usize) -> f64 {
///         -10.0
///     }
///     fn upper_bound(&self, _index: usize) -> f64 {
///         10.0
///     }
///     fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
///         let x = NumericView::new(&*solution)?.get_value(0);
///         solution.set_objective(0, (x - 2.0).powi(2));
///         Ok(())
///     }
/// }
/// ```
pub trait Problem: Debug {
    /// The problem name.
    fn name(&self) -> String;

    /// The number of decision variables.
    fn number_of_variables(&self) -> usize;

    /// The number of objectives.
    fn number_of_objectives(&self) -> usize;

    /// The number of constraints. Default to `0`.
    fn number_of_constraints(&self) -> usize {
        0
    }

    /// The lower bound of a decision variable.
    ///
    /// # Arguments
    ///
    /// * `index`: The variable index.
    ///
    /// returns: `f64`
    fn lower_bound(&self, index: usize) -> f64;

    /// The upper bound of a decision variable.
    ///
    /// # Arguments
    ///
    /// * `index`: The variable index.
    ///
    /// returns: `f64`
    fn upper_bound(&self, index: usize) -> f64;

    /// The encoding of the solutions. Default to [`SolutionType::Real`].
    fn solution_type(&self) -> SolutionType {
        SolutionType::Real
    }

    /// The number of bits used by the binary encodings for a variable. Default to `30`.
    fn number_of_bits(&self, _index: usize) -> usize {
        30
    }

    /// Calculate and store the objective values of a solution.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution to evaluate.
    ///
    /// returns: `Result<(), Box<dyn Error>>`
    fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>>;

    /// Calculate and store the overall constraint violation and the number of violated
    /// constraints of a solution. This does nothing by default.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution to evaluate.
    ///
    /// returns: `Result<(), Box<dyn Error>>`
    fn evaluate_constraints(&self, _solution: &mut Solution) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

pub mod builtin_problems {
    use std::error::Error;
    use std::f64::consts::PI;

    use crate::core::{NumericView, Problem, Solution, SolutionType};

    /// Get the decision variable values of a solution.
    fn decision_variables(solution: &Solution) -> Result<Vec<f64>, Box<dyn Error>> {
        let view = NumericView::new(solution)?;
        Ok((0..view.size()).map(|i| view.get_value(i)).collect())
    }

    /// The sphere function `f(x) = sum(x_i^2)` with variables in `[-5.12, 5.12]`. The minimum is
    /// `0` at `x = 0`.
    #[derive(Debug)]
    pub struct Sphere {
        number_of_variables: usize,
        solution_type: SolutionType,
    }

    impl Sphere {
        /// Create the problem.
        ///
        /// # Arguments
        ///
        /// * `number_of_variables`: The number of variables.
        /// * `solution_type`: The encoding.
        ///
        /// returns: `Sphere`
        pub fn new(number_of_variables: usize, solution_type: SolutionType) -> Self {
            Self {
                number_of_variables,
                solution_type,
            }
        }

        /// The objective function.
        pub fn f(x: &[f64]) -> f64 {
            x.iter().map(|v| v.powi(2)).sum()
        }
    }

    impl Problem for Sphere {
        fn name(&self) -> String {
            "Sphere".to_string()
        }

        fn number_of_variables(&self) -> usize {
            self.number_of_variables
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            -5.12
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            5.12
        }

        fn solution_type(&self) -> SolutionType {
            self.solution_type
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            let x = decision_variables(solution)?;
            solution.set_objective(0, Sphere::f(&x));
            Ok(())
        }
    }

    /// The Rastrigin function `f(x) = 10 n + sum(x_i^2 - 10 cos(2 pi x_i))` with variables in
    /// `[-5.12, 5.12]`. The minimum is `0` at `x = 0`.
    #[derive(Debug)]
    pub struct Rastrigin {
        number_of_variables: usize,
        solution_type: SolutionType,
    }

    impl Rastrigin {
        /// Create the problem.
        ///
        /// # Arguments
        ///
        /// * `number_of_variables`: The number of variables.
        /// * `solution_type`: The encoding.
        ///
        /// returns: `Rastrigin`
        pub fn new(number_of_variables: usize, solution_type: SolutionType) -> Self {
            Self {
                number_of_variables,
                solution_type,
            }
        }

        /// The objective function.
        pub fn f(x: &[f64]) -> f64 {
            10.0 * x.len() as f64
                + x.iter()
                    .map(|v| v.powi(2) - 10.0 * (2.0 * PI * v).cos())
                    .sum::<f64>()
        }
    }

    impl Problem for Rastrigin {
        fn name(&self) -> String {
            "Rastrigin".to_string()
        }

        fn number_of_variables(&self) -> usize {
            self.number_of_variables
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            -5.12
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            5.12
        }

        fn solution_type(&self) -> SolutionType {
            self.solution_type
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            let x = decision_variables(solution)?;
            solution.set_objective(0, Rastrigin::f(&x));
            Ok(())
        }
    }

    /// The Rosenbrock function `f(x) = sum(100 (x_{i+1} - x_i^2)^2 + (x_i - 1)^2)` with variables
    /// in `[-5.12, 5.12]`. The minimum is `0` at `x = 1`.
    #[derive(Debug)]
    pub struct Rosenbrock {
        number_of_variables: usize,
        solution_type: SolutionType,
    }

    impl Rosenbrock {
        /// Create the problem.
        ///
        /// # Arguments
        ///
        /// * `number_of_variables`: The number of variables.
        /// * `solution_type`: The encoding.
        ///
        /// returns: `Rosenbrock`
        pub fn new(number_of_variables: usize, solution_type: SolutionType) -> Self {
            Self {
                number_of_variables,
                solution_type,
            }
        }

        /// The objective function.
        pub fn f(x: &[f64]) -> f64 {
            x.windows(2)
                .map(|w| 100.0 * (w[1] - w[0].powi(2)).powi(2) + (w[0] - 1.0).powi(2))
                .sum()
        }
    }

    impl Problem for Rosenbrock {
        fn name(&self) -> String {
            "Rosenbrock".to_string()
        }

        fn number_of_variables(&self) -> usize {
            self.number_of_variables
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            -5.12
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            5.12
        }

        fn solution_type(&self) -> SolutionType {
            self.solution_type
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            let x = decision_variables(solution)?;
            solution.set_objective(0, Rosenbrock::f(&x));
            Ok(())
        }
    }

    /// The Tanaka problem with two objectives, two variables in `[1e-4, pi]` and two
    /// constraints.
    ///
    /// See: Tanaka, M., Watanabe, H., Furukawa, Y., & Tanino, T. (1995). GA-based decision
    /// support system for multicriteria optimization. <https://doi.org/10.1109/ICSMC.1995.537993>
    #[derive(Debug)]
    pub struct Tanaka {
        solution_type: SolutionType,
    }

    impl Tanaka {
        /// Create the problem.
        ///
        /// # Arguments
        ///
        /// * `solution_type`: The encoding.
        ///
        /// returns: `Tanaka`
        pub fn new(solution_type: SolutionType) -> Self {
            Self { solution_type }
        }

        /// The constraint values. A constraint is violated when its value is negative.
        pub fn constraints(x1: f64, x2: f64) -> [f64; 2] {
            [
                x1.powi(2) + x2.powi(2) - 1.0 - 0.1 * (16.0 * (x1 / x2).atan()).cos(),
                -2.0 * ((x1 - 0.5).powi(2) + (x2 - 0.5).powi(2) - 0.5),
            ]
        }
    }

    impl Problem for Tanaka {
        fn name(&self) -> String {
            "Tanaka".to_string()
        }

        fn number_of_variables(&self) -> usize {
            2
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn number_of_constraints(&self) -> usize {
            2
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            10e-5
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            PI
        }

        fn solution_type(&self) -> SolutionType {
            self.solution_type
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            let x = decision_variables(solution)?;
            solution.set_objective(0, x[0]);
            solution.set_objective(1, x[1]);
            Ok(())
        }

        fn evaluate_constraints(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            let x = decision_variables(solution)?;
            let violated: Vec<f64> = Tanaka::constraints(x[0], x[1])
                .into_iter()
                .filter(|c| *c < 0.0)
                .collect();
            solution.set_overall_constraint_violation(violated.iter().sum());
            solution.set_number_of_violated_constraints(violated.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::problem::builtin_problems::{Rastrigin, Rosenbrock, Sphere, Tanaka};
    use crate::core::{Problem, Solution, SolutionType};

    #[test]
    fn test_builtin_objectives() {
        assert_eq!(Sphere::f(&[1.0, -2.0]), 5.0);
        assert_approx_eq!(f64, Rastrigin::f(&[0.0, 0.0, 0.0]), 0.0);
        assert_approx_eq!(f64, Rastrigin::f(&[1.0]), 1.0, epsilon = 1e-12);
        assert_eq!(Rosenbrock::f(&[1.0, 1.0, 1.0]), 0.0);
        assert_eq!(Rosenbrock::f(&[0.0, 1.0]), 101.0);
    }

    #[test]
    /// The objectives are evaluated through the numeric view for all the real encodings.
    fn test_evaluate_encodings() {
        for solution_type in [
            SolutionType::Real,
            SolutionType::BinaryReal,
            SolutionType::ArrayReal,
        ] {
            let problem = Sphere::new(3, solution_type);
            let mut rng = crate::core::utils::get_rng(Some(2));
            let mut solution = Solution::new(&problem, &mut rng).unwrap();
            problem.evaluate(&mut solution).unwrap();
            assert!(solution.objective(0) > 0.0);
        }

        let problem = Sphere::new(3, SolutionType::Int);
        let mut rng = crate::core::utils::get_rng(Some(2));
        let mut solution = Solution::new(&problem, &mut rng).unwrap();
        assert!(problem.evaluate(&mut solution).is_err());
    }

    #[test]
    /// The constraint violation is the sum of the negative constraint values.
    fn test_tanaka_constraints() {
        let problem = Tanaka::new(SolutionType::Real);

        // outside the unit circle and inside the second circle
        let mut solution = Solution::from_real_values(&[1.0, 0.8], (10e-5, 3.2), 2).unwrap();
        problem.evaluate_constraints(&mut solution).unwrap();
        assert_eq!(solution.number_of_violated_constraints(), 0);
        assert!(solution.is_feasible());

        // inside the unit circle
        let mut solution = Solution::from_real_values(&[0.1, 0.1], (10e-5, 3.2), 2).unwrap();
        problem.evaluate(&mut solution).unwrap();
        problem.evaluate_constraints(&mut solution).unwrap();
        assert_eq!(solution.objectives(), &[0.1, 0.1]);
        assert_eq!(solution.number_of_violated_constraints(), 1);
        let [c1, _] = Tanaka::constraints(0.1, 0.1);
        assert_eq!(solution.overall_constraint_violation(), c1);
        assert!(!solution.is_feasible());
    }
}
