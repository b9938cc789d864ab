use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::{
    ArrayRealVariable, BinaryRealVariable, BinaryVariable, IntVariable, OError, Problem,
    RealVariable, Variable,
};

/// The encoding of the decision variables of a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionType {
    /// One [`Variable::Real`] per decision variable.
    Real,
    /// One [`Variable::BinaryReal`] per decision variable.
    BinaryReal,
    /// One [`Variable::ArrayReal`] holding all the decision variables.
    ArrayReal,
    /// One [`Variable::Binary`] per decision variable.
    Binary,
    /// One [`Variable::Int`] per decision variable.
    Int,
}

impl Display for SolutionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolutionType::Real => "Real",
            SolutionType::BinaryReal => "BinaryReal",
            SolutionType::ArrayReal => "ArrayReal",
            SolutionType::Binary => "Binary",
            SolutionType::Int => "Int",
        };
        f.write_str(name)
    }
}

/// Serialised data of a solution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolutionExport {
    /// The encoding.
    pub solution_type: SolutionType,
    /// The variable values in their string form.
    pub variables: Vec<String>,
    /// The objective values.
    pub objectives: Vec<f64>,
    /// The overall constraint violation.
    pub overall_constraint_violation: f64,
    /// The number of violated constraints.
    pub number_of_violated_constraints: usize,
}

/// A candidate solution: the decision variables, the objective values and the constraint
/// violation data. The objectives and the violation are only changed by the problem evaluation;
/// the variables are changed by the operators. Cloning a solution copies all its data.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    solution_type: SolutionType,
    variables: Vec<Variable>,
    objectives: Vec<f64>,
    /// The sum of the violated constraint values. This is `0` for feasible solutions and negative
    /// otherwise.
    overall_constraint_violation: f64,
    number_of_violated_constraints: usize,
}

impl Solution {
    /// Create a new solution for a problem with random variable values. The objectives are
    /// initialised to `0` and the solution is feasible until evaluated.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem. Its encoding, bounds and sizes are used to create the variables.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Solution, OError>`
    pub fn new(problem: &dyn Problem, rng: &mut dyn RngCore) -> Result<Self, OError> {
        let n = problem.number_of_variables();
        let solution_type = problem.solution_type();
        let variables = match solution_type {
            SolutionType::Real => (0..n)
                .map(|i| {
                    RealVariable::new(problem.lower_bound(i), problem.upper_bound(i), rng)
                        .map(Variable::Real)
                })
                .collect::<Result<Vec<_>, OError>>()?,
            SolutionType::BinaryReal => (0..n)
                .map(|i| {
                    BinaryRealVariable::new(
                        problem.number_of_bits(i),
                        problem.lower_bound(i),
                        problem.upper_bound(i),
                        rng,
                    )
                    .map(Variable::BinaryReal)
                })
                .collect::<Result<Vec<_>, OError>>()?,
            SolutionType::ArrayReal => {
                let lower_bounds = (0..n).map(|i| problem.lower_bound(i)).collect();
                let upper_bounds = (0..n).map(|i| problem.upper_bound(i)).collect();
                vec![Variable::ArrayReal(ArrayRealVariable::new(
                    lower_bounds,
                    upper_bounds,
                    rng,
                )?)]
            }
            SolutionType::Binary => (0..n)
                .map(|i| Variable::Binary(BinaryVariable::new(problem.number_of_bits(i), rng)))
                .collect(),
            SolutionType::Int => (0..n)
                .map(|i| {
                    IntVariable::new(
                        problem.lower_bound(i) as i64,
                        problem.upper_bound(i) as i64,
                        rng,
                    )
                    .map(Variable::Int)
                })
                .collect::<Result<Vec<_>, OError>>()?,
        };

        Ok(Self::from_variables(
            solution_type,
            variables,
            problem.number_of_objectives(),
        ))
    }

    /// Create a solution from existing variables. The variables must match the encoding.
    ///
    /// # Arguments
    ///
    /// * `solution_type`: The encoding.
    /// * `variables`: The decision variables.
    /// * `number_of_objectives`: The number of objectives.
    ///
    /// returns: `Solution`
    pub fn from_variables(
        solution_type: SolutionType,
        variables: Vec<Variable>,
        number_of_objectives: usize,
    ) -> Self {
        Self {
            solution_type,
            variables,
            objectives: vec![0.0; number_of_objectives],
            overall_constraint_violation: 0.0,
            number_of_violated_constraints: 0,
        }
    }

    /// Create a solution with [`Variable::Real`] variables. This is mainly used to set up
    /// solutions with known values.
    ///
    /// # Arguments
    ///
    /// * `values`: The variable values.
    /// * `bounds`: The lower and upper bounds of all variables.
    /// * `number_of_objectives`: The number of objectives.
    ///
    /// returns: `Result<Solution, OError>`
    pub fn from_real_values(
        values: &[f64],
        bounds: (f64, f64),
        number_of_objectives: usize,
    ) -> Result<Self, OError> {
        let variables = values
            .iter()
            .map(|v| RealVariable::with_value(*v, bounds.0, bounds.1).map(Variable::Real))
            .collect::<Result<Vec<_>, OError>>()?;
        Ok(Self::from_variables(
            SolutionType::Real,
            variables,
            number_of_objectives,
        ))
    }

    pub fn solution_type(&self) -> SolutionType {
        self.solution_type
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut [Variable] {
        &mut self.variables
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Get an objective value. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    ///
    /// returns: `f64`
    pub fn objective(&self, index: usize) -> f64 {
        self.objectives[index]
    }

    /// Set an objective value. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    /// * `value`: The objective value.
    pub fn set_objective(&mut self, index: usize, value: f64) {
        self.objectives[index] = value;
    }

    pub fn overall_constraint_violation(&self) -> f64 {
        self.overall_constraint_violation
    }

    pub fn set_overall_constraint_violation(&mut self, value: f64) {
        self.overall_constraint_violation = value;
    }

    pub fn number_of_violated_constraints(&self) -> usize {
        self.number_of_violated_constraints
    }

    pub fn set_number_of_violated_constraints(&mut self, value: usize) {
        self.number_of_violated_constraints = value;
    }

    /// Whether the solution violates none of the constraints.
    ///
    /// returns: `bool`
    pub fn is_feasible(&self) -> bool {
        self.number_of_violated_constraints == 0 && self.overall_constraint_violation >= 0.0
    }

    /// Serialise the solution.
    ///
    /// returns: `SolutionExport`
    pub fn export(&self) -> SolutionExport {
        SolutionExport {
            solution_type: self.solution_type,
            variables: self.variables.iter().map(|v| v.to_string()).collect(),
            objectives: self.objectives.clone(),
            overall_constraint_violation: self.overall_constraint_violation,
            number_of_violated_constraints: self.number_of_violated_constraints,
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let objectives: Vec<String> = self.objectives.iter().map(|o| o.to_string()).collect();
        write!(f, "{}", objectives.join(" "))
    }
}

#[cfg(test)]
mod test {
    use crate::core::problem::builtin_problems::{Sphere, Tanaka};
    use crate::core::utils::{dummy_problem, get_rng};
    use crate::core::{Problem, Solution, SolutionType, Variable};

    #[test]
    /// Random solutions follow the problem encoding and bounds.
    fn test_new() {
        let mut rng = get_rng(Some(3));
        let problem = Sphere::new(4, SolutionType::Real);
        let solution = Solution::new(&problem, &mut rng).unwrap();
        assert_eq!(solution.number_of_variables(), 4);
        assert_eq!(solution.objectives(), &[0.0]);
        for v in solution.variables() {
            let value = v.value().unwrap();
            assert!((-5.12..=5.12).contains(&value));
        }
        assert!(solution.is_feasible());

        let problem = Sphere::new(4, SolutionType::ArrayReal);
        let solution = Solution::new(&problem, &mut rng).unwrap();
        assert_eq!(solution.number_of_variables(), 1);
        assert!(matches!(&solution.variables()[0], Variable::ArrayReal(a) if a.len() == 4));

        let problem = Tanaka::new(SolutionType::Binary);
        let solution = Solution::new(&problem, &mut rng).unwrap();
        assert_eq!(solution.number_of_objectives(), 2);
        assert!(matches!(&solution.variables()[1], Variable::Binary(b) if b.number_of_bits() == problem.number_of_bits(1)));
    }

    #[test]
    /// A clone does not share data with the original solution.
    fn test_deep_copy() {
        let mut rng = get_rng(Some(1));
        let mut a = Solution::new(&dummy_problem(), &mut rng).unwrap();
        a.set_objective(0, 3.0);
        let b = a.clone();
        a.set_objective(0, 1.0);
        if let Variable::Real(v) = &mut a.variables_mut()[0] {
            v.set_value(0.123);
        }

        assert_eq!(b.objective(0), 3.0);
        assert_ne!(b.variables()[0].value(), Some(0.123));
    }

    #[test]
    fn test_export() {
        let mut solution = Solution::from_real_values(&[0.5, 1.5], (0.0, 2.0), 1).unwrap();
        solution.set_objective(0, 2.5);
        solution.set_overall_constraint_violation(-1.0);
        solution.set_number_of_violated_constraints(1);

        let export = solution.export();
        assert_eq!(export.variables, vec!["0.5".to_string(), "1.5".to_string()]);
        assert_eq!(export.objectives, vec![2.5]);
        assert!(!solution.is_feasible());
        assert_eq!(solution.to_string(), "2.5");
    }
}
