use std::collections::HashMap;

use chrono::{DateTime, Local};
use log::{debug, info};
use rand::RngCore;

use crate::core::utils::get_rng;
use crate::core::{DataValue, OError, Parameters, Population, Problem, Solution};
use crate::operators::{Crossover, Mutation, Operator, Selection};

/// The operators registered on an algorithm, indexed by their role name (for example
/// `"crossover"` or `"selection"`).
#[derive(Debug, Default)]
pub struct Operators(HashMap<String, Operator>);

impl Operators {
    /// Register an operator. An operator registered with the same name is replaced.
    ///
    /// # Arguments
    ///
    /// * `name`: The role name.
    /// * `operator`: The operator.
    pub fn insert(&mut self, name: &str, operator: Operator) {
        self.0.insert(name.to_string(), operator);
    }

    /// Whether an operator is registered with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get a crossover operator. This returns an error if no crossover is registered with the
    /// name.
    ///
    /// returns: `Result<&dyn Crossover, OError>`
    pub fn crossover(&self, name: &str) -> Result<&dyn Crossover, OError> {
        match self.0.get(name) {
            Some(Operator::Crossover(o)) => Ok(o.as_ref()),
            _ => Err(OError::MissingOperator(name.to_string())),
        }
    }

    /// Get a mutation operator. This returns an error if no mutation is registered with the name.
    ///
    /// returns: `Result<&dyn Mutation, OError>`
    pub fn mutation(&self, name: &str) -> Result<&dyn Mutation, OError> {
        match self.0.get(name) {
            Some(Operator::Mutation(o)) => Ok(o.as_ref()),
            _ => Err(OError::MissingOperator(name.to_string())),
        }
    }

    /// Get a selection operator. This returns an error if no selection is registered with the
    /// name.
    ///
    /// returns: `Result<&dyn Selection, OError>`
    pub fn selection(&self, name: &str) -> Result<&dyn Selection, OError> {
        match self.0.get(name) {
            Some(Operator::Selection(o)) => Ok(o.as_ref()),
            _ => Err(OError::MissingOperator(name.to_string())),
        }
    }
}

/// The data shared by all algorithms: the problem being solved, the operators, the input and
/// output parameters and the random number generator.
pub struct AlgorithmBase<'a> {
    /// The algorithm name.
    pub name: String,
    /// The problem being solved.
    pub problem: &'a dyn Problem,
    /// The registered operators.
    pub operators: Operators,
    /// The input parameters (population size, budgets, seed...).
    pub input_parameters: Parameters,
    /// The parameters set by the algorithm after a run.
    pub output_parameters: Parameters,
    /// The random number generator. All the stochastic draws of a run come from this stream.
    pub rng: Box<dyn RngCore>,
    /// The time when the last run started.
    pub start_time: DateTime<Local>,
}

impl<'a> AlgorithmBase<'a> {
    /// Initialise the algorithm data.
    ///
    /// # Arguments
    ///
    /// * `name`: The algorithm name.
    /// * `problem`: The problem to solve.
    ///
    /// returns: `AlgorithmBase`
    pub fn new(name: &str, problem: &'a dyn Problem) -> Self {
        Self {
            name: name.to_string(),
            problem,
            operators: Operators::default(),
            input_parameters: Parameters::new(),
            output_parameters: Parameters::new(),
            rng: get_rng(None),
            start_time: Local::now(),
        }
    }

    /// Prepare a new run. When the `seed` input parameter is set, the random number generator is
    /// reset so that runs with the same seed are reproducible. A negative seed is read back as
    /// the unsigned integer with the same bits.
    ///
    /// returns: `Result<(), OError>`
    pub fn start(&mut self) -> Result<(), OError> {
        info!("Starting {}", self.name);
        if self.input_parameters.contains("seed") {
            let seed = self.input_parameters.integer_or("seed", 0)? as u64;
            self.rng = get_rng(Some(seed));
        }
        info!("Input parameters: {}", self.input_parameters);
        self.output_parameters = Parameters::new();
        self.start_time = Local::now();
        Ok(())
    }

    /// Complete a run and store the number of evaluations in the `evaluations` output parameter.
    ///
    /// # Arguments
    ///
    /// * `evaluations`: The number of function evaluations.
    pub fn finish(&mut self, evaluations: usize) {
        self.output_parameters.set("evaluations", evaluations);
        info!(
            "{} completed {evaluations} evaluations. Took {}",
            self.name,
            self.elapsed_as_string()
        );
    }

    /// Get the elapsed hours, minutes and seconds since the start of the run.
    ///
    /// return: `[i64; 3]`.
    pub fn elapsed(&self) -> [i64; 3] {
        let duration = Local::now() - self.start_time;
        let seconds = duration.num_seconds() % 60;
        let minutes = (duration.num_seconds() / 60) % 60;
        let hours = (duration.num_seconds() / 60) / 60;
        [hours, minutes, seconds]
    }

    /// Format the elapsed time as string.
    ///
    /// return: `String`.
    pub fn elapsed_as_string(&self) -> String {
        let [hours, minutes, seconds] = self.elapsed();
        format!(
            "{:0>2} hours, {:0>2} minutes and {:0>2} seconds",
            hours, minutes, seconds
        )
    }
}

/// Evaluate the objectives and constraints of a solution. This returns an error if the problem
/// evaluation fails or an objective is NaN.
///
/// # Arguments
///
/// * `problem`: The problem.
/// * `solution`: The solution to evaluate.
///
/// return `Result<(), OError>`
pub(crate) fn evaluate(problem: &dyn Problem, solution: &mut Solution) -> Result<(), OError> {
    problem
        .evaluate(solution)
        .map_err(|e| OError::Evaluation(e.to_string()))?;
    problem
        .evaluate_constraints(solution)
        .map_err(|e| OError::Evaluation(e.to_string()))?;

    if let Some(index) = solution.objectives().iter().position(|o| o.is_nan()) {
        return Err(OError::NaN(index));
    }
    debug!("Evaluated solution with objectives {}", solution);
    Ok(())
}

/// The trait to use to implement an algorithm. An algorithm is configured with operators and
/// input parameters and run with [`Algorithm::execute`].
pub trait Algorithm<'a> {
    /// The shared algorithm data.
    fn base(&self) -> &AlgorithmBase<'a>;

    /// The shared algorithm data as mutable.
    fn base_mut(&mut self) -> &mut AlgorithmBase<'a>;

    /// Run the algorithm and return the resulting population.
    ///
    /// return: `Result<Population, OError>`
    fn execute(&mut self) -> Result<Population, OError>;

    /// Return the algorithm name.
    ///
    /// return: `String`.
    fn name(&self) -> String {
        self.base().name.clone()
    }

    /// Return the problem.
    ///
    /// return: `&dyn Problem`.
    fn problem(&self) -> &'a dyn Problem {
        self.base().problem
    }

    /// Register an operator.
    ///
    /// # Arguments
    ///
    /// * `name`: The role of the operator in the algorithm (for example `"mutation"`).
    /// * `operator`: The operator.
    fn add_operator(&mut self, name: &str, operator: Operator) {
        self.base_mut().operators.insert(name, operator);
    }

    /// Set an input parameter.
    ///
    /// # Arguments
    ///
    /// * `name`: The parameter name.
    /// * `value`: The value.
    fn set_input_parameter(&mut self, name: &str, value: DataValue) {
        self.base_mut().input_parameters.set(name, value);
    }

    /// Set several input parameters at once (for example loaded with
    /// [`Parameters::from_json`]).
    ///
    /// # Arguments
    ///
    /// * `parameters`: The parameters.
    fn set_input_parameters(&mut self, parameters: &Parameters) {
        self.base_mut().input_parameters.extend(parameters);
    }

    /// The input parameters.
    fn input_parameters<'s>(&'s self) -> &'s Parameters
    where
        'a: 's,
    {
        &self.base().input_parameters
    }

    /// The parameters set by the last run.
    fn output_parameters<'s>(&'s self) -> &'s Parameters
    where
        'a: 's,
    {
        &self.base().output_parameters
    }

    /// Reset the random number generator with a seed. The seed is also stored in the `seed`
    /// input parameter, as the integer with the same bits, so that the following runs start
    /// from the same stream.
    ///
    /// # Arguments
    ///
    /// * `seed`: The seed.
    fn set_seed(&mut self, seed: u64) {
        let base = self.base_mut();
        base.input_parameters.set("seed", seed as i64);
        base.rng = get_rng(Some(seed));
    }

    /// Format the elapsed time of the last run as string.
    ///
    /// return: `String`.
    fn elapsed_as_string(&self) -> String {
        self.base().elapsed_as_string()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::algorithm::{evaluate, Operators};
    use crate::algorithms::{Algorithm, GenerationalGA};
    use crate::core::problem::builtin_problems::Sphere;
    use crate::core::utils::dummy_problem;
    use crate::core::{DataValue, OError, Problem, Solution, SolutionType};
    use crate::operators::{Operator, PolynomialMutation, PolynomialMutationArgs, RandomSelection};
    use std::error::Error;

    #[test]
    fn test_operators() {
        let mut operators = Operators::default();
        operators.insert(
            "mutation",
            Operator::Mutation(Box::new(
                PolynomialMutation::new(PolynomialMutationArgs::default()).unwrap(),
            )),
        );
        operators.insert("selection", Operator::Selection(Box::new(RandomSelection)));

        assert!(operators.contains("mutation"));
        assert!(operators.mutation("mutation").is_ok());
        assert_eq!(
            operators.selection("selection").unwrap().name(),
            "RandomSelection"
        );
        // wrong type
        assert!(matches!(
            operators.crossover("mutation"),
            Err(OError::MissingOperator(_))
        ));
        assert!(operators.crossover("crossover").is_err());
    }

    #[test]
    fn test_evaluate() {
        let problem = Sphere::new(2, SolutionType::Real);
        let mut solution = Solution::from_real_values(&[1.0, 2.0], (-5.12, 5.12), 1).unwrap();
        evaluate(&problem, &mut solution).unwrap();
        assert_eq!(solution.objective(0), 5.0);

        let mut solution = Solution::from_real_values(&[0.3], (0.0, 1.0), 1).unwrap();
        evaluate(&dummy_problem(), &mut solution).unwrap();
        assert_eq!(solution.objective(0), 0.3);
    }

    #[derive(Debug)]
    struct NaNProblem;

    impl Problem for NaNProblem {
        fn name(&self) -> String {
            "NaN".to_string()
        }

        fn number_of_variables(&self) -> usize {
            1
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            0.0
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            1.0
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            solution.set_objective(0, f64::NAN);
            Ok(())
        }
    }

    #[test]
    fn test_evaluate_nan() {
        let mut solution = Solution::from_real_values(&[0.3], (0.0, 1.0), 1).unwrap();
        assert!(matches!(
            evaluate(&NaNProblem, &mut solution),
            Err(OError::NaN(0))
        ));
    }

    /// Read the parameters through a trait object.
    fn parameter_count(algorithm: &dyn Algorithm) -> (usize, usize) {
        (
            algorithm.input_parameters().len(),
            algorithm.output_parameters().len(),
        )
    }

    #[test]
    fn test_parameters() {
        let problem = Sphere::new(2, SolutionType::Real);
        let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
        algorithm.set_input_parameter("populationSize", DataValue::Integer(10));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(30));
        assert_eq!(parameter_count(&algorithm), (2, 0));

        algorithm.execute().unwrap();
        assert_eq!(
            algorithm.output_parameters().get("evaluations"),
            Some(&DataValue::Integer(30))
        );
        assert_eq!(parameter_count(&algorithm).0, 2);
    }

    #[test]
    /// Any unsigned seed is accepted and gives the same run twice.
    fn test_large_seed() {
        let problem = Sphere::new(2, SolutionType::Real);
        let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
        algorithm.set_input_parameter("populationSize", DataValue::Integer(10));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(50));
        algorithm.set_seed(u64::MAX);
        assert_eq!(
            algorithm.input_parameters().get("seed"),
            Some(&DataValue::Integer(-1))
        );

        let a = algorithm.execute().unwrap();
        let b = algorithm.execute().unwrap();
        assert_eq!(a, b);

        algorithm.set_seed(1 << 63);
        assert!(algorithm.execute().is_ok());
    }
}
