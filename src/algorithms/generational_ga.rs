use log::{debug, info, warn};

use crate::algorithms::algorithm::evaluate;
use crate::algorithms::{
    Algorithm, AlgorithmBase, MaxFunctionEvaluationValue, StoppingCondition,
};
use crate::core::{OError, Population, Problem, Solution};
use crate::operators::{
    BinaryTournament, ObjectiveComparator, Operator, PolynomialMutation, PolynomialMutationArgs,
    SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs,
};

/// The default number of solutions in the population.
const POPULATION_SIZE: usize = 100;
/// The default number of function evaluations.
const MAX_EVALUATIONS: usize = 25000;

/// A single-objective generational genetic algorithm with elitism.
///
/// At each generation, the offspring population is filled with pairs of children obtained by
/// selecting two parents (`"selection"` operator), recombining them (`"crossover"` operator)
/// and mutating both children (`"mutation"` operator). The two worst children are then
/// replaced by copies of the two best parents and the offspring become the new population. The
/// evaluation budget is checked before each pair is generated, so the last generation may be
/// only partially filled.
///
/// Input parameters:
///  - `populationSize`: the number of solutions (default `100`).
///  - `maxEvaluations`: the number of function evaluations (default `25000`).
///  - `seed`: the optional seed of the random number generator.
///
/// The algorithm returns a population with the best solution found for the first objective.
///
/// # Example
/// ```
/// use optipop::algorithms::{Algorithm, GenerationalGA};
/// use optipop::core::problem::builtin_problems::Sphere;
/// use optipop::core::{DataValue, SolutionType};
///
/// let problem = Sphere::new(3, SolutionType::Real);
/// let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
/// algorithm.set_input_parameter("populationSize", DataValue::Integer(20));
/// algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(400));
/// algorithm.set_seed(1);
/// let result = algorithm.execute().unwrap();
/// assert_eq!(result.size(), 1);
/// ```
pub struct GenerationalGA<'a> {
    base: AlgorithmBase<'a>,
}

impl<'a> GenerationalGA<'a> {
    /// Create the algorithm. The `"selection"`, `"crossover"` and `"mutation"` operators must be
    /// added with [`Algorithm::add_operator`] before running it.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem to solve.
    ///
    /// returns: `GenerationalGA`
    pub fn new(problem: &'a dyn Problem) -> Self {
        Self {
            base: AlgorithmBase::new("GenerationalGA", problem),
        }
    }

    /// Create the algorithm with a binary tournament, the simulated binary crossover (with
    /// probability `0.9` and distribution index `20`) and the polynomial mutation (with
    /// probability `1/n` and distribution index `20`).
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem to solve.
    ///
    /// returns: `Result<GenerationalGA, OError>`
    pub fn with_default_operators(problem: &'a dyn Problem) -> Result<Self, OError> {
        let mut algorithm = Self::new(problem);
        algorithm.add_operator(
            "crossover",
            Operator::Crossover(Box::new(SimulatedBinaryCrossover::new(
                SimulatedBinaryCrossoverArgs::default(),
            )?)),
        );
        algorithm.add_operator(
            "mutation",
            Operator::Mutation(Box::new(PolynomialMutation::new(
                PolynomialMutationArgs::default(),
            )?)),
        );
        algorithm.add_operator(
            "selection",
            Operator::Selection(Box::new(BinaryTournament::default())),
        );
        Ok(algorithm)
    }

    /// Select two parents with the selection operator.
    fn select_parents<'p>(
        &mut self,
        population: &'p Population,
    ) -> Result<[&'p Solution; 2], OError> {
        let selection = self.base.operators.selection("selection")?;
        let mut indexes: Vec<usize> = Vec::with_capacity(2);
        while indexes.len() < 2 {
            let selected = selection.execute(population, None, &mut self.base.rng)?;
            if selected.is_empty() {
                return Err(OError::AlgorithmRun(
                    self.base.name.clone(),
                    format!("The selection operator {} returned no solution", selection.name()),
                ));
            }
            indexes.extend(selected);
        }
        Ok([population.get(indexes[0]), population.get(indexes[1])])
    }
}

impl<'a> Algorithm<'a> for GenerationalGA<'a> {
    fn base(&self) -> &AlgorithmBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AlgorithmBase<'a> {
        &mut self.base
    }

    fn execute(&mut self) -> Result<Population, OError> {
        self.base.start()?;
        let name = self.base.name.clone();
        let population_size = self
            .base
            .input_parameters
            .usize_or("populationSize", POPULATION_SIZE)?;
        let budget =
            MaxFunctionEvaluationValue::from_parameters(&self.base.input_parameters, MAX_EVALUATIONS)?;
        if population_size < 2 {
            return Err(OError::AlgorithmInit(
                name,
                "The population must have at least 2 solutions".to_string(),
            ));
        }
        // fail before evaluating anything when an operator is missing
        self.base.operators.crossover("crossover")?;
        self.base.operators.mutation("mutation")?;
        self.base.operators.selection("selection")?;

        let problem = self.base.problem;
        let comparator = ObjectiveComparator::new(0);
        let mut evaluations: usize = 0;
        let mut generation: usize = 0;

        let mut population = Population::new(population_size);
        for _ in 0..population_size {
            let mut solution = Solution::new(problem, &mut self.base.rng)?;
            evaluate(problem, &mut solution)?;
            evaluations += 1;
            population.add(solution);
        }
        info!("Created and evaluated the initial population");

        while !budget.is_met(evaluations) {
            generation += 1;
            let mut offspring = Population::new(population_size);
            for _ in 0..population_size / 2 {
                if budget.is_met(evaluations) {
                    break;
                }
                let parents = self.select_parents(&population)?;
                let crossover = self.base.operators.crossover("crossover")?;
                let mutation = self.base.operators.mutation("mutation")?;
                let children = crossover.execute(&parents, &mut self.base.rng)?;
                for mut child in children {
                    mutation.execute(&mut child, &mut self.base.rng)?;
                    evaluate(problem, &mut child)?;
                    evaluations += 1;
                    if offspring.size() < offspring.capacity() {
                        offspring.add(child);
                    }
                }
            }

            population.sort(&comparator);
            offspring.sort(&comparator);
            if offspring.size() >= 2 {
                let last = offspring.size() - 1;
                offspring.replace(last, population.get(0).clone());
                offspring.replace(last - 1, population.get(1).clone());
            } else {
                warn!(
                    "Generation #{generation} has {} children. Elitism is skipped",
                    offspring.size()
                );
            }

            if !offspring.is_empty() {
                population.clear();
                for child in offspring.iter() {
                    population.add(child.clone());
                }
            }
            debug!(
                "Generation #{generation} completed after {evaluations} evaluations. Best objective: {}",
                population.get(0).objective(0)
            );
        }

        population.sort(&comparator);
        let mut result = Population::new(1);
        result.add(population.get(0).clone());
        info!(
            "Stopping evolution because the {} was reached. Best objective: {}",
            MaxFunctionEvaluationValue::name(),
            population.get(0).objective(0)
        );

        self.base.output_parameters.set("iterations", generation);
        self.base.finish(evaluations);
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{Algorithm, GenerationalGA};
    use crate::core::problem::builtin_problems::Sphere;
    use crate::core::utils::dummy_problem;
    use crate::core::{DataValue, OError, SolutionType};

    #[test]
    /// With a budget equal to the population size, only the initial population is evaluated and
    /// the solution with the smallest objective is returned.
    fn test_initial_population_only() {
        let problem = dummy_problem();
        let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
        algorithm.set_input_parameter("populationSize", DataValue::Integer(4));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(4));
        algorithm.set_seed(3);
        let result = algorithm.execute().unwrap();

        assert_eq!(result.size(), 1);
        assert_eq!(
            algorithm.output_parameters().get("evaluations"),
            Some(&DataValue::Integer(4))
        );
        assert_eq!(
            algorithm.output_parameters().get("iterations"),
            Some(&DataValue::Integer(0))
        );

        // the same seed gives the same initial population, whose minimum is returned
        let mut rng = crate::core::utils::get_rng(Some(3));
        let min = (0..4)
            .map(|_| {
                let s = crate::core::Solution::new(&problem, &mut rng).unwrap();
                s.variables()[0].value().unwrap()
            })
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.get(0).objective(0), min);
        assert_eq!(result.get(0).variables()[0].value().unwrap(), min);
    }

    #[test]
    /// The best solution never gets worse and the budget is respected.
    fn test_sphere() {
        let problem = Sphere::new(3, SolutionType::Real);
        let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
        algorithm.set_input_parameter("populationSize", DataValue::Integer(20));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(20));
        algorithm.set_seed(1);
        let initial_best = algorithm.execute().unwrap().get(0).objective(0);

        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(2000));
        let result = algorithm.execute().unwrap();
        assert!(result.get(0).objective(0) <= initial_best);
        assert_eq!(
            algorithm.output_parameters().get("evaluations"),
            Some(&DataValue::Integer(2000))
        );
        assert_eq!(
            algorithm.output_parameters().get("iterations"),
            Some(&DataValue::Integer(99))
        );
    }

    #[test]
    /// The same seed gives the same result.
    fn test_reproducible() {
        let problem = Sphere::new(2, SolutionType::Real);
        let mut algorithm = GenerationalGA::with_default_operators(&problem).unwrap();
        algorithm.set_input_parameter("populationSize", DataValue::Integer(10));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(200));
        algorithm.set_seed(7);
        let a = algorithm.execute().unwrap();
        let b = algorithm.execute().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_operator() {
        let problem = dummy_problem();
        let mut algorithm = GenerationalGA::new(&problem);
        assert!(matches!(
            algorithm.execute(),
            Err(OError::MissingOperator(_))
        ));
    }
}
