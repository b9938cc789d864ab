use log::{debug, info};

use crate::algorithms::algorithm::evaluate;
use crate::algorithms::{Algorithm, AlgorithmBase, MaxFunctionEvaluationValue, StoppingCondition};
use crate::core::{OError, Population, Problem, Solution};
use crate::operators::{
    Comparator, DifferentialEvolutionCrossover, DifferentialEvolutionSelection,
    ObjectiveComparator, Operator, PreferredSolution,
};

/// The default number of solutions in the population.
const POPULATION_SIZE: usize = 100;
/// The default number of function evaluations.
const MAX_EVALUATIONS: usize = 25000;

/// A single-objective differential evolution (DE) algorithm.
///
/// At each generation and for each solution in the population, three parents different from
/// the solution are drawn by the `"selection"` operator and a child is built by the
/// `"crossover"` operator from the solution and its parents. When the crossover requires it
/// (the `best/...` and `current-to-best/...` variants of the
/// [`DifferentialEvolutionCrossover`]), the base parent is the best solution in the population.
/// The child replaces the solution unless the solution is strictly better.
///
/// Input parameters:
///  - `populationSize`: the number of solutions (default `100`, at least `4`).
///  - `maxEvaluations`: the number of function evaluations (default `25000`).
///  - `seed`: the optional seed of the random number generator.
///
/// Implemented based on:
/// > Storn, R., Price, K. "Differential Evolution - A Simple and Efficient Heuristic for global
/// > Optimization over Continuous Spaces". Journal of Global Optimization 11, 341-359 (1997).
pub struct DifferentialEvolution<'a> {
    base: AlgorithmBase<'a>,
}

impl<'a> DifferentialEvolution<'a> {
    /// Create the algorithm. The crossover is registered as the `"crossover"` operator and the
    /// [`DifferentialEvolutionSelection`] as the `"selection"` operator. Both can be replaced
    /// with [`Algorithm::add_operator`].
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem to solve.
    /// * `crossover`: The DE crossover with the variant to use.
    ///
    /// returns: `DifferentialEvolution`
    pub fn new(problem: &'a dyn Problem, crossover: DifferentialEvolutionCrossover) -> Self {
        let mut base = AlgorithmBase::new("DifferentialEvolution", problem);
        base.operators
            .insert("crossover", Operator::Crossover(Box::new(crossover)));
        base.operators.insert(
            "selection",
            Operator::Selection(Box::new(DifferentialEvolutionSelection)),
        );
        Self { base }
    }

    /// Pick the parents of the solution at `index`.
    fn parents(
        &mut self,
        population: &Population,
        index: usize,
        best: usize,
    ) -> Result<[usize; 3], OError> {
        let selection = self.base.operators.selection("selection")?;
        let selected = selection.execute(population, Some(index), &mut self.base.rng)?;
        let &[p0, p1, p2, ..] = selected.as_slice() else {
            return Err(OError::AlgorithmRun(
                self.base.name.clone(),
                format!(
                    "The selection operator {} returned {} parents instead of 3",
                    selection.name(),
                    selected.len()
                ),
            ));
        };
        if self.base.operators.crossover("crossover")?.uses_best_parent() {
            return Ok([p0, p1, best]);
        }
        Ok([p0, p1, p2])
    }
}

impl<'a> Algorithm<'a> for DifferentialEvolution<'a> {
    fn base(&self) -> &AlgorithmBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AlgorithmBase<'a> {
        &mut self.base
    }

    fn execute(&mut self) -> Result<Population, OError> {
        self.base.start()?;
        let population_size = self
            .base
            .input_parameters
            .usize_or("populationSize", POPULATION_SIZE)?;
        let budget =
            MaxFunctionEvaluationValue::from_parameters(&self.base.input_parameters, MAX_EVALUATIONS)?;
        if population_size < 4 {
            return Err(OError::AlgorithmInit(
                self.base.name.clone(),
                "The population must have at least 4 solutions".to_string(),
            ));
        }
        let crossover = self.base.operators.crossover("crossover")?;
        self.base.operators.selection("selection")?;
        info!("Using the {} operator", crossover.name());

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

        while !budget.is_met(evaluations) {
            generation += 1;
            let best = population.index_best(&comparator).unwrap_or(0);
            let mut offspring = Population::new(population_size);
            for i in 0..population.size() {
                let [p0, p1, p2] = self.parents(&population, i, best)?;
                let crossover = self.base.operators.crossover("crossover")?;
                let mut children = crossover.execute(
                    &[
                        population.get(i),
                        population.get(p0),
                        population.get(p1),
                        population.get(p2),
                    ],
                    &mut self.base.rng,
                )?;
                let Some(mut child) = children.pop() else {
                    return Err(OError::AlgorithmRun(
                        self.base.name.clone(),
                        format!("The crossover operator {} returned no child", crossover.name()),
                    ));
                };
                evaluate(problem, &mut child)?;
                evaluations += 1;

                let current = population.get(i);
                if comparator.compare(Some(current), Some(&child)) == PreferredSolution::First {
                    offspring.add(current.clone());
                } else {
                    offspring.add(child);
                }
            }
            population = offspring;
            debug!("Generation #{generation} completed after {evaluations} evaluations");
        }

        let mut result = Population::new(1);
        if let Some(best) = population.best(&comparator) {
            info!("Best objective: {}", best.objective(0));
            result.add(best.clone());
        }
        self.base.output_parameters.set("iterations", generation);
        self.base.finish(evaluations);
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{Algorithm, DifferentialEvolution};
    use crate::core::problem::builtin_problems::Sphere;
    use crate::core::{DataValue, OError, Parameters, SolutionType};
    use crate::operators::{
        DifferentialEvolutionCrossover, DifferentialEvolutionCrossoverArgs, Operator,
        RandomSelection,
    };

    fn run(variant: &str, max_evaluations: i64) -> f64 {
        let problem = Sphere::new(3, SolutionType::Real);
        let mut parameters = Parameters::new();
        parameters.set("DE_VARIANT", variant).set("CR", 0.9);
        let crossover = DifferentialEvolutionCrossover::from_parameters(&parameters).unwrap();
        let mut algorithm = DifferentialEvolution::new(&problem, crossover);
        algorithm.set_input_parameter("populationSize", DataValue::Integer(20));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(max_evaluations));
        algorithm.set_seed(2);
        let result = algorithm.execute().unwrap();
        assert_eq!(result.size(), 1);
        assert_eq!(
            algorithm.output_parameters().get("evaluations"),
            Some(&DataValue::Integer(max_evaluations))
        );
        result.get(0).objective(0)
    }

    #[test]
    /// The greedy replacement never loses the best solution.
    fn test_improvement() {
        for variant in ["rand/1/bin", "best/1/exp", "current-to-best/1"] {
            let initial = run(variant, 20);
            let last = run(variant, 2000);
            assert!(last <= initial, "{variant}: {last} > {initial}");
        }
    }

    #[test]
    fn test_small_population() {
        let problem = Sphere::new(2, SolutionType::Real);
        let crossover =
            DifferentialEvolutionCrossover::new(DifferentialEvolutionCrossoverArgs::default())
                .unwrap();
        let mut algorithm = DifferentialEvolution::new(&problem, crossover);
        algorithm.set_input_parameter("populationSize", DataValue::Integer(3));
        assert!(matches!(
            algorithm.execute(),
            Err(OError::AlgorithmInit(_, _))
        ));
    }

    #[test]
    /// The crossover and the selection are read from the registered operators.
    fn test_operators() {
        let problem = Sphere::new(2, SolutionType::Real);
        let crossover =
            DifferentialEvolutionCrossover::new(DifferentialEvolutionCrossoverArgs::default())
                .unwrap();
        let mut algorithm = DifferentialEvolution::new(&problem, crossover);
        algorithm.set_input_parameter("populationSize", DataValue::Integer(5));
        algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(20));
        assert!(algorithm.base().operators.crossover("crossover").is_ok());
        assert_eq!(
            algorithm.base().operators.selection("selection").unwrap().name(),
            "DifferentialEvolutionSelection"
        );

        // the random selection returns two parents only
        algorithm.add_operator("selection", Operator::Selection(Box::new(RandomSelection)));
        assert!(matches!(
            algorithm.execute(),
            Err(OError::AlgorithmRun(_, _))
        ));

        algorithm.add_operator("crossover", Operator::Selection(Box::new(RandomSelection)));
        assert!(matches!(
            algorithm.execute(),
            Err(OError::MissingOperator(_))
        ));
    }
}
