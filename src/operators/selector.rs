use std::fmt::Debug;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::core::{OError, Parameters, Population};
use crate::operators::{Comparator, DominanceComparator, ObjectiveComparator, PreferredSolution};

/// A trait implementing methods to choose solutions from a population for reproduction.
pub trait Selection: Debug {
    /// Select solutions from the population and return their indexes.
    ///
    /// # Arguments
    ///
    /// * `population`: The population.
    /// * `current`: The index of the solution being processed. Selectors picking parents that
    ///    must differ from the current solution use this (see [`DifferentialEvolutionSelection`]);
    ///    the others ignore it.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<usize>, OError>`
    fn execute(
        &self,
        population: &Population,
        current: Option<usize>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError>;

    /// The operator name.
    ///
    /// returns: `String`
    fn name(&self) -> String;
}

/// Return an error if the population has fewer solutions than needed.
fn check_size(operator: &str, population: &Population, needed: usize) -> Result<(), OError> {
    if population.size() < needed {
        return Err(OError::SelectorOperator(
            operator.to_string(),
            format!(
                "The population size ({}) is smaller than the number of solutions needed ({needed})",
                population.size()
            ),
        ));
    }
    Ok(())
}

/// Binary tournament. Two different solutions are drawn at random and the one preferred by the
/// comparator wins. When the comparator has no preference, the winner is drawn at random.
#[derive(Debug, Clone)]
pub struct BinaryTournament {
    comparator: Arc<dyn Comparator>,
}

impl Default for BinaryTournament {
    /// A tournament using the [`DominanceComparator`].
    fn default() -> Self {
        Self::new(Arc::new(DominanceComparator))
    }
}

impl BinaryTournament {
    /// Create the tournament.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator deciding the winner.
    ///
    /// returns: `BinaryTournament`
    pub fn new(comparator: Arc<dyn Comparator>) -> Self {
        Self { comparator }
    }

    /// Create the tournament using the `comparator` parameter. This defaults to the
    /// [`DominanceComparator`].
    ///
    /// returns: `Result<BinaryTournament, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Ok(Self::new(parameters.comparator_or("comparator", || {
            Arc::new(DominanceComparator)
        })?))
    }
}

impl Selection for BinaryTournament {
    fn execute(
        &self,
        population: &Population,
        _current: Option<usize>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        check_size(&self.name(), population, 1)?;
        let size = population.size();
        let first = rng.gen_range(0..size);
        let mut second = rng.gen_range(0..size);
        if size >= 2 {
            while second == first {
                second = rng.gen_range(0..size);
            }
        }

        let winner = match self
            .comparator
            .compare(Some(population.get(first)), Some(population.get(second)))
        {
            PreferredSolution::First => first,
            PreferredSolution::Second => second,
            PreferredSolution::MutuallyPreferred => {
                if rng.gen::<f64>() < 0.5 {
                    first
                } else {
                    second
                }
            }
        };
        Ok(vec![winner])
    }

    fn name(&self) -> String {
        "BinaryTournament".to_string()
    }
}

/// Select two different solutions at random.
#[derive(Debug, Clone, Default)]
pub struct RandomSelection;

impl Selection for RandomSelection {
    fn execute(
        &self,
        population: &Population,
        _current: Option<usize>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        check_size(&self.name(), population, 2)?;
        let size = population.size();
        let first = rng.gen_range(0..size);
        let mut second = rng.gen_range(0..size);
        while second == first {
            second = rng.gen_range(0..size);
        }
        Ok(vec![first, second])
    }

    fn name(&self) -> String {
        "RandomSelection".to_string()
    }
}

/// Select the best solution in the population according to a comparator. With ties, the solution
/// with the smallest index wins.
#[derive(Debug, Clone)]
pub struct BestSolutionSelection {
    comparator: Arc<dyn Comparator>,
}

impl BestSolutionSelection {
    /// Create the operator.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator.
    ///
    /// returns: `BestSolutionSelection`
    pub fn new(comparator: Arc<dyn Comparator>) -> Self {
        Self { comparator }
    }

    /// Create the operator using the `comparator` parameter. This defaults to the comparator on
    /// the first objective.
    ///
    /// returns: `Result<BestSolutionSelection, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Ok(Self::new(parameters.comparator_or("comparator", || {
            Arc::new(ObjectiveComparator::new(0))
        })?))
    }
}

impl Selection for BestSolutionSelection {
    fn execute(
        &self,
        population: &Population,
        _current: Option<usize>,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        let index = population
            .index_best(self.comparator.as_ref())
            .ok_or_else(|| {
                OError::SelectorOperator(self.name(), "The population is empty".to_string())
            })?;
        Ok(vec![index])
    }

    fn name(&self) -> String {
        "BestSolutionSelection".to_string()
    }
}

/// Select the worst solution in the population according to a comparator. With ties, the
/// solution with the smallest index wins.
#[derive(Debug, Clone)]
pub struct WorstSolutionSelection {
    comparator: Arc<dyn Comparator>,
}

impl WorstSolutionSelection {
    /// Create the operator.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator.
    ///
    /// returns: `WorstSolutionSelection`
    pub fn new(comparator: Arc<dyn Comparator>) -> Self {
        Self { comparator }
    }

    /// Create the operator using the `comparator` parameter. This defaults to the comparator on
    /// the first objective.
    ///
    /// returns: `Result<WorstSolutionSelection, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Ok(Self::new(parameters.comparator_or("comparator", || {
            Arc::new(ObjectiveComparator::new(0))
        })?))
    }
}

impl Selection for WorstSolutionSelection {
    fn execute(
        &self,
        population: &Population,
        _current: Option<usize>,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        let index = population
            .index_worst(self.comparator.as_ref())
            .ok_or_else(|| {
                OError::SelectorOperator(self.name(), "The population is empty".to_string())
            })?;
        Ok(vec![index])
    }

    fn name(&self) -> String {
        "WorstSolutionSelection".to_string()
    }
}

/// Select three different parents for the differential evolution crossover. The parents are
/// also different from the current solution, so the population needs at least four solutions.
#[derive(Debug, Clone, Default)]
pub struct DifferentialEvolutionSelection;

impl Selection for DifferentialEvolutionSelection {
    fn execute(
        &self,
        population: &Population,
        current: Option<usize>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        let current = current.ok_or_else(|| {
            OError::SelectorOperator(
                self.name(),
                "The index of the current solution is required".to_string(),
            )
        })?;
        check_size(&self.name(), population, 4)?;
        if current >= population.size() {
            return Err(OError::SelectorOperator(
                self.name(),
                format!("The current index {current} is out of range"),
            ));
        }

        let mut parents: Vec<usize> = Vec::with_capacity(3);
        while parents.len() < 3 {
            let candidate = rng.gen_range(0..population.size());
            if candidate != current && !parents.contains(&candidate) {
                parents.push(candidate);
            }
        }
        Ok(parents)
    }

    fn name(&self) -> String {
        "DifferentialEvolutionSelection".to_string()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::core::utils::get_rng;
    use crate::core::{Parameters, Population, Solution};
    use crate::operators::{
        BestSolutionSelection, BinaryTournament, Comparator, DifferentialEvolutionSelection,
        ObjectiveComparator, RandomSelection, Selection, WorstSolutionSelection,
    };

    fn population(objectives: &[f64]) -> Population {
        let mut population = Population::new(objectives.len());
        for o in objectives {
            let mut s = Solution::from_real_values(&[0.0], (0.0, 1.0), 1).unwrap();
            s.set_objective(0, *o);
            population.add(s);
        }
        population
    }

    #[test]
    /// The worst solution never wins a tournament.
    fn test_binary_tournament() {
        let population = population(&[3.0, 1.0, 2.0]);
        let selector = BinaryTournament::from_parameters(&Parameters::new()).unwrap();
        let mut rng = get_rng(Some(1));
        for _ in 0..50 {
            let winners = selector.execute(&population, None, &mut rng).unwrap();
            assert_eq!(winners.len(), 1);
            assert_ne!(winners[0], 0);
        }
    }

    #[test]
    /// Ties are broken at random.
    fn test_binary_tournament_ties() {
        let population = population(&[1.0, 1.0]);
        let selector = BinaryTournament::new(Arc::new(ObjectiveComparator::new(0)));
        let mut rng = get_rng(Some(3));
        let mut winners = [0; 2];
        for _ in 0..100 {
            winners[selector.execute(&population, None, &mut rng).unwrap()[0]] += 1;
        }
        assert!(winners[0] > 0 && winners[1] > 0);

        assert!(selector
            .execute(&Population::new(2), None, &mut rng)
            .is_err());
    }

    #[test]
    fn test_random_selection() {
        let population = population(&[1.0, 2.0, 3.0]);
        let mut rng = get_rng(Some(2));
        for _ in 0..20 {
            let selected = RandomSelection.execute(&population, None, &mut rng).unwrap();
            assert_eq!(selected.len(), 2);
            assert_ne!(selected[0], selected[1]);
        }
        assert!(RandomSelection
            .execute(&self::population(&[1.0]), None, &mut rng)
            .is_err());
    }

    #[test]
    fn test_best_worst_selection() {
        let population = population(&[2.0, 0.5, 4.0, 0.5]);
        let mut rng = get_rng(None);
        let best = BestSolutionSelection::from_parameters(&Parameters::new()).unwrap();
        assert_eq!(best.execute(&population, None, &mut rng).unwrap(), vec![1]);

        let worst = WorstSolutionSelection::new(Arc::new(ObjectiveComparator::new(0)));
        assert_eq!(worst.execute(&population, None, &mut rng).unwrap(), vec![2]);

        // maximise instead
        let mut parameters = Parameters::new();
        let comparator: Arc<dyn Comparator> = Arc::new(ObjectiveComparator::with_order(0, false));
        parameters.set("comparator", comparator);
        let best = BestSolutionSelection::from_parameters(&parameters).unwrap();
        assert_eq!(best.execute(&population, None, &mut rng).unwrap(), vec![2]);

        assert!(best.execute(&Population::new(1), None, &mut rng).is_err());
    }

    #[test]
    /// The three parents are distinct and different from the current solution.
    fn test_de_selection() {
        let population = population(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut rng = get_rng(Some(4));
        for current in 0..5 {
            let parents = DifferentialEvolutionSelection
                .execute(&population, Some(current), &mut rng)
                .unwrap();
            assert_eq!(parents.len(), 3);
            assert!(!parents.contains(&current));
            assert_ne!(parents[0], parents[1]);
            assert_ne!(parents[0], parents[2]);
            assert_ne!(parents[1], parents[2]);
        }

        assert!(DifferentialEvolutionSelection
            .execute(&population, None, &mut rng)
            .is_err());
        assert!(DifferentialEvolutionSelection
            .execute(&self::population(&[1.0, 2.0, 3.0]), Some(0), &mut rng)
            .is_err());
    }
}
