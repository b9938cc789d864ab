//! The Standard Particle Swarm Optimisation (SPSO) algorithms. Both variants share the swarm
//! initialisation, the adaptive random topology, the memory update and the stagnation
//! handling, and differ in how the velocity is initialised and updated and in how a particle
//! leaving the search space is handled.
//!
//! Implemented based on:
//! > Clerc, M. "Standard Particle Swarm Optimisation". 2012. hal-00764996.
//!
//! See: <https://hal.science/hal-00764996>.

use std::f64::consts::LN_2;
use std::sync::Arc;

use log::{debug, info};
use rand::RngCore;

pub use neighborhood::AdaptiveRandomNeighborhood;
pub use spso2007::StandardPSO2007;
pub use spso2011::StandardPSO2011;

use crate::algorithms::algorithm::evaluate;
use crate::algorithms::{AlgorithmBase, MaxGenerationValue, StoppingCondition};
use crate::core::{NumericView, OError, Population, Solution};
use crate::operators::{BestSolutionSelection, ObjectiveComparator, Selection};

mod neighborhood;
mod spso2007;
mod spso2011;

/// The inertia weight.
pub const W: f64 = 1.0 / (2.0 * LN_2);
/// The acceleration coefficient.
pub const C: f64 = 0.5 + LN_2;
/// The default number of iterations.
const MAX_ITERATIONS: usize = 80000;
/// The default number of informants of each particle.
const NUMBER_OF_INFORMANTS: usize = 3;

/// The default swarm size `10 + 2 sqrt(n)`, where `n` is the number of variables.
///
/// # Arguments
///
/// * `number_of_variables`: The number of variables.
///
/// returns: `usize`
pub fn default_swarm_size(number_of_variables: usize) -> usize {
    10 + (2.0 * (number_of_variables as f64).sqrt()) as usize
}

/// The particles with their velocity and memory.
pub(crate) struct Swarm {
    /// The current positions.
    pub(crate) particles: Population,
    /// The velocity of each particle.
    pub(crate) velocity: Vec<Vec<f64>>,
    /// A copy of the best position visited by each particle.
    pub(crate) personal_best: Vec<Solution>,
    /// For each particle, the index of the informant with the best personal best.
    pub(crate) neighborhood_best: Vec<usize>,
    /// The informants of each particle.
    pub(crate) neighborhood: AdaptiveRandomNeighborhood,
}

impl Swarm {
    /// The index of the informant of particle `index` with the best personal best. With ties, the
    /// first informant wins.
    fn informant_best(&self, index: usize) -> usize {
        let informants = self.neighborhood.neighbors(index);
        let mut best = informants[0];
        for &j in &informants[1..] {
            if self.personal_best[best].objective(0) > self.personal_best[j].objective(0) {
                best = j;
            }
        }
        best
    }

    fn update_neighborhood_best(&mut self) {
        for i in 0..self.particles.size() {
            self.neighborhood_best[i] = self.informant_best(i);
        }
    }

    /// Replace the personal best of each particle whose position strictly improves it.
    fn update_personal_best(&mut self) {
        for (i, particle) in self.particles.iter().enumerate() {
            if particle.objective(0) < self.personal_best[i].objective(0) {
                self.personal_best[i] = particle.clone();
            }
        }
    }

    /// Whether the best informant of a particle is the particle itself.
    pub(crate) fn informed_by_itself(&self, index: usize) -> bool {
        self.neighborhood_best[index] == index
    }

    /// The position, personal best and neighborhood best of a particle.
    pub(crate) fn views(
        &self,
        index: usize,
    ) -> Result<[NumericView<&Solution>; 3], OError> {
        Ok([
            NumericView::new(self.particles.get(index))?,
            NumericView::new(&self.personal_best[index])?,
            NumericView::new(&self.personal_best[self.neighborhood_best[index]])?,
        ])
    }
}

/// How a SPSO variant moves the particles.
pub(crate) trait VelocityRule {
    /// The factor applied to a velocity component when the particle is moved back to a bound.
    const BOUND_FACTOR: f64;

    /// The initial velocity of one component.
    ///
    /// # Arguments
    ///
    /// * `value`: The particle position.
    /// * `lower_bound`: The lower bound.
    /// * `upper_bound`: The upper bound.
    /// * `rng`: The random number generator.
    ///
    /// returns: `f64`
    fn initial_velocity(
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
        rng: &mut dyn RngCore,
    ) -> f64;

    /// The new velocity of a particle.
    ///
    /// # Arguments
    ///
    /// * `swarm`: The swarm.
    /// * `index`: The particle index.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<f64>, OError>`
    fn velocity(swarm: &Swarm, index: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>, OError>;
}

/// Move a particle with its velocity. A component leaving the bounds is set to the violated
/// bound and its velocity is multiplied by `bound_factor`.
///
/// # Arguments
///
/// * `particle`: The particle to move.
/// * `velocity`: The particle velocity.
/// * `bound_factor`: The factor applied to the velocity on a bound violation.
///
/// returns: `Result<(), OError>`
pub(crate) fn update_position(
    particle: &mut Solution,
    velocity: &mut [f64],
    bound_factor: f64,
) -> Result<(), OError> {
    let mut x = NumericView::new(particle)?;
    for (j, v) in velocity.iter_mut().enumerate() {
        let value = x.get_value(j) + *v;
        let (lower, upper) = (x.lower_bound(j), x.upper_bound(j));
        if value < lower {
            x.set_value(j, lower);
            *v *= bound_factor;
        } else if value > upper {
            x.set_value(j, upper);
            *v *= bound_factor;
        } else {
            x.set_value(j, value);
        }
    }
    Ok(())
}

/// Run a SPSO variant.
///
/// Input parameters:
///  - `swarmSize`: the number of particles (default `10 + 2 sqrt(n)`).
///  - `maxIterations`: the number of iterations (default `80000`).
///  - `numberOfParticlesToInform`: the number of informants of each particle (default `3`).
///  - `seed`: the optional seed of the random number generator.
///
/// The `neighborhoodRecomputations` output parameter counts the iterations that did not change
/// the best fitness of the swarm.
///
/// returns: `Result<Population, OError>` The best position found.
pub(crate) fn run<R: VelocityRule>(base: &mut AlgorithmBase) -> Result<Population, OError> {
    base.start()?;
    let name = base.name.clone();
    let problem = base.problem;
    let swarm_size = base
        .input_parameters
        .usize_or("swarmSize", default_swarm_size(problem.number_of_variables()))?;
    let max_iterations = MaxGenerationValue::from_parameters(&base.input_parameters, MAX_ITERATIONS)?;
    let number_of_informants = base
        .input_parameters
        .usize_or("numberOfParticlesToInform", NUMBER_OF_INFORMANTS)?;
    if swarm_size == 0 {
        return Err(OError::AlgorithmInit(
            name,
            "The swarm must have at least one particle".to_string(),
        ));
    }
    let rng: &mut dyn RngCore = &mut *base.rng;

    let mut particles = Population::new(swarm_size);
    for _ in 0..swarm_size {
        let mut particle = Solution::new(problem, rng)?;
        evaluate(problem, &mut particle)?;
        particles.add(particle);
    }
    let mut evaluations = swarm_size;
    let neighborhood = AdaptiveRandomNeighborhood::new(swarm_size, number_of_informants, rng)
        .map_err(|e| OError::AlgorithmInit(name.clone(), e.to_string()))?;

    let mut velocity = Vec::with_capacity(swarm_size);
    for particle in particles.iter() {
        let x = NumericView::new(particle)?;
        velocity.push(
            (0..x.size())
                .map(|j| R::initial_velocity(x.get_value(j), x.lower_bound(j), x.upper_bound(j), rng))
                .collect::<Vec<f64>>(),
        );
    }

    let mut swarm = Swarm {
        personal_best: particles.iter().cloned().collect(),
        particles,
        velocity,
        neighborhood_best: vec![0; swarm_size],
        neighborhood,
    };
    swarm.update_neighborhood_best();

    let comparator = ObjectiveComparator::new(0);
    let mut best_found = f64::MAX;
    let mut iteration: usize = 0;
    let mut recomputed: usize = 0;
    while !max_iterations.is_met(iteration) {
        for i in 0..swarm_size {
            let velocity = R::velocity(&swarm, i, rng)?;
            swarm.velocity[i] = velocity;
        }
        for i in 0..swarm_size {
            update_position(
                swarm.particles.get_mut(i),
                &mut swarm.velocity[i],
                R::BOUND_FACTOR,
            )?;
        }
        for i in 0..swarm_size {
            evaluate(problem, swarm.particles.get_mut(i))?;
        }
        evaluations += swarm_size;

        swarm.update_personal_best();
        swarm.update_neighborhood_best();
        iteration += 1;

        let current_best = swarm
            .particles
            .best(&comparator)
            .map(|s| s.objective(0))
            .unwrap_or(f64::MAX);
        if current_best == best_found {
            debug!("Iteration #{iteration}: no improvement. Recomputing the neighborhood");
            swarm.neighborhood.recompute(rng);
            recomputed += 1;
        }
        if current_best < best_found {
            best_found = current_best;
        }
    }
    info!("The neighborhood was recomputed {recomputed} times");

    let mut memory = Population::new(swarm_size);
    for solution in swarm.personal_best {
        memory.add(solution);
    }
    let selection = BestSolutionSelection::new(Arc::new(comparator));
    let best = selection.execute(&memory, None, rng)?[0];
    let mut result = Population::new(1);
    result.add(memory.get(best).clone());
    info!("Best objective: {}", memory.get(best).objective(0));

    base.output_parameters.set("iterations", iteration);
    base.output_parameters
        .set("neighborhoodRecomputations", recomputed);
    base.finish(evaluations);
    Ok(result)
}

#[cfg(test)]
pub(crate) mod test {
    use std::error::Error;

    use crate::algorithms::pso::{
        default_swarm_size, update_position, AdaptiveRandomNeighborhood, StandardPSO2007,
        StandardPSO2011, Swarm, C, W,
    };
    use crate::algorithms::Algorithm;
    use crate::core::test_utils::real_values;
    use crate::core::{DataValue, Population, Problem, Solution};

    /// A particle with an evaluated objective.
    pub(crate) fn particle(values: &[f64], objective: f64) -> Solution {
        let mut solution = Solution::from_real_values(values, (-10.0, 10.0), 1).unwrap();
        solution.set_objective(0, objective);
        solution
    }

    /// A swarm with fixed informants and zero velocities.
    pub(crate) fn swarm(
        positions: Vec<Solution>,
        personal_best: Vec<Solution>,
        neighbors: Vec<Vec<usize>>,
    ) -> Swarm {
        let size = positions.len();
        let velocity = positions
            .iter()
            .map(|p| vec![0.0; p.number_of_variables()])
            .collect();
        let mut particles = Population::new(size);
        for position in positions {
            particles.add(position);
        }
        let mut swarm = Swarm {
            particles,
            velocity,
            personal_best,
            neighborhood_best: vec![0; size],
            neighborhood: AdaptiveRandomNeighborhood::from_neighbors(neighbors),
        };
        swarm.update_neighborhood_best();
        swarm
    }

    #[test]
    fn test_constants() {
        assert!((W - 0.721347520444).abs() < 1e-9);
        assert!((C - 1.193147180560).abs() < 1e-9);
        assert_eq!(default_swarm_size(4), 14);
        assert_eq!(default_swarm_size(10), 16);
    }

    #[test]
    /// A particle inside the bounds moves by its velocity.
    fn test_update_position() {
        let mut particle = Solution::from_real_values(&[0.5, 0.5], (0.0, 1.0), 1).unwrap();
        let mut velocity = vec![0.25, -0.5];
        update_position(&mut particle, &mut velocity, 0.0).unwrap();
        assert_eq!(real_values(&particle), vec![0.75, 0.0]);
        assert_eq!(velocity, vec![0.25, -0.5]);
    }

    #[test]
    /// The neighborhood best is the informant with the smallest personal best. With ties, the
    /// informant listed first wins.
    fn test_neighborhood_best() {
        let memory: Vec<Solution> = [3.0, 1.0, 1.0, 0.5]
            .iter()
            .map(|f| particle(&[0.0], *f))
            .collect();
        let swarm = swarm(
            memory.clone(),
            memory,
            vec![vec![0, 2, 1], vec![1, 2], vec![2, 3], vec![3, 0, 1]],
        );
        assert_eq!(swarm.neighborhood_best, vec![2, 1, 3, 3]);
        assert!(!swarm.informed_by_itself(0));
        assert!(swarm.informed_by_itself(1));
        assert!(swarm.informed_by_itself(3));
    }

    #[test]
    /// The personal best is replaced by a copy of the position only when the position is
    /// strictly better.
    fn test_personal_best() {
        let mut swarm = swarm(
            vec![particle(&[1.0, 1.0], 1.0), particle(&[0.5, 0.5], 0.5)],
            vec![particle(&[2.0, 2.0], 1.0), particle(&[3.0, 3.0], 2.0)],
            vec![vec![0, 1], vec![1, 0]],
        );
        swarm.update_personal_best();
        assert_eq!(real_values(&swarm.personal_best[0]), vec![2.0, 2.0]);
        assert_eq!(real_values(&swarm.personal_best[1]), vec![0.5, 0.5]);
        assert_eq!(swarm.personal_best[1].objective(0), 0.5);

        // moving the particle does not move its memory
        update_position(swarm.particles.get_mut(1), &mut [1.0, 1.0], 0.0).unwrap();
        assert_eq!(real_values(swarm.particles.get(1)), vec![1.5, 1.5]);
        assert_eq!(real_values(&swarm.personal_best[1]), vec![0.5, 0.5]);
    }

    /// A problem whose objective never changes.
    #[derive(Debug)]
    struct FlatProblem;

    impl Problem for FlatProblem {
        fn name(&self) -> String {
            "Flat".to_string()
        }

        fn number_of_variables(&self) -> usize {
            2
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn lower_bound(&self, _index: usize) -> f64 {
            -1.0
        }

        fn upper_bound(&self, _index: usize) -> f64 {
            1.0
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
            solution.set_objective(0, 1.0);
            Ok(())
        }
    }

    /// Run an algorithm for five iterations and return the number of neighborhood updates.
    fn recomputations(algorithm: &mut dyn Algorithm) -> Option<DataValue> {
        algorithm.set_input_parameter("swarmSize", DataValue::Integer(6));
        algorithm.set_input_parameter("maxIterations", DataValue::Integer(5));
        algorithm.set_seed(1);
        algorithm.execute().unwrap();
        algorithm
            .output_parameters()
            .get("neighborhoodRecomputations")
            .cloned()
    }

    #[test]
    /// With a constant objective the best fitness never changes after the first iteration, so
    /// the neighborhood is drawn again at every following iteration.
    fn test_stagnation() {
        let problem = FlatProblem;
        assert_eq!(
            recomputations(&mut StandardPSO2007::new(&problem)),
            Some(DataValue::Integer(4))
        );
        assert_eq!(
            recomputations(&mut StandardPSO2011::new(&problem)),
            Some(DataValue::Integer(4))
        );
    }
}
