use rand::RngCore;

use crate::algorithms::pso::{run, Swarm, VelocityRule, C, W};
use crate::algorithms::{Algorithm, AlgorithmBase};
use crate::core::utils::rand_double;
use crate::core::{OError, Population, Problem};

/// The Standard PSO 2007 (SPSO 2007).
///
/// The velocity of a particle is pulled towards its personal best and towards the best
/// personal best among its informants, with random coefficients drawn in `[0, C]` for each
/// particle. A particle leaving the search space is moved back to the violated bound and the
/// velocity component is set to zero.
///
/// Input parameters:
///  - `swarmSize`: the number of particles (default `10 + 2 sqrt(n)`).
///  - `maxIterations`: the number of iterations (default `80000`).
///  - `numberOfParticlesToInform`: the number of informants of each particle (default `3`).
///  - `seed`: the optional seed of the random number generator.
///
/// The algorithm returns a population with the best position found.
///
/// # Example
/// ```
/// use optipop::algorithms::pso::StandardPSO2007;
/// use optipop::algorithms::Algorithm;
/// use optipop::core::problem::builtin_problems::Sphere;
/// use optipop::core::{DataValue, SolutionType};
///
/// let problem = Sphere::new(2, SolutionType::Real);
/// let mut algorithm = StandardPSO2007::new(&problem);
/// algorithm.set_input_parameter("maxIterations", DataValue::Integer(50));
/// let result = algorithm.execute().unwrap();
/// assert!(result.get(0).objective(0) < 1.0);
/// ```
pub struct StandardPSO2007<'a> {
    base: AlgorithmBase<'a>,
}

impl<'a> StandardPSO2007<'a> {
    /// Create the algorithm.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem to solve.
    ///
    /// returns: `StandardPSO2007`
    pub fn new(problem: &'a dyn Problem) -> Self {
        Self {
            base: AlgorithmBase::new("StandardPSO2007", problem),
        }
    }
}

/// The 2007 velocity rule.
struct Rule2007;

impl VelocityRule for Rule2007 {
    const BOUND_FACTOR: f64 = 0.0;

    /// Half the distance to a random point in the search space.
    fn initial_velocity(
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
        rng: &mut dyn RngCore,
    ) -> f64 {
        (rand_double(rng, lower_bound, upper_bound) - value) / 2.0
    }

    fn velocity(swarm: &Swarm, index: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>, OError> {
        let [x, p, l] = swarm.views(index)?;
        let r1 = rand_double(rng, 0.0, C);
        let r2 = rand_double(rng, 0.0, C);
        let informed_by_itself = swarm.informed_by_itself(index);

        Ok(swarm.velocity[index]
            .iter()
            .enumerate()
            .map(|(j, v)| {
                let mut new_v = W * v + r1 * (p.get_value(j) - x.get_value(j));
                if !informed_by_itself {
                    new_v += r2 * (l.get_value(j) - x.get_value(j));
                }
                new_v
            })
            .collect())
    }
}

impl<'a> Algorithm<'a> for StandardPSO2007<'a> {
    fn base(&self) -> &AlgorithmBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AlgorithmBase<'a> {
        &mut self.base
    }

    fn execute(&mut self) -> Result<Population, OError> {
        run::<Rule2007>(&mut self.base)
    }
}
