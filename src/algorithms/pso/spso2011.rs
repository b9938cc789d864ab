use rand::RngCore;

use crate::algorithms::pso::{run, Swarm, VelocityRule, C, W};
use crate::algorithms::{Algorithm, AlgorithmBase};
use crate::core::utils::{euclidean_distance, rand_double, rand_sphere};
use crate::core::{OError, Population, Problem};

/// The factor applied to the velocity of a particle leaving the search space.
const CH_VEL: f64 = -0.5;

/// The Standard PSO 2011 (SPSO 2011).
///
/// The velocity is rotation invariant: for each particle, a gravity centre `G` is computed from
/// its position `x`, its personal best `p` and the best informant `l` as
/// `G = x + C (p + l - 2x) / 3` (or `G = x + C (p - x) / 2` when the particle is its own best
/// informant). A random point `x'` is drawn in the hypersphere centred on `G` with radius
/// `|G - x|` and the new velocity is `W v + x' - x`. A particle leaving the search space is moved
/// back to the violated bound and the velocity component is multiplied by `-0.5`.
///
/// Input parameters:
///  - `swarmSize`: the number of particles (default `10 + 2 sqrt(n)`).
///  - `maxIterations`: the number of iterations (default `80000`).
///  - `numberOfParticlesToInform`: the number of informants of each particle (default `3`).
///  - `seed`: the optional seed of the random number generator.
///
/// The algorithm returns a population with the best position found.
pub struct StandardPSO2011<'a> {
    base: AlgorithmBase<'a>,
}

impl<'a> StandardPSO2011<'a> {
    /// Create the algorithm.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem to solve.
    ///
    /// returns: `StandardPSO2011`
    pub fn new(problem: &'a dyn Problem) -> Self {
        Self {
            base: AlgorithmBase::new("StandardPSO2011", problem),
        }
    }
}

/// The 2011 velocity rule.
struct Rule2011;

impl VelocityRule for Rule2011 {
    const BOUND_FACTOR: f64 = CH_VEL;

    /// A random velocity keeping the particle in the search space.
    fn initial_velocity(
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
        rng: &mut dyn RngCore,
    ) -> f64 {
        rand_double(rng, lower_bound - value, upper_bound - value)
    }

    fn velocity(swarm: &Swarm, index: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>, OError> {
        let [x, p, l] = swarm.views(index)?;
        let position: Vec<f64> = (0..x.size()).map(|j| x.get_value(j)).collect();

        let gravity_centre: Vec<f64> = if swarm.informed_by_itself(index) {
            (0..x.size())
                .map(|j| position[j] + C * (p.get_value(j) - position[j]) / 2.0)
                .collect()
        } else {
            (0..x.size())
                .map(|j| {
                    position[j]
                        + C * (p.get_value(j) + l.get_value(j) - 2.0 * position[j]) / 3.0
                })
                .collect()
        };
        let radius = euclidean_distance(&gravity_centre, &position);
        let random_point = rand_sphere(rng, &gravity_centre, radius);

        Ok(swarm.velocity[index]
            .iter()
            .zip(random_point.iter().zip(&position))
            .map(|(v, (r, x))| W * v + r - x)
            .collect())
    }
}

impl<'a> Algorithm<'a> for StandardPSO2011<'a> {
    fn base(&self) -> &AlgorithmBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AlgorithmBase<'a> {
        &mut self.base
    }

    fn execute(&mut self) -> Result<Population, OError> {
        run::<Rule2011>(&mut self.base)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::pso::spso2011::Rule2011;
    use crate::algorithms::pso::test::{particle, swarm};
    use crate::algorithms::pso::{update_position, StandardPSO2011, VelocityRule, C, W};
    use crate::algorithms::Algorithm;
    use crate::core::problem::builtin_problems::Sphere;
    use crate::core::test_utils::{assert_approx_array_eq, real_values};
    use crate::core::utils::{euclidean_distance, get_rng, rand_sphere};
    use crate::core::{DataValue, Solution, SolutionType};

    #[test]
    /// A particle crossing a bound stops on the bound and bounces back at half the speed.
    fn test_bound_violation() {
        let mut particle = Solution::from_real_values(&[0.9, 0.1, 0.5], (0.0, 1.0), 1).unwrap();
        let mut velocity = vec![0.3, -0.4, 0.25];
        update_position(&mut particle, &mut velocity, Rule2011::BOUND_FACTOR).unwrap();
        assert_eq!(real_values(&particle), vec![1.0, 0.0, 0.75]);
        assert_eq!(velocity, vec![-0.15, 0.2, 0.25]);
    }

    #[test]
    /// The initial velocity keeps each component of the particle within its bounds.
    fn test_initial_velocity() {
        let mut rng = get_rng(Some(1));
        for value in [-1.0, 0.0, 2.5] {
            let v = Rule2011::initial_velocity(value, -1.0, 3.0, &mut rng);
            assert!((-1.0..=3.0).contains(&(value + v)));
        }
    }

    #[test]
    /// The gravity centre includes the best informant unless the particle is its own best
    /// informant.
    fn test_velocity() {
        let mut swarm = swarm(
            vec![particle(&[1.0, -1.0], 5.0), particle(&[2.0, 0.0], 4.0)],
            vec![particle(&[0.0, 0.0], 3.0), particle(&[3.0, 1.0], 1.0)],
            vec![vec![0, 1], vec![1, 0]],
        );
        swarm.velocity = vec![vec![0.5, -0.5], vec![0.2, 0.1]];
        let mut rng = get_rng(Some(7));
        let mut expected_rng = get_rng(Some(7));

        // x = [1, -1], p = [0, 0], l = [3, 1]
        let centre = [
            1.0 + C * (0.0 + 3.0 - 2.0) / 3.0,
            -1.0 + C * (0.0 + 1.0 + 2.0) / 3.0,
        ];
        let radius = euclidean_distance(&centre, &[1.0, -1.0]);
        let point = rand_sphere(&mut expected_rng, &centre, radius);
        let v = Rule2011::velocity(&swarm, 0, &mut rng).unwrap();
        assert_approx_array_eq(&v, &[W * 0.5 + point[0] - 1.0, W * -0.5 + point[1] + 1.0]);

        // x = [2, 0], p = l = [3, 1]
        let centre = [2.0 + C * (3.0 - 2.0) / 2.0, 0.0 + C * (1.0 - 0.0) / 2.0];
        let radius = euclidean_distance(&centre, &[2.0, 0.0]);
        let point = rand_sphere(&mut expected_rng, &centre, radius);
        let v = Rule2011::velocity(&swarm, 1, &mut rng).unwrap();
        assert_approx_array_eq(&v, &[W * 0.2 + point[0] - 2.0, W * 0.1 + point[1] - 0.0]);
    }

    #[test]
    fn test_sphere() {
        let problem = Sphere::new(3, SolutionType::Real);
        let mut algorithm = StandardPSO2011::new(&problem);
        algorithm.set_input_parameter("swarmSize", DataValue::Integer(20));
        algorithm.set_input_parameter("maxIterations", DataValue::Integer(0));
        algorithm.set_seed(4);
        let initial = algorithm.execute().unwrap().get(0).objective(0);

        algorithm.set_input_parameter("maxIterations", DataValue::Integer(300));
        let result = algorithm.execute().unwrap();
        assert_eq!(result.size(), 1);
        assert!(result.get(0).objective(0) < initial);
        assert!(real_values(result.get(0))
            .iter()
            .all(|x| (-5.12..=5.12).contains(x)));
        assert_eq!(
            algorithm.output_parameters().get("evaluations"),
            Some(&DataValue::Integer(20 * 301))
        );
    }

    #[test]
    /// The array encoding gives the same run as the per-variable encoding.
    fn test_array_encoding() {
        let run = |solution_type| {
            let problem = Sphere::new(2, solution_type);
            let mut algorithm = StandardPSO2011::new(&problem);
            algorithm.set_input_parameter("swarmSize", DataValue::Integer(10));
            algorithm.set_input_parameter("maxIterations", DataValue::Integer(30));
            algorithm.set_seed(9);
            algorithm.execute().unwrap().get(0).objective(0)
        };
        assert_eq!(run(SolutionType::Real), run(SolutionType::ArrayReal));
    }
}
