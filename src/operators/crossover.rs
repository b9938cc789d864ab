use std::fmt::Debug;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{NumericView, OError, Parameters, Solution};

/// Trait to define a crossover operator to generate new children by recombining the genetic
/// material of some parents.
pub trait Crossover: Debug {
    /// Generate the children from their parents.
    ///
    /// # Arguments
    ///
    /// * `parents`: The parents to use for mating. The number of parents depends on the operator.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<Solution>, OError>`. The new children.
    fn execute(
        &self,
        parents: &[&Solution],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution>, OError>;

    /// Whether the base parent must be the best solution in the population.
    fn uses_best_parent(&self) -> bool {
        false
    }

    /// The operator name.
    ///
    /// returns: `String`
    fn name(&self) -> String;
}

/// Input arguments for [`SimulatedBinaryCrossover`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SimulatedBinaryCrossoverArgs {
    /// The distribution index for crossover (this is the eta_c in the paper). This directly
    /// control the spread of children. If a large value is selected, the resulting children will
    /// have a higher probability of being close to their parents; a small value generates distant
    /// offsprings.
    pub distribution_index: f64,
    /// The probability that the parents participate in the crossover. If 1.0, the parents always
    /// participate in the crossover. If the probability is lower, then the children are the exact
    /// clones of their parents (i.e. all the variable values do not change).
    pub crossover_probability: f64,
}

impl Default for SimulatedBinaryCrossoverArgs {
    /// Default parameters for the Simulated Binary Crossover (SBX) with a distribution index of
    /// 20 and crossover probability of `0.9`.
    fn default() -> Self {
        Self {
            distribution_index: 20.0,
            crossover_probability: 0.9,
        }
    }
}

impl SimulatedBinaryCrossoverArgs {
    /// Read the arguments from the `probability` and `distributionIndex` parameters. The missing
    /// parameters take their default value.
    ///
    /// # Arguments
    ///
    /// * `parameters`: The parameters.
    ///
    /// returns: `Result<SimulatedBinaryCrossoverArgs, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        let default = Self::default();
        Ok(Self {
            distribution_index: parameters
                .real_or("distributionIndex", default.distribution_index)?,
            crossover_probability: parameters
                .real_or("probability", default.crossover_probability)?,
        })
    }
}

/// Simulated Binary Crossover (SBX) operator for solutions encoded with real numbers. The operator
/// takes two parents and generates two children. Each variable has a probability of `0.5` of being
/// recombined; the values of the variables that are not recombined are exchanged between the
/// children.
///
/// Implemented based on:
/// > Kalyanmoy Deb, Karthik Sindhya, and Tatsuya Okabe. 2007. Self-adaptive
/// > simulated binary crossover for real-parameter optimization. In Proceedings of the 9th annual
/// > conference on Genetic and evolutionary computation (GECCO '07). Association for Computing
/// > Machinery, New York, NY, USA, 1187–1194. <https://doi.org/10.1145/1276958.1277190>
///
/// # Example
///
/// ```
/// use optipop::core::Solution;
/// use optipop::core::utils::get_rng;
/// use optipop::operators::{Crossover, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs};
///
/// let a = Solution::from_real_values(&[0.2, 5.0], (0.0, 10.0), 1).unwrap();
/// let b = Solution::from_real_values(&[0.8, 1.0], (0.0, 10.0), 1).unwrap();
///
/// let sbx = SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs::default()).unwrap();
/// let mut rng = get_rng(Some(1));
/// let children = sbx.execute(&[&a, &b], &mut rng).unwrap();
/// assert_eq!(children.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedBinaryCrossover {
    /// The distribution index for crossover. This is the eta_c in the paper.
    distribution_index: f64,
    /// The probability that the parents participate in the crossover.
    crossover_probability: f64,
}

/// Parent values closer than this are copied to the children.
const EPS: f64 = 1.0e-14;

impl SimulatedBinaryCrossover {
    /// Initialise the Simulated Binary Crossover (SBX) operator.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`SimulatedBinaryCrossoverArgs`] for a detail
    ///    explanation of the parameters.
    ///
    /// returns: `Result<SimulatedBinaryCrossover, OError>`
    pub fn new(args: SimulatedBinaryCrossoverArgs) -> Result<Self, OError> {
        if args.distribution_index < 0.0 {
            return Err(OError::CrossoverOperator(
                "SBX".to_string(),
                format!(
                    "The distribution index {} must be a positive number",
                    args.distribution_index
                ),
            ));
        }
        if !(0.0..=1.0).contains(&args.crossover_probability) {
            return Err(OError::CrossoverOperator(
                "SBX".to_string(),
                format!(
                    "The crossover probability {} must be a number between 0 and 1",
                    args.crossover_probability
                ),
            ));
        }

        Ok(Self {
            distribution_index: args.distribution_index,
            crossover_probability: args.crossover_probability,
        })
    }

    /// Initialise the operator from named parameters. See
    /// [`SimulatedBinaryCrossoverArgs::from_parameters`].
    ///
    /// returns: `Result<SimulatedBinaryCrossover, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Self::new(SimulatedBinaryCrossoverArgs::from_parameters(parameters)?)
    }

    /// Perform the crossover for two real variables from two parents, whose values differ.
    ///
    /// # Arguments
    ///
    /// * `v1`: The real variable value from the first parent.
    /// * `v2`: The real variable value from the second parent.
    /// * `y_lower`: The variable lower bound.
    /// * `y_upper`: The variable upper bound.
    /// * `rng`: The random number generator reference.
    ///
    /// returns: `(f64, f64)`. The values to assign to the two children.
    fn crossover_variables(
        &self,
        v1: f64,
        v2: f64,
        y_lower: f64,
        y_upper: f64,
        rng: &mut dyn RngCore,
    ) -> (f64, f64) {
        // get the lowest value between the two parent
        let (y1, y2) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        let delta_y = y2 - y1;
        let prob = rng.gen::<f64>();

        // first child
        let beta = 1.0 + (2.0 * (y1 - y_lower) / delta_y);
        let alpha = 2.0 - f64::powf(beta, -(self.distribution_index + 1.0));
        let c1 = 0.5 * ((y1 + y2) - self.betaq(prob, alpha) * delta_y);

        // second child
        let beta = 1.0 + (2.0 * (y_upper - y2) / delta_y);
        let alpha = 2.0 - f64::powf(beta, -(self.distribution_index + 1.0));
        let c2 = 0.5 * ((y1 + y2) + self.betaq(prob, alpha) * delta_y);

        // make sure values are within bounds
        let c1 = c1.clamp(y_lower, y_upper);
        let c2 = c2.clamp(y_lower, y_upper);

        // randomly swap the values
        if rng.gen::<f64>() <= 0.5 {
            (c2, c1)
        } else {
            (c1, c2)
        }
    }

    /// Calculate the betaq coefficient.
    ///
    /// # Arguments
    ///
    /// * `prob`: The probability.
    /// * `alpha`: The alpha coefficient.
    ///
    /// returns: `f64`
    fn betaq(&self, prob: f64, alpha: f64) -> f64 {
        if prob <= (1.0 / alpha) {
            f64::powf(prob * alpha, 1.0 / (self.distribution_index + 1.0))
        } else {
            f64::powf(
                1.0 / (2.0 - prob * alpha),
                1.0 / (self.distribution_index + 1.0),
            )
        }
    }
}

impl Crossover for SimulatedBinaryCrossover {
    fn execute(
        &self,
        parents: &[&Solution],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution>, OError> {
        let [parent1, parent2] = parents else {
            return Err(OError::CrossoverOperator(
                self.name(),
                format!("The operator needs 2 parents, {} given", parents.len()),
            ));
        };
        let mut child1 = (*parent1).clone();
        let mut child2 = (*parent2).clone();

        let p1 = NumericView::new(*parent1)?;
        let p2 = NumericView::new(*parent2)?;
        let mut c1 = NumericView::new(&mut child1)?;
        let mut c2 = NumericView::new(&mut child2)?;

        // do not apply crossover if probability is not reached
        if rng.gen::<f64>() <= self.crossover_probability {
            for i in 0..p1.size() {
                let v1 = p1.get_value(i);
                let v2 = p2.get_value(i);
                let (new_v1, new_v2) = if rng.gen::<f64>() <= 0.5 {
                    if (v1 - v2).abs() > EPS {
                        self.crossover_variables(
                            v1,
                            v2,
                            p1.lower_bound(i),
                            p1.upper_bound(i),
                            rng,
                        )
                    } else {
                        (v1, v2)
                    }
                } else {
                    (v2, v1)
                };
                c1.set_value(i, new_v1);
                c2.set_value(i, new_v2);
            }
        }

        Ok(vec![child1, child2])
    }

    fn name(&self) -> String {
        "SBX".to_string()
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::real_values;
    use crate::core::utils::get_rng;
    use crate::core::{Parameters, Solution};
    use crate::operators::{Crossover, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs};

    #[test]
    /// Check that the input arguments to SBX operator are valid.
    fn test_new_sbx_error() {
        assert!(SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs {
            distribution_index: -2.0,
            crossover_probability: 1.0,
        })
        .is_err());
        assert!(SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs {
            distribution_index: 1.0,
            crossover_probability: 2.0,
        })
        .is_err());

        let mut parameters = Parameters::new();
        parameters.set("probability", "always");
        assert!(SimulatedBinaryCrossover::from_parameters(&parameters).is_err());
    }

    #[test]
    /// The children stay within the bounds and are different from the parents.
    fn test_sbx_crossover() {
        let a = Solution::from_real_values(&[0.2, 3.0, 7.0], (0.0, 10.0), 1).unwrap();
        let b = Solution::from_real_values(&[0.8, 4.0, 7.0], (0.0, 10.0), 1).unwrap();

        let sbx = SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs {
            distribution_index: 1.0,
            crossover_probability: 1.0,
        })
        .unwrap();
        let mut rng = get_rng(Some(1));
        let mut changed = false;
        for _ in 0..20 {
            let children = sbx.execute(&[&a, &b], &mut rng).unwrap();
            assert_eq!(children.len(), 2);
            for child in &children {
                let values = real_values(child);
                assert!(values.iter().all(|v| (0.0..=10.0).contains(v)));
                // equal parent values are copied
                assert_eq!(values[2], 7.0);
                changed |= values[0] != 0.2 && values[0] != 0.8;
            }
        }
        assert!(changed);
    }

    #[test]
    /// With a zero probability the children are copies of the parents.
    fn test_sbx_no_crossover() {
        let a = Solution::from_real_values(&[0.2, 3.0], (0.0, 10.0), 1).unwrap();
        let b = Solution::from_real_values(&[0.8, 4.0], (0.0, 10.0), 1).unwrap();
        let mut parameters = Parameters::new();
        parameters.set("probability", 0.0);
        let sbx = SimulatedBinaryCrossover::from_parameters(&parameters).unwrap();

        let mut rng = get_rng(Some(1));
        let children = sbx.execute(&[&a, &b], &mut rng).unwrap();
        assert_eq!(real_values(&children[0]), vec![0.2, 3.0]);
        assert_eq!(real_values(&children[1]), vec![0.8, 4.0]);

        assert!(sbx.execute(&[&a], &mut rng).is_err());
    }
}
