use std::fmt::Debug;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{NumericView, OError, Parameters, Solution};

/// The trait to implement a mutation operator to modify the genetic material of a solution.
pub trait Mutation: Debug {
    /// Mutate a solution in place.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution to mutate.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<(), OError>`.
    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<(), OError>;

    /// The operator name.
    ///
    /// returns: `String`
    fn name(&self) -> String;
}

/// Check that a probability is in `[0, 1]`.
fn check_probability(operator: &str, probability: f64) -> Result<(), OError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(OError::MutationOperator(
            operator.to_string(),
            format!("The probability {probability} must be a number between 0 and 1"),
        ));
    }
    Ok(())
}

/// Input arguments for [`PolynomialMutation`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PolynomialMutationArgs {
    /// A user-defined parameter to control the mutation. This is eta_m in the paper, and it is
    /// suggested its value to be in the [20, 100] range.
    pub index_parameter: f64,
    /// The probability of mutating a variable. When `None`, this is `1` divided by the number of
    /// variables of the mutated solution (i.e. each variable will have the same probability of
    /// being mutated).
    pub variable_probability: Option<f64>,
}

impl Default for PolynomialMutationArgs {
    /// A distribution index of `20` and a variable probability of `1/n`.
    fn default() -> Self {
        Self {
            index_parameter: 20.0,
            variable_probability: None,
        }
    }
}

impl PolynomialMutationArgs {
    /// Read the arguments from the `probability` and `distributionIndex` parameters.
    ///
    /// # Arguments
    ///
    /// * `parameters`: The parameters.
    ///
    /// returns: `Result<PolynomialMutationArgs, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Ok(Self {
            index_parameter: parameters
                .real_or("distributionIndex", Self::default().index_parameter)?,
            variable_probability: parameters.optional_real("probability")?,
        })
    }
}

/// The Polynomial mutation (PM) operator.
///
/// Adapted from [Deb & Deb (2014)](https://dl.acm.org/doi/10.1504/IJAISC.2014.059280), full
/// text available at <https://www.egr.msu.edu/~kdeb/papers/k2012016.pdf>.
///
/// # Example
///
/// ```
/// use optipop::core::Solution;
/// use optipop::core::utils::get_rng;
/// use optipop::operators::{Mutation, PolynomialMutation, PolynomialMutationArgs};
///
/// let mut solution = Solution::from_real_values(&[0.2, 0.5], (0.0, 1.0), 1).unwrap();
/// let pm = PolynomialMutation::new(PolynomialMutationArgs {
///     index_parameter: 20.0,
///     variable_probability: Some(1.0),
/// }).unwrap();
/// let mut rng = get_rng(Some(1));
/// pm.execute(&mut solution, &mut rng).unwrap();
/// println!("{:?}", solution.variables());
/// ```
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    /// The user-defined parameter to control the mutation.
    index_parameter: f64,
    /// The probability of mutating a variable.
    variable_probability: Option<f64>,
}

impl PolynomialMutation {
    /// Initialise the Polynomial mutation (PM) operator. This returns an error if the probability
    /// is outside the [0, 1] range.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`PolynomialMutationArgs`].
    ///
    /// returns: `Result<PolynomialMutation, OError>`
    pub fn new(args: PolynomialMutationArgs) -> Result<Self, OError> {
        if let Some(probability) = args.variable_probability {
            check_probability("PolynomialMutation", probability)?;
        }
        if args.index_parameter < 0.0 {
            return Err(OError::MutationOperator(
                "PolynomialMutation".to_string(),
                format!(
                    "The distribution index {} must be a positive number",
                    args.index_parameter
                ),
            ));
        }
        Ok(Self {
            index_parameter: args.index_parameter,
            variable_probability: args.variable_probability,
        })
    }

    /// Initialise the operator from named parameters. See
    /// [`PolynomialMutationArgs::from_parameters`].
    ///
    /// returns: `Result<PolynomialMutation, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Self::new(PolynomialMutationArgs::from_parameters(parameters)?)
    }

    /// Perform the mutation of a real variable.
    ///
    /// # Arguments
    ///
    /// * `y`: The real variable value to mutate.
    /// * `y_lower`: The variable lower bound.
    /// * `y_upper`: The variable upper bound.
    /// * `rng`: The random number generator reference.
    ///
    /// returns: `f64`
    fn mutate_variable(&self, y: f64, y_lower: f64, y_upper: f64, rng: &mut dyn RngCore) -> f64 {
        let delta_y = y_upper - y_lower;
        let prob = rng.gen::<f64>();

        // this is delta_l or delta_r
        let delta = if prob <= 0.5 {
            let bl = (y - y_lower) / delta_y;
            let b =
                2.0 * prob + (1.0 - 2.0 * prob) * f64::powf(1.0 - bl, self.index_parameter + 1.0);
            f64::powf(b, 1.0 / (self.index_parameter + 1.0)) - 1.0
        } else {
            let bu = (y_upper - y) / delta_y;
            let b = 2.0 * (1.0 - prob)
                + 2.0 * (prob - 0.5) * f64::powf(1.0 - bu, self.index_parameter + 1.0);
            1.0 - f64::powf(b, 1.0 / (self.index_parameter + 1.0))
        };

        // adjust the variable
        let new_y = y + delta * delta_y;
        new_y.clamp(y_lower, y_upper)
    }
}

impl Mutation for PolynomialMutation {
    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<(), OError> {
        let mut x = NumericView::new(solution)?;
        let probability = self
            .variable_probability
            .unwrap_or(1.0 / x.size().max(1) as f64);

        for i in 0..x.size() {
            if rng.gen::<f64>() <= probability {
                let new_y = self.mutate_variable(x.get_value(i), x.lower_bound(i), x.upper_bound(i), rng);
                x.set_value(i, new_y);
            }
        }
        Ok(())
    }

    fn name(&self) -> String {
        "PolynomialMutation".to_string()
    }
}

/// Input arguments for [`UniformMutation`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UniformMutationArgs {
    /// The probability of mutating a variable.
    pub probability: f64,
    /// The width of the uniform perturbation added to a variable.
    pub perturbation: f64,
}

impl Default for UniformMutationArgs {
    /// A probability of `1` and a perturbation of `0.5`.
    fn default() -> Self {
        Self {
            probability: 1.0,
            perturbation: 0.5,
        }
    }
}

impl UniformMutationArgs {
    /// Read the arguments from the `probability` and `perturbation` parameters.
    ///
    /// returns: `Result<UniformMutationArgs, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        let default = Self::default();
        Ok(Self {
            probability: parameters.real_or("probability", default.probability)?,
            perturbation: parameters.real_or("perturbation", default.perturbation)?,
        })
    }
}

/// The uniform mutation adds a random number in `[-perturbation/2, perturbation/2)` to each
/// variable with the given probability. A value falling outside the bounds is moved back inside:
/// to the middle of the range or, when the perturbation is in `(0, 1)`, to a random point in the
/// half of the range closest to the violated bound, up to `perturbation` times the half-range
/// away from it.
#[derive(Debug, Clone)]
pub struct UniformMutation {
    probability: f64,
    perturbation: f64,
}

impl UniformMutation {
    /// Initialise the operator. This returns an error if the probability is outside the [0, 1]
    /// range.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`UniformMutationArgs`].
    ///
    /// returns: `Result<UniformMutation, OError>`
    pub fn new(args: UniformMutationArgs) -> Result<Self, OError> {
        check_probability("UniformMutation", args.probability)?;
        Ok(Self {
            probability: args.probability,
            perturbation: args.perturbation,
        })
    }

    /// Initialise the operator from named parameters.
    ///
    /// returns: `Result<UniformMutation, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Self::new(UniformMutationArgs::from_parameters(parameters)?)
    }

    /// Whether the repaired value is drawn at random near the bound.
    fn random_repair(&self) -> bool {
        self.perturbation > 0.0 && self.perturbation < 1.0
    }
}

impl Mutation for UniformMutation {
    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<(), OError> {
        let mut x = NumericView::new(solution)?;
        for i in 0..x.size() {
            let (lower, upper) = (x.lower_bound(i), x.upper_bound(i));
            let half_range = (upper - lower) / 2.0;
            if rng.gen::<f64>() >= self.probability {
                continue;
            }

            let mut value = x.get_value(i) + (rng.gen::<f64>() - 0.5) * self.perturbation;
            if value < lower {
                value = if self.random_repair() {
                    lower + half_range * rng.gen::<f64>() * self.perturbation
                } else {
                    lower + half_range
                };
            } else if value > upper {
                value = if self.random_repair() {
                    upper - half_range * rng.gen::<f64>() * self.perturbation
                } else {
                    upper - half_range
                };
            }
            x.set_value(i, value);
        }
        Ok(())
    }

    fn name(&self) -> String {
        "UniformMutation".to_string()
    }
}

/// Input arguments for [`NonUniformMutation`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NonUniformMutationArgs {
    /// The probability of mutating a variable.
    pub probability: f64,
    /// The exponent `b` controlling how fast the step shrinks with the iterations.
    pub perturbation: f64,
    /// The iteration at which the step becomes zero.
    pub max_iterations: usize,
    /// The current iteration.
    pub current_iteration: usize,
}

impl Default for NonUniformMutationArgs {
    /// A probability of `1`, a perturbation of `0.5` and 25000 iterations.
    fn default() -> Self {
        Self {
            probability: 1.0,
            perturbation: 0.5,
            max_iterations: 25000,
            current_iteration: 0,
        }
    }
}

impl NonUniformMutationArgs {
    /// Read the arguments from the `probability`, `perturbation`, `maxIterations` and
    /// `currentIteration` parameters.
    ///
    /// returns: `Result<NonUniformMutationArgs, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        let default = Self::default();
        Ok(Self {
            probability: parameters.real_or("probability", default.probability)?,
            perturbation: parameters.real_or("perturbation", default.perturbation)?,
            max_iterations: parameters.usize_or("maxIterations", default.max_iterations)?,
            current_iteration: parameters
                .usize_or("currentIteration", default.current_iteration)?,
        })
    }
}

/// The non-uniform mutation (Michalewicz, 1992) moves a variable towards one of its bounds by a
/// random step that shrinks as the current iteration approaches the maximum number of iterations.
#[derive(Debug, Clone)]
pub struct NonUniformMutation {
    probability: f64,
    perturbation: f64,
    max_iterations: usize,
    current_iteration: usize,
}

impl NonUniformMutation {
    /// Initialise the operator. This returns an error if the probability is outside the [0, 1]
    /// range or the maximum number of iterations is zero.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`NonUniformMutationArgs`].
    ///
    /// returns: `Result<NonUniformMutation, OError>`
    pub fn new(args: NonUniformMutationArgs) -> Result<Self, OError> {
        check_probability("NonUniformMutation", args.probability)?;
        if args.max_iterations == 0 {
            return Err(OError::MutationOperator(
                "NonUniformMutation".to_string(),
                "The maximum number of iterations must be larger than zero".to_string(),
            ));
        }
        Ok(Self {
            probability: args.probability,
            perturbation: args.perturbation,
            max_iterations: args.max_iterations,
            current_iteration: args.current_iteration,
        })
    }

    /// Initialise the operator from named parameters.
    ///
    /// returns: `Result<NonUniformMutation, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Self::new(NonUniformMutationArgs::from_parameters(parameters)?)
    }

    /// Update the current iteration.
    ///
    /// # Arguments
    ///
    /// * `iteration`: The iteration.
    pub fn set_current_iteration(&mut self, iteration: usize) {
        self.current_iteration = iteration;
    }

    /// The step `y (1 - r^((1 - t/T)^b))`.
    fn delta(&self, y: f64, rng: &mut dyn RngCore) -> f64 {
        let progress = (self.current_iteration as f64 / self.max_iterations as f64).min(1.0);
        let r = rng.gen::<f64>();
        y * (1.0 - r.powf((1.0 - progress).powf(self.perturbation)))
    }
}

impl Mutation for NonUniformMutation {
    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<(), OError> {
        let mut x = NumericView::new(solution)?;
        for i in 0..x.size() {
            if rng.gen::<f64>() >= self.probability {
                continue;
            }
            let (lower, upper, value) = (x.lower_bound(i), x.upper_bound(i), x.get_value(i));
            let step = if rng.gen::<f64>() <= 0.5 {
                self.delta(upper - value, rng)
            } else {
                self.delta(lower - value, rng)
            };
            x.set_value(i, (value + step).clamp(lower, upper));
        }
        Ok(())
    }

    fn name(&self) -> String {
        "NonUniformMutation".to_string()
    }
}
