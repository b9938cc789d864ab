use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{NumericView, OError, Parameters, Solution};
use crate::operators::Crossover;

/// The scheme used by the differential evolution to build the mutant vector and to recombine it
/// with the current solution. The `best` variants use the same formula as the `rand` variants:
/// the difference is in the selection of the base parent, which is the best solution of the
/// population.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DEVariant {
    /// `rand/1/bin`
    RandOneBin,
    /// `best/1/bin`
    BestOneBin,
    /// `rand/1/exp`
    RandOneExp,
    /// `best/1/exp`
    BestOneExp,
    /// `current-to-rand/1`
    CurrentToRandOne,
    /// `current-to-best/1`
    CurrentToBestOne,
    /// `current-to-rand/1/bin`
    CurrentToRandOneBin,
    /// `current-to-best/1/bin`
    CurrentToBestOneBin,
    /// `current-to-rand/1/exp`
    CurrentToRandOneExp,
    /// `current-to-best/1/exp`
    CurrentToBestOneExp,
}

/// How the mutant and the current values are recombined.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Recombination {
    /// Each gene is taken from the mutant with probability `CR`.
    Binomial,
    /// The genes are taken from the mutant until a gene fails the `CR` test.
    Exponential,
    /// All the genes are taken from the mutant.
    None,
}

impl DEVariant {
    const NAMES: [(&'static str, DEVariant); 10] = [
        ("rand/1/bin", DEVariant::RandOneBin),
        ("best/1/bin", DEVariant::BestOneBin),
        ("rand/1/exp", DEVariant::RandOneExp),
        ("best/1/exp", DEVariant::BestOneExp),
        ("current-to-rand/1", DEVariant::CurrentToRandOne),
        ("current-to-best/1", DEVariant::CurrentToBestOne),
        ("current-to-rand/1/bin", DEVariant::CurrentToRandOneBin),
        ("current-to-best/1/bin", DEVariant::CurrentToBestOneBin),
        ("current-to-rand/1/exp", DEVariant::CurrentToRandOneExp),
        ("current-to-best/1/exp", DEVariant::CurrentToBestOneExp),
    ];

    /// Whether the base parent is the best solution of the population.
    ///
    /// returns: `bool`
    pub fn uses_best(&self) -> bool {
        matches!(
            self,
            DEVariant::BestOneBin
                | DEVariant::BestOneExp
                | DEVariant::CurrentToBestOne
                | DEVariant::CurrentToBestOneBin
                | DEVariant::CurrentToBestOneExp
        )
    }

    /// Whether the mutant is built from the current solution.
    fn from_current(&self) -> bool {
        !matches!(
            self,
            DEVariant::RandOneBin | DEVariant::BestOneBin | DEVariant::RandOneExp | DEVariant::BestOneExp
        )
    }

    fn recombination(&self) -> Recombination {
        match self {
            DEVariant::RandOneBin
            | DEVariant::BestOneBin
            | DEVariant::CurrentToRandOneBin
            | DEVariant::CurrentToBestOneBin => Recombination::Binomial,
            DEVariant::RandOneExp
            | DEVariant::BestOneExp
            | DEVariant::CurrentToRandOneExp
            | DEVariant::CurrentToBestOneExp => Recombination::Exponential,
            DEVariant::CurrentToRandOne | DEVariant::CurrentToBestOne => Recombination::None,
        }
    }
}

impl FromStr for DEVariant {
    type Err = OError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DEVariant::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, variant)| *variant)
            .ok_or_else(|| OError::UnknownDEVariant(s.to_string()))
    }
}

impl Display for DEVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = DEVariant::NAMES
            .iter()
            .find(|(_, variant)| variant == self)
            .map(|(name, _)| *name)
            .unwrap_or_default();
        f.write_str(name)
    }
}

/// Input arguments for [`DifferentialEvolutionCrossover`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DifferentialEvolutionCrossoverArgs {
    /// The crossover rate `CR` in `[0, 1]`: the probability of taking a gene from the mutant.
    pub cr: f64,
    /// The scale factor `F` of the difference vector.
    pub f: f64,
    /// The weight `K` of the attraction towards the base parent in the `current-to-*` variants.
    pub k: f64,
    /// The variant.
    pub variant: DEVariant,
}

impl Default for DifferentialEvolutionCrossoverArgs {
    /// Default parameters with `CR = 0.5`, `F = 0.5`, `K = 0.5` and the `rand/1/bin` variant.
    fn default() -> Self {
        Self {
            cr: 0.5,
            f: 0.5,
            k: 0.5,
            variant: DEVariant::RandOneBin,
        }
    }
}

impl DifferentialEvolutionCrossoverArgs {
    /// Read the arguments from the `CR`, `F`, `K` and `DE_VARIANT` parameters. The missing
    /// parameters take their default value. This returns an error if a parameter has the wrong
    /// type or the variant is unknown.
    ///
    /// # Arguments
    ///
    /// * `parameters`: The parameters.
    ///
    /// returns: `Result<DifferentialEvolutionCrossoverArgs, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        let default = Self::default();
        Ok(Self {
            cr: parameters.real_or("CR", default.cr)?,
            f: parameters.real_or("F", default.f)?,
            k: parameters.real_or("K", default.k)?,
            variant: parameters
                .text_or("DE_VARIANT", &default.variant.to_string())?
                .parse()?,
        })
    }
}

/// The differential evolution crossover. A child is built from the current solution and three
/// parents `x0`, `x1` and `x2`:
///  - the `rand/1` and `best/1` variants use the mutant `x2 + F (x0 - x1)`;
///  - the `current-to-*` variants use the mutant `current + K (x2 - current) + F (x0 - x1)`.
///
/// With the binomial (`bin`) recombination, each gene is taken from the mutant when a uniform
/// number is below `CR`, or for one randomly-chosen gene (`jrand`), and from the current
/// solution otherwise. With the exponential (`exp`) recombination, once a gene fails the test, the
/// remaining genes of the child (except `jrand`) are taken from the current solution. The mutant
/// genes are clipped to the variable bounds.
///
/// See: Storn, R., Price, K. Differential Evolution – A Simple and Efficient Heuristic for global
/// Optimization over Continuous Spaces. Journal of Global Optimization 11, 341–359 (1997).
/// <https://doi.org/10.1023/A:1008202821328>
///
/// # Example
///
/// ```
/// use optipop::core::{NumericView, Parameters, Solution};
/// use optipop::core::utils::get_rng;
/// use optipop::operators::DifferentialEvolutionCrossover;
///
/// let mut parameters = Parameters::new();
/// parameters.set("CR", 0.0).set("F", 0.5).set("DE_VARIANT", "rand/1/bin");
/// let de = DifferentialEvolutionCrossover::from_parameters(&parameters).unwrap();
///
/// let current = Solution::from_real_values(&[0.1], (0.0, 1.0), 1).unwrap();
/// let x0 = Solution::from_real_values(&[0.6], (0.0, 1.0), 1).unwrap();
/// let x1 = Solution::from_real_values(&[0.2], (0.0, 1.0), 1).unwrap();
/// let x2 = Solution::from_real_values(&[0.5], (0.0, 1.0), 1).unwrap();
///
/// let mut rng = get_rng(Some(1));
/// let child = de.execute(&current, [&x0, &x1, &x2], &mut rng).unwrap();
/// assert!((NumericView::new(&child).unwrap().get_value(0) - 0.7).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DifferentialEvolutionCrossover {
    cr: f64,
    f: f64,
    k: f64,
    variant: DEVariant,
}

impl DifferentialEvolutionCrossover {
    /// Initialise the operator. This returns an error if `CR` is not in `[0, 1]`.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`DifferentialEvolutionCrossoverArgs`].
    ///
    /// returns: `Result<DifferentialEvolutionCrossover, OError>`
    pub fn new(args: DifferentialEvolutionCrossoverArgs) -> Result<Self, OError> {
        if !(0.0..=1.0).contains(&args.cr) {
            return Err(OError::CrossoverOperator(
                "DifferentialEvolutionCrossover".to_string(),
                format!("The crossover rate {} must be a number between 0 and 1", args.cr),
            ));
        }
        Ok(Self {
            cr: args.cr,
            f: args.f,
            k: args.k,
            variant: args.variant,
        })
    }

    /// Initialise the operator from named parameters. See
    /// [`DifferentialEvolutionCrossoverArgs::from_parameters`].
    ///
    /// returns: `Result<DifferentialEvolutionCrossover, OError>`
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, OError> {
        Self::new(DifferentialEvolutionCrossoverArgs::from_parameters(parameters)?)
    }

    /// The variant.
    pub fn variant(&self) -> DEVariant {
        self.variant
    }

    /// Build a child from the current solution and three parents.
    ///
    /// # Arguments
    ///
    /// * `current`: The current solution.
    /// * `parents`: The parents `x0`, `x1` and `x2`. `x2` is the base parent.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Solution, OError>`
    pub fn execute(
        &self,
        current: &Solution,
        parents: [&Solution; 3],
        rng: &mut dyn RngCore,
    ) -> Result<Solution, OError> {
        let mut child = current.clone();
        let x_current = NumericView::new(current)?;
        let x0 = NumericView::new(parents[0])?;
        let x1 = NumericView::new(parents[1])?;
        let x2 = NumericView::new(parents[2])?;
        let mut x_child = NumericView::new(&mut child)?;

        let n = x_current.size();
        if n == 0 {
            return Ok(child);
        }
        let jrand = rng.gen_range(0..n);
        let recombination = self.variant.recombination();
        // the exponential recombination zeroes the rate for the rest of this call only
        let mut cr = self.cr;

        for j in 0..n {
            let take_mutant = match recombination {
                Recombination::None => true,
                Recombination::Binomial => rng.gen::<f64>() < cr || j == jrand,
                Recombination::Exponential => {
                    let take = rng.gen::<f64>() < cr || j == jrand;
                    if !take {
                        cr = 0.0;
                    }
                    take
                }
            };

            let value = if take_mutant {
                let mutant = if self.variant.from_current() {
                    x_current.get_value(j)
                        + self.k * (x2.get_value(j) - x_current.get_value(j))
                        + self.f * (x0.get_value(j) - x1.get_value(j))
                } else {
                    x2.get_value(j) + self.f * (x0.get_value(j) - x1.get_value(j))
                };
                mutant.clamp(x_current.lower_bound(j), x_current.upper_bound(j))
            } else {
                x_current.get_value(j)
            };
            x_child.set_value(j, value);
        }
        debug!("DE {} child built with jrand = {jrand}", self.variant);

        Ok(child)
    }
}

impl Crossover for DifferentialEvolutionCrossover {
    /// Build one child. The parents must be the current solution followed by `x0`, `x1` and
    /// `x2`.
    fn execute(
        &self,
        parents: &[&Solution],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution>, OError> {
        let [current, x0, x1, x2] = parents else {
            return Err(OError::CrossoverOperator(
                self.name(),
                format!(
                    "The operator needs the current solution and 3 parents, {} solutions given",
                    parents.len()
                ),
            ));
        };
        Ok(vec![DifferentialEvolutionCrossover::execute(
            self,
            current,
            [*x0, *x1, *x2],
            rng,
        )?])
    }

    fn uses_best_parent(&self) -> bool {
        self.variant.uses_best()
    }

    fn name(&self) -> String {
        "DifferentialEvolutionCrossover".to_string()
    }
}
