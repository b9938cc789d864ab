use std::fmt::Debug;

use crate::core::Solution;

/// The preferred solution returned by a [`Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredSolution {
    /// The first solution is preferred.
    First,
    /// The second solution is preferred.
    Second,
    /// The two solutions are mutually preferred.
    MutuallyPreferred,
}

impl PreferredSolution {
    /// The preference as an integer: `-1` when the first solution is preferred, `1` when the
    /// second one is preferred and `0` for ties.
    ///
    /// returns: `i8`
    pub fn as_int(&self) -> i8 {
        match self {
            PreferredSolution::First => -1,
            PreferredSolution::Second => 1,
            PreferredSolution::MutuallyPreferred => 0,
        }
    }

    /// The same preference with the two solutions swapped.
    ///
    /// returns: `PreferredSolution`
    pub fn reverse(&self) -> Self {
        match self {
            PreferredSolution::First => PreferredSolution::Second,
            PreferredSolution::Second => PreferredSolution::First,
            PreferredSolution::MutuallyPreferred => PreferredSolution::MutuallyPreferred,
        }
    }
}

/// A trait to implement a comparison operator between two solutions. A missing solution is
/// always worse than a present one: `compare(Some(x), None)` and `compare(None, Some(x))` both
/// prefer `x`.
pub trait Comparator: Debug {
    /// Compare two solutions and select the best one.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The first solution to compare.
    /// * `second_solution`: The second solution to compare.
    ///
    /// returns: `PreferredSolution` The preferred solution.
    fn compare(
        &self,
        first_solution: Option<&Solution>,
        second_solution: Option<&Solution>,
    ) -> PreferredSolution;

    /// The comparator name.
    ///
    /// returns: `String`
    fn name(&self) -> String;
}

/// Unwrap the two solutions or return the preference when one is missing.
fn both_present<'a>(
    first_solution: Option<&'a Solution>,
    second_solution: Option<&'a Solution>,
) -> Result<(&'a Solution, &'a Solution), PreferredSolution> {
    match (first_solution, second_solution) {
        (None, _) => Err(PreferredSolution::Second),
        (_, None) => Err(PreferredSolution::First),
        (Some(s1), Some(s2)) => Ok((s1, s2)),
    }
}

/// Compare two solutions using the value of one objective.
#[derive(Debug, Clone)]
pub struct ObjectiveComparator {
    /// The index of the objective to compare.
    index: usize,
    /// Whether the smallest value is preferred.
    ascending: bool,
}

impl ObjectiveComparator {
    /// Compare the objective at `index`. The solution with the smallest value is preferred.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    ///
    /// returns: `ObjectiveComparator`
    pub fn new(index: usize) -> Self {
        Self::with_order(index, true)
    }

    /// Compare the objective at `index` in the given order.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    /// * `ascending`: Prefer the smallest value when `true`, the largest otherwise.
    ///
    /// returns: `ObjectiveComparator`
    pub fn with_order(index: usize, ascending: bool) -> Self {
        Self { index, ascending }
    }
}

impl Comparator for ObjectiveComparator {
    fn compare(
        &self,
        first_solution: Option<&Solution>,
        second_solution: Option<&Solution>,
    ) -> PreferredSolution {
        let (s1, s2) = match both_present(first_solution, second_solution) {
            Ok(pair) => pair,
            Err(preferred) => return preferred,
        };
        let v1 = s1.objective(self.index);
        let v2 = s2.objective(self.index);

        let preferred = if v1 < v2 {
            PreferredSolution::First
        } else if v1 > v2 {
            PreferredSolution::Second
        } else {
            PreferredSolution::MutuallyPreferred
        };
        if self.ascending {
            preferred
        } else {
            preferred.reverse()
        }
    }

    fn name(&self) -> String {
        "ObjectiveComparator".to_string()
    }
}

/// Compare the overall constraint violation of two solutions. A feasible solution (with zero
/// violation) is preferred to an infeasible one; between two infeasible solutions, the one with
/// the larger (less negative) violation is preferred.
#[derive(Debug, Clone, Default)]
pub struct OverallConstraintViolationComparator;

impl Comparator for OverallConstraintViolationComparator {
    fn compare(
        &self,
        first_solution: Option<&Solution>,
        second_solution: Option<&Solution>,
    ) -> PreferredSolution {
        let (s1, s2) = match both_present(first_solution, second_solution) {
            Ok(pair) => pair,
            Err(preferred) => return preferred,
        };
        let cv1 = s1.overall_constraint_violation();
        let cv2 = s2.overall_constraint_violation();

        if cv1 < 0.0 && cv2 < 0.0 {
            if cv1 > cv2 {
                PreferredSolution::First
            } else if cv2 > cv1 {
                PreferredSolution::Second
            } else {
                PreferredSolution::MutuallyPreferred
            }
        } else if cv1 == 0.0 && cv2 < 0.0 {
            PreferredSolution::First
        } else if cv1 < 0.0 && cv2 == 0.0 {
            PreferredSolution::Second
        } else {
            PreferredSolution::MutuallyPreferred
        }
    }

    fn name(&self) -> String {
        "OverallConstraintViolationComparator".to_string()
    }
}

/// Count the objectives where each solution is better, after transforming the first solution's
/// values with `scale`, and derive the Pareto dominance from the two flags.
fn pareto_dominance(s1: &Solution, s2: &Solution, scale: impl Fn(f64) -> f64) -> PreferredSolution {
    let mut dominate1 = false;
    let mut dominate2 = false;
    for (v1, v2) in s1.objectives().iter().zip(s2.objectives()) {
        let v1 = scale(*v1);
        if v1 < *v2 {
            dominate1 = true;
        } else if v1 > *v2 {
            dominate2 = true;
        }
    }

    match (dominate1, dominate2) {
        (true, false) => PreferredSolution::First,
        (false, true) => PreferredSolution::Second,
        _ => PreferredSolution::MutuallyPreferred,
    }
}

/// This assesses the Pareto dominance between two solutions $S_1$ and $S_2$. When the solutions
/// have a different constraint violation and one of them is infeasible, the preferred solution is
/// the one chosen by the [`OverallConstraintViolationComparator`]. Otherwise $S_1$ is preferred
/// if it is not worse than $S_2$ in all objectives and better in at least one
/// ($ S_1 \prec S_2 $). The solutions are mutually preferred when none dominates the other.
///
/// See: Kalyanmoy Deb & Samir Agrawal. (2002). <https://doi.org/10.1007/978-3-7091-6384-9_40>.
#[derive(Debug, Clone, Default)]
pub struct DominanceComparator;

impl Comparator for DominanceComparator {
    fn compare(
        &self,
        first_solution: Option<&Solution>,
        second_solution: Option<&Solution>,
    ) -> PreferredSolution {
        let (s1, s2) = match both_present(first_solution, second_solution) {
            Ok(pair) => pair,
            Err(preferred) => return preferred,
        };
        let cv1 = s1.overall_constraint_violation();
        let cv2 = s2.overall_constraint_violation();
        if cv1 != cv2 && (cv1 < 0.0 || cv2 < 0.0) {
            return OverallConstraintViolationComparator.compare(Some(s1), Some(s2));
        }

        pareto_dominance(s1, s2, |v| v)
    }

    fn name(&self) -> String {
        "DominanceComparator".to_string()
    }
}

/// The epsilon-dominance between two solutions. The constraint violation is compared first; if
/// the [`OverallConstraintViolationComparator`] returns a tie, the Pareto dominance is assessed
/// after scaling the first solution's objectives by `1 / (1 + eta)`.
#[derive(Debug, Clone)]
pub struct EpsilonDominanceComparator {
    eta: f64,
}

impl EpsilonDominanceComparator {
    /// Create the comparator.
    ///
    /// # Arguments
    ///
    /// * `eta`: The relative tolerance applied to the first solution's objectives.
    ///
    /// returns: `EpsilonDominanceComparator`
    pub fn new(eta: f64) -> Self {
        Self { eta }
    }
}

impl Comparator for EpsilonDominanceComparator {
    fn compare(
        &self,
        first_solution: Option<&Solution>,
        second_solution: Option<&Solution>,
    ) -> PreferredSolution {
        let (s1, s2) = match both_present(first_solution, second_solution) {
            Ok(pair) => pair,
            Err(preferred) => return preferred,
        };
        let preferred = OverallConstraintViolationComparator.compare(Some(s1), Some(s2));
        if preferred != PreferredSolution::MutuallyPreferred {
            return preferred;
        }

        pareto_dominance(s1, s2, |v| v / (1.0 + self.eta))
    }

    fn name(&self) -> String {
        "EpsilonDominanceComparator".to_string()
    }
}
