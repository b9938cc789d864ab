use std::ops::{Deref, DerefMut};

use crate::core::{OError, Solution, SolutionType, Variable};

/// Access the decision variables of a solution as an array of bounded real numbers, whatever the
/// real encoding of the solution is. Solutions encoded with [`SolutionType::Real`] or
/// [`SolutionType::BinaryReal`] store one variable per decision variable, while
/// [`SolutionType::ArrayReal`] solutions store all the values in one array.
///
/// The view wraps either a shared reference (read-only access) or a mutable reference (to also
/// set the values) to the solution.
///
/// # Example
/// ```
/// use optipop::core::{NumericView, Solution};
///
/// let mut solution = Solution::from_real_values(&[0.2, 0.4], (0.0, 1.0), 1).unwrap();
/// let mut view = NumericView::new(&mut solution).unwrap();
/// view.set_value(1, 0.9);
/// assert_eq!(view.get_value(1), 0.9);
/// assert_eq!(view.upper_bound(0), 1.0);
/// ```
#[derive(Debug)]
pub struct NumericView<S: Deref<Target = Solution>> {
    solution: S,
}

impl<S: Deref<Target = Solution>> NumericView<S> {
    /// Wrap a solution. This returns an error if the solution is not encoded with real numbers.
    ///
    /// # Arguments
    ///
    /// * `solution`: A reference to the solution.
    ///
    /// returns: `Result<NumericView, OError>`
    pub fn new(solution: S) -> Result<Self, OError> {
        match solution.solution_type() {
            SolutionType::Real | SolutionType::BinaryReal | SolutionType::ArrayReal => {
                Ok(Self { solution })
            }
            t @ (SolutionType::Binary | SolutionType::Int) => Err(OError::UnsupportedEncoding(
                "NumericView".to_string(),
                t,
            )),
        }
    }

    /// The wrapped solution.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Get the value of a decision variable. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The decision variable index.
    ///
    /// returns: `f64`
    pub fn get_value(&self, index: usize) -> f64 {
        match self.solution.solution_type() {
            SolutionType::ArrayReal => self.array().value(index),
            _ => match &self.solution.variables()[index] {
                Variable::Real(v) => v.value(),
                Variable::BinaryReal(v) => v.value(),
                other => Self::inconsistent(other),
            },
        }
    }

    /// Get the lower bound of a decision variable. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The decision variable index.
    ///
    /// returns: `f64`
    pub fn lower_bound(&self, index: usize) -> f64 {
        match self.solution.solution_type() {
            SolutionType::ArrayReal => self.array().lower_bound(index),
            _ => match &self.solution.variables()[index] {
                Variable::Real(v) => v.lower_bound(),
                Variable::BinaryReal(v) => v.lower_bound(),
                other => Self::inconsistent(other),
            },
        }
    }

    /// Get the upper bound of a decision variable. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The decision variable index.
    ///
    /// returns: `f64`
    pub fn upper_bound(&self, index: usize) -> f64 {
        match self.solution.solution_type() {
            SolutionType::ArrayReal => self.array().upper_bound(index),
            _ => match &self.solution.variables()[index] {
                Variable::Real(v) => v.upper_bound(),
                Variable::BinaryReal(v) => v.upper_bound(),
                other => Self::inconsistent(other),
            },
        }
    }

    /// The number of decision variables.
    ///
    /// returns: `usize`
    pub fn size(&self) -> usize {
        match self.solution.solution_type() {
            SolutionType::ArrayReal => self.array().len(),
            _ => self.solution.number_of_variables(),
        }
    }

    /// The number of decision variables. This is an alias of [`NumericView::size`].
    ///
    /// returns: `usize`
    pub fn number_of_decision_variables(&self) -> usize {
        self.size()
    }

    fn array(&self) -> &crate::core::ArrayRealVariable {
        match self.solution.variables().first() {
            Some(Variable::ArrayReal(a)) => a,
            _ => panic!("An ArrayReal solution must store its values in one array variable"),
        }
    }

    fn inconsistent(variable: &Variable) -> ! {
        panic!(
            "The variable {:?} does not match the encoding of a real solution",
            variable
        )
    }
}

impl<S: DerefMut<Target = Solution>> NumericView<S> {
    /// Set the value of a decision variable. The value is not clipped to the bounds. This panics
    /// if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The decision variable index.
    /// * `value`: The new value.
    pub fn set_value(&mut self, index: usize, value: f64) {
        let solution_type = self.solution.solution_type();
        let variables = self.solution.variables_mut();
        match solution_type {
            SolutionType::ArrayReal => match variables.first_mut() {
                Some(Variable::ArrayReal(a)) => a.set_value(index, value),
                _ => panic!("An ArrayReal solution must store its values in one array variable"),
            },
            _ => match &mut variables[index] {
                Variable::Real(v) => v.set_value(value),
                Variable::BinaryReal(v) => v.set_value(value),
                other => Self::inconsistent(other),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::{
        ArrayRealVariable, BinaryVariable, NumericView, OError, Solution, SolutionType, Variable,
    };
    use crate::core::problem::builtin_problems::Sphere;

    #[test]
    /// The per-variable and the array storage give the same access.
    fn test_dispatch() {
        let mut real = Solution::from_real_values(&[1.0, 2.0, 3.0], (0.0, 5.0), 1).unwrap();
        let mut array = Solution::from_variables(
            SolutionType::ArrayReal,
            vec![Variable::ArrayReal(
                ArrayRealVariable::with_values(vec![1.0, 2.0, 3.0], vec![0.0; 3], vec![5.0; 3])
                    .unwrap(),
            )],
            1,
        );

        for solution in [&mut real, &mut array] {
            let mut view = NumericView::new(solution).unwrap();
            assert_eq!(view.size(), 3);
            assert_eq!(view.number_of_decision_variables(), 3);
            assert_eq!(view.get_value(2), 3.0);
            assert_eq!(view.lower_bound(1), 0.0);
            assert_eq!(view.upper_bound(1), 5.0);
            view.set_value(0, 4.5);
            assert_eq!(view.get_value(0), 4.5);
        }
        assert_eq!(real.variables()[0].value(), Some(4.5));
    }

    #[test]
    fn test_binary_real() {
        let mut rng = get_rng(Some(10));
        let mut solution = Solution::new(&Sphere::new(2, SolutionType::BinaryReal), &mut rng).unwrap();
        let mut view = NumericView::new(&mut solution).unwrap();
        assert_eq!(view.size(), 2);
        view.set_value(1, -1.5);
        assert_eq!(view.get_value(1), -1.5);
        assert_eq!(view.lower_bound(1), -5.12);
    }

    #[test]
    /// Non-real encodings are rejected.
    fn test_unsupported_encoding() {
        let solution = Solution::from_variables(
            SolutionType::Binary,
            vec![Variable::Binary(BinaryVariable::from_bits(vec![true]))],
            1,
        );
        assert!(matches!(
            NumericView::new(&solution),
            Err(OError::UnsupportedEncoding(_, SolutionType::Binary))
        ));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        let solution = Solution::from_real_values(&[1.0], (0.0, 5.0), 1).unwrap();
        let view = NumericView::new(&solution).unwrap();
        view.get_value(1);
    }
}
