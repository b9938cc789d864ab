use serde::{Deserialize, Serialize};

use crate::core::{OError, Parameters};

/// Trait to define a budget that causes an algorithm to terminate.
pub trait StoppingCondition<T: PartialOrd> {
    /// The target value of the stopping condition.
    fn target(&self) -> T;

    /// Whether the budget is exhausted once `current` is reached.
    fn is_met(&self, current: T) -> bool {
        self.target() <= current
    }

    /// A name describing the stopping condition.
    fn name() -> String;
}

/// Number of generations (or swarm iterations) after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaxGenerationValue(pub usize);

impl MaxGenerationValue {
    /// Read the budget from the `maxIterations` parameter.
    ///
    /// # Arguments
    ///
    /// * `parameters`: The algorithm input parameters.
    /// * `default`: The budget to use when the parameter is not set.
    ///
    /// returns: `Result<MaxGenerationValue, OError>`
    pub fn from_parameters(parameters: &Parameters, default: usize) -> Result<Self, OError> {
        Ok(Self(parameters.usize_or("maxIterations", default)?))
    }
}

impl StoppingCondition<usize> for MaxGenerationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of iterations".to_string()
    }
}

/// Number of objective function evaluations after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaxFunctionEvaluationValue(pub usize);

impl MaxFunctionEvaluationValue {
    /// Read the budget from the `maxEvaluations` parameter.
    ///
    /// # Arguments
    ///
    /// * `parameters`: The algorithm input parameters.
    /// * `default`: The budget to use when the parameter is not set.
    ///
    /// returns: `Result<MaxFunctionEvaluationValue, OError>`
    pub fn from_parameters(parameters: &Parameters, default: usize) -> Result<Self, OError> {
        Ok(Self(parameters.usize_or("maxEvaluations", default)?))
    }
}

impl StoppingCondition<usize> for MaxFunctionEvaluationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of function evaluations".to_string()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{MaxFunctionEvaluationValue, MaxGenerationValue, StoppingCondition};
    use crate::core::{OError, Parameters};

    #[test]
    fn test_is_met() {
        let condition = MaxFunctionEvaluationValue(10);
        assert!(!condition.is_met(9));
        assert!(condition.is_met(10));
        assert!(condition.is_met(11));

        assert!(MaxGenerationValue(0).is_met(0));
        assert_eq!(
            MaxGenerationValue::name(),
            "maximum number of iterations".to_string()
        );
    }

    #[test]
    fn test_from_parameters() {
        let mut parameters = Parameters::new();
        assert_eq!(
            MaxFunctionEvaluationValue::from_parameters(&parameters, 25000).unwrap(),
            MaxFunctionEvaluationValue(25000)
        );

        parameters.set("maxEvaluations", 300).set("maxIterations", -1);
        assert_eq!(
            MaxFunctionEvaluationValue::from_parameters(&parameters, 25000).unwrap(),
            MaxFunctionEvaluationValue(300)
        );
        assert!(matches!(
            MaxGenerationValue::from_parameters(&parameters, 10),
            Err(OError::InvalidParameter(_, _))
        ));
    }
}
