use thiserror::Error;

use crate::core::SolutionType;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum OError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("The min value ({0}) must be strictly smaller than the max value ({1}).")]
    TooLargeLowerBound(String, String),
    #[error("The parameter named '{0}' is not {1}")]
    WrongDataType(String, String),
    #[error("The parameter named '{0}' is invalid: {1}")]
    InvalidParameter(String, String),
    #[error("Cannot parse the parameters: {0}")]
    ParameterParsing(String),
    #[error("Unknown differential evolution variant '{0}'")]
    UnknownDEVariant(String),
    #[error("The operator '{0}' does not support solutions encoded as {1}")]
    UnsupportedEncoding(String, SolutionType),
    #[error("An error occurred in the selector operator '{0}': {1}")]
    SelectorOperator(String, String),
    #[error("An error occurred in the crossover operator '{0}': {1}")]
    CrossoverOperator(String, String),
    #[error("An error occurred in the mutation operator '{0}': {1}")]
    MutationOperator(String, String),
    #[error("The operator named '{0}' is not set on the algorithm or has the wrong type")]
    MissingOperator(String),
    #[error("An error occurred when evaluating a solution: {0}")]
    Evaluation(String),
    #[error("NaN detected in objective #{0}. This may be an error in the problem evaluation function")]
    NaN(usize),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when running {0}: {1}")]
    AlgorithmRun(String, String),
}
