pub use algorithm::{Algorithm, AlgorithmBase, Operators};
pub use differential_evolution::DifferentialEvolution;
pub use generational_ga::GenerationalGA;
pub use pso::{StandardPSO2007, StandardPSO2011};
pub use stopping_condition::{MaxFunctionEvaluationValue, MaxGenerationValue, StoppingCondition};

mod algorithm;
mod differential_evolution;
mod generational_ga;
pub mod pso;
mod stopping_condition;
