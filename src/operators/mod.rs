pub use comparison::{
    Comparator, DominanceComparator, EpsilonDominanceComparator, ObjectiveComparator,
    OverallConstraintViolationComparator, PreferredSolution,
};
pub use crossover::{Crossover, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs};
pub use de_crossover::{
    DEVariant, DifferentialEvolutionCrossover, DifferentialEvolutionCrossoverArgs,
};
pub use mutation::{
    Mutation, NonUniformMutation, NonUniformMutationArgs, PolynomialMutation,
    PolynomialMutationArgs, UniformMutation, UniformMutationArgs,
};
pub use selector::{
    BestSolutionSelection, BinaryTournament, DifferentialEvolutionSelection, RandomSelection,
    Selection, WorstSolutionSelection,
};

pub mod comparison;
pub mod crossover;
pub mod de_crossover;
pub mod mutation;
pub mod selector;

/// An operator registered on an algorithm by name.
#[derive(Debug)]
pub enum Operator {
    Crossover(Box<dyn Crossover>),
    Mutation(Box<dyn Mutation>),
    Selection(Box<dyn Selection>),
}

impl Operator {
    /// The name of the wrapped operator.
    ///
    /// returns: `String`
    pub fn name(&self) -> String {
        match self {
            Operator::Crossover(o) => o.name(),
            Operator::Mutation(o) => o.name(),
            Operator::Selection(o) => o.name(),
        }
    }
}
