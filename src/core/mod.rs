pub use data::{DataValue, DataValueType, Parameters};
pub use error::OError;
pub use numeric_view::NumericView;
pub use population::Population;
pub use problem::Problem;
pub use solution::{Solution, SolutionExport, SolutionType};
pub use variable::{ArrayRealVariable, BinaryRealVariable, BinaryVariable, IntVariable, RealVariable, Variable};

pub mod data;
pub mod error;
pub mod numeric_view;
pub mod population;
pub mod problem;
pub mod solution;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod utils;
pub mod variable;
