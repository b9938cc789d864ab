use std::error::Error;

use log::{info, LevelFilter};

use optipop::algorithms::{Algorithm, DifferentialEvolution};
use optipop::core::problem::builtin_problems::Rosenbrock;
use optipop::core::{DataValue, Parameters, SolutionType};
use optipop::operators::DifferentialEvolutionCrossover;

/// Minimise the Rosenbrock function with 5 variables with the differential evolution. The
/// variables are stored in one array (`SolutionType::ArrayReal`). The global minimum is 0 at
/// `x = (1, ..., 1)`.
///
/// `cargo run --example de_rosenbrock --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = Rosenbrock::new(5, SolutionType::ArrayReal);
    let crossover = DifferentialEvolutionCrossover::from_parameters(&Parameters::from_json(
        r#"{"CR": 0.9, "F": 0.5, "DE_VARIANT": "rand/1/bin"}"#,
    )?)?;

    let mut algorithm = DifferentialEvolution::new(&problem, crossover);
    algorithm.set_input_parameter("populationSize", DataValue::Integer(50));
    algorithm.set_input_parameter("maxEvaluations", DataValue::Integer(100000));
    algorithm.set_seed(3);
    let result = algorithm.execute()?;

    info!("Best solution: {}", result);
    info!("Took {}", algorithm.elapsed_as_string());
    Ok(())
}
