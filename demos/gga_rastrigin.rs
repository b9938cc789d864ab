use std::error::Error;

use log::{info, LevelFilter};

use optipop::algorithms::{Algorithm, GenerationalGA};
use optipop::core::problem::builtin_problems::Rastrigin;
use optipop::core::{Parameters, SolutionType};

/// Minimise the Rastrigin function with 10 variables in [-5.12, 5.12] with the generational
/// genetic algorithm. The global minimum is 0 at the origin.
///
/// Make sure to compile this in release mode to speed up the calculation:
///
/// `cargo run --example gga_rastrigin --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = Rastrigin::new(10, SolutionType::Real);

    // SBX, polynomial mutation and binary tournament
    let mut algorithm = GenerationalGA::with_default_operators(&problem)?;
    algorithm.set_input_parameters(&Parameters::from_json(
        r#"{"populationSize": 100, "maxEvaluations": 25000, "seed": 10}"#,
    )?);
    let result = algorithm.execute()?;

    let best = result.get(0);
    info!("Best objective: {}", best.objective(0));
    info!("Variables: {:?}", best.variables());
    info!("Output: {}", algorithm.output_parameters());
    Ok(())
}
