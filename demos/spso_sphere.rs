use std::error::Error;

use log::{info, LevelFilter};

use optipop::algorithms::{Algorithm, StandardPSO2007, StandardPSO2011};
use optipop::core::problem::builtin_problems::Sphere;
use optipop::core::{DataValue, OError, SolutionType};

/// Minimise the sphere function with 20 variables with the Standard PSO 2007 and 2011 and
/// compare the best objectives. The global minimum is 0 at the origin.
///
/// `cargo run --example spso_sphere --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = Sphere::new(20, SolutionType::Real);
    run(&mut StandardPSO2007::new(&problem))?;
    run(&mut StandardPSO2011::new(&problem))?;
    Ok(())
}

/// Run an algorithm with the default swarm size (`10 + 2 sqrt(n)`) and 3 informants.
fn run(algorithm: &mut dyn Algorithm) -> Result<(), OError> {
    algorithm.set_input_parameter("maxIterations", DataValue::Integer(2000));
    algorithm.set_seed(1);
    let result = algorithm.execute()?;

    let evaluations = algorithm
        .output_parameters()
        .get("evaluations")
        .map(|v| v.to_string())
        .unwrap_or_default();
    info!(
        "{} - best objective: {:e} after {evaluations} evaluations",
        algorithm.name(),
        result.get(0).objective(0)
    );
    Ok(())
}
