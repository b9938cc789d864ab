#[cfg(test)]
use std::error::Error;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

#[cfg(test)]
use crate::core::{NumericView, Problem, Solution};

/// Get the random number generator. If no seed is provided, the generator is seeded with the
/// default (zero) seed.
///
/// # Arguments
///
/// * `seed`: The optional seed number.
///
/// returns: `Box<dyn RngCore>`
pub fn get_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    let rng = match seed {
        None => ChaCha8Rng::from_seed(Default::default()),
        Some(s) => ChaCha8Rng::seed_from_u64(s),
    };
    Box::new(rng)
}

/// Draw a uniformly-distributed number in `[low, high)`. Unlike [`Rng::gen_range`], this does
/// not panic when the range is empty and returns `low` when `low == high`.
///
/// # Arguments
///
/// * `rng`: The random number generator.
/// * `low`: The lower end of the range.
/// * `high`: The upper end of the range.
///
/// returns: `f64`
pub fn rand_double(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

/// Calculate the Euclidean distance between two points.
///
/// # Arguments
///
/// * `a`: The first point.
/// * `b`: The second point.
///
/// returns: `f64`
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Draw a random point inside a hypersphere. The direction is uniformly distributed and the
/// distance from the centre is `radius` times a uniform number in `[0, 1)`.
///
/// # Arguments
///
/// * `rng`: The random number generator.
/// * `centre`: The centre of the hypersphere.
/// * `radius`: The radius.
///
/// returns: `Vec<f64>`
pub fn rand_sphere(rng: &mut dyn RngCore, centre: &[f64], radius: f64) -> Vec<f64> {
    let mut direction: Vec<f64> = centre
        .iter()
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect();
    let norm = direction.iter().map(|d| d.powi(2)).sum::<f64>().sqrt();
    let length = rand_double(rng, 0.0, radius);

    // a zero vector has no direction and the point is the centre
    if norm > 0.0 {
        for d in direction.iter_mut() {
            *d *= length / norm;
        }
    }
    centre.iter().zip(direction).map(|(c, d)| c + d).collect()
}

/// A one-variable problem minimising `f(x) = x` with `x` in `[0, 1]`. This is only used in tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct DummyProblem;

#[cfg(test)]
impl Problem for DummyProblem {
    fn name(&self) -> String {
        "Dummy".to_string()
    }

    fn number_of_variables(&self) -> usize {
        1
    }

    fn number_of_objectives(&self) -> usize {
        1
    }

    fn lower_bound(&self, _index: usize) -> f64 {
        0.0
    }

    fn upper_bound(&self, _index: usize) -> f64 {
        1.0
    }

    fn evaluate(&self, solution: &mut Solution) -> Result<(), Box<dyn Error>> {
        let x = NumericView::new(&*solution)?.get_value(0);
        solution.set_objective(0, x);
        Ok(())
    }
}

/// Return the dummy problem. This is only used in tests.
///
/// returns: `DummyProblem`
#[cfg(test)]
pub(crate) fn dummy_problem() -> DummyProblem {
    DummyProblem
}

#[cfg(test)]
mod test {
    use rand::RngCore;

    use crate::core::utils::{euclidean_distance, get_rng, rand_double, rand_sphere};

    #[test]
    /// The same seed gives the same stream.
    fn test_rng_seed() {
        let mut a = get_rng(Some(7));
        let mut b = get_rng(Some(7));
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rand_double() {
        let mut rng = get_rng(Some(1));
        for _ in 0..100 {
            let v = rand_double(&mut rng, -1.0, 3.0);
            assert!((-1.0..3.0).contains(&v));
        }
        assert_eq!(rand_double(&mut rng, 2.0, 2.0), 2.0);
    }

    #[test]
    /// The points are inside the hypersphere.
    fn test_rand_sphere() {
        let mut rng = get_rng(Some(1));
        let centre = [1.0, -2.0, 0.5];
        for _ in 0..200 {
            let point = rand_sphere(&mut rng, &centre, 0.3);
            assert_eq!(point.len(), 3);
            assert!(euclidean_distance(&point, &centre) <= 0.3 + 1e-12);
        }
        assert_eq!(rand_sphere(&mut rng, &centre, 0.0), centre.to_vec());
    }
}
