use rand::{Rng, RngCore};

use crate::core::OError;

/// The adaptive random topology of the Standard PSO. Each particle is informed by itself and by
/// `number_of_informants - 1` particles drawn at random (the same particle may be drawn more
/// than once). The informants are drawn again with [`AdaptiveRandomNeighborhood::recompute`]
/// when the search stagnates.
///
/// # Example
///
/// ```
/// use optipop::algorithms::pso::AdaptiveRandomNeighborhood;
/// use optipop::core::utils::get_rng;
///
/// let mut rng = get_rng(Some(1));
/// let neighborhood = AdaptiveRandomNeighborhood::new(10, 3, &mut rng).unwrap();
/// assert_eq!(neighborhood.neighbors(4).len(), 3);
/// assert_eq!(neighborhood.neighbors(4)[0], 4);
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveRandomNeighborhood {
    /// The number of informants of each particle, including the particle itself.
    number_of_informants: usize,
    /// The informant indexes of each particle.
    neighbors: Vec<Vec<usize>>,
}

impl AdaptiveRandomNeighborhood {
    /// Create the neighborhood. This returns an error if the number of informants is zero or
    /// larger than the swarm size.
    ///
    /// # Arguments
    ///
    /// * `swarm_size`: The number of particles.
    /// * `number_of_informants`: The size of each informant set, including the particle itself.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<AdaptiveRandomNeighborhood, OError>`
    pub fn new(
        swarm_size: usize,
        number_of_informants: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self, OError> {
        if number_of_informants == 0 || number_of_informants > swarm_size {
            return Err(OError::InvalidParameter(
                "numberOfParticlesToInform".to_string(),
                format!(
                    "the number of informants ({number_of_informants}) must be between 1 and the swarm size ({swarm_size})"
                ),
            ));
        }
        let mut neighborhood = Self {
            number_of_informants,
            neighbors: vec![Vec::with_capacity(number_of_informants); swarm_size],
        };
        neighborhood.recompute(rng);
        Ok(neighborhood)
    }

    /// Create a neighborhood with fixed informant sets.
    #[cfg(test)]
    pub(crate) fn from_neighbors(neighbors: Vec<Vec<usize>>) -> Self {
        Self {
            number_of_informants: neighbors.first().map_or(0, Vec::len),
            neighbors,
        }
    }

    /// Draw new informants for all particles.
    ///
    /// # Arguments
    ///
    /// * `rng`: The random number generator.
    pub fn recompute(&mut self, rng: &mut dyn RngCore) {
        let swarm_size = self.neighbors.len();
        for (i, informants) in self.neighbors.iter_mut().enumerate() {
            informants.clear();
            informants.push(i);
            for _ in 1..self.number_of_informants {
                informants.push(rng.gen_range(0..swarm_size));
            }
        }
    }

    /// The informants of a particle. The first informant is the particle itself. This panics if
    /// the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The particle index.
    ///
    /// returns: `&[usize]`
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// The informants of all particles.
    pub fn neighborhoods(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    /// The number of particles.
    pub fn size(&self) -> usize {
        self.neighbors.len()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::pso::AdaptiveRandomNeighborhood;
    use crate::core::utils::get_rng;

    #[test]
    /// Every particle informs itself and the sets have a fixed size.
    fn test_new() {
        let mut rng = get_rng(Some(1));
        let neighborhood = AdaptiveRandomNeighborhood::new(8, 3, &mut rng).unwrap();
        assert_eq!(neighborhood.size(), 8);
        for (i, informants) in neighborhood.neighborhoods().iter().enumerate() {
            assert_eq!(informants.len(), 3);
            assert_eq!(informants[0], i);
            assert!(informants.iter().all(|j| *j < 8));
        }
    }

    #[test]
    fn test_recompute() {
        let mut rng = get_rng(Some(2));
        let mut neighborhood = AdaptiveRandomNeighborhood::new(20, 4, &mut rng).unwrap();
        let before = neighborhood.neighborhoods().to_vec();
        neighborhood.recompute(&mut rng);
        assert_ne!(before, neighborhood.neighborhoods().to_vec());
        assert_eq!(neighborhood.neighbors(19)[0], 19);
        assert_eq!(neighborhood.neighbors(19).len(), 4);
    }

    #[test]
    fn test_invalid_size() {
        let mut rng = get_rng(None);
        assert!(AdaptiveRandomNeighborhood::new(3, 4, &mut rng).is_err());
        assert!(AdaptiveRandomNeighborhood::new(3, 0, &mut rng).is_err());
        // only the particle itself
        let neighborhood = AdaptiveRandomNeighborhood::new(3, 1, &mut rng).unwrap();
        assert_eq!(neighborhood.neighbors(2), &[2]);
    }
}
