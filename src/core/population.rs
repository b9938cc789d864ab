use std::fmt;
use std::fmt::{Display, Formatter};

use crate::core::{Solution, SolutionExport};
use crate::operators::{Comparator, PreferredSolution};

/// An ordered set of solutions with a fixed capacity. The solutions keep their insertion order
/// until the population is sorted.
///
/// Adding a solution to a full population or accessing a solution beyond the population size is
/// a programming error and causes a panic.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    capacity: usize,
    solutions: Vec<Solution>,
}

impl Population {
    /// Create an empty population.
    ///
    /// # Arguments
    ///
    /// * `capacity`: The maximum number of solutions the population can hold.
    ///
    /// returns: `Population`
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            solutions: Vec::with_capacity(capacity),
        }
    }

    /// Append a solution. This panics if the population is full.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution to add.
    pub fn add(&mut self, solution: Solution) {
        if self.solutions.len() >= self.capacity {
            panic!(
                "The population is full (capacity = {}) and the solution cannot be added",
                self.capacity
            );
        }
        self.solutions.push(solution);
    }

    /// Insert a solution at a position, shifting the following solutions. This panics if the
    /// population is full or the index is larger than the population size.
    ///
    /// # Arguments
    ///
    /// * `index`: The position.
    /// * `solution`: The solution to insert.
    pub fn insert(&mut self, index: usize, solution: Solution) {
        if self.solutions.len() >= self.capacity {
            panic!(
                "The population is full (capacity = {}) and the solution cannot be inserted",
                self.capacity
            );
        }
        self.check_index(index, self.solutions.len() + 1);
        self.solutions.insert(index, solution);
    }

    /// Get a solution. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The solution index.
    ///
    /// returns: `&Solution`
    pub fn get(&self, index: usize) -> &Solution {
        self.check_index(index, self.solutions.len());
        &self.solutions[index]
    }

    /// Get a solution as mutable. This panics if the index is out of range.
    ///
    /// returns: `&mut Solution`
    pub fn get_mut(&mut self, index: usize) -> &mut Solution {
        self.check_index(index, self.solutions.len());
        &mut self.solutions[index]
    }

    /// Remove a solution and return it. This panics if the index is out of range.
    ///
    /// returns: `Solution`
    pub fn remove(&mut self, index: usize) -> Solution {
        self.check_index(index, self.solutions.len());
        self.solutions.remove(index)
    }

    /// Replace a solution. This panics if the index is out of range.
    ///
    /// # Arguments
    ///
    /// * `index`: The index of the solution to replace.
    /// * `solution`: The new solution.
    ///
    /// returns: `Solution` The replaced solution.
    pub fn replace(&mut self, index: usize, solution: Solution) -> Solution {
        self.check_index(index, self.solutions.len());
        std::mem::replace(&mut self.solutions[index], solution)
    }

    /// Remove all the solutions.
    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    /// The number of solutions in the population.
    pub fn size(&self) -> usize {
        self.solutions.len()
    }

    /// The maximum number of solutions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Iterate over the solutions.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    /// The solutions.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Order the solutions with a comparator. Adjacent solutions are exchanged only when the
    /// comparator strictly prefers the later one, so equivalent solutions keep their relative
    /// order.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator. The preferred solutions come first.
    pub fn sort(&mut self, comparator: &dyn Comparator) {
        let n = self.solutions.len();
        for pass in 0..n {
            let mut swapped = false;
            for j in 0..n.saturating_sub(pass + 1) {
                let preferred =
                    comparator.compare(Some(&self.solutions[j]), Some(&self.solutions[j + 1]));
                if preferred == PreferredSolution::Second {
                    self.solutions.swap(j, j + 1);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
        }
    }

    /// The index of the best solution according to a comparator. With ties, the first solution
    /// wins. This returns `None` if the population is empty.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator.
    ///
    /// returns: `Option<usize>`
    pub fn index_best(&self, comparator: &dyn Comparator) -> Option<usize> {
        self.scan(comparator, PreferredSolution::Second)
    }

    /// The best solution according to a comparator. See [`Population::index_best`].
    ///
    /// returns: `Option<&Solution>`
    pub fn best(&self, comparator: &dyn Comparator) -> Option<&Solution> {
        self.index_best(comparator).map(|i| &self.solutions[i])
    }

    /// The index of the worst solution according to a comparator. With ties, the first solution
    /// wins. This returns `None` if the population is empty.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator.
    ///
    /// returns: `Option<usize>`
    pub fn index_worst(&self, comparator: &dyn Comparator) -> Option<usize> {
        self.scan(comparator, PreferredSolution::First)
    }

    /// The worst solution according to a comparator. See [`Population::index_worst`].
    ///
    /// returns: `Option<&Solution>`
    pub fn worst(&self, comparator: &dyn Comparator) -> Option<&Solution> {
        self.index_worst(comparator).map(|i| &self.solutions[i])
    }

    /// Create a population with the solutions of this population followed by the solutions of
    /// `other`. The capacity of the new population equals the number of solutions.
    ///
    /// # Arguments
    ///
    /// * `other`: The other population.
    ///
    /// returns: `Population`
    pub fn join(&self, other: &Population) -> Population {
        let mut joined = Population::new(self.size() + other.size());
        for solution in self.iter().chain(other.iter()) {
            joined.add(solution.clone());
        }
        joined
    }

    /// The objective values of all solutions. Each row contains the objectives of one solution.
    ///
    /// returns: `Vec<Vec<f64>>`
    pub fn objectives_matrix(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.objectives().to_vec())
            .collect()
    }

    /// Serialise the solutions.
    ///
    /// returns: `Vec<SolutionExport>`
    pub fn serialise(&self) -> Vec<SolutionExport> {
        self.solutions.iter().map(|s| s.export()).collect()
    }

    /// Keep the index of the solution replacing the running one when `compare(running,
    /// candidate)` returns `replace_on`.
    fn scan(&self, comparator: &dyn Comparator, replace_on: PreferredSolution) -> Option<usize> {
        if self.solutions.is_empty() {
            return None;
        }
        let mut index = 0;
        for i in 1..self.solutions.len() {
            if comparator.compare(Some(&self.solutions[index]), Some(&self.solutions[i]))
                == replace_on
            {
                index = i;
            }
        }
        Some(index)
    }

    fn check_index(&self, index: usize, limit: usize) {
        if index >= limit {
            panic!(
                "The index {index} is out of range for a population with {} solutions",
                self.solutions.len()
            );
        }
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl Display for Population {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for solution in &self.solutions {
            writeln!(f, "{solution}")?;
        }
        Ok(())
    }
}
