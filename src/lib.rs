//! Population-based metaheuristics for single- and multi-objective numerical problems.
//!
//! The crate is organised in three layers:
//! - [`core`]: the problem definition, the decision variable encodings, the [`core::Solution`]
//!   and [`core::Population`] containers, the [`core::NumericView`] adapter and the named
//!   parameter maps used to configure operators and algorithms;
//! - [`operators`]: comparators, selection, crossover (SBX and differential evolution) and
//!   mutation operators;
//! - [`algorithms`]: the generational genetic algorithm, the Standard PSO 2007 and 2011 and a
//!   single-objective differential evolution.
//!
//! All algorithms run on a single thread and draw their random numbers from one seeded stream,
//! so that two runs with the same seed give the same result.
pub mod algorithms;
pub mod core;
pub mod operators;
