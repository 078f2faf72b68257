//! Bi-criterion evolution for multi-objective optimization.
//!
//! Implements BCE-MOEA/D, which couples a Pareto-dominance archive with a
//! decomposition-based MOEA/D population:
//!
//! - **PC population**: bounded archive of non-dominated solutions, kept
//!   diverse by crowding-degree truncation in normalized objective space.
//! - **NPC population**: one solution per reference direction, improved
//!   through scalarizing functions and neighborhood mating.
//! - **Exploration**: PC solutions in regions the NPC covers poorly are
//!   recombined to feed both populations.
//!
//! The [`problems`] module provides ZDT and DTLZ benchmark functions.
//!
//! # Architecture
//!
//! Problems are defined by implementing [`bce::BceProblem`]. Operators,
//! decompositions and termination criteria are chosen through
//! [`bce::BceConfig`]; randomness comes from a seeded `StdRng` so every
//! run is reproducible.

pub mod bce;
pub mod problems;
