//! BCE-MOEA/D: bi-criterion evolution with a decomposition-based NPC.
//!
//! Two populations evolve side by side. The PC (Pareto criterion) population
//! is a bounded archive of non-dominated solutions kept diverse by a
//! crowding-degree truncation. The NPC (non-Pareto criterion) population is
//! an MOEA/D population with one member per reference direction, updated by
//! scalarizing functions. Each generation the PC explores the regions the
//! NPC covers poorly, the NPC evolves every subproblem once, and the two are
//! merged back into the PC.
//!
//! # Core Trait
//!
//! - [`BceProblem`]: unconstrained, box-bounded, multi-objective problem
//!
//! # Key Types
//!
//! - [`BceConfig`]: algorithm parameters and operator choices
//! - [`BceRunner`]: executes a complete run
//! - [`BceState`]: the run state, for stepping one generation at a time
//! - [`BceResult`]: final populations and per-generation statistics
//!
//! # Submodules
//!
//! - [`archive`]: PC insertion and crowding-degree truncation
//! - [`exploration`]: promising-member detection and exploration
//! - [`geometry`]: normalization, distances and niche radius
//! - [`multi_objective`]: dominance, non-dominated sorting, duplicate removal
//!
//! # Example
//!
//! ```
//! use u_bcemoead::bce::{das_dennis, BceConfig, BceRunner, Decomposition};
//! use u_bcemoead::problems::Dtlz2;
//!
//! let ref_dirs = das_dennis(3, 4);
//! let config = BceConfig::default()
//!     .with_n_neighbors(5)
//!     .with_decomposition(Decomposition::Pbi { theta: 5.0 })
//!     .with_max_generations(5)
//!     .with_seed(7);
//!
//! let result = BceRunner::run(&Dtlz2::standard(3), &ref_dirs, &config).unwrap();
//! assert_eq!(result.npc.len(), ref_dirs.len());
//! ```
//!
//! # References
//!
//! - Li, Yang & Liu (2016), "Pareto or Non-Pareto: Bi-Criterion Evolution in
//!   Multiobjective Optimization", *IEEE TEVC* 20(5), 645–665
//! - Li, Yang & Liu (2016), "Bi-criterion Evolution based MOEA/D", *GECCO*
//! - Zhang & Li (2007), "MOEA/D: A Multiobjective Evolutionary Algorithm
//!   Based on Decomposition"

pub mod archive;
mod config;
mod decomposition;
mod error;
pub mod exploration;
pub mod geometry;
pub mod multi_objective;
mod neighborhood;
mod operators;
mod reference;
mod runner;
mod selection;
mod types;

pub use archive::InsertionRule;
pub use config::BceConfig;
pub use decomposition::{global_update, max_replacements, replace_in_neighborhood, Decomposition};
pub use error::BceError;
pub use exploration::ExplorationReport;
pub use neighborhood::Neighborhood;
pub use operators::{Crossover, Mutation, Sampling};
pub use reference::das_dennis;
pub use runner::{BceResult, BceRunner, BceState, GenerationStats, StopReason};
pub use selection::NeighborhoodSelection;
pub use types::{objectives_of, BceProblem, Individual};
