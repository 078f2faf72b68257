//! BCE-MOEA/D generation loop.
//!
//! [`BceState`] owns everything that changes during a run: the PC archive,
//! the NPC population (one member per reference direction), the ideal point
//! and the published population. Each [`BceState::step`] runs one
//! generation in three phases:
//!
//! 1. **Exploration**: promising PC members are recombined with PC mates
//!    (see [`explore`]).
//! 2. **NPC evolution**: every subproblem, in random order, breeds one
//!    offspring from its neighborhood; the offspring goes to PC, the ideal
//!    point and a bounded neighborhood replacement.
//! 3. **Merge**: PC ∪ NPC ∪ published is deduplicated and, when it exceeds
//!    the capacity, cut down to its first front and then truncated by
//!    crowding. The result is the new PC and the new published population.
//!
//! [`BceRunner`] wraps the state in a run with termination criteria.

use super::archive;
use super::config::BceConfig;
use super::decomposition::{max_replacements, replace_in_neighborhood};
use super::error::BceError;
use super::exploration::explore;
use super::multi_objective::{eliminate_duplicates, non_dominated_sort};
use super::neighborhood::Neighborhood;
use super::operators::check_within_bounds;
use super::selection::NeighborhoodSelection;
use super::types::{evaluate_individual, objectives_of, BceProblem, Individual};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters recorded after each generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Promising PC members explored this generation.
    pub promising: usize,
    /// Exploration offspring accepted into PC.
    pub archived: usize,
    /// Exploration offspring injected into NPC.
    pub npc_updates: usize,
    /// NPC slots overwritten by neighborhood replacement.
    pub replacements: usize,
    /// PC size after the merge.
    pub pc_size: usize,
    /// Total evaluations so far.
    pub evaluations: usize,
    /// Ideal point after the generation.
    pub ideal: Vec<f64>,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_generations` reached.
    MaxGenerations,
    /// The evaluation budget was used up.
    MaxEvaluations,
    /// The wall-clock limit elapsed.
    TimeLimit,
    /// The cancellation flag was set.
    Cancelled,
}

/// Result of a BCE-MOEA/D run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BceResult {
    /// The published population of the last generation.
    pub population: Vec<Individual>,

    /// Final PC archive.
    pub pc: Vec<Individual>,

    /// Final NPC population, one member per reference direction.
    pub npc: Vec<Individual>,

    /// Best value seen for each objective.
    pub ideal: Vec<f64>,

    /// Number of generations executed.
    pub generations: usize,

    /// Number of objective evaluations.
    pub evaluations: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Statistics of every generation, in order.
    pub history: Vec<GenerationStats>,
}

/// Mutable state of a BCE-MOEA/D run.
///
/// Created by [`BceState::initialize`] (or [`BceState::from_population`])
/// and advanced one generation at a time with [`BceState::step`]. The NPC
/// population always holds exactly one member per reference direction.
#[derive(Debug, Clone)]
pub struct BceState {
    pub(crate) ref_dirs: Vec<Vec<f64>>,
    neighborhood: Neighborhood,
    pub(crate) bounds: Vec<(f64, f64)>,
    pub(crate) pc: Vec<Individual>,
    pub(crate) npc: Vec<Individual>,
    pub(crate) ideal: Vec<f64>,
    published: Vec<Individual>,
    generation: usize,
    evaluations: usize,
}

impl BceState {
    /// Samples, evaluates and sets up the initial populations.
    ///
    /// NPC is the evaluated sample, PC its first front and the ideal point
    /// its component-wise minimum.
    ///
    /// # Errors
    /// Any setup error (constrained problem, bad reference directions,
    /// bad bounds, invalid configuration) or an evaluation returning the
    /// wrong number of objectives.
    pub fn initialize<P: BceProblem, R: Rng>(
        problem: &P,
        ref_dirs: &[Vec<f64>],
        config: &BceConfig,
        rng: &mut R,
    ) -> Result<Self, BceError> {
        let bounds = check_setup(problem, ref_dirs, config)?;
        let xs = config.sampling.sample(&bounds, ref_dirs.len(), rng)?;
        let population = evaluate_all(problem, xs, config.parallel)?;
        let evaluations = population.len();
        Ok(Self::assemble(ref_dirs, config, bounds, population, evaluations))
    }

    /// Sets up the state from an already evaluated population.
    ///
    /// The population must hold one member per reference direction, each
    /// within the problem bounds. No evaluations are counted.
    pub fn from_population<P: BceProblem>(
        problem: &P,
        ref_dirs: &[Vec<f64>],
        config: &BceConfig,
        population: Vec<Individual>,
    ) -> Result<Self, BceError> {
        let bounds = check_setup(problem, ref_dirs, config)?;
        if population.len() != ref_dirs.len()
            || population.iter().any(|ind| ind.x.len() != bounds.len())
        {
            return Err(BceError::SamplingShape {
                expected: ref_dirs.len(),
                found: population.len(),
                n_var: bounds.len(),
            });
        }
        check_within_bounds(population.iter().map(|ind| &ind.x), &bounds)?;
        let expected = problem.n_objectives();
        if let Some(bad) = population.iter().find(|ind| ind.f.len() != expected) {
            return Err(BceError::ObjectiveDimension {
                expected,
                found: bad.f.len(),
            });
        }
        Ok(Self::assemble(ref_dirs, config, bounds, population, 0))
    }

    fn assemble(
        ref_dirs: &[Vec<f64>],
        config: &BceConfig,
        bounds: Vec<(f64, f64)>,
        population: Vec<Individual>,
        evaluations: usize,
    ) -> Self {
        let n_obj = ref_dirs.first().map_or(0, Vec::len);
        let mut ideal = vec![f64::INFINITY; n_obj];
        for ind in &population {
            for (z, &v) in ideal.iter_mut().zip(&ind.f) {
                *z = z.min(v);
            }
        }

        let front = non_dominated_sort(&objectives_of(&population)).first_front();
        let pc = front.iter().map(|&i| population[i].clone()).collect();

        Self {
            ref_dirs: ref_dirs.to_vec(),
            neighborhood: Neighborhood::new(ref_dirs, config.n_neighbors),
            bounds,
            pc,
            npc: population.clone(),
            ideal,
            published: population,
            generation: 0,
            evaluations,
        }
    }

    /// Runs one generation: exploration, NPC evolution, merge.
    pub fn step<P: BceProblem, R: Rng>(
        &mut self,
        problem: &P,
        config: &BceConfig,
        rng: &mut R,
    ) -> Result<GenerationStats, BceError> {
        let report = explore(self, problem, config, rng)?;
        let replacements = self.evolve_subproblems(problem, config, rng)?;
        self.merge(config, rng);
        self.generation += 1;

        debug_assert_eq!(self.npc.len(), self.capacity());
        log::debug!(
            "generation {}: promising={} archived={} replaced={} pc={} evals={} ideal={:?}",
            self.generation,
            report.promising,
            report.archived,
            replacements,
            self.pc.len(),
            self.evaluations,
            self.ideal
        );

        Ok(GenerationStats {
            generation: self.generation,
            promising: report.promising,
            archived: report.archived,
            npc_updates: report.npc_updates,
            replacements,
            pc_size: self.pc.len(),
            evaluations: self.evaluations,
            ideal: self.ideal.clone(),
        })
    }

    /// One offspring per subproblem, visited in random order.
    fn evolve_subproblems<P: BceProblem, R: Rng>(
        &mut self,
        problem: &P,
        config: &BceConfig,
        rng: &mut R,
    ) -> Result<usize, BceError> {
        let selection = NeighborhoodSelection::new(config.prob_neighbor_mating);
        let n_parents = config.crossover.n_parents();
        let nr = max_replacements(self.capacity());

        let mut order: Vec<usize> = (0..self.capacity()).collect();
        order.shuffle(rng);

        let mut replacements = 0;
        for i in order {
            let parents = selection.select(i, &self.neighborhood, n_parents, rng);
            let mut x = match parents.as_slice() {
                [a, b, ..] => config
                    .crossover
                    .crossover(&self.npc[*a].x, &self.npc[*b].x, &self.bounds, rng)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| self.npc[*a].x.clone()),
                [a] => self.npc[*a].x.clone(),
                [] => self.npc[i].x.clone(),
            };
            config.mutation.mutate(&mut x, &self.bounds, rng);

            let offspring = self.evaluate(problem, x)?;
            archive::insert(&mut self.pc, offspring.clone(), config.insertion_rule);
            self.update_ideal(&offspring.f);

            replacements += replace_in_neighborhood(
                &mut self.npc,
                self.neighborhood.of(i),
                &self.ref_dirs,
                &offspring,
                &self.ideal,
                config.decomposition,
                nr,
            )
            .len();
        }
        Ok(replacements)
    }

    /// Rebuilds PC from PC ∪ NPC ∪ published and republishes it.
    fn merge<R: Rng>(&mut self, config: &BceConfig, rng: &mut R) {
        let capacity = self.capacity();
        let mut merged = Vec::with_capacity(self.pc.len() + self.npc.len() + self.published.len());
        merged.extend(self.pc.iter().cloned());
        merged.extend(self.npc.iter().cloned());
        merged.append(&mut self.published);
        let merged = eliminate_duplicates(merged, config.duplicate_epsilon);

        if merged.len() > capacity {
            let front = non_dominated_sort(&objectives_of(&merged)).first_front();
            let mut keep = vec![false; merged.len()];
            for &i in &front {
                keep[i] = true;
            }
            let front: Vec<Individual> = merged
                .into_iter()
                .zip(keep)
                .filter_map(|(ind, k)| k.then_some(ind))
                .collect();
            self.pc = archive::truncate(front, capacity, rng);
        }
        self.published = self.pc.clone();
    }

    /// Evaluates `x`, counting the evaluation.
    pub(crate) fn evaluate<P: BceProblem>(
        &mut self,
        problem: &P,
        x: Vec<f64>,
    ) -> Result<Individual, BceError> {
        let ind = evaluate_individual(problem, x)?;
        self.evaluations += 1;
        Ok(ind)
    }

    /// Folds `f` into the ideal point.
    pub(crate) fn update_ideal(&mut self, f: &[f64]) {
        for (z, &v) in self.ideal.iter_mut().zip(f) {
            if v < *z {
                *z = v;
            }
        }
    }

    /// Archive capacity `C`, the number of reference directions.
    pub fn capacity(&self) -> usize {
        self.ref_dirs.len()
    }

    /// Current PC archive.
    pub fn pc(&self) -> &[Individual] {
        &self.pc
    }

    /// Current NPC population, indexed by subproblem.
    pub fn npc(&self) -> &[Individual] {
        &self.npc
    }

    /// Current ideal point.
    pub fn ideal(&self) -> &[f64] {
        &self.ideal
    }

    /// Population published by the last generation (the initial
    /// population before the first step).
    pub fn population(&self) -> &[Individual] {
        &self.published
    }

    /// Reference directions, one per subproblem.
    pub fn ref_dirs(&self) -> &[Vec<f64>] {
        &self.ref_dirs
    }

    /// Neighborhood graph over the reference directions.
    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Objective evaluations performed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn into_result(self, stop_reason: StopReason, history: Vec<GenerationStats>) -> BceResult {
        BceResult {
            population: self.published,
            pc: self.pc,
            npc: self.npc,
            ideal: self.ideal,
            generations: self.generation,
            evaluations: self.evaluations,
            stop_reason,
            cancelled: stop_reason == StopReason::Cancelled,
            history,
        }
    }
}

/// Executes a complete BCE-MOEA/D run.
///
/// # Usage
///
/// ```
/// use u_bcemoead::bce::{das_dennis, BceConfig, BceRunner};
/// use u_bcemoead::problems::Zdt1;
///
/// let ref_dirs = das_dennis(2, 19);
/// let config = BceConfig::default()
///     .with_n_neighbors(5)
///     .with_max_generations(10)
///     .with_seed(42);
///
/// let result = BceRunner::run(&Zdt1::new(6), &ref_dirs, &config).unwrap();
/// assert_eq!(result.generations, 10);
/// assert!(result.population.len() <= ref_dirs.len());
/// ```
pub struct BceRunner;

impl BceRunner {
    /// Runs BCE-MOEA/D until a termination criterion is met.
    pub fn run<P: BceProblem>(
        problem: &P,
        ref_dirs: &[Vec<f64>],
        config: &BceConfig,
    ) -> Result<BceResult, BceError> {
        Self::run_with_cancel(problem, ref_dirs, config, None)
    }

    /// Runs BCE-MOEA/D with an optional cancellation token.
    ///
    /// The flag, the evaluation budget and the time limit are checked
    /// before each generation; a started generation always completes.
    pub fn run_with_cancel<P: BceProblem>(
        problem: &P,
        ref_dirs: &[Vec<f64>],
        config: &BceConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BceResult, BceError> {
        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut state = BceState::initialize(problem, ref_dirs, config, &mut rng)?;
        log::info!(
            "BCE-MOEA/D start: capacity={} neighbors={} generations={} initial_pc={}",
            state.capacity(),
            state.neighborhood.size(),
            config.max_generations,
            state.pc.len()
        );

        let mut history = Vec::with_capacity(config.max_generations);
        let mut stop_reason = StopReason::MaxGenerations;

        while state.generation < config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    stop_reason = StopReason::Cancelled;
                    break;
                }
            }
            if config
                .max_evaluations
                .is_some_and(|max| state.evaluations >= max)
            {
                stop_reason = StopReason::MaxEvaluations;
                break;
            }
            if config
                .time_limit_ms
                .is_some_and(|ms| start.elapsed().as_millis() >= u128::from(ms))
            {
                stop_reason = StopReason::TimeLimit;
                break;
            }

            let stats = state.step(problem, config, &mut rng)?;
            problem.on_generation(stats.generation, state.population());
            history.push(stats);
        }

        log::info!(
            "BCE-MOEA/D done: {:?} after {} generations, {} evaluations, front size {}",
            stop_reason,
            state.generation,
            state.evaluations,
            state.published.len()
        );

        Ok(state.into_result(stop_reason, history))
    }
}

/// Validates the problem and reference directions against the
/// configuration and returns the problem bounds.
fn check_setup<P: BceProblem>(
    problem: &P,
    ref_dirs: &[Vec<f64>],
    config: &BceConfig,
) -> Result<Vec<(f64, f64)>, BceError> {
    config.validate()?;

    let n_constraints = problem.n_constraints();
    if n_constraints > 0 {
        return Err(BceError::ConstrainedProblem { n_constraints });
    }

    let required = config.crossover.n_parents();
    if ref_dirs.len() < required {
        return Err(BceError::TooFewReferenceDirections {
            required,
            found: ref_dirs.len(),
        });
    }
    let expected = problem.n_objectives();
    if let Some((index, w)) = ref_dirs.iter().enumerate().find(|(_, w)| w.len() != expected) {
        return Err(BceError::ReferenceDimension {
            index,
            expected,
            found: w.len(),
        });
    }

    let bounds = problem.bounds();
    if bounds.is_empty() {
        return Err(BceError::NoVariables);
    }
    if let Some((index, &(low, high))) = bounds
        .iter()
        .enumerate()
        .find(|(_, (lo, hi))| !(lo.is_finite() && hi.is_finite() && lo <= hi))
    {
        return Err(BceError::InvalidBounds { index, low, high });
    }
    Ok(bounds)
}

#[cfg(feature = "parallel")]
fn evaluate_all<P: BceProblem>(
    problem: &P,
    xs: Vec<Vec<f64>>,
    parallel: bool,
) -> Result<Vec<Individual>, BceError> {
    use rayon::prelude::*;

    if parallel {
        xs.into_par_iter()
            .map(|x| evaluate_individual(problem, x))
            .collect()
    } else {
        xs.into_iter()
            .map(|x| evaluate_individual(problem, x))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: BceProblem>(
    problem: &P,
    xs: Vec<Vec<f64>>,
    _parallel: bool,
) -> Result<Vec<Individual>, BceError> {
    xs.into_iter()
        .map(|x| evaluate_individual(problem, x))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
