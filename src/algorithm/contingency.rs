//! Line-outage screening that collects minimal infeasible outage sets
//!
//! Scenarios are visited in increasing order of outage count, so any
//! infeasible scenario whose outages contain an already-recorded one is
//! skipped without evaluation.

use crate::algorithm::bitset::LineMask;
use crate::algorithm::exclusion::ExclusionSet;
use crate::algorithm::network::Network;
use crate::io::configuration::MAX_SCREEN_OUTAGES;
use crate::io::error::{Result, invalid_parameter};
use serde::Serialize;

/// Why a scenario was found infeasible
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Infeasibility {
    /// Current bus flags of these substations become illegal
    InvalidSubstations {
        /// Offending substation ids
        substations: Vec<usize>,
    },
    /// The network graph splits into separate pieces
    Islanded {
        /// Number of connected components
        components: usize,
        /// Substations dropped entirely
        dropped_substations: Vec<usize>,
    },
}

/// One infeasible scenario as first discovered
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CutSet {
    /// Lines switched off by the scenario
    pub lines: Vec<usize>,
    /// What went wrong
    pub cause: Infeasibility,
}

/// Progress snapshot passed to the screen's callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenProgress {
    /// Outage count of the scenarios being screened
    pub outages: usize,
    /// Scenarios handled so far at this outage count
    pub done: usize,
    /// Scenarios at this outage count
    pub total: usize,
}

/// Outcome of a screening run
#[derive(Clone, Debug, Default)]
pub struct ScreenSummary {
    /// Line state the scenarios were applied on top of
    pub base: LineMask,
    /// Infeasibility of the base state itself
    pub baseline: Option<Infeasibility>,
    /// Scenarios evaluated
    pub evaluated: usize,
    /// Scenarios skipped because a smaller outage already explains them
    pub pruned: usize,
    /// Infeasible scenarios, each a minimal cut set
    pub cut_sets: Vec<CutSet>,
    /// Minimal infeasible masks, holding only the base mask when the base
    /// state itself is infeasible
    pub exclusions: ExclusionSet,
}

impl ScreenSummary {
    /// Number of infeasible scenarios found
    pub fn infeasible(&self) -> usize {
        self.cut_sets.len()
    }
}

/// Exhaustive N-k screen over currently energised lines
#[derive(Clone, Copy, Debug)]
pub struct ContingencyScreen {
    max_outages: usize,
}

impl ContingencyScreen {
    /// Screen every combination of up to `max_outages` simultaneous outages
    ///
    /// # Errors
    ///
    /// Returns [`crate::GridError::InvalidParameter`] if `max_outages` is zero
    /// or above [`MAX_SCREEN_OUTAGES`]
    pub fn new(max_outages: usize) -> Result<Self> {
        if max_outages == 0 || max_outages > MAX_SCREEN_OUTAGES {
            return Err(invalid_parameter(
                "max_outages",
                &max_outages,
                &format!("must be between 1 and {MAX_SCREEN_OUTAGES}"),
            ));
        }
        Ok(Self { max_outages })
    }

    /// Largest outage count screened
    pub const fn max_outages(&self) -> usize {
        self.max_outages
    }

    /// Run the screen on top of the network's current state
    ///
    /// The network's bus flags and graph are left as they were; scenarios
    /// are evaluated on a copy of the graph. When the base state is already
    /// infeasible every scenario is pruned and no cut set is reported.
    pub fn run<F>(&self, network: &mut Network, mut on_progress: F) -> ScreenSummary
    where
        F: FnMut(ScreenProgress),
    {
        let base = network.line_mask().clone();
        let candidates: Vec<usize> = base.on_lines().collect();
        let mut summary = ScreenSummary {
            baseline: evaluate(network, &base, &[]),
            base: base.clone(),
            ..ScreenSummary::default()
        };

        // A failing base explains every scenario built on top of it
        if let Some(cause) = &summary.baseline {
            log::warn!("base state is already infeasible: {cause:?}");
            summary.exclusions.insert(base.clone());
        }

        for outages in 1..=self.max_outages.min(candidates.len()) {
            let total = binomial(candidates.len(), outages);
            let mut done = 0;

            for combination in Combinations::new(candidates.len(), outages) {
                let lines: Vec<usize> = combination
                    .iter()
                    .filter_map(|&candidate| candidates.get(candidate).copied())
                    .collect();
                let mut scenario = base.clone();
                for &line in &lines {
                    scenario.set(line, false);
                }

                if summary.exclusions.is_subsumed(&scenario) {
                    summary.pruned += 1;
                } else {
                    summary.evaluated += 1;
                    if let Some(cause) = evaluate(network, &scenario, &lines) {
                        log::debug!("outage of lines {lines:?} is infeasible: {cause:?}");
                        summary.exclusions.insert(scenario);
                        summary.cut_sets.push(CutSet { lines, cause });
                    }
                }

                done += 1;
                on_progress(ScreenProgress {
                    outages,
                    done,
                    total,
                });
            }
        }

        log::info!(
            "screened {} scenarios ({} pruned), {} minimal cut sets",
            summary.evaluated + summary.pruned,
            summary.pruned,
            summary.infeasible()
        );

        summary
    }
}

/// Total number of scenarios a screen of depth `max_outages` visits
pub fn scenario_count(lines: usize, max_outages: usize) -> usize {
    (1..=max_outages.min(lines))
        .map(|outages| binomial(lines, outages))
        .fold(0, usize::saturating_add)
}

fn evaluate(network: &mut Network, scenario: &LineMask, lines: &[usize]) -> Option<Infeasibility> {
    let substations = network.invalid_substations_under(scenario);
    if !substations.is_empty() {
        return Some(Infeasibility::InvalidSubstations { substations });
    }

    let mut graph = network.adjacency().clone();
    for &line in lines {
        if graph.switch_line(line, false).is_err() {
            log::warn!("line {line} is missing from the network graph");
        }
    }

    let report = graph.find_disjoint_components();
    report.is_islanded().then(|| Infeasibility::Islanded {
        components: report.component_count(),
        dropped_substations: report.dropped_substations.clone(),
    })
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1_usize, |acc, i| {
        acc.saturating_mul(n - i) / (i + 1)
    })
}

/// Lexicographic `k`-subsets of `0..n`
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    finished: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            finished: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        // Rightmost index that can still move forward
        let pivot = (0..k)
            .rev()
            .find(|&i| self.indices.get(i).is_some_and(|&value| value < self.n - k + i));
        match pivot {
            Some(i) => {
                let start = self.indices.get(i).copied().unwrap_or(0) + 1;
                for (offset, slot) in self.indices.iter_mut().skip(i).enumerate() {
                    *slot = start + offset;
                }
            }
            None => self.finished = true,
        }

        Some(current)
    }
}
