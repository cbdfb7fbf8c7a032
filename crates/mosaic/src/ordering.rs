//! Display-order optimization for masonry galleries.
//!
//! The [`OrderingEngine`] starts from the natural rank order (votes
//! descending, then id ascending) and improves it with a bounded
//! adjacent-swap local search. Every candidate order is scored by simulating
//! the skyline placement with a synthetic uniform column width and no gaps,
//! then summing the absolute pairwise differences of the final column
//! heights.
//!
//! A swap is accepted when it strictly lowers the balance cost, provided it
//! does not increase the number of adjacent wide/wide pairs. At equal cost a
//! swap is accepted if it reduces wide/wide adjacency, or, at equal
//! adjacency, if it moves the pair back into rank order. Each accepted swap
//! strictly decreases `(cost, wide pairs, rank inversions)`, so the search
//! converges even without the pass bound.
//!
//! Placement is a left-to-right fold, so the skyline after the first `i`
//! items is kept per position and a swap at `i` only re-simulates the tail.
//! The number of scored swaps is capped as well as the number of passes.
//!
//! # Submodules
//!
//! - [`cache`] - Per-collection memoization keyed by fingerprint
//! - [`service`] - Engine plus cache, producing wire responses

pub mod cache;
pub mod service;

pub use cache::{CacheLookup, CacheStats, OrderingCache};
pub use mosaic_core::ordering::OrderingResult;
pub use service::OrderingService;

use log::debug;

use mosaic_core::{
    dimension,
    identifier::ItemId,
    item::{self, Item},
    snapshot::DimensionSnapshot,
};

use crate::{
    config::OrderingConfig,
    layout::{ColumnSpec, skyline::Skyline},
};

/// Column width used when simulating placements; only ratios of heights matter.
const SIMULATED_COLUMN_WIDTH: f64 = 100.0;

/// Cost differences at or below this are treated as equal.
const COST_EPSILON: f64 = 1e-9;

/// The column counts an ordering is computed for.
const PRESENTATIONS: [usize; 2] = [2, 4];

#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: ItemId,
    rank: usize,
    aspect_ratio: f64,
    is_wide: bool,
}

/// Quality of one candidate order.
#[derive(Debug, Clone, Copy)]
struct Score {
    cost: f64,
    wide_pairs: usize,
}

impl Score {
    /// Returns `true` if moving from `current` to `self` is an accepted swap.
    fn improves_on(&self, current: &Score, restores_rank: bool) -> bool {
        if self.wide_pairs > current.wide_pairs {
            return false;
        }
        if self.cost < current.cost - COST_EPSILON {
            return true;
        }
        if self.cost > current.cost + COST_EPSILON {
            return false;
        }
        self.wide_pairs < current.wide_pairs || restores_rank
    }
}

/// Skyline placement of one candidate order in synthetic columns.
///
/// `prefixes[k]` is the skyline after placing the first `k` candidates.
/// Entries past the position last passed to [`Simulation::advance`] may be
/// stale after a swap.
struct Simulation {
    spec: ColumnSpec,
    prefixes: Vec<Skyline>,
}

impl Simulation {
    fn new(order: &[Candidate], columns: usize) -> Self {
        let spec = ColumnSpec::gapless(columns, SIMULATED_COLUMN_WIDTH);
        let mut prefixes = Vec::with_capacity(order.len() + 1);
        let mut skyline = Skyline::new(columns);
        for candidate in order {
            prefixes.push(skyline.clone());
            skyline.place(candidate.aspect_ratio, candidate.is_wide, &spec);
        }
        prefixes.push(skyline);
        Self { spec, prefixes }
    }

    /// Balance cost of the order the simulation was built from.
    fn cost(&self) -> f64 {
        self.prefixes.last().map_or(0.0, Skyline::balance_cost)
    }

    /// Balance cost of `order`, reusing the cached skyline before `start`.
    fn cost_from(&self, order: &[Candidate], start: usize) -> f64 {
        let mut skyline = self.prefixes[start].clone();
        for candidate in &order[start..] {
            skyline.place(candidate.aspect_ratio, candidate.is_wide, &self.spec);
        }
        skyline.balance_cost()
    }

    /// Refreshes the cached skyline after `order[i]` was settled.
    fn advance(&mut self, order: &[Candidate], i: usize) {
        let mut skyline = self.prefixes[i].clone();
        skyline.place(order[i].aspect_ratio, order[i].is_wide, &self.spec);
        self.prefixes[i + 1] = skyline;
    }
}

fn wide_pairs(order: &[Candidate]) -> usize {
    order
        .windows(2)
        .filter(|pair| pair[0].is_wide && pair[1].is_wide)
        .count()
}

/// Wide/wide pairs touching positions `i` and `i + 1`.
fn wide_pairs_near(order: &[Candidate], i: usize) -> usize {
    let end = (i + 3).min(order.len());
    wide_pairs(&order[i.saturating_sub(1)..end])
}

#[derive(Debug, Clone, Copy, Default)]
struct SearchStats {
    passes: usize,
    evaluations: usize,
    swaps: usize,
}

/// Computes display orders for the 2- and 4-column presentations.
///
/// The engine holds only its configuration; every call works on local
/// state, so a single engine may be shared across threads.
#[derive(Debug, Clone)]
pub struct OrderingEngine {
    max_passes: usize,
    max_evaluations: usize,
}

impl Default for OrderingEngine {
    fn default() -> Self {
        Self::new(&OrderingConfig::default())
    }
}

impl OrderingEngine {
    /// Creates an engine from the ordering configuration.
    pub fn new(config: &OrderingConfig) -> Self {
        Self {
            max_passes: config.max_passes(),
            max_evaluations: config.max_evaluations(),
        }
    }

    /// Returns the local-search pass bound.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns the bound on scored swaps per column count.
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }

    /// Computes the ordering for `items` given the currently known dimensions.
    ///
    /// Items without a known dimension are treated as squares. Never fails;
    /// an empty collection yields [`OrderingResult::empty`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use mosaic::{item::Item, ordering::OrderingEngine, snapshot::DimensionSnapshot};
    /// let items = vec![
    ///     Item::new(1, "a.jpg").with_votes(2),
    ///     Item::new(2, "b.jpg").with_votes(5),
    /// ];
    /// let result = OrderingEngine::default().compute_ordering(&items, &DimensionSnapshot::new());
    ///
    /// assert_eq!(result.count(), 2);
    /// assert!(result.matches_items(&items));
    /// ```
    pub fn compute_ordering(&self, items: &[Item], snapshot: &DimensionSnapshot) -> OrderingResult {
        if items.is_empty() {
            return OrderingResult::empty();
        }

        let natural: Vec<Candidate> = item::ranked(items)
            .into_iter()
            .enumerate()
            .map(|(rank, item)| {
                let aspect_ratio = snapshot.aspect_ratio_for(item);
                Candidate {
                    id: item.id(),
                    rank,
                    aspect_ratio,
                    is_wide: dimension::is_wide(aspect_ratio),
                }
            })
            .collect();

        let avg_aspect_ratio =
            natural.iter().map(|c| c.aspect_ratio).sum::<f64>() / natural.len() as f64;
        let wide_image_count = natural.iter().filter(|c| c.is_wide).count();

        let [two, four] = PRESENTATIONS.map(|columns| self.optimize(&natural, columns));

        debug!(
            items = natural.len(),
            wide = wide_image_count,
            avg_aspect_ratio;
            "Ordering computed"
        );

        OrderingResult::new(two, four, avg_aspect_ratio, wide_image_count)
    }

    /// Runs the bounded adjacent-swap search for one column count.
    fn optimize(&self, natural: &[Candidate], columns: usize) -> Vec<ItemId> {
        let (order, _, _) = self.search(natural, columns);
        order.into_iter().map(|c| c.id).collect()
    }

    fn search(
        &self,
        natural: &[Candidate],
        columns: usize,
    ) -> (Vec<Candidate>, Score, SearchStats) {
        let mut order = natural.to_vec();
        let mut simulation = Simulation::new(&order, columns);
        let initial = Score {
            cost: simulation.cost(),
            wide_pairs: wide_pairs(&order),
        };
        let mut score = initial;
        let mut stats = SearchStats::default();

        'passes: while stats.passes < self.max_passes {
            stats.passes += 1;
            let mut accepted = false;

            for i in 0..order.len().saturating_sub(1) {
                if stats.evaluations >= self.max_evaluations {
                    debug!(columns, evaluations = stats.evaluations; "Swap budget exhausted");
                    break 'passes;
                }
                stats.evaluations += 1;

                let before = wide_pairs_near(&order, i);
                order.swap(i, i + 1);
                let pairs = score.wide_pairs + wide_pairs_near(&order, i) - before;
                let restores_rank = order[i].rank < order[i + 1].rank;

                let candidate = (pairs <= score.wide_pairs).then(|| Score {
                    cost: simulation.cost_from(&order, i),
                    wide_pairs: pairs,
                });
                match candidate {
                    Some(candidate) if candidate.improves_on(&score, restores_rank) => {
                        score = candidate;
                        accepted = true;
                        stats.swaps += 1;
                    }
                    _ => order.swap(i, i + 1),
                }
                simulation.advance(&order, i);
            }

            if !accepted {
                break;
            }
        }

        debug!(
            columns,
            passes = stats.passes,
            evaluations = stats.evaluations,
            swaps = stats.swaps,
            initial_cost = initial.cost,
            final_cost = score.cost;
            "Local search finished"
        );

        (order, score, stats)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn raw(ids: &[ItemId]) -> Vec<i64> {
        ids.iter().map(|id| id.get()).collect()
    }

    fn item(id: i64, ratio: f64) -> Item {
        Item::new(id, format!("img-{id}")).with_stored_size(ratio * 100.0, 100.0)
    }

    #[test]
    fn test_empty_collection() {
        let result = OrderingEngine::default().compute_ordering(&[], &DimensionSnapshot::new());

        assert_eq!(result.count(), 0);
        assert!(result.ordered_ids_2col().is_empty());
        assert!(result.ordered_ids_4col().is_empty());
        assert_approx_eq!(f64, result.avg_aspect_ratio(), 0.0);
        assert_eq!(result.wide_image_count(), 0);
    }

    #[test]
    fn test_equal_shapes_keep_rank_order() {
        let items = vec![
            Item::new(4, "d").with_votes(1),
            Item::new(2, "b").with_votes(7),
            Item::new(3, "c").with_votes(7),
            Item::new(1, "a").with_votes(0),
        ];

        let result = OrderingEngine::default().compute_ordering(&items, &DimensionSnapshot::new());

        assert_eq!(raw(result.ordered_ids_2col()), vec![2, 3, 4, 1]);
        assert_eq!(raw(result.ordered_ids_4col()), vec![2, 3, 4, 1]);
        assert_approx_eq!(f64, result.avg_aspect_ratio(), 1.0);
    }

    #[test]
    fn test_swap_balances_columns() {
        // Natural order leaves heights [400, 200]; swapping the last two gives [300, 300].
        let items = vec![item(1, 0.5), item(2, 1.0), item(3, 1.0), item(4, 0.5)];

        let result = OrderingEngine::default().compute_ordering(&items, &DimensionSnapshot::new());

        assert_eq!(raw(result.ordered_ids_2col()), vec![1, 2, 4, 3]);
        assert!(result.matches_items(&items));
    }

    #[test]
    fn test_zero_passes_returns_natural_order() {
        let items = vec![item(1, 0.5), item(2, 1.0), item(3, 1.0), item(4, 0.5)];
        let engine = OrderingEngine::new(&OrderingConfig::new(0));

        let result = engine.compute_ordering(&items, &DimensionSnapshot::new());

        assert_eq!(raw(result.ordered_ids_2col()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_statistics_use_known_dimensions() {
        let items = vec![item(1, 2.0), item(2, 1.0), Item::new(3, "unknown")];

        let result = OrderingEngine::default().compute_ordering(&items, &DimensionSnapshot::new());

        assert_eq!(result.count(), 3);
        assert_eq!(result.wide_image_count(), 1);
        assert_approx_eq!(f64, result.avg_aspect_ratio(), 4.0 / 3.0);
    }

    fn natural(items: &[Item]) -> Vec<Candidate> {
        item::ranked(items)
            .into_iter()
            .enumerate()
            .map(|(rank, item)| {
                let aspect_ratio = DimensionSnapshot::new().aspect_ratio_for(item);
                Candidate {
                    id: item.id(),
                    rank,
                    aspect_ratio,
                    is_wide: dimension::is_wide(aspect_ratio),
                }
            })
            .collect()
    }

    fn gallery(count: i64) -> Vec<Item> {
        const RATIOS: [f64; 5] = [0.66, 1.0, 1.5, 1.8, 0.75];
        (0..count)
            .map(|id| item(id, RATIOS[id as usize % RATIOS.len()]).with_votes(id % 7))
            .collect()
    }

    #[test]
    fn test_swap_budget_stops_search() {
        let items = gallery(400);
        let engine = OrderingEngine::new(&OrderingConfig::new(8).with_max_evaluations(50));

        let (order, _, stats) = engine.search(&natural(&items), 4);

        assert_eq!(stats.evaluations, 50);
        assert_eq!(stats.passes, 1);
        assert_eq!(order.len(), 400);
    }

    #[test]
    fn test_large_gallery_search_is_bounded() {
        let items = gallery(1_000);
        let engine = OrderingEngine::default();

        for columns in PRESENTATIONS {
            let start = natural(&items);
            let (order, score, stats) = engine.search(&start, columns);

            assert!(stats.evaluations <= engine.max_evaluations());
            assert!(stats.passes <= engine.max_passes());
            // Tail re-simulation agrees with placing the whole order again.
            assert_approx_eq!(
                f64,
                score.cost,
                Simulation::new(&order, columns).cost(),
                epsilon = 1e-6
            );
            assert!(score.cost <= Simulation::new(&start, columns).cost() + 1e-6);
        }
    }

    #[test]
    fn test_wide_pairs_near_counts_pairs_touching_swap() {
        let items = vec![item(1, 2.0), item(2, 2.0), item(3, 2.0), item(4, 1.0), item(5, 2.0)];
        let order: Vec<Candidate> = items
            .iter()
            .enumerate()
            .map(|(rank, item)| {
                let aspect_ratio = DimensionSnapshot::new().aspect_ratio_for(item);
                Candidate {
                    id: item.id(),
                    rank,
                    aspect_ratio,
                    is_wide: dimension::is_wide(aspect_ratio),
                }
            })
            .collect();

        assert_eq!(wide_pairs(&order), 2);
        assert_eq!(wide_pairs_near(&order, 0), 2);
        assert_eq!(wide_pairs_near(&order, 2), 1);
        assert_eq!(wide_pairs_near(&order, 3), 0);
    }

    #[test]
    fn test_score_rejects_added_wide_adjacency() {
        let current = Score {
            cost: 100.0,
            wide_pairs: 0,
        };
        let cheaper_but_adjacent = Score {
            cost: 10.0,
            wide_pairs: 1,
        };
        let same_score = Score {
            cost: 100.0,
            wide_pairs: 0,
        };

        assert!(!cheaper_but_adjacent.improves_on(&current, true));
        assert!(!same_score.improves_on(&current, false));
        assert!(same_score.improves_on(&current, true));
    }
}
