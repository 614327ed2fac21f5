//! Minimum-cost one-to-one assignment of vehicles to orders.
//!
//! The solver is the shortest augmenting path form of the Hungarian
//! algorithm (Jonker-Volgenant, as described by Crouse 2016): one Dijkstra
//! search per row over reduced costs, with row/column potentials kept
//! feasible between searches. O(n^2 m) for an n x m matrix with n <= m.

use tracing::debug;

use crate::cost::{CostMatrix, TripCost};
use crate::error::PlannerError;

const NONE: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignedPair {
    pub order: usize,
    /// Index into the caller's vehicle list (not the matrix column).
    pub vehicle: usize,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment {
    pairs: Vec<AssignedPair>,
    unassigned_orders: Vec<usize>,
}

impl Assignment {
    /// Matched pairs, sorted by order index.
    pub fn pairs(&self) -> &[AssignedPair] {
        &self.pairs
    }

    /// Orders left without a vehicle because the fleet is smaller than the
    /// order set.
    pub fn unassigned_orders(&self) -> &[usize] {
        &self.unassigned_orders
    }

    pub fn total_cost(&self) -> f64 {
        self.pairs.iter().map(|pair| pair.cost).sum()
    }

    pub fn vehicle_for(&self, order: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|pair| pair.order == order)
            .map(|pair| pair.vehicle)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Optimal assignment over a cost matrix.
///
/// Fails with [`PlannerError::DegenerateAssignment`] for the first order that
/// could only be matched through an infeasible pairing. When every order must
/// be matched (no more orders than vehicles), an order with no feasible
/// vehicle at all fails up front. With more orders than vehicles such an
/// order is simply left unassigned.
pub fn assign(matrix: &CostMatrix) -> Result<Assignment, PlannerError> {
    let every_order_matched = matrix.order_count() <= matrix.column_count();
    if every_order_matched || matrix.column_count() == 0 {
        if let Some(order) = matrix
            .rows()
            .iter()
            .position(|row| !row.iter().any(|cost| cost.is_feasible()))
        {
            return Err(PlannerError::DegenerateAssignment { order });
        }
    }

    let index_pairs = linear_sum_assignment(&matrix.to_f64_rows());
    debug!(
        orders = matrix.order_count(),
        vehicles = matrix.column_count(),
        matched = index_pairs.len(),
        "solved assignment"
    );

    let mut pairs = Vec::with_capacity(index_pairs.len());
    for (order, column) in index_pairs {
        match matrix.get(order, column) {
            TripCost::Feasible(cost) => pairs.push(AssignedPair {
                order,
                vehicle: matrix.vehicle_index(column),
                cost,
            }),
            TripCost::Infeasible => return Err(PlannerError::DegenerateAssignment { order }),
        }
    }

    let mut matched = vec![false; matrix.order_count()];
    for pair in &pairs {
        matched[pair.order] = true;
    }
    let unassigned_orders = (0..matrix.order_count()).filter(|&order| !matched[order]).collect();

    Ok(Assignment {
        pairs,
        unassigned_orders,
    })
}

/// Rectangular linear sum assignment.
///
/// Returns `min(rows, cols)` `(row, col)` pairs sorted by row, each row and
/// column used at most once, minimizing the sum of selected entries.
/// Non-finite entries are forbidden: a forbidden pair is only selected when
/// no complete matching avoids it, and then as few of them as possible.
pub fn linear_sum_assignment(costs: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let rows = costs.len();
    let cols = costs.first().map_or(0, |row| row.len());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    debug_assert!(costs.iter().all(|row| row.len() == cols), "ragged cost matrix");

    let prepared = forbid_non_finite(costs);

    let mut pairs = if rows <= cols {
        solve_wide(&prepared, rows, cols)
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
    } else {
        let transposed: Vec<Vec<f64>> = (0..cols)
            .map(|j| (0..rows).map(|i| prepared[i][j]).collect())
            .collect();
        solve_wide(&transposed, cols, rows)
            .into_iter()
            .enumerate()
            .map(|(col, row)| (row, col))
            .collect::<Vec<_>>()
    };

    pairs.sort_unstable();
    pairs
}

/// Shift every entry to be non-negative and replace non-finite entries with a
/// penalty larger than any difference between finite assignments.
fn forbid_non_finite(costs: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let finite = || costs.iter().flatten().copied().filter(|value| value.is_finite());

    let min = finite().fold(f64::INFINITY, f64::min);
    let min = if min.is_finite() { min } else { 0.0 };
    let spread: f64 = finite().map(|value| value - min).sum();
    let penalty = 2.0 * spread + 1.0;

    costs
        .iter()
        .map(|row| {
            row.iter()
                .map(|&value| if value.is_finite() { value - min } else { penalty })
                .collect()
        })
        .collect()
}

/// Column assigned to each row, for a finite non-negative matrix with
/// `rows <= cols`.
fn solve_wide(cost: &[Vec<f64>], rows: usize, cols: usize) -> Vec<usize> {
    let mut u = vec![0.0; rows];
    let mut v = vec![0.0; cols];
    let mut col4row = vec![NONE; rows];
    let mut row4col = vec![NONE; cols];

    let mut shortest = vec![f64::INFINITY; cols];
    let mut path = vec![NONE; cols];
    let mut remaining = vec![0usize; cols];
    let mut seen_rows = vec![false; rows];
    let mut seen_cols = vec![false; cols];

    for cur_row in 0..rows {
        shortest.fill(f64::INFINITY);
        path.fill(NONE);
        seen_rows.fill(false);
        seen_cols.fill(false);
        for (it, slot) in remaining.iter_mut().enumerate() {
            *slot = cols - it - 1;
        }
        let mut num_remaining = cols;

        let mut min_val = 0.0;
        let mut i = cur_row;
        let sink = loop {
            seen_rows[i] = true;

            let mut index = NONE;
            let mut lowest = f64::INFINITY;
            for (it, &j) in remaining[..num_remaining].iter().enumerate() {
                let reduced = min_val + cost[i][j] - u[i] - v[j];
                if reduced < shortest[j] {
                    path[j] = i;
                    shortest[j] = reduced;
                }
                // Ties prefer a free column so the search ends sooner.
                if shortest[j] < lowest || (shortest[j] == lowest && row4col[j] == NONE) {
                    lowest = shortest[j];
                    index = it;
                }
            }

            // Every entry is finite, so some column is always reachable.
            debug_assert!(index != NONE);
            min_val = lowest;
            let j = remaining[index];
            seen_cols[j] = true;
            num_remaining -= 1;
            remaining[index] = remaining[num_remaining];

            if row4col[j] == NONE {
                break j;
            }
            i = row4col[j];
        };

        u[cur_row] += min_val;
        for r in 0..rows {
            if seen_rows[r] && r != cur_row {
                u[r] += min_val - shortest[col4row[r]];
            }
        }
        for c in 0..cols {
            if seen_cols[c] {
                v[c] -= min_val - shortest[c];
            }
        }

        let mut j = sink;
        loop {
            let r = path[j];
            row4col[j] = r;
            std::mem::swap(&mut col4row[r], &mut j);
            if r == cur_row {
                break;
            }
        }
    }

    col4row
}
