use roundtrip_core::DistanceMatrix;

/// Grow a closed tour from `start` by cheapest insertion.
///
/// Returns the visiting order without the closing return. At each step the
/// unvisited location with the smallest insertion cost is placed at its
/// cheapest position; equal costs favour the lower location index, then the
/// earlier position.
///
/// Because each tie goes to the earliest position, a matrix where every
/// insertion costs the same places later nodes in front of earlier ones: an
/// all-zero 5×5 matrix from start 2 yields `[2, 4, 3, 1, 0]`.
///
/// `start` must index the matrix; an empty order is returned otherwise.
#[must_use]
pub fn cheapest_insertion(matrix: &DistanceMatrix, start: usize) -> Vec<usize> {
    let size = matrix.size();
    if start >= size {
        return Vec::new();
    }
    let mut tour = Vec::with_capacity(size);
    tour.push(start);
    let mut visited = vec![false; size];
    if let Some(slot) = visited.get_mut(start) {
        *slot = true;
    }

    while tour.len() < size {
        let mut best: Option<(i128, usize, usize)> = None;
        for (node, _) in visited.iter().enumerate().filter(|(_, seen)| !**seen) {
            let (cost, position) = best_position(matrix, &tour, node);
            if best.is_none_or(|(best_cost, _, _)| cost < best_cost) {
                best = Some((cost, node, position));
            }
        }
        let Some((_, node, position)) = best else {
            break;
        };
        tour.insert(position, node);
        if let Some(slot) = visited.get_mut(node) {
            *slot = true;
        }
    }
    tour
}

/// Cheapest position at which to insert `node`, with its cost increase.
///
/// Position `p` places `node` between `tour[p - 1]` and the stop after it,
/// wrapping to the start for the closing edge.
fn best_position(matrix: &DistanceMatrix, tour: &[usize], node: usize) -> (i128, usize) {
    let successors = tour.iter().skip(1).chain(tour.first());
    let mut best = (i128::MAX, tour.len());
    for (edge, (&from, &to)) in tour.iter().zip(successors).enumerate() {
        let delta = cost(matrix, from, node) + cost(matrix, node, to) - cost(matrix, from, to);
        if delta < best.0 {
            best = (delta, edge + 1);
        }
    }
    best
}

fn cost(matrix: &DistanceMatrix, from: usize, to: usize) -> i128 {
    i128::from(matrix.distance(from, to))
}
