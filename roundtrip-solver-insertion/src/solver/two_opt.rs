use roundtrip_core::DistanceMatrix;

/// Improve a closed tour in place with 2-opt moves.
///
/// `tour` is the visiting order without the closing return; its first entry
/// is never moved. Each pass scans edge pairs `(i, j)` in lexicographic order
/// and applies the first move that strictly shortens the tour, by reversing
/// `tour[i + 1..=j]`. The search stops when a pass finds no improvement or
/// after `max_passes` moves. Returns the number of moves applied.
///
/// Asymmetric matrices are handled by charging the reversed inner segment at
/// its reverse cost, so a move is only taken when the whole tour gets
/// shorter.
pub fn two_opt(matrix: &DistanceMatrix, tour: &mut [usize], max_passes: usize) -> usize {
    if tour.len() < 4 {
        return 0;
    }
    let symmetric = matrix.is_symmetric();
    let mut applied = 0;
    while applied < max_passes {
        let Some((i, j)) = first_improvement(matrix, tour, symmetric) else {
            break;
        };
        if let Some(segment) = tour.get_mut(i + 1..=j) {
            segment.reverse();
        }
        applied += 1;
    }
    applied
}

#[expect(
    clippy::indexing_slicing,
    reason = "i < j < tour.len() and j + 1 wraps to 0"
)]
fn first_improvement(
    matrix: &DistanceMatrix,
    tour: &[usize],
    symmetric: bool,
) -> Option<(usize, usize)> {
    let n = tour.len();
    for i in 0..n - 2 {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b, c) = (tour[i], tour[i + 1], tour[j]);
            let d = if j + 1 == n { tour[0] } else { tour[j + 1] };
            let mut delta = cost(matrix, a, c) + cost(matrix, b, d)
                - cost(matrix, a, b)
                - cost(matrix, c, d);
            if !symmetric {
                delta += tour[i + 1..=j]
                    .windows(2)
                    .map(|pair| cost(matrix, pair[1], pair[0]) - cost(matrix, pair[0], pair[1]))
                    .sum::<i128>();
            }
            if delta < 0 {
                return Some((i, j));
            }
        }
    }
    None
}

fn cost(matrix: &DistanceMatrix, from: usize, to: usize) -> i128 {
    i128::from(matrix.distance(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtrip_core::Route;
    use rstest::rstest;

    /// Four corners of a square; diagonals cost more than sides.
    fn square() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 10, 14, 10],
            vec![10, 0, 10, 14],
            vec![14, 10, 0, 10],
            vec![10, 14, 10, 0],
        ])
        .expect("square")
    }

    #[rstest]
    fn removes_a_crossing() {
        let matrix = square();
        let mut tour = vec![0, 2, 1, 3];

        let applied = two_opt(&matrix, &mut tour, 10);

        assert_eq!(applied, 1);
        assert_eq!(tour, vec![0, 1, 2, 3]);
        assert_eq!(matrix.tour_cost(&Route::from_cycle(tour)), Some(40));
    }

    #[rstest]
    fn zero_passes_leave_the_tour_alone() {
        let mut tour = vec![0, 2, 1, 3];
        assert_eq!(two_opt(&square(), &mut tour, 0), 0);
        assert_eq!(tour, vec![0, 2, 1, 3]);
    }

    #[rstest]
    fn short_tours_are_untouched() {
        let mut tour = vec![0, 2, 1];
        assert_eq!(two_opt(&square(), &mut tour, 10), 0);
        assert_eq!(tour, vec![0, 2, 1]);
    }

    #[rstest]
    fn asymmetric_moves_account_for_reversed_segment() {
        // Reversing [1, 2, 3] would fix the endpoint edges but the inner legs
        // are far more expensive backwards.
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0, 1, 5, 5, 9],
            vec![5, 0, 1, 5, 5],
            vec![5, 100, 0, 1, 5],
            vec![5, 5, 100, 0, 1],
            vec![1, 5, 5, 5, 0],
        ])
        .expect("square");
        let mut tour = vec![0, 1, 2, 3, 4];
        let before = matrix.tour_cost(&Route::from_cycle(tour.clone()));

        two_opt(&matrix, &mut tour, 100);

        let after = matrix.tour_cost(&Route::from_cycle(tour.clone()));
        assert!(after <= before);
        assert_eq!(tour, vec![0, 1, 2, 3, 4]);
    }
}
