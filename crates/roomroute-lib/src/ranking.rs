use crate::scoring::ScoredRoute;

/// Order scored routes best first and annotate them relative to the winner.
///
/// Sorting is stable, so routes with equal scores keep their enumeration
/// order. The first route is marked optimal. When the optimal score is zero
/// every route reports a relative efficiency of zero.
pub fn rank_routes(mut routes: Vec<ScoredRoute>) -> Vec<ScoredRoute> {
    routes.sort_by(|a, b| b.efficiency_score.cmp(&a.efficiency_score));

    let optimal_score = routes.first().map_or(0, |route| route.efficiency_score);
    for (position, route) in routes.iter_mut().enumerate() {
        route.is_optimal = position == 0;
        route.relative_to_optimal = relative_efficiency(route.efficiency_score, optimal_score);
    }

    routes
}

fn relative_efficiency(score: u32, optimal: u32) -> u32 {
    if optimal == 0 {
        return 0;
    }
    (f64::from(score) * 100.0 / f64::from(optimal)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: i64, score: u32) -> ScoredRoute {
        ScoredRoute {
            path: vec![1, id],
            room_names: vec!["A".to_string(), format!("R{id}")],
            step_count: 1,
            avg_occupancy_ratio: 0.0,
            efficiency_score: score,
            is_optimal: false,
            relative_to_optimal: 0,
        }
    }

    #[test]
    fn best_route_first_with_relative_percentages() {
        let ranked = rank_routes(vec![scored(2, 60), scored(3, 80), scored(4, 70)]);
        let order: Vec<i64> = ranked.iter().map(|route| route.path[1]).collect();
        assert_eq!(order, vec![3, 4, 2]);
        assert!(ranked[0].is_optimal);
        assert!(!ranked[1].is_optimal && !ranked[2].is_optimal);
        assert_eq!(ranked[0].relative_to_optimal, 100);
        assert_eq!(ranked[1].relative_to_optimal, 88);
        assert_eq!(ranked[2].relative_to_optimal, 75);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let ranked = rank_routes(vec![scored(2, 50), scored(3, 50), scored(4, 50)]);
        let order: Vec<i64> = ranked.iter().map(|route| route.path[1]).collect();
        assert_eq!(order, vec![2, 3, 4]);
        assert!(ranked[0].is_optimal);
    }

    #[test]
    fn zero_optimal_score_yields_zero_relatives() {
        let ranked = rank_routes(vec![scored(2, 0), scored(3, 0)]);
        assert!(ranked.iter().all(|route| route.relative_to_optimal == 0));
        assert!(ranked[0].is_optimal);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(rank_routes(Vec::new()).is_empty());
    }
}
