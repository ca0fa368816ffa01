use crate::error::{MapError, Result};
use crate::model::spending::{BuildingCount, CategoryTotals};

/// Cells that can take a building: everything except the road rows and the
/// house cell.
pub fn available_spots(grid_size: usize) -> usize {
    let road_rows = grid_size / 2;
    (grid_size * grid_size)
        .saturating_sub(road_rows * grid_size)
        .saturating_sub(1)
}

/// Turns category totals into building counts proportional to spend.
///
/// Each count is `round(share * available_spots)` with a floor of 1. Counts
/// are not renormalized, so their sum can land above or below capacity; the
/// placement engine absorbs any overshoot as exhausted placements.
///
/// Negative totals can push a share above 1, so no single count is allowed
/// past the number of available spots.
pub fn plan(totals: &CategoryTotals, grid_size: usize) -> Result<BuildingCount> {
    let grand_total: f64 = totals.values().sum();
    if !grand_total.is_finite() || grand_total <= 0.0 {
        return Err(MapError::ZeroTotalSpending { total: grand_total });
    }

    let spots = available_spots(grid_size) as f64;
    let ceiling = spots.max(1.0);
    let counts = totals
        .iter()
        .map(|(category, value)| {
            let proportion = value / grand_total;
            // f64::round rounds half away from zero
            let count = (proportion * spots).round().clamp(1.0, ceiling) as u32;
            (category.clone(), count)
        })
        .collect();

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, f64)]) -> CategoryTotals {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_available_spots() {
        assert_eq!(available_spots(20), 199);
        assert_eq!(available_spots(5), 14);
        assert_eq!(available_spots(1), 0);
        assert_eq!(available_spots(0), 0);
    }

    #[test]
    fn test_plan_example_split() {
        let counts = plan(&totals(&[("EO", 100.0), ("OS", 300.0)]), 20).unwrap();
        assert_eq!(counts["EO"], 50);
        assert_eq!(counts["OS"], 149);
    }

    #[test]
    fn test_small_category_gets_at_least_one() {
        let counts = plan(&totals(&[("EO", 1.0), ("OS", 100_000.0)]), 20).unwrap();
        assert_eq!(counts["EO"], 1);
        assert_eq!(counts["OS"], 199);
    }

    #[test]
    fn test_counts_are_not_renormalized() {
        // three equal shares of 199 round to 66 each
        let counts = plan(&totals(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]), 20).unwrap();
        assert_eq!(counts.values().sum::<u32>(), 198);
    }

    #[test]
    fn test_counts_track_proportion() {
        let input = totals(&[("EO", 12.5), ("OS", 40.0), ("SH", 7.3), ("GR", 90.1)]);
        let grand: f64 = input.values().sum();
        let spots = available_spots(20) as f64;
        let counts = plan(&input, 20).unwrap();
        for (category, value) in &input {
            let ideal = value / grand * spots;
            let diff = (counts[category] as f64 - ideal).abs();
            assert!(diff <= 1.0, "{} got {} for ideal {}", category, counts[category], ideal);
        }
    }

    #[test]
    fn test_zero_total() {
        assert!(matches!(
            plan(&CategoryTotals::new(), 20),
            Err(MapError::ZeroTotalSpending { .. })
        ));
        assert!(matches!(
            plan(&totals(&[("EO", 0.0)]), 20),
            Err(MapError::ZeroTotalSpending { .. })
        ));
        assert!(matches!(
            plan(&totals(&[("EO", 10.0), ("OS", -10.0)]), 20),
            Err(MapError::ZeroTotalSpending { .. })
        ));
    }

    #[test]
    fn test_negative_category_still_gets_one() {
        let counts = plan(&totals(&[("EO", 150.0), ("OS", -50.0)]), 20).unwrap();
        assert_eq!(counts["OS"], 1);
        assert_eq!(counts["EO"], 199);
    }

    #[test]
    fn test_near_cancelling_totals_are_capped() {
        let counts = plan(&totals(&[("A", 1e10), ("B", -9.999999999e9)]), 20).unwrap();
        assert_eq!(counts["A"], 199);
        assert_eq!(counts["B"], 1);

        let counts = plan(&totals(&[("A", 1e10), ("B", -9.999999999e9)]), 1).unwrap();
        assert_eq!(counts["A"], 1);
    }
}
