use crate::error::{MapError, Result};
use crate::model::spending::{CategoryTotals, SpendingEntry};

/// Sums spending per category code. Amounts are taken as-is, negative ones
/// included, and codes are not validated here.
pub fn aggregate(entries: &[SpendingEntry]) -> Result<CategoryTotals> {
    if entries.is_empty() {
        return Err(MapError::EmptyInput);
    }

    let mut totals = CategoryTotals::new();
    for entry in entries {
        *totals.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
    }
    Ok(totals)
}
