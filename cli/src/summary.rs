use spendcity_core::MapLayout;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Building")]
    building: String,
    #[tabled(rename = "Spend")]
    spend: String,
    #[tabled(rename = "Requested")]
    requested: u32,
    #[tabled(rename = "Placed")]
    placed: u32,
    #[tabled(rename = "Failed")]
    failed: u32,
}

pub fn allocation_table(layout: &MapLayout) -> String {
    let rows: Vec<AllocationRow> = layout
        .report
        .categories
        .iter()
        .map(|(category, placement)| AllocationRow {
            category: category.clone(),
            building: placement.building_type.to_string(),
            spend: format!("{:.2}", layout.totals.get(category).copied().unwrap_or(0.0)),
            requested: placement.requested,
            placed: placement.placed,
            failed: placement.failed,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
