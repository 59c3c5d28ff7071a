// src/data.rs
//
// Display-ready table data derived from the results model: the standings
// rows the CLI prints or exports, and the class summary listing. The model
// itself stays untouched; these are projections.

use crate::config::options::ClassSelector;
use crate::model::{Driver, ResultsModel};
use crate::stats;

const STANDINGS_HEADERS: [&str; 8] =
    ["Pos.", "Driver", "#", "Class", "Car Model", "Runs", "Best", "Last"];

pub fn standings_headers() -> Vec<String> {
    STANDINGS_HEADERS.iter().map(|h| s!(*h)).collect()
}

/// Column index of the class code in a standings row (per-class export
/// groups on it).
pub const STANDINGS_CLASS_COL: usize = 3;

/// One driver, flattened for display: identity columns plus the derived
/// run statistics.
pub fn standings_row(driver: &Driver) -> Vec<String> {
    vec![
        driver.position_label(),
        driver.name.clone(),
        driver.number.clone(),
        driver.class.clone(),
        driver.car.clone(),
        stats::count_runs(&driver.runs).to_string(),
        stats::fastest_run(&driver.runs),
        stats::latest_run(&driver.runs),
    ]
}

pub fn standings_rows(model: &ResultsModel, selector: &ClassSelector) -> Vec<Vec<String>> {
    match selector {
        ClassSelector::All => model.drivers.iter().map(standings_row).collect(),
        ClassSelector::One(code) => model
            .drivers_in_class(code)
            .map(standings_row)
            .collect(),
    }
}

pub fn class_summary_headers() -> Vec<String> {
    vec![s!("Class"), s!("Name"), s!("Entries")]
}

/// `code, full name, entrant count` per class, in code order.
pub fn class_summary_rows(model: &ResultsModel) -> Vec<Vec<String>> {
    model
        .classes
        .values()
        .map(|info| vec![info.alias.clone(), info.name.clone(), info.count.to_string()])
        .collect()
}
