// src/specs/results.rs
// Event results page: one big standings table where a driver's entry may
// span two physical rows. The trailing row carries the extended runs and
// has no marker of its own; we classify rows instead of trusting adjacency
// blindly.

use std::collections::BTreeMap;
use std::error::Error;

use crate::config::consts::RESULTS_TABLE_INDEX;
use crate::core::html::nth_table_block_ci;
use crate::core::sanitize::strip_line_breaks;
use crate::core::table::{self, RowRecord};
use crate::model::{class_full_name, ClassInfo, Driver, ResultsModel, Run};

/// Parse a full results page: locate the standings table and build the model.
pub fn parse_doc(html_doc: &str) -> Result<ResultsModel, Box<dyn Error>> {
    let table = nth_table_block_ci(html_doc, RESULTS_TABLE_INDEX)
        .ok_or("results table not found")?;
    let records = table::parse_table(table)?;
    Ok(parse_results(&records))
}

/* ---------------- row shaping ---------------- */

/// Typed view of one physical row: the known identity columns plus the
/// ordered run columns, keyed by their recovered run numbers.
#[derive(Debug, Default)]
struct RowFields {
    driver: Option<String>,
    number: Option<String>,
    class: Option<String>,
    car: Option<String>,
    pos: Option<String>,
    runs: Vec<(u32, String)>,
}

#[derive(Debug, PartialEq, Eq)]
enum RowKind {
    Data,
    Continuation,
    Separator,
}

fn shape_row(record: &RowRecord) -> RowFields {
    let mut fields = RowFields::default();
    for (key, value) in record.iter() {
        match key.as_str() {
            "Driver" => fields.driver = nonblank(value.text()),
            "#" => fields.number = nonblank(value.text()),
            "Class" => fields.class = nonblank(value.text()),
            "CarModel" => fields.car = nonblank(value.text()),
            "Pos." => fields.pos = nonblank(value.text()),
            k if k.contains("Run") => {
                let number = run_number(k)
                    .unwrap_or(fields.runs.len() as u32 + 1);
                fields.runs.push((number, value.text().to_string()));
            }
            _ => {}
        }
    }
    fields
}

fn nonblank(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Recover a run number from a column key: strip the `Run` and `..`
/// decorations, keep the digits. `Run1` → 1, `Run..3` → 3.
fn run_number(key: &str) -> Option<u32> {
    let stripped = key.replace("Run", "").replace("..", "");
    let digits: String = stripped.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// A data row names its driver. A continuation row doesn't, but still has
/// run entries. Anything else is a section break or repeated header.
fn classify(fields: &RowFields) -> RowKind {
    if fields.driver.is_some() {
        return RowKind::Data;
    }
    if fields.runs.iter().any(|(_, raw)| !raw.trim().is_empty()) {
        return RowKind::Continuation;
    }
    RowKind::Separator
}

/* ---------------- run parsing ---------------- */

/// Decode one run cell: `45.123`, `44.500+1`, `45.800+dnf`, `dnf`, or empty.
/// The cone count rides behind the `+`; a `dnf` tail carries none. No
/// numeric validation of the time text here — stats owns that.
pub fn parse_run(number: u32, extended: bool, raw: &str) -> Run {
    let dnf = raw.contains("dnf");
    let (time_part, cones) = match raw.split_once('+') {
        Some((time, tail)) => (time, cone_count(tail)),
        None => (raw, 0),
    };
    Run {
        number,
        extended,
        time: strip_line_breaks(time_part),
        dnf,
        cones,
        raw: raw.to_string(),
    }
}

fn cone_count(tail: &str) -> u32 {
    tail.trim().parse().unwrap_or(0)
}

/* ---------------- run assembly ---------------- */

/// A driver's runs in two explicit phases: the numbered primary runs and
/// the extended runs off the continuation row.
struct RunSet {
    primary: Vec<Run>,
    extended: Vec<Run>,
}

impl RunSet {
    /// Primary first, then extended, each in encounter order.
    fn merged(self) -> Vec<Run> {
        let mut runs = self.primary;
        runs.extend(self.extended);
        runs
    }
}

fn assemble_runs(primary: &RowFields, continuation: Option<&RowFields>) -> RunSet {
    let primary_runs = primary
        .runs
        .iter()
        .map(|(n, raw)| parse_run(*n, false, raw))
        .collect();
    let extended_runs = continuation
        .map(|c| {
            c.runs
                .iter()
                .map(|(n, raw)| parse_run(*n, true, raw))
                .collect()
        })
        .unwrap_or_default();
    RunSet { primary: primary_runs, extended: extended_runs }
}

/* ---------------- aggregation ---------------- */

/// Single forward pass over the row records. Record 0 is the heading row
/// mapped onto itself and is always skipped. A bad row is logged and
/// stepped over; it never aborts the pass.
pub fn parse_results(records: &[RowRecord]) -> ResultsModel {
    let mut model = ResultsModel::default();

    let mut i = 1usize;
    while i < records.len() {
        let fields = shape_row(&records[i]);
        if classify(&fields) != RowKind::Data {
            i += 1;
            continue;
        }

        // Extended runs ride on the next row, unmarked. Consume it only
        // when it actually looks like a continuation.
        let continuation = records
            .get(i + 1)
            .map(shape_row)
            .filter(|f| classify(f) == RowKind::Continuation);
        let consumed = if continuation.is_some() { 2 } else { 1 };

        let (trophy, position) = parse_position(fields.pos.as_deref().unwrap_or(""));
        let runs = assemble_runs(&fields, continuation.as_ref()).merged();
        let class = fields.class.clone().unwrap_or_default();

        if class.is_empty() {
            loge!("Results: row {} has no class, keeping driver anyway", i);
        } else {
            bump_class(&mut model.classes, &class);
        }

        model.drivers.push(Driver {
            name: fields.driver.unwrap_or_default(),
            number: fields.number.unwrap_or_default(),
            class,
            car: fields.car.unwrap_or_default(),
            runs,
            trophy,
            position,
        });
        i += consumed;
    }

    model
}

/// `3` → (false, 3); `1T` → (true, 1). Unparsable positions are logged
/// and come back as 0 so the row survives.
fn parse_position(pos: &str) -> (bool, u32) {
    let trophy = pos.contains('T');
    let digits = pos.replace('T', "");
    match digits.trim().parse() {
        Ok(v) => (trophy, v),
        Err(_) => {
            if !pos.trim().is_empty() {
                loge!("Results: unparsable position {:?}", pos);
            }
            (trophy, 0)
        }
    }
}

fn bump_class(classes: &mut BTreeMap<String, ClassInfo>, code: &str) {
    if let Some(info) = classes.get_mut(code) {
        info.count += 1;
        return;
    }
    classes.insert(
        code.to_string(),
        ClassInfo {
            count: 1,
            name: s!(class_full_name(code)),
            alias: s!(code),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::{CellValue, RowRecord};

    fn record(cols: &[(&str, &str)]) -> RowRecord {
        let mut r = RowRecord::default();
        for (k, v) in cols {
            r.push(s!(*k), CellValue::Text(s!(*v)));
        }
        r
    }

    fn heading_record() -> RowRecord {
        record(&[
            ("Pos.", "Pos."), ("Class", "Class"), ("#", "#"),
            ("Driver", "Driver"), ("CarModel", "Car Model"),
            ("Run1", "Run 1"), ("Run2", "Run 2"),
        ])
    }

    #[test]
    fn parse_run_plain_time() {
        let run = parse_run(1, false, "45.123");
        assert_eq!(run.time, "45.123");
        assert!(!run.dnf);
        assert_eq!(run.cones, 0);
        assert_eq!(run.raw, "45.123");
    }

    #[test]
    fn parse_run_with_cones() {
        let run = parse_run(2, false, "44.500+1");
        assert_eq!(run.time, "44.500");
        assert!(!run.dnf);
        assert_eq!(run.cones, 1);
    }

    #[test]
    fn parse_run_dnf_variants() {
        assert!(parse_run(1, false, "dnf").dnf);
        assert!(parse_run(1, false, "45.800+dnf").dnf);
        let run = parse_run(1, false, "45.800+dnf");
        assert_eq!(run.time, "45.800");
        assert_eq!(run.cones, 0);
    }

    #[test]
    fn parse_run_strips_line_breaks() {
        let run = parse_run(1, false, "45.123\r\n");
        assert_eq!(run.time, "45.123");
        assert_eq!(run.raw, "45.123\r\n");
    }

    #[test]
    fn parse_run_keeps_non_numeric_time_text() {
        let run = parse_run(1, false, "n/a");
        assert_eq!(run.time, "n/a");
    }

    #[test]
    fn display_round_trips_well_formed_entries() {
        for raw in ["45.123", "44.500+1", "50.2+3"] {
            let run = parse_run(1, false, raw);
            assert_eq!(crate::stats::display_run(&run), raw);
        }
    }

    #[test]
    fn run_number_strips_decorations() {
        assert_eq!(run_number("Run1"), Some(1));
        assert_eq!(run_number("Run..3"), Some(3));
        assert_eq!(run_number("Run12.."), Some(12));
        assert_eq!(run_number("Run"), None);
    }

    #[test]
    fn classify_kinds() {
        let data = shape_row(&record(&[("Driver", "Jane"), ("Run1", "45.1")]));
        assert_eq!(classify(&data), RowKind::Data);

        let cont = shape_row(&record(&[("Run1", "46.0"), ("Run2", "")]));
        assert_eq!(classify(&cont), RowKind::Continuation);

        let sep = shape_row(&record(&[("Pos.", ""), ("Run1", "")]));
        assert_eq!(classify(&sep), RowKind::Separator);

        let blank_driver = shape_row(&record(&[("Driver", "  "), ("Run1", "46.0")]));
        assert_eq!(classify(&blank_driver), RowKind::Continuation);
    }

    #[test]
    fn aggregates_single_row_driver() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "3"), ("Class", "n"), ("#", "42"),
                ("Driver", "Jane Doe"), ("CarModel", "Miata"),
                ("Run1", "45.123"), ("Run2", "44.500+1"),
            ]),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.drivers.len(), 1);

        let d = &model.drivers[0];
        assert_eq!(d.name, "Jane Doe");
        assert_eq!(d.number, "42");
        assert_eq!(d.car, "Miata");
        assert_eq!(d.position, 3);
        assert!(!d.trophy);
        assert_eq!(d.runs.len(), 2);
        assert!(!d.runs[1].extended);
        assert_eq!(d.runs[1].cones, 1);

        let n = &model.classes["n"];
        assert_eq!(n.count, 1);
        assert_eq!(n.name, "novice");
        assert_eq!(n.alias, "n");
    }

    #[test]
    fn trophy_position_is_split_out() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "1T"), ("Class", "es"), ("#", "7"),
                ("Driver", "Ro Vasquez"), ("CarModel", "BRZ"),
                ("Run1", "43.001"),
            ]),
        ];
        let model = parse_results(&rows);
        let d = &model.drivers[0];
        assert!(d.trophy);
        assert_eq!(d.position, 1);
        assert_eq!(d.position_label(), "1T");
    }

    #[test]
    fn continuation_row_becomes_extended_runs() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "2"), ("Class", "er"), ("#", "11"),
                ("Driver", "Sam Lee"), ("CarModel", "Corvette"),
                ("Run1", "41.900"), ("Run2", "41.500"),
            ]),
            record(&[("Run1", "dnf"), ("Run2", "")]),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.drivers.len(), 1);

        let runs = &model.drivers[0].runs;
        assert_eq!(runs.len(), 4);
        assert!(runs[2].extended);
        assert_eq!(runs[2].number, 1);
        assert!(runs[2].dnf);
        assert_eq!(runs[2].cones, 0);
    }

    #[test]
    fn separator_rows_are_skipped_not_consumed() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "1"), ("Class", "n"), ("#", "1"),
                ("Driver", "A"), ("CarModel", "M1"), ("Run1", "50.0"),
            ]),
            record(&[("Pos.", "")]),
            record(&[
                ("Pos.", "2"), ("Class", "n"), ("#", "2"),
                ("Driver", "B"), ("CarModel", "M2"), ("Run1", "51.0"),
            ]),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.drivers.len(), 2);
        assert_eq!(model.classes["n"].count, 2);
    }

    #[test]
    fn next_driver_row_is_not_eaten_as_continuation() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "1"), ("Class", "n"), ("#", "1"),
                ("Driver", "A"), ("CarModel", "M1"), ("Run1", "50.0"),
            ]),
            record(&[
                ("Pos.", "2"), ("Class", "n"), ("#", "2"),
                ("Driver", "B"), ("CarModel", "M2"), ("Run1", "51.0"),
            ]),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.drivers.len(), 2);
        assert_eq!(model.drivers[0].runs.len(), 1);
        assert_eq!(model.drivers[1].runs.len(), 1);
    }

    #[test]
    fn class_counts_accumulate_and_keep_first_names() {
        let driver = |pos: &str, class: &str, name: &str| {
            record(&[
                ("Pos.", pos), ("Class", class), ("#", "9"),
                ("Driver", name), ("CarModel", "GTI"), ("Run1", "50.0"),
            ])
        };
        let rows = vec![
            heading_record(),
            driver("1", "n", "A"),
            driver("2", "es", "B"),
            driver("3", "n", "C"),
            driver("4", "x1", "D"),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.classes["n"].count, 2);
        assert_eq!(model.classes["es"].count, 1);
        assert_eq!(model.classes["es"].name, "experienced street");
        // unknown codes pass through as their own display name
        assert_eq!(model.classes["x1"].name, "x1");
    }

    #[test]
    fn bad_position_keeps_the_row() {
        let rows = vec![
            heading_record(),
            record(&[
                ("Pos.", "??"), ("Class", "n"), ("#", "5"),
                ("Driver", "E"), ("CarModel", "RX-8"), ("Run1", "50.0"),
            ]),
        ];
        let model = parse_results(&rows);
        assert_eq!(model.drivers.len(), 1);
        assert_eq!(model.drivers[0].position, 0);
    }

    #[test]
    fn parse_doc_takes_the_fourth_table() {
        let decoy = "<table><tr><td>banner</td></tr></table>";
        let results = r#"
            <table>
              <tr><td>Pos.</td><td>Class</td><td>#</td><td>Driver</td><td>Car Model</td><td>Run 1</td></tr>
              <tr><td>1</td><td>n</td><td>42</td><td>Jane Doe</td><td>Miata</td><td>45.123</td></tr>
            </table>
        "#;
        let doc = join!(decoy, decoy, decoy, results);
        let model = parse_doc(&doc).unwrap();
        assert_eq!(model.drivers.len(), 1);
        assert_eq!(model.drivers[0].name, "Jane Doe");
    }

    #[test]
    fn parse_doc_fails_without_the_table() {
        let doc = "<table><tr><td>only one</td></tr></table>";
        assert!(parse_doc(doc).is_err());
    }
}
