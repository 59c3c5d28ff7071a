// src/core/table.rs
// Generic table-to-records extraction: the first body row supplies the
// column headings, every body row (that one included) maps onto a record
// keyed by heading. Row filtering is the caller's business, not ours.

use std::error::Error;

use super::html::{
    attr_value_ci, has_attr_ci, inner_after_open_tag, next_cell_block_ci,
    next_tag_block_ci, strip_tags, to_lower,
};
use super::sanitize::normalize_entities;

/// One table cell's extracted value. Checkbox-style inputs carry a flag,
/// everything else is text.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Flag(bool),
}

impl CellValue {
    /// The textual content; flags render as empty.
    pub fn text(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Flag(_) => "",
        }
    }
}

/// Heading-keyed view of one physical table row. Keys keep their source
/// order and are not deduplicated.
#[derive(Clone, Debug, Default)]
pub struct RowRecord {
    cols: Vec<(String, CellValue)>,
}

impl RowRecord {
    pub fn push(&mut self, key: String, value: CellValue) {
        self.cols.push((key, value));
    }

    /// First column stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cols.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).map(CellValue::text)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, CellValue)> {
        self.cols.iter()
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

/// Column heading: rendered cell text with all whitespace removed
/// ("Car Model" → "CarModel", "Run 1" → "Run1").
fn heading_key(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Convert a table block into heading-keyed row records.
/// The heading row itself maps onto a record too; the aggregation layer
/// owns skipping it.
pub fn parse_table(table_html: &str) -> Result<Vec<RowRecord>, Box<dyn Error>> {
    let mut row_blocks: Vec<Vec<&str>> = Vec::new();

    let mut tr_pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(table_html, "<tr", "</tr>", tr_pos) {
        let tr = &table_html[tr_s..tr_e];
        tr_pos = tr_e;

        let mut cells = Vec::new();
        let mut cell_pos = 0usize;
        while let Some((c_s, c_e)) = next_cell_block_ci(tr, cell_pos) {
            cells.push(&tr[c_s..c_e]);
            cell_pos = c_e;
        }
        row_blocks.push(cells);
    }

    let first = row_blocks.first().ok_or("results table has no rows")?;
    let headings: Vec<String> = first
        .iter()
        .map(|block| heading_key(&cell_text(block)))
        .collect();

    let records = row_blocks
        .iter()
        .map(|cells| {
            let mut record = RowRecord::default();
            for (heading, block) in headings.iter().zip(cells.iter()) {
                record.push(heading.clone(), cell_value(block));
            }
            record
        })
        .collect();

    Ok(records)
}

/* ---------------- cell extraction ---------------- */

fn cell_text(block: &str) -> String {
    strip_tags(normalize_entities(&inner_after_open_tag(block)))
}

/// A cell with an embedded control reports the control's state instead of
/// its rendered text: checkbox → checked flag, other input → value
/// attribute, select → selected option.
fn cell_value(block: &str) -> CellValue {
    if let Some(opener) = input_opener(block) {
        let kind = attr_value_ci(opener, "type").unwrap_or_default();
        if kind.eq_ignore_ascii_case("checkbox") {
            return CellValue::Flag(has_attr_ci(opener, "checked"));
        }
        return CellValue::Text(attr_value_ci(opener, "value").unwrap_or_default());
    }
    if let Some(value) = select_value(block) {
        return CellValue::Text(value);
    }
    CellValue::Text(cell_text(block))
}

/// `<input …>` is a void tag; grab just its opener.
fn input_opener(block: &str) -> Option<&str> {
    let lc = to_lower(block);
    let start = lc.find("<input")?;
    let end = block[start..].find('>')? + start + 1;
    Some(&block[start..end])
}

/// Current value of an embedded `<select>`: the selected option, else the
/// first option (matching what the DOM reports).
fn select_value(block: &str) -> Option<String> {
    let (s_s, s_e) = next_tag_block_ci(block, "<select", "</select>", 0)?;
    let select = &block[s_s..s_e];

    let mut first: Option<String> = None;
    let mut pos = 0usize;
    while let Some((o_s, o_e)) = next_tag_block_ci(select, "<option", "</option>", pos) {
        let option = &select[o_s..o_e];
        pos = o_e;

        let opener_end = option.find('>').map(|i| i + 1).unwrap_or(option.len());
        let opener = &option[..opener_end];
        let value = attr_value_ci(opener, "value")
            .unwrap_or_else(|| strip_tags(normalize_entities(&inner_after_open_tag(option))));

        if has_attr_ci(opener, "selected") {
            return Some(value);
        }
        if first.is_none() {
            first = Some(value);
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <table border=1>
          <tr><td>Pos.</td><td>Driver</td><td>Car Model</td><td>Run 1</td></tr>
          <tr><td>1</td><td>Jane Doe</td><td>Miata</td><td>45.123</td></tr>
        </table>
    "#;

    #[test]
    fn headings_come_from_first_body_row() {
        let records = parse_table(TABLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("Pos."), Some("1"));
        assert_eq!(records[1].text("Driver"), Some("Jane Doe"));
        assert_eq!(records[1].text("CarModel"), Some("Miata"));
        assert_eq!(records[1].text("Run1"), Some("45.123"));
    }

    #[test]
    fn heading_row_maps_onto_itself() {
        let records = parse_table(TABLE).unwrap();
        assert_eq!(records[0].text("Driver"), Some("Driver"));
        assert_eq!(records[0].text("Run1"), Some("Run 1"));
    }

    #[test]
    fn short_rows_get_short_records() {
        let table = r#"
            <table>
              <tr><td>Pos.</td><td>Driver</td></tr>
              <tr><td colspan=2>&nbsp;</td></tr>
            </table>
        "#;
        let records = parse_table(table).unwrap();
        assert_eq!(records[1].len(), 1);
        assert_eq!(records[1].get("Driver"), None);
    }

    #[test]
    fn checkbox_cell_reports_checked_state() {
        let table = r#"
            <table>
              <tr><td>Paid</td><td>Driver</td></tr>
              <tr><td><input type="checkbox" checked></td><td>A</td></tr>
              <tr><td><input type="checkbox"></td><td>B</td></tr>
            </table>
        "#;
        let records = parse_table(table).unwrap();
        assert_eq!(records[1].get("Paid"), Some(&CellValue::Flag(true)));
        assert_eq!(records[2].get("Paid"), Some(&CellValue::Flag(false)));
    }

    #[test]
    fn text_input_cell_reports_value() {
        let table = r#"
            <table>
              <tr><td>Note</td></tr>
              <tr><td><input type="text" value="rerun granted"></td></tr>
            </table>
        "#;
        let records = parse_table(table).unwrap();
        assert_eq!(records[1].text("Note"), Some("rerun granted"));
    }

    #[test]
    fn select_cell_reports_selected_option() {
        let table = r#"
            <table>
              <tr><td>Heat</td></tr>
              <tr><td><select><option value="am">AM</option><option value="pm" selected>PM</option></select></td></tr>
              <tr><td><select><option value="am">AM</option><option value="pm">PM</option></select></td></tr>
            </table>
        "#;
        let records = parse_table(table).unwrap();
        assert_eq!(records[1].text("Heat"), Some("pm"));
        assert_eq!(records[2].text("Heat"), Some("am"));
    }

    #[test]
    fn empty_table_is_a_structural_error() {
        assert!(parse_table("<table></table>").is_err());
    }
}
