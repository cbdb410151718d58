//! Mechanical per-source column handling: display-name assembly,
//! derived columns, weekday cleanup for remote-day fields.

use chrono::Weekday;

use crate::config::NameColumns;
use crate::models::{PersonRecord, Row};
use crate::normalize::normalize;

/// Assemble a display name from one or several columns, null cells
/// treated as empty. Concatenated parts are joined with single spaces.
pub fn display_name(row: &Row, cols: &NameColumns) -> String {
    let parts: Vec<&str> = cols
        .columns()
        .iter()
        .filter_map(|c| row.get(*c).and_then(|v| v.as_deref()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(" ")
}

/// Build a [`PersonRecord`] from a raw row: display name per the
/// source's name columns, normalized key, optional source identifier.
pub fn person_record(row: &Row, cols: &NameColumns, id_column: Option<&str>) -> PersonRecord {
    let display = display_name(row, cols);
    let key = normalize(&display);
    let source_id = id_column
        .and_then(|c| row.get(c))
        .and_then(|v| v.clone())
        .filter(|s| !s.trim().is_empty());
    PersonRecord {
        display_name: display,
        normalized_key: key,
        source_id,
        fields: row.clone(),
    }
}

/// Derive a department label from tag substrings embedded in an
/// employee id ("GH-OP-031" carries an operations tag). A null id
/// stays null; an id with no known tag gets the empty label.
#[derive(Debug, Clone)]
pub struct DepartmentRule {
    pub column: String,
    pub output: String,
    pub tags: Vec<(String, String)>,
}

impl DepartmentRule {
    /// The tag scheme the employee master list uses.
    pub fn standard() -> Self {
        Self {
            column: "employee_id".into(),
            output: "department".into(),
            tags: vec![
                ("OP".into(), "Operation".into()),
                ("SC".into(), "Service Center".into()),
                ("TC".into(), "Training Center".into()),
            ],
        }
    }

    pub fn derive(&self, id: Option<&str>) -> Option<String> {
        let id = id?.to_uppercase();
        for (tag, label) in &self.tags {
            if id.contains(tag.as_str()) {
                return Some(label.clone());
            }
        }
        Some(String::new())
    }

    pub fn apply(&self, rows: &mut [Row]) {
        for row in rows.iter_mut() {
            let derived = self.derive(row.get(&self.column).and_then(|v| v.as_deref()));
            row.insert(self.output.clone(), derived);
        }
    }
}

/// Parse a free-text weekday cell ("monday", "Tue") into a canonical
/// full day name. `None` for anything unparseable.
pub fn canonical_weekday(raw: &str) -> Option<&'static str> {
    let day: Weekday = raw.trim().parse().ok()?;
    Some(match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    })
}

/// Canonicalize the given remote-day columns in place. Unparseable
/// values become explicit nulls; nulls stay null.
pub fn canonicalize_remote_days(row: &mut Row, columns: &[&str]) {
    for col in columns {
        if let Some(cell) = row.get_mut(*col) {
            if let Some(raw) = cell.as_deref() {
                match canonical_weekday(raw) {
                    Some(day) => *cell = Some(day.to_string()),
                    None => {
                        log::warn!("unparseable weekday in '{}': {:?}", col, raw);
                        *cell = None;
                    }
                }
            }
        }
    }
}
