//! The in-memory Result object: a plain table of sampled values keyed by
//! node/branch name, plus a plain-text renderer. No external serialization
//! format is owned here — a caller wanting Parquet, CSV, or anything else
//! sits on top of this table.
use faer::c64;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt::Write as _;

/// One time- or frequency-domain trajectory: a sequence of sample points,
/// each a name-keyed map of sampled values.
#[derive(Debug, Clone)]
pub struct ResultTable {
    /// Name of the sweep variable ("time" or "frequency").
    pub sweep_name: &'static str,
    pub sweep_values: Vec<f64>,
    pub rows: Vec<HashMap<String, f64>>,
}

impl ResultTable {
    pub fn from_transient(data: &[(f64, HashMap<String, f64>)]) -> Self {
        let sweep_values = data.iter().map(|(t, _)| *t).collect();
        let rows = data.iter().map(|(_, row)| row.clone()).collect();
        ResultTable {
            sweep_name: "time",
            sweep_values,
            rows,
        }
    }

    /// Flattens a complex AC sweep into magnitude (dB) and phase (degrees)
    /// columns, one pair per signal, per §6's Result object contract.
    pub fn from_ac(data: &[(f64, HashMap<String, c64>)]) -> Self {
        let sweep_values = data.iter().map(|(f, _)| *f).collect();
        let rows = data
            .iter()
            .map(|(_, row)| {
                let mut flattened = HashMap::with_capacity(row.len() * 2);
                for (name, value) in row {
                    let mag_db = 20.0 * value.norm().log10();
                    let phase_deg = value.arg() * 180.0 / PI;
                    flattened.insert(format!("{name}_mag_db"), mag_db);
                    flattened.insert(format!("{name}_phase_deg"), phase_deg);
                }
                flattened
            })
            .collect();
        ResultTable {
            sweep_name: "frequency",
            sweep_values,
            rows,
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = self
            .rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        headers.sort();
        headers
    }

    /// Renders the table as a fixed-width plain-text grid, the sweep column
    /// first, everything else alphabetical.
    pub fn to_plain_text(&self) -> String {
        let headers = self.headers();
        let mut out = String::new();

        let _ = write!(out, "{:<18}", self.sweep_name);
        for header in &headers {
            let _ = write!(out, "{header:<18}");
        }
        out.push('\n');
        let rule_width = (headers.len() + 1) * 18;
        let _ = writeln!(out, "{:-<width$}", "", width = rule_width);

        for (sweep_value, row) in self.sweep_values.iter().zip(&self.rows) {
            let _ = write!(out, "{sweep_value:<18.6e}");
            for header in &headers {
                match row.get(header) {
                    Some(value) => {
                        let _ = write!(out, "{value:<18.6e}");
                    }
                    None => {
                        let _ = write!(out, "{:<18}", "N/A");
                    }
                }
            }
            out.push('\n');
        }

        out
    }
}
