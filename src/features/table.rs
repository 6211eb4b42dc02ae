//! Feature rows and their CSV persistence.

use crate::search::TemplateMatch;
use crate::util::{FrameMatchError, FrameMatchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placement of one segment in one asset folder.
///
/// A folder without a match is still present, as an all-zero row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Folder basename.
    pub id: String,
    /// Template width.
    pub w: usize,
    /// Template height.
    pub h: usize,
    /// Bottom-right x.
    pub btrx: usize,
    /// Bottom-right y.
    pub btry: usize,
    /// Top-left x.
    pub tltx: usize,
    /// Top-left y.
    pub tlty: usize,
}

impl FeatureRow {
    /// All-zero sentinel row for a folder without a usable match.
    pub fn zero(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Row populated from a successful match.
    pub fn from_match(id: impl Into<String>, found: &TemplateMatch) -> Self {
        let top_left = found.top_left();
        let bottom_right = found.bottom_right();
        Self {
            id: id.into(),
            w: found.template_width(),
            h: found.template_height(),
            btrx: bottom_right.x,
            btry: bottom_right.y,
            tltx: top_left.x,
            tlty: top_left.y,
        }
    }

    /// Returns true for the sentinel row.
    pub fn is_zero(&self) -> bool {
        self.geometry() == [0; 6]
    }

    /// Returns `(w, h, btrx, btry, tltx, tlty)`.
    pub fn geometry(&self) -> [usize; 6] {
        [self.w, self.h, self.btrx, self.btry, self.tltx, self.tlty]
    }
}

/// Ordered rows for one segment, one per enumerated folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureTable {
    prefix: String,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Creates a table with column prefix `prefix`.
    pub fn new(prefix: impl Into<String>, rows: Vec<FeatureRow>) -> Self {
        Self {
            prefix: prefix.into(),
            rows,
        }
    }

    /// Returns the column prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the rows in folder order.
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Returns the row for folder `id`.
    pub fn row(&self, id: &str) -> Option<&FeatureRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Returns the header: `id` followed by the six prefixed geometry columns.
    pub fn header(&self) -> [String; 7] {
        let p = &self.prefix;
        [
            "id".to_owned(),
            format!("{p}_w"),
            format!("{p}_h"),
            format!("{p}_btrx"),
            format!("{p}_btry"),
            format!("{p}_tltx"),
            format!("{p}_tlty"),
        ]
    }

    /// Writes the table as CSV, replacing any existing file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> FrameMatchResult<()> {
        let path = path.as_ref();
        let csv_err = |err: csv::Error| FrameMatchError::Csv {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;
        writer.write_record(self.header()).map_err(csv_err)?;
        for row in &self.rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer
            .flush()
            .map_err(|err| FrameMatchError::io(path, &err))?;
        Ok(())
    }

    /// Reads a table previously written by [`FeatureTable::write_csv`].
    ///
    /// The prefix is recovered from the second header column.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> FrameMatchResult<Self> {
        let path = path.as_ref();
        let csv_err = |reason: String| FrameMatchError::Csv {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::Reader::from_path(path).map_err(|err| csv_err(err.to_string()))?;
        let headers = reader.headers().map_err(|err| csv_err(err.to_string()))?;
        let prefix = headers
            .get(1)
            .and_then(|col| col.strip_suffix("_w"))
            .ok_or_else(|| csv_err("missing <prefix>_w column".to_owned()))?
            .to_owned();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| csv_err(err.to_string()))?;
            let row: FeatureRow = record
                .deserialize(None)
                .map_err(|err| csv_err(err.to_string()))?;
            rows.push(row);
        }
        Ok(Self { prefix, rows })
    }
}
