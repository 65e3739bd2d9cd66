//! Vertex inputs and result tables for the CLI (angles in degrees at this boundary).

use anyhow::{bail, Context, Result};
use foldmatch::api::{pattern_by_name, Branch, Output, Vertex};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk vertex: `{ "angles_deg": [...], "lengths": [...] }` (lengths default to 1).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VertexFile {
    pub angles_deg: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lengths: Option<Vec<f64>>,
}

impl VertexFile {
    pub fn from_vertex(v: &Vertex) -> Self {
        Self {
            angles_deg: v.iter().map(|b| b.angle.to_degrees()).collect(),
            lengths: Some(v.iter().map(|b| b.length).collect()),
        }
    }

    pub fn into_vertex(self) -> Result<Vertex> {
        let lengths = match self.lengths {
            Some(l) if l.len() != self.angles_deg.len() => bail!(
                "{} lengths given for {} angles",
                l.len(),
                self.angles_deg.len()
            ),
            Some(l) => l,
            None => vec![1.0; self.angles_deg.len()],
        };
        Ok(Vertex::new(
            self.angles_deg
                .iter()
                .zip(lengths)
                .map(|(a, l)| Branch::new(a.to_radians(), l))
                .collect(),
        ))
    }
}

/// Resolve a built-in pattern name or read a JSON vertex file.
pub fn load_vertex(source: &str) -> Result<Vertex> {
    if let Some(v) = pattern_by_name(source) {
        return Ok(v);
    }
    let raw = fs::read(source).with_context(|| format!("reading vertex file {source}"))?;
    let file: VertexFile =
        serde_json::from_slice(&raw).with_context(|| format!("parsing vertex file {source}"))?;
    file.into_vertex()
}

/// One filled alignment, flattened for output.
#[derive(Clone, Debug, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub rotation_deg: f64,
    pub cost: f64,
    pub adjustments_deg: Vec<f64>,
    pub subset: Vec<usize>,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned_deg: Option<Vec<f64>>,
}

pub fn rows(outputs: &[Output]) -> Vec<ResultRow> {
    outputs
        .iter()
        .filter(|o| o.is_filled())
        .enumerate()
        .map(|(rank, o)| ResultRow {
            rank,
            rotation_deg: o.rotation.to_degrees(),
            cost: o.cost,
            adjustments_deg: o.angle_adjustments.iter().map(|a| a.to_degrees()).collect(),
            subset: o.subset.clone(),
            offset: o.offset,
            aligned_deg: o
                .vertex
                .as_ref()
                .map(|v| v.iter().map(|b| b.angle.to_degrees()).collect()),
        })
        .collect()
}

/// Write rows as JSON or CSV, chosen by the file extension.
pub fn write_rows(path: &Path, rows: &[ResultRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, rows),
        Some("json") => {
            fs::write(path, serde_json::to_vec_pretty(rows)?)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(())
        }
        other => bail!("unsupported output extension {other:?} (use .json or .csv)"),
    }
}

fn join(xs: &[f64]) -> String {
    xs.iter()
        .map(|x| format!("{x:.4}"))
        .collect::<Vec<_>>()
        .join(";")
}

fn write_csv(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let mut df = df!(
        "rank" => rows.iter().map(|r| r.rank as i64).collect::<Vec<_>>(),
        "rotation_deg" => rows.iter().map(|r| r.rotation_deg).collect::<Vec<_>>(),
        "cost" => rows.iter().map(|r| r.cost).collect::<Vec<_>>(),
        "offset" => rows.iter().map(|r| r.offset as i64).collect::<Vec<_>>(),
        "subset" => rows
            .iter()
            .map(|r| r.subset.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(";"))
            .collect::<Vec<_>>(),
        "adjustments_deg" => rows.iter().map(|r| join(&r.adjustments_deg)).collect::<Vec<_>>(),
        "aligned_deg" => rows
            .iter()
            .map(|r| r.aligned_deg.as_deref().map(join).unwrap_or_default())
            .collect::<Vec<_>>()
    )?;
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    tracing::info!(rows = df.height(), path = %path.display(), "wrote csv");
    Ok(())
}
