use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use polars::prelude::*;
use tempfile::NamedTempFile;

use crate::error::LcvError;
use crate::grid::GcpGrid;
use crate::input::SummaryVectors;
use crate::types::LcvOutput;

/// Column names of an LCV input table.
#[derive(Debug, Clone)]
pub struct SummaryColumns {
    pub ell: String,
    pub z1: String,
    pub z2: String,
    /// Regression weights; `1 / max(1, ell)` when absent.
    pub weights: Option<String>,
}

impl Default for SummaryColumns {
    fn default() -> Self {
        Self {
            ell: "L2".to_string(),
            z1: "Z1".to_string(),
            z2: "Z2".to_string(),
            weights: None,
        }
    }
}

pub fn read_table(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext == "gz" || ext == "bz2" {
        let tmp = decompress_to_temp(path, &ext)?;
        return read_table_plain(tmp.path());
    }

    read_table_plain(path)
}

fn read_table_plain(path: &Path) -> Result<DataFrame> {
    let delimiter = detect_delimiter(path)?;
    if delimiter == b' ' {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        return read_table_whitespace(BufReader::new(file));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(delimiter)
                .with_null_values(Some(NullValues::AllColumns(vec![
                    "".into(),
                    "NA".into(),
                    "NaN".into(),
                    ".".into(),
                ])))
                .with_missing_is_null(true),
        )
        .with_ignore_errors(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("read {}", path.display()))?;
    Ok(df)
}

fn read_table_whitespace<R: Read>(reader: R) -> Result<DataFrame> {
    let mut reader = BufReader::new(reader);
    let mut header_line = String::new();
    reader.read_line(&mut header_line)?;
    if header_line.trim().is_empty() {
        return Err(anyhow::anyhow!("empty file"));
    }
    let headers: Vec<&str> = header_line.split_whitespace().collect();
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        for col in columns.iter_mut() {
            col.push(parts.next().and_then(normalize_missing_token));
        }
    }

    let df: DataFrame = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new((*name).into(), values))
        .collect();
    Ok(df)
}

fn detect_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut first = String::new();
    reader.read_line(&mut first)?;
    if first.contains('\t') {
        return Ok(b'\t');
    }
    if first.contains(',') {
        return Ok(b',');
    }
    Ok(b' ')
}

fn decompress_to_temp(path: &Path, ext: &str) -> Result<NamedTempFile> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut decoder: Box<dyn Read> = match ext {
        "gz" => Box::new(GzDecoder::new(file)),
        "bz2" => Box::new(BzDecoder::new(file)),
        _ => Box::new(file),
    };
    let mut tmp = NamedTempFile::new()?;
    std::io::copy(&mut decoder, &mut tmp)?;
    Ok(tmp)
}

fn normalize_missing_token(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let upper = trimmed.to_ascii_uppercase();
    if trimmed.is_empty() || upper == "NA" || upper == "NAN" || trimmed == "." {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| LcvError::Argument(format!("missing required column {name}")))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = series.f64()?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Reads LD scores and both traits' Z-statistics from a table.
///
/// Rows with a missing or non-finite value in any used column are dropped and
/// counted in the second return value.
pub fn read_summary_vectors(path: &Path, columns: &SummaryColumns) -> Result<(SummaryVectors, usize)> {
    let df = read_table(path).with_context(|| format!("read {}", path.display()))?;
    let ell = float_column(&df, &columns.ell)?;
    let z1 = float_column(&df, &columns.z1)?;
    let z2 = float_column(&df, &columns.z2)?;
    let weights = columns
        .weights
        .as_deref()
        .map(|name| float_column(&df, name))
        .transpose()?;

    let mut kept = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let mut dropped = 0usize;
    for i in 0..ell.len() {
        let w = weights.as_ref().map(|w| w[i]).unwrap_or(1.0);
        if ell[i].is_finite() && z1[i].is_finite() && z2[i].is_finite() && w.is_finite() {
            kept.0.push(ell[i]);
            kept.1.push(z1[i]);
            kept.2.push(z2[i]);
            kept.3.push(w);
        } else {
            dropped += 1;
        }
    }
    let weights = weights.map(|_| kept.3);
    let vectors = SummaryVectors::new(kept.0, kept.1, kept.2, weights)?;
    Ok((vectors, dropped))
}

/// Writes the vectors as a tab-separated table with `L2 Z1 Z2 WEIGHT`
/// columns, gzip-compressed when `gzip` is set.
pub fn write_summary_vectors(data: &SummaryVectors, path: &Path, gzip: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer: Box<dyn Write> = if gzip {
        Box::new(GzEncoder::new(BufWriter::new(file), Compression::default()))
    } else {
        Box::new(BufWriter::new(file))
    };
    writeln!(writer, "L2\tZ1\tZ2\tWEIGHT")?;
    for i in 0..data.len() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            data.ell[i], data.z1[i], data.z2[i], data.weights[i]
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_lcv_json(out: &LcvOutput, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    let diagnostics = out
        .diagnostics
        .iter()
        .map(|d| format!("\"{}\"", escape_json(&d.to_string())))
        .collect::<Vec<_>>()
        .join(",");
    let json = format!(
        "{{\"zsc_gcp\":{},\"pval_gcpzero_2tailed\":{},\"gcp_pm\":{},\"gcp_pse\":{},\"rho_est\":{},\"rho_err\":{},\"pval_fullycausal\":{},\"h2_zscore\":{},\"intercept\":{},\"likelihood\":{},\"diagnostics\":[{}]}}",
        format_number(out.zsc_gcp),
        format_number(out.pval_gcpzero_2tailed),
        format_number(out.gcp_pm),
        format_number(out.gcp_pse),
        format_number(out.rho_est),
        format_number(out.rho_err),
        format_vec(&out.pval_fullycausal),
        format_vec(&out.h2_zscore),
        format_vec(&out.intercept),
        format_vec(&out.likelihood),
        diagnostics,
    );
    writeln!(file, "{json}")?;
    Ok(())
}

/// Writes the likelihood curve as `gcp<TAB>likelihood` rows.
pub fn write_likelihood(out: &LcvOutput, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "gcp\tlikelihood")?;
    for (x, l) in GcpGrid::new().values().iter().zip(&out.likelihood) {
        writeln!(file, "{x:.2}\t{l}")?;
    }
    Ok(())
}

fn format_vec(values: &[f64]) -> String {
    let vals = values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{vals}]")
}

fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.15}")
    } else {
        "null".to_string()
    }
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
