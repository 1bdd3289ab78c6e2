use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use csv::{ReaderBuilder, WriterBuilder};
use eps_core::errors::{EpsError, ErrorInfo};
use eps_core::{BindingPath, ModelStore, ParamValue, RngHandle};

use crate::binding::FieldBinding;
use crate::group::BindingGroup;
use crate::registry::SamplerRegistry;

/// Reserved first-cell names marking the artifact-name record. Matched
/// case-insensitively; the record holds output file names, not a binding.
pub const RESERVED_NAME_COLUMNS: [&str; 2] = ["idf_name", "idf_names"];

/// Physical encodings of the parameter table, chosen by file extension.
///
/// Both encode the same matrix: one record per binding, first cell the
/// rendered path, remaining cells the string-formatted values of cases
/// `0..N-1`, plus the optional reserved artifact-name record.
#[derive(Debug, Clone, PartialEq)]
pub enum TableFormat {
    /// Comma-separated text (`.csv`, and the historical `.ged` extension).
    Csv(PathBuf),
    /// Compact binary matrix via `bincode`.
    Binary(PathBuf),
}

impl TableFormat {
    /// Picks the encoding from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") | Some("ged") => TableFormat::Csv(path),
            _ => TableFormat::Binary(path),
        }
    }

    /// The underlying file path.
    pub fn path(&self) -> &Path {
        match self {
            TableFormat::Csv(path) | TableFormat::Binary(path) => path,
        }
    }
}

/// Writes a group's parameter matrix, with optional explicit artifact names.
///
/// `file_names`, when given, must hold exactly one name per case; a
/// mismatch would desynchronize names from cases on reload, so it is
/// rejected up front.
pub fn save_table(
    group: &BindingGroup,
    file_names: Option<&[String]>,
    target: &TableFormat,
) -> Result<(), EpsError> {
    let mut rows: Vec<Vec<String>> = group
        .bindings()
        .iter()
        .map(|binding| {
            let mut row = Vec::with_capacity(group.param_count() + 1);
            row.push(binding.path().to_string());
            row.extend(binding.params().iter().map(ToString::to_string));
            row
        })
        .collect();
    if let Some(names) = file_names {
        if names.len() != group.param_count() {
            return Err(EpsError::Table(
                ErrorInfo::new("name-count-mismatch", "one artifact name per case required")
                    .with_context("names", names.len().to_string())
                    .with_context("cases", group.param_count().to_string()),
            ));
        }
        let mut row = Vec::with_capacity(names.len() + 1);
        row.push(RESERVED_NAME_COLUMNS[0].to_string());
        row.extend(names.iter().cloned());
        rows.push(row);
    }
    match target {
        TableFormat::Csv(path) => write_csv(path, &rows),
        TableFormat::Binary(path) => write_binary(path, &rows),
    }
}

/// Reads a parameter table back into a group bound to `model`.
///
/// Every non-reserved record is resolved against the model (failing fast on
/// unresolvable paths, which indicate a corrupted or incompatible file) and
/// bound to the `enumerate` sampler seeded with exactly the stored values,
/// so reloading reproduces the saved values verbatim even though the
/// original sampler identity is lost. Names in the reserved record are
/// suffixed with the model's artifact extension when missing.
pub fn load_table(
    model: &dyn ModelStore,
    registry: &SamplerRegistry,
    source: &TableFormat,
) -> Result<(BindingGroup, Option<Vec<String>>), EpsError> {
    let rows = match source {
        TableFormat::Csv(path) => read_csv(path)?,
        TableFormat::Binary(path) => read_binary(path)?,
    };
    let mut bindings = Vec::new();
    let mut file_names = None;
    for row in rows {
        let Some((head, values)) = row.split_first() else {
            continue;
        };
        if RESERVED_NAME_COLUMNS
            .iter()
            .any(|reserved| head.eq_ignore_ascii_case(reserved))
        {
            let suffix = format!(".{}", model.artifact_extension());
            file_names = Some(
                values
                    .iter()
                    .map(|name| {
                        if name.ends_with(&suffix) {
                            name.clone()
                        } else {
                            format!("{name}{suffix}")
                        }
                    })
                    .collect::<Vec<String>>(),
            );
            continue;
        }
        let path: BindingPath = head.parse()?;
        let args: Vec<ParamValue> = values.iter().map(|raw| ParamValue::parse(raw)).collect();
        // enumerate consumes no randomness, so the seed below is immaterial
        let mut rng = RngHandle::from_seed(0);
        bindings.push(FieldBinding::bind(
            model,
            registry,
            path,
            "enumerate",
            Some(args),
            &mut rng,
        )?);
    }
    if bindings.is_empty() {
        return Err(EpsError::Table(
            ErrorInfo::new("table-empty", "table holds no binding records")
                .with_context("path", source.path().display().to_string()),
        ));
    }
    let group = BindingGroup::assemble(model, registry, 0, bindings)?;
    Ok((group, file_names))
}

/// Last-modified timestamp of a table file.
///
/// Exposed so callers can key reload caches on the mtime; the table layer
/// itself never caches.
pub fn modified_time(path: impl AsRef<Path>) -> Result<SystemTime, EpsError> {
    let path = path.as_ref();
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|err| {
            EpsError::Table(
                ErrorInfo::new("table-mtime", "failed to read table modification time")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
}

fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<(), EpsError> {
    let file = File::create(path).map_err(|err| wrap_io("table-create", path, err))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(BufWriter::new(file));
    for row in rows {
        writer
            .write_record(row)
            .map_err(|err| wrap_csv("table-write-row", err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("table-flush", err.into()))?;
    Ok(())
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, EpsError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| wrap_csv("table-read", err))?;
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| wrap_csv("table-record", err))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

fn write_binary(path: &Path, rows: &[Vec<String>]) -> Result<(), EpsError> {
    let bytes = bincode::serialize(rows).map_err(|err| {
        EpsError::Table(
            ErrorInfo::new("table-encode", "failed to encode binary table")
                .with_hint(err.to_string()),
        )
    })?;
    fs::write(path, bytes).map_err(|err| wrap_io("table-write", path, err))
}

fn read_binary(path: &Path) -> Result<Vec<Vec<String>>, EpsError> {
    let bytes = fs::read(path).map_err(|err| wrap_io("table-open", path, err))?;
    bincode::deserialize(&bytes).map_err(|err| {
        EpsError::Table(
            ErrorInfo::new("table-decode", "failed to decode binary table")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

fn wrap_io(code: &str, path: &Path, err: std::io::Error) -> EpsError {
    EpsError::Table(
        ErrorInfo::new(code, "table file I/O failure")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

fn wrap_csv(code: &str, err: csv::Error) -> EpsError {
    EpsError::Table(ErrorInfo::new(code, "CSV table failure").with_hint(err.to_string()))
}
