//! Structured output rendering
//!
//! Every command prints its result through a [`Renderer`], in exactly one of the formats
//! selected with `--output`: an aligned table, indented JSON, or YAML. Narration such as
//! "Topic [orders] created" is separate from the result and is dropped in silent mode.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;

use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::error::{CliError, CliResult};
use crate::config::OutputFormat;
use crate::domain::{
    AlertSetting, AlertView, ClusterConnector, ConnectCluster, Connector, ConnectorPlugin,
    ConnectorStatus, ConnectorTask, TaskStatus, TopicMetadataView, TopicView,
};

/// A table column: header text and the field it shows.
///
/// `key` names a top-level field, or a nested one as a JSON pointer (`/config/name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, key: &'static str) -> Self {
        Self { header, key }
    }
}

/// A value that can be shown as table rows.
///
/// Types without declared columns get columns inferred from the first row.
pub trait Tabular: Serialize {
    fn columns() -> &'static [Column] {
        &[]
    }
}

/// Render a serialized value in `format`. Table columns come from `columns`, or are
/// inferred when empty.
pub fn render(value: &Value, format: OutputFormat, columns: &[Column]) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .map_err(|e| CliError::Render(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Table => Ok(render_table(value, columns)),
    }
}

fn render_table(value: &Value, columns: &[Column]) -> String {
    let mut builder = Builder::default();
    match value {
        Value::Array(rows) => {
            let columns = resolve_columns(columns, rows.first());
            if columns.is_empty() {
                return String::new();
            }
            builder.push_record(columns.iter().map(|(header, _)| header.clone()));
            for row in rows {
                builder.push_record(columns.iter().map(|(_, key)| cell(field(row, key))));
            }
        }
        Value::Object(map) if columns.is_empty() => {
            builder.push_record(["KEY".to_string(), "VALUE".to_string()]);
            for (key, value) in map {
                builder.push_record([key.clone(), cell(value)]);
            }
        }
        Value::Object(_) => {
            let columns = resolve_columns(columns, Some(value));
            builder.push_record(columns.iter().map(|(header, _)| header.clone()));
            builder.push_record(columns.iter().map(|(_, key)| cell(field(value, key))));
        }
        Value::Null => return String::new(),
        scalar => return format!("{}\n", cell(scalar)),
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    format!("{table}\n")
}

/// Declared columns, or one column per key of the first row.
fn resolve_columns(declared: &[Column], first: Option<&Value>) -> Vec<(String, String)> {
    if !declared.is_empty() {
        return declared
            .iter()
            .map(|c| (c.header.to_string(), c.key.to_string()))
            .collect();
    }
    match first {
        Some(Value::Object(map)) => map.keys().map(|k| (header_of(k), k.clone())).collect(),
        Some(_) => vec![("VALUE".to_string(), String::new())],
        None => Vec::new(),
    }
}

fn field<'v>(row: &'v Value, key: &str) -> &'v Value {
    if key.is_empty() {
        return row;
    }
    let found = if key.starts_with('/') {
        row.pointer(key)
    } else {
        row.get(key)
    };
    found.unwrap_or(&Value::Null)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            items.iter().map(cell).join(", ")
        }
        other => other.to_string(),
    }
}

/// `topicName` -> `TOPIC NAME`
fn header_of(key: &str) -> String {
    let mut header = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            header.push(' ');
        }
        header.extend(ch.to_uppercase());
    }
    header.replace('_', " ")
}

/// Writes results to `out` and narration/warnings to `err` or `out`.
pub struct Renderer<'a> {
    format: OutputFormat,
    silent: bool,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    header_written: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(
        format: OutputFormat,
        silent: bool,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
    ) -> Self {
        Self {
            format,
            silent,
            out,
            err,
            header_written: false,
        }
    }

    /// Print a single result.
    pub fn object<T: Tabular>(&mut self, value: &T) -> CliResult<()> {
        let value = to_value(value)?;
        self.write(&render(&value, self.format, T::columns())?)
    }

    /// Print a list of results.
    pub fn list<T: Tabular>(&mut self, items: &[T]) -> CliResult<()> {
        self.list_filtered(items, |_| true)
    }

    /// Print a list; in table format, only the rows `keep` accepts.
    pub fn list_filtered<T, F>(&mut self, items: &[T], keep: F) -> CliResult<()>
    where
        T: Tabular,
        F: Fn(&T) -> bool,
    {
        let rows: Vec<&T> = match self.format {
            OutputFormat::Table => items.iter().filter(|item| keep(item)).collect(),
            _ => items.iter().collect(),
        };
        let value = to_value(&rows)?;
        self.write(&render(&value, self.format, T::columns())?)
    }

    /// Print as JSON regardless of the selected format.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> CliResult<()> {
        let value = to_value(value)?;
        self.write(&render(&value, OutputFormat::Json, &[])?)
    }

    /// Print identifiers only, as `[{field: name}]` in the selected format.
    pub fn names(&mut self, field: &str, names: &[String]) -> CliResult<()> {
        let rows: Vec<Value> = names
            .iter()
            .map(|name| {
                let mut row = Map::new();
                row.insert(field.to_string(), Value::String(name.clone()));
                Value::Object(row)
            })
            .collect();
        self.write(&render(&Value::Array(rows), self.format, &[])?)
    }

    /// Print one raw value per line.
    pub fn lines(&mut self, values: &[String], no_trailing_newline: bool) -> CliResult<()> {
        let mut text = values.join("\n");
        if !no_trailing_newline && !values.is_empty() {
            text.push('\n');
        }
        self.write(&text)
    }

    /// Print one item of an open-ended stream: a tab-separated row under a header written
    /// once, a single JSON line, or a YAML document.
    pub fn stream_item<T: Tabular>(&mut self, item: &T) -> CliResult<()> {
        let value = to_value(item)?;
        let text = match self.format {
            OutputFormat::Json => serde_json::to_string(&value)
                .map(|line| line + "\n")
                .map_err(|e| CliError::Render(e.to_string()))?,
            OutputFormat::Yaml => format!("---\n{}", render(&value, OutputFormat::Yaml, &[])?),
            OutputFormat::Table => {
                let columns = resolve_columns(T::columns(), Some(&value));
                let row = columns.iter().map(|(_, key)| cell(field(&value, key))).join("\t");
                if self.header_written {
                    format!("{row}\n")
                } else {
                    self.header_written = true;
                    let header = columns.iter().map(|(header, _)| header).join("\t");
                    format!("{header}\n{row}\n")
                }
            }
        };
        self.write(&text)
    }

    /// Print preformatted text as is.
    pub fn text(&mut self, text: &str) -> CliResult<()> {
        self.write(text)
    }

    /// Narration for a completed action; suppressed in silent mode.
    pub fn info(&mut self, msg: impl Display) -> CliResult<()> {
        if self.silent {
            return Ok(());
        }
        writeln!(self.out, "{msg}")?;
        Ok(())
    }

    /// Warning on the error stream; never suppressed.
    pub fn warn(&mut self, msg: impl Display) -> CliResult<()> {
        writeln!(self.err, "{}: {}", "Warning".yellow(), msg)?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> CliResult<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> CliResult<Value> {
    serde_json::to_value(value).map_err(|e| CliError::Render(e.to_string()))
}

impl Tabular for TopicView {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("NAME", "topicName"),
            Column::new("KEY TYPE", "keyType"),
            Column::new("VALUE TYPE", "valueType"),
            Column::new("PARTITIONS", "partitions"),
            Column::new("REPLICATION", "replication"),
            Column::new("MSG/S", "messagesPerSecond"),
            Column::new("TOTAL MESSAGES", "totalMessages"),
        ];
        COLUMNS
    }
}

impl Tabular for TopicMetadataView {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("NAME", "topicName"),
            Column::new("KEY TYPE", "keyType"),
            Column::new("VALUE TYPE", "valueType"),
        ];
        COLUMNS
    }
}

impl Tabular for AlertView {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID", "alertId"),
            Column::new("TIME", "time"),
            Column::new("LEVEL", "level"),
            Column::new("CATEGORY", "category"),
            Column::new("INSTANCE", "instance"),
            Column::new("SUMMARY", "summary"),
        ];
        COLUMNS
    }
}

impl Tabular for ClusterConnector {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("CLUSTER", "cluster"),
            Column::new("NAME", "name"),
            Column::new("TYPE", "type"),
            Column::new("CLASS", "/config/connector.class"),
        ];
        COLUMNS
    }
}

impl Tabular for ConnectorPlugin {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("CLASS", "class"),
            Column::new("TYPE", "type"),
            Column::new("VERSION", "version"),
        ];
        COLUMNS
    }
}

impl Tabular for AlertSetting {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID", "id"),
            Column::new("DESCRIPTION", "description"),
            Column::new("CATEGORY", "category"),
            Column::new("ENABLED", "enabled"),
            Column::new("AVAILABLE", "isAvailable"),
            Column::new("CONDITIONS", "conditions"),
        ];
        COLUMNS
    }
}

impl Tabular for ConnectCluster {}
impl Tabular for Connector {}
impl Tabular for ConnectorStatus {}
impl Tabular for ConnectorTask {}
impl Tabular for TaskStatus {}
impl Tabular for BTreeMap<String, String> {}
