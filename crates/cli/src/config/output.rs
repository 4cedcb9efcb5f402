use indexmap::IndexMap;
use prettytable::{
    format::{FormatBuilder, LinePosition, LineSeparator, TableFormat},
    Cell, Row, Table,
};
use serde::Serialize;
use serde_json::{Map, Value};

type Record = Map<String, Value>;

/// Output format.
#[derive(
    clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Table.
    #[default]
    Table,
    /// JSON.
    Json,
}

/// Table columns: serialized field name to column title, in display order.
///
/// Columns only shape table output. JSON output always carries every field.
#[derive(Debug, Clone, Default)]
pub struct Columns(IndexMap<String, String>);

impl Columns {
    /// Create from `(field, title)` pairs.
    pub fn new(columns: impl IntoIterator<Item = (impl ToString, impl ToString)>) -> Self {
        Self(
            columns
                .into_iter()
                .map(|(field, title)| (field.to_string(), title.to_string()))
                .collect(),
        )
    }

    fn select<'a>(&'a self, record: &'a Record) -> Vec<(&'a str, Value)> {
        if self.0.is_empty() {
            return record
                .iter()
                .map(|(field, value)| (field.as_str(), value.clone()))
                .collect();
        }
        self.0
            .iter()
            .map(|(field, title)| {
                let value = record.get(field).cloned().unwrap_or(Value::Null);
                (title.as_str(), value)
            })
            .collect()
    }
}

impl OutputFormat {
    /// Render one record. Tables show it as `Key | Value` rows.
    pub fn display_one(&self, item: impl Serialize, columns: Columns) -> eyre::Result<String> {
        let record = to_record(item)?;
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(&record)?),
            Self::Table => {
                let mut table = new_table(["Key", "Value"]);
                for (title, value) in columns.select(&record) {
                    table.add_row(Row::new(vec![Cell::new(title), cell(&value)]));
                }
                Ok(table.to_string())
            }
        }
    }

    /// Render a list of records, one row per record.
    pub fn display_many(
        &self,
        items: impl IntoIterator<Item = impl Serialize>,
        columns: Columns,
    ) -> eyre::Result<String> {
        let records = items
            .into_iter()
            .map(to_record)
            .collect::<eyre::Result<Vec<_>>>()?;
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(&records)?),
            Self::Table => {
                let Some(first) = records.first() else {
                    return Ok("empty".to_string());
                };
                let titles = columns
                    .select(first)
                    .into_iter()
                    .map(|(title, _)| title.to_string())
                    .collect::<Vec<_>>();
                let mut table = new_table(titles);
                for record in records.iter() {
                    let cells = columns
                        .select(record)
                        .iter()
                        .map(|(_, value)| cell(value))
                        .collect();
                    table.add_row(Row::new(cells));
                }
                Ok(table.to_string())
            }
        }
    }

    /// Render a list of records keyed by name. The key is stored under
    /// `key_field` ahead of the record's own fields.
    pub fn display_keyed_many(
        &self,
        key_field: &str,
        items: impl IntoIterator<Item = (impl ToString, impl Serialize)>,
        columns: Columns,
    ) -> eyre::Result<String> {
        let records = items
            .into_iter()
            .map(|(key, item)| {
                let mut keyed = Record::new();
                keyed.insert(key_field.to_string(), Value::String(key.to_string()));
                keyed.extend(to_record(item)?);
                Ok(keyed)
            })
            .collect::<eyre::Result<Vec<_>>>()?;
        self.display_many(records, columns)
    }
}

fn to_record(item: impl Serialize) -> eyre::Result<Record> {
    match serde_json::to_value(item)? {
        Value::Object(record) => Ok(record),
        other => eyre::bail!("expected a JSON object, found `{other}`"),
    }
}

fn new_table(titles: impl IntoIterator<Item = impl ToString>) -> Table {
    let format: TableFormat = FormatBuilder::new()
        .padding(0, 2)
        .separator(LinePosition::Title, LineSeparator::new('-', '+', '+', '+'))
        .build();
    let mut table = Table::new();
    table.set_format(format);
    table.set_titles(Row::new(
        titles
            .into_iter()
            .map(|title| Cell::new(&title.to_string()))
            .collect(),
    ));
    table
}

fn cell(value: &Value) -> Cell {
    let text = match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    Cell::new(&text)
}
