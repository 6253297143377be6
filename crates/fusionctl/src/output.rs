//! Output rendering: JSON, YAML, and tables, with optional JMESPath
//! filtering applied before formatting.

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

pub fn print_output<T: Serialize>(
    data: T,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    let mut json_value = serde_json::to_value(data)?;

    if let Some(query_str) = query {
        json_value = apply_query(&json_value, query_str)?;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            print_as_table(&json_value)?;
        }
    }

    Ok(())
}

/// Run a JMESPath expression over a JSON value.
fn apply_query(value: &Value, query: &str) -> Result<Value> {
    let expr = jmespath::compile(query)
        .map_err(|e| anyhow::anyhow!("Invalid JMESPath expression '{query}': {e}"))?;
    let data = jmespath::Variable::from_json(&value.to_string())
        .map_err(|e| anyhow::anyhow!("JMESPath input conversion failed: {e}"))?;
    let result = expr
        .search(data)
        .map_err(|e| anyhow::anyhow!("JMESPath query failed: {e}"))?;
    serde_json::to_value(&*result).context("JMESPath result serialization failed")
}

fn print_as_table(value: &Value) -> Result<()> {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &items[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in items {
                    if let Value::Object(fields) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| render_cell(fields.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in items {
                    table.add_row(vec![render_cell(item)]);
                }
            }

            println!("{table}");
        }
        Value::Object(fields) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);
            for (key, val) in fields {
                table.add_row(vec![key.clone(), render_cell(val)]);
            }
            println!("{table}");
        }
        _ => {
            println!("{}", render_cell(value));
        }
    }

    Ok(())
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
    }
}
