use super::ui;
use crate::core::{Environment, InvocationEvent};
use crate::handler::{IngestSummary, InvocationResult};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::io::Read;

impl IngestSummary {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

        let rows = [
            ("Date", self.date.clone()),
            ("Base", self.base.clone()),
            ("Symbols", self.symbols.join(", ")),
            ("Rows", self.count.to_string()),
            ("NDJSON key", self.s3_ndjson_key.clone()),
            ("Raw key", self.s3_raw_key.clone()),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }

        let written = format!("{} rows written", self.count);
        format!(
            "{}\n\n{table}\n{}",
            ui::style_text(&self.message, ui::StyleType::Title),
            ui::style_text(&written, ui::StyleType::Success)
        )
    }
}

/// Event fields supplied on the command line. Each one overrides the event file.
#[derive(Debug, Default, Clone)]
pub struct EventOverrides {
    pub base: Option<String>,
    pub symbols: Option<String>,
    pub date: Option<String>,
}

/// Builds the invocation event from an optional JSON file (`-` for stdin)
/// and command line overrides.
pub fn build_event(source: Option<&str>, overrides: EventOverrides) -> Result<InvocationEvent> {
    let mut event = match source {
        None => InvocationEvent::default(),
        Some("-") => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read event from stdin")?;
            InvocationEvent::from_json(&json).context("Failed to parse event from stdin")?
        }
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event file: {path}"))?;
            InvocationEvent::from_json(&json)
                .with_context(|| format!("Failed to parse event file: {path}"))?
        }
    };

    if overrides.base.is_some() {
        event.base = overrides.base;
    }
    if overrides.symbols.is_some() {
        event.symbols = overrides.symbols;
    }
    if overrides.date.is_some() {
        event.date = overrides.date;
    }
    Ok(event)
}

pub fn render(result: &InvocationResult, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(result).context("Failed to serialize invocation result")
    } else {
        Ok(result.body.display_as_table())
    }
}

pub async fn invoke(config_path: Option<&str>, event: InvocationEvent, json: bool) -> Result<()> {
    let env = Environment::from_process();
    let result = crate::run_invocation(config_path, &event, &env).await?;
    println!("{}", render(&result, json)?);
    Ok(())
}
