//! Config command implementation

use super::CommandContext;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use tabled::Tabled;

pub fn execute(ctx: &CommandContext<'_>) -> Result<()> {
    let mut entries: Vec<ConfigEntry> = ctx
        .config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry {
            key,
            value,
            source: format!("{:?}", source),
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    let output = ctx.output;
    if output.is_json() {
        return output.result(ConfigOutput { entries });
    }

    output.section("Configuration Values");

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let rows: Vec<ConfigRow> = entries
        .into_iter()
        .map(|e| ConfigRow {
            key: e.key,
            value: e.value,
            source: e.source,
        })
        .collect();
    output.table(rows);

    Ok(())
}
