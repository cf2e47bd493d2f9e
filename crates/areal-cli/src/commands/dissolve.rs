//! Dissolve command implementation

use super::{parse_reducers, CommandContext};
use crate::cli::DissolveArgs;
use anyhow::Result;

pub fn execute(args: DissolveArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let reducers = parse_reducers(&args.reduce)?;
    let source = ctx.read_input(&args.source)?;

    let result = ctx.ops().dissolve(&source, &args.by, &reducers)?;
    ctx.write_result(&format!("dissolve by {}", args.by), source.len(), &result)
}
