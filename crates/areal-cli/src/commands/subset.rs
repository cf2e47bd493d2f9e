//! Subset command implementation

use super::CommandContext;
use crate::cli::SubsetArgs;
use anyhow::{Context, Result};
use areal_ops::Predicate;

pub fn execute(args: SubsetArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let predicate: Predicate = args.predicate.parse().context("Invalid --predicate")?;

    let source = ctx.read_input(&args.source)?;
    let reference = ctx.read_input(&args.reference)?;

    let result = ctx.ops().subset(&source, &reference, predicate)?;
    ctx.write_result(&format!("subset ({})", predicate), source.len(), &result)
}
