//! Join command implementation

use super::CommandContext;
use crate::cli::JoinArgs;
use anyhow::{Context, Result};
use areal_ops::{JoinMode, Predicate};

pub fn execute(args: JoinArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let predicate: Predicate = args.predicate.parse().context("Invalid --predicate")?;
    let mode: JoinMode = args.mode.parse().context("Invalid --mode")?;

    let left = ctx.read_input(&args.left)?;
    let right = ctx.read_input(&args.right)?;

    let result = ctx.ops().join(&left, &right, predicate, mode)?;
    ctx.write_result(&format!("{} join ({})", mode, predicate), left.len(), &result)
}
