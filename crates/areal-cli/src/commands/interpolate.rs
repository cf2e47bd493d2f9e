//! Interpolate command implementation

use super::CommandContext;
use crate::cli::InterpolateArgs;
use anyhow::{bail, Result};
use areal_ops::{AreaInterpolation, ESTIMATE_NOTICE};

pub fn execute(args: InterpolateArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let request = AreaInterpolation::new()
        .extensive(args.extensive)
        .intensive(args.intensive);
    if request.is_empty() {
        bail!("Nothing to interpolate. Pass --extensive and/or --intensive fields");
    }

    let source = ctx.read_input(&args.source)?;
    let target = ctx.read_input(&args.target)?;

    ctx.output.warning(ESTIMATE_NOTICE);
    let result = ctx.ops().interpolate(&source, &target, &request)?;
    ctx.write_result("interpolate", target.len(), &result)
}
