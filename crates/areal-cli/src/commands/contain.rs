//! Containment aggregation command implementation

use super::{parse_reducers, CommandContext};
use crate::cli::ContainArgs;
use anyhow::Result;

pub fn execute(args: ContainArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let reducers = parse_reducers(&args.reduce)?;
    let points = ctx.read_input(&args.points)?;
    let zones = ctx.read_input(&args.zones)?;

    let result = ctx.ops().aggregate_by_containment(&points, &zones, &reducers)?;
    if result.len() < zones.len() {
        ctx.output.info(format!(
            "{} of {} zones contain no points and were omitted",
            zones.len() - result.len(),
            zones.len()
        ));
    }
    ctx.write_result("contain", points.len(), &result)
}
