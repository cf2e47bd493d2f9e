//! Project command implementation

use super::CommandContext;
use crate::cli::ProjectArgs;
use anyhow::Result;

pub fn execute(args: ProjectArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let source = ctx.read_input(&args.source)?;
    let result = areal_ops::project(&source, args.fields.as_slice())?;
    ctx.write_result("project", source.len(), &result)
}
