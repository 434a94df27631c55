//! Artifact push command

use anyhow::Result;

use super::Context;
use crate::output::{print_info, print_success};

pub async fn execute(ctx: &Context) -> Result<()> {
    let pushed = ctx.workflow().push_artifacts().await?;
    if pushed.is_empty() {
        print_info("No packaged artifacts to push");
    } else {
        for tool in pushed {
            print_success(&format!("Pushed {} artifacts", tool));
        }
    }
    Ok(())
}
