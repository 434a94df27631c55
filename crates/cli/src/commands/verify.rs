//! Suite verification commands

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use testship_common::{ToolKind, VerificationReport};

use super::Context;
use crate::output::{print_info, print_rows, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct VerifyEnvironmentArgs {
    /// Also write the results as JSON under the reports directory
    #[arg(long)]
    pub write_report: bool,
}

/// Run one tool's suite from its source directory and package it
pub async fn verify_tool(ctx: &Context, tool: ToolKind) -> Result<()> {
    match ctx.workflow().verify_tool(tool).await? {
        Some(packaged) => print_success(&format!(
            "{} tests passed, packaged {}",
            tool,
            packaged.archive.display()
        )),
        None => print_info(&format!("No {} tests found", tool)),
    }
    Ok(())
}

#[derive(Serialize)]
struct PhaseRow {
    phase: &'static str,
    tools: Vec<ToolKind>,
}

impl TableDisplay for PhaseRow {
    fn headers() -> Vec<&'static str> {
        vec!["Phase", "Tools"]
    }

    fn row(&self) -> Vec<String> {
        let tools = if self.tools.is_empty() {
            "-".to_string()
        } else {
            self.tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        };
        vec![self.phase.to_string(), tools]
    }
}

fn phase_rows(report: &VerificationReport) -> Vec<PhaseRow> {
    vec![
        PhaseRow {
            phase: "local",
            tools: report.local.clone(),
        },
        PhaseRow {
            phase: "parity",
            tools: report.parity.clone(),
        },
        PhaseRow {
            phase: "promoted",
            tools: report.promoted.clone(),
        },
    ]
}

pub async fn verify_environment(
    ctx: &Context,
    args: VerifyEnvironmentArgs,
    format: OutputFormat,
) -> Result<()> {
    let workflow = ctx.workflow();
    let report = workflow.verify_environment().await?;
    if args.write_report {
        workflow.write_report(&report)?;
    }

    print_rows(&phase_rows(&report), format);
    print_success("Environment verified");
    Ok(())
}
