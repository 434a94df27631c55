//! Identity, destination and layout reporting

use anyhow::Result;
use serde::Serialize;

use testship_common::layout::Layout;
use testship_common::resolve_identity;

use super::Context;
use crate::output::{print_rows, OutputFormat, TableDisplay};

#[derive(Serialize)]
struct Setting {
    key: &'static str,
    value: String,
}

impl TableDisplay for Setting {
    fn headers() -> Vec<&'static str> {
        vec!["Key", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.key.to_string(), self.value.clone()]
    }
}

fn setting(key: &'static str, value: impl Into<String>) -> Setting {
    Setting {
        key,
        value: value.into(),
    }
}

/// Print the resolved identity and both remote destinations
pub fn destinations(ctx: &Context, format: OutputFormat) -> Result<()> {
    let project = &ctx.project;
    let store = ctx.registry.resolve(project)?;
    let identity = resolve_identity(project);

    let settings = vec![
        setting("store", store.friendly_name()),
        setting("group", identity.group),
        setting("application", identity.name),
        setting("role", identity.role),
        setting("version", project.version.clone()),
        setting("latest", store.latest_destination(project)?),
        setting("versioned", store.versioned_destination(project)?),
    ];
    print_rows(&settings, format);
    Ok(())
}

/// Create the integration directories and print them
pub fn layout(ctx: &Context, format: OutputFormat) -> Result<()> {
    let layout = Layout::prepare(&ctx.project)?;
    let settings: Vec<_> = layout
        .entries()
        .into_iter()
        .map(|(key, path)| setting(key, path.display().to_string()))
        .collect();
    print_rows(&settings, format);
    Ok(())
}
