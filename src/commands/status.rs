//! `ba-install status` - report platform and installed version

use anyhow::Result;
use pkgkit::{Client, ProbeResult};
use serde::Serialize;

use crate::Context;
use crate::cli::{OutputFormat, StatusArgs};
use crate::config::{self, Config};
use crate::ui;

#[derive(Debug, Serialize)]
struct Status {
    os_family: String,
    packaging: Option<String>,
    installed: bool,
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe_error: Option<String>,
}

impl Status {
    fn collect(client: &Client) -> Self {
        let platform = client.platform();
        let probe = client.detect_version();
        Self {
            os_family: platform.os_family().to_string(),
            packaging: platform.packaging_kind().map(|k| k.as_str().to_string()),
            installed: probe.is_found(),
            version: probe.version().map(str::to_string),
            probe_error: match probe {
                ProbeResult::ProbeError(detail) => Some(detail),
                _ => None,
            },
        }
    }
}

pub fn run(ctx: &Context, config: &Config, args: &StatusArgs) -> Result<()> {
    let timeout = args
        .timeout
        .map_or_else(|| config.timeout(), config::timeout_from_secs);
    let client = Client::new(config.settings(), timeout);
    let status = Status::collect(&client);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => print_text(ctx, &status),
    }
    Ok(())
}

fn print_text(ctx: &Context, status: &Status) {
    if !ctx.quiet {
        ui::header("BA Client Status");
    }
    ui::kv("os", &status.os_family);
    if let Some(packaging) = &status.packaging {
        ui::kv("packaging", packaging);
    }
    match &status.version {
        Some(version) => ui::success(&format!("installed (version {version})")),
        None => ui::info("not installed"),
    }
    if let Some(detail) = &status.probe_error {
        ui::warn(&format!("probe failed: {detail}"));
    }
}
