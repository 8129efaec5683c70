//! `ba-install apply` - converge the client to the declared state

use anyhow::Result;
use declarative::{ApplyContext, Declaration, reconcile};
use pkgkit::{ActionRequest, Client};
use std::process::ExitCode;

use crate::Context;
use crate::cli::{ApplyArgs, OutputFormat};
use crate::config::{self, Config};
use crate::report::Report;
use crate::resource::BaClient;

pub fn run(ctx: &Context, config: &Config, args: &ApplyArgs) -> Result<ExitCode> {
    let timeout = args
        .timeout
        .map_or_else(|| config.timeout(), config::timeout_from_secs);
    let strict = args.strict_probe || config.detect.strict;

    let client = Client::new(config.settings(), timeout);
    log::info!("platform: {}", client.platform());

    let report = execute(client, args, strict);
    finish(ctx, &report, args.output)
}

/// Emit the report and map it to an exit code
///
/// The record is printed in every mode; `-q` only trims text decoration.
fn finish(ctx: &Context, report: &Report, format: OutputFormat) -> Result<ExitCode> {
    report.emit(format, ctx.quiet)?;
    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Empty values count as not given
fn given(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Reconcile once and build the report
fn execute(client: Client, args: &ApplyArgs, strict: bool) -> Report {
    let request = ActionRequest {
        installer_path: given(args.installer_path.as_ref()),
        product_code: given(args.product_code.as_ref()),
        pkg_name: given(args.pkg_name.as_ref()),
    };

    let mut declaration = Declaration::new(args.state);
    if let Some(path) = &request.installer_path {
        declaration = declaration.with_artifact(path.as_str());
    }

    let resource = BaClient::new(client, request).strict(strict);
    log::debug!("reconciling {resource:?} to {}", declaration.state);

    match reconcile(&resource, &declaration, ApplyContext::new(args.check)) {
        Ok(result) => Report::success(&result),
        Err(err) => {
            log::error!("{err}");
            Report::failure(&err)
        }
    }
}
