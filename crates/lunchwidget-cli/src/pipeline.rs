//! Command pipelines: acquire, enrich, then render or inject.
//!
//! Failures are logged and end the run early; they never abort the
//! process, so callers get `()` rather than a `Result`.

use std::path::PathBuf;

use anyhow::Context;
use lunchwidget_core::{AppConfig, Record};
use lunchwidget_enrich::{EnrichOptions, Enricher, LookupClient};
use lunchwidget_source::{DirectoryRequest, SourceSpec};

use crate::SourceArgs;

pub(crate) struct WidgetRun {
    pub(crate) source: SourceSpec,
    pub(crate) template: PathBuf,
    pub(crate) output: PathBuf,
    /// `0` means no limit.
    pub(crate) limit: usize,
}

pub(crate) struct InjectRun {
    pub(crate) source: SourceSpec,
    pub(crate) host_document: PathBuf,
    pub(crate) variable: String,
}

/// Picks the source from explicit flags, falling back to the configured
/// directory URL when `remote_by_default`, else the configured input dir.
pub(crate) fn resolve_source(
    args: &SourceArgs,
    config: &AppConfig,
    remote_by_default: bool,
) -> SourceSpec {
    let directory = |url: &str| {
        SourceSpec::Directory(DirectoryRequest {
            url: url.to_owned(),
            page_size_control: config.page_size_control.clone(),
            page_size: config.page_size,
        })
    };
    match (&args.input_dir, &args.directory_url) {
        (Some(dir), _) => SourceSpec::LocalDir(dir.clone()),
        (None, Some(url)) => directory(url),
        (None, None) if remote_by_default => directory(&config.directory_url),
        (None, None) => SourceSpec::LocalDir(config.input_dir.clone()),
    }
}

pub(crate) async fn run_widget(config: &AppConfig, run: &WidgetRun) {
    tracing::info!("starting lunch widget generator");
    if let Err(e) = widget(config, run).await {
        tracing::error!(error = %format!("{e:#}"), "widget generation failed");
    }
}

pub(crate) async fn run_inject(config: &AppConfig, run: &InjectRun) {
    tracing::info!("starting data injection");
    if let Err(e) = inject(config, run).await {
        tracing::error!(error = %format!("{e:#}"), "data injection failed");
    }
}

async fn widget(config: &AppConfig, run: &WidgetRun) -> anyhow::Result<()> {
    let records = acquire_and_enrich(config, &run.source, run.limit).await?;
    lunchwidget_render::render_widget(&run.template, &run.output, &records)
        .with_context(|| format!("rendering {}", run.template.display()))
}

async fn inject(config: &AppConfig, run: &InjectRun) -> anyhow::Result<()> {
    let records = acquire_and_enrich(config, &run.source, 0).await?;
    lunchwidget_render::inject_into_file(&run.host_document, &run.variable, &records)
        .with_context(|| format!("injecting into {}", run.host_document.display()))
}

/// Acquires rows, applies `limit`, and enriches them. Cuisine
/// classification and request pacing are only enabled for the remote
/// directory.
async fn acquire_and_enrich(
    config: &AppConfig,
    source: &SourceSpec,
    limit: usize,
) -> anyhow::Result<Vec<Record>> {
    let remote = source.is_remote();
    let timeout_secs = if remote {
        config.scrape_timeout_secs
    } else {
        config.request_timeout_secs
    };

    let mut rows = source
        .acquire(timeout_secs, &config.user_agent)
        .await
        .context("acquiring restaurant listings")?;
    let loaded = rows.len();
    if limit > 0 {
        rows.truncate(limit);
    }
    tracing::info!(loaded, processing = rows.len(), origin = %config.origin, "enriching restaurants");

    let client = LookupClient::new(
        &config.geocoder_url,
        &config.router_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("building lookup client")?;

    Ok(Enricher::new(client, enrich_options(config, remote))
        .enrich_all(rows)
        .await)
}

/// Cuisine classification and request pacing only apply to remote listings.
fn enrich_options(config: &AppConfig, remote: bool) -> EnrichOptions {
    let mut options = EnrichOptions::new(config.origin);
    options.classify_cuisine = remote;
    options.delay_ms = if remote { config.enrich_delay_ms } else { 0 };
    options
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
