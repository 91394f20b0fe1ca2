//! Export a membership form PDF.

use std::path::PathBuf;

use anyhow::Context;
use unionportal_common::PortalError;
use unionportal_common::config::{AppConfig, PaperFormat};
use unionportal_form_export::template::TemplateOrigin;
use unionportal_form_export::{ExportOptions, FormExporter};
use unionportal_member_model::MemberRecord;

pub async fn run(
    config: &AppConfig,
    member_path: PathBuf,
    template: Option<String>,
    output: Option<PathBuf>,
    paper: Option<PaperFormat>,
) -> anyhow::Result<()> {
    let member = MemberRecord::load(&member_path)
        .map_err(PortalError::from)
        .context("Failed to load member record")?;

    let mut options = ExportOptions::from_config(config);
    options.template_url = template;
    if let Some(output) = output {
        options.output_dir = output;
    }
    if let Some(paper) = paper {
        options.paper = paper;
    }

    let name = member.full_name();
    println!(
        "Exporting membership form for {}",
        if name.is_empty() { "(unnamed member)" } else { &name }
    );

    let exporter = FormExporter::new(config);
    let exported = exporter.export(&member, &options).await?;

    match exported.background {
        Some(TemplateOrigin::Primary) => println!("  Template: primary"),
        Some(TemplateOrigin::Fallback) => println!("  Template: bundled fallback"),
        None => println!("  Template: unavailable, rendered on a blank page"),
    }
    println!("  Paper: {:?}", options.paper);
    println!("  Size: {} bytes", exported.size_bytes);
    println!("\nWritten to: {}", exported.path.display());

    Ok(())
}
