//! Export entry points.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use unionportal_common::clock::{iso_date, Clock, SystemClock};
use unionportal_common::config::{AppConfig, PaperFormat};
use unionportal_common::error::{PortalError, PortalResult};
use unionportal_member_model::{slugify, MemberRecord};

use crate::compositor::{compose, FormPlan, FormStyle};
use crate::fields::collect_entries;
use crate::pdf::write_pdf;
use crate::template::{TemplateImage, TemplateOrigin, TemplateProvider};

/// Per-call export options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Overrides the configured template location.
    pub template_url: Option<String>,

    /// Directory the PDF is written to.
    pub output_dir: PathBuf,

    pub paper: PaperFormat,

    pub style: FormStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ExportOptions {
    /// Options taken from the `export` section of the config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            template_url: None,
            output_dir: config.export.output_dir.clone(),
            paper: config.export.paper,
            style: FormStyle {
                font_size: config.export.font_size,
                line_height: config.export.line_height,
            },
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportedForm {
    pub path: PathBuf,

    /// Which template ended up behind the text, if any.
    pub background: Option<TemplateOrigin>,

    pub size_bytes: usize,
}

/// Exports membership forms with a fixed template source and clock.
pub struct FormExporter {
    provider: TemplateProvider,
    clock: Arc<dyn Clock>,
    default_template_url: String,
}

impl FormExporter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            provider: TemplateProvider::new(),
            clock: Arc::new(SystemClock),
            default_template_url: config.portal.template_url(&config.export.template_path),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_provider(mut self, provider: TemplateProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Template location used when the options carry no override.
    pub fn default_template_url(&self) -> &str {
        &self.default_template_url
    }

    /// Render `member` and write the PDF into `options.output_dir`.
    ///
    /// Template failures never fail the export; the page is rendered
    /// without a background instead.
    pub async fn export(
        &self,
        member: &MemberRecord,
        options: &ExportOptions,
    ) -> PortalResult<ExportedForm> {
        let today = self.clock.today();
        let template_url = options
            .template_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.default_template_url);

        tracing::info!(
            member = %member.member_id(),
            template = %crate::template::describe_location(template_url),
            paper = ?options.paper,
            "Exporting membership form"
        );

        let template = self.provider.resolve(template_url).await;
        let bytes = render_membership_form(
            member,
            template.as_ref(),
            today,
            options.paper,
            &options.style,
        );

        let path = options.output_dir.join(export_filename(member, today));
        write_output(&path, &bytes).await?;

        tracing::info!(
            output = %path.display(),
            size_bytes = bytes.len(),
            background = ?template.as_ref().map(|t| t.origin),
            "Membership form exported"
        );

        Ok(ExportedForm {
            path,
            background: template.map(|t| t.origin),
            size_bytes: bytes.len(),
        })
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> PortalResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            PortalError::render(format!(
                "Cannot create output directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Export with the on-disk configuration and the system clock.
pub async fn export_membership_form(
    member: &MemberRecord,
    options: &ExportOptions,
) -> PortalResult<ExportedForm> {
    let config = AppConfig::load();
    FormExporter::new(&config).export(member, options).await
}

/// Lay out the form for a template of the given pixel size.
pub fn plan_membership_form(
    member: &MemberRecord,
    template_size: Option<(u32, u32)>,
    today: NaiveDate,
    paper: PaperFormat,
    style: &FormStyle,
) -> FormPlan {
    let entries = collect_entries(member, today);
    compose(paper, template_size, &entries, style)
}

/// Build the PDF bytes for `member`.
pub fn render_membership_form(
    member: &MemberRecord,
    template: Option<&TemplateImage>,
    today: NaiveDate,
    paper: PaperFormat,
    style: &FormStyle,
) -> Vec<u8> {
    let plan = plan_membership_form(
        member,
        template.map(|t| (t.width(), t.height())),
        today,
        paper,
        style,
    );
    let title = match member.full_name() {
        name if name.is_empty() => "Membership Application Form".to_string(),
        name => format!("Membership Application Form - {name}"),
    };
    write_pdf(&plan, template, &title)
}

/// `<slug>-membership-<YYYY-MM-DD>.pdf`, slug from the member ID, else the
/// full name, else `member`.
pub fn export_filename(member: &MemberRecord, date: NaiveDate) -> String {
    let slug = [member.member_id(), member.full_name()]
        .iter()
        .map(|candidate| slugify(candidate))
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| "member".to_string());
    format!("{slug}-membership-{}.pdf", iso_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{DrawOp, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
    use crate::layout::FormField;
    use unionportal_common::clock::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    fn member() -> MemberRecord {
        MemberRecord {
            member_id: Some("ALU--001 X!".to_string()),
            first_name: Some("Maria".to_string()),
            last_name: Some("Santos".to_string()),
            marital_status: Some("Married".to_string()),
            ..MemberRecord::default()
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "unionportal-export-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_filename_uses_member_id_slug() {
        assert_eq!(
            export_filename(&member(), today()),
            "alu-001-x-membership-2025-03-09.pdf"
        );
    }

    #[test]
    fn test_filename_falls_back_to_name_then_member() {
        let named = MemberRecord {
            first_name: Some("José".to_string()),
            last_name: Some("Rizal".to_string()),
            ..MemberRecord::default()
        };
        assert_eq!(
            export_filename(&named, today()),
            "jos-rizal-membership-2025-03-09.pdf"
        );
        assert_eq!(
            export_filename(&MemberRecord::default(), today()),
            "member-membership-2025-03-09.pdf"
        );
    }

    #[test]
    fn test_plan_without_template_uses_default_canvas() {
        let plan = plan_membership_form(
            &member(),
            None,
            today(),
            PaperFormat::A4,
            &FormStyle::default(),
        );
        let (pw, ph) = PaperFormat::A4.size_pt();
        let scale = (pw / DEFAULT_CANVAS_WIDTH).min(ph / DEFAULT_CANVAS_HEIGHT);
        assert!((plan.geometry.rendered_width - DEFAULT_CANVAS_WIDTH * scale).abs() < 1e-9);
        assert!(plan
            .ops
            .iter()
            .all(|op| !matches!(op, DrawOp::Background { .. })));

        let coord = FormField::MaritalMarried.coordinate();
        let (x, y) = plan.geometry.place(&coord);
        assert!(plan
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Mark { x: mx, y: my, .. } if *mx == x && *my == y)));
    }

    #[tokio::test]
    async fn test_export_without_any_template_still_writes_pdf() {
        let dir = temp_dir("degraded");
        let exporter = FormExporter::new(&AppConfig::default())
            .with_clock(Arc::new(FixedClock::new(today())))
            .with_provider(
                TemplateProvider::new().with_fallback("data:image/png;base64,bm90IGFuIGltYWdl"),
            );
        let options = ExportOptions {
            template_url: Some(dir.join("missing.png").display().to_string()),
            output_dir: dir.clone(),
            ..ExportOptions::default()
        };

        let exported = exporter.export(&member(), &options).await.unwrap();

        assert_eq!(exported.background, None);
        assert_eq!(
            exported.path,
            dir.join("alu-001-x-membership-2025-03-09.pdf")
        );
        let bytes = std::fs::read(&exported.path).unwrap();
        assert_eq!(bytes.len(), exported.size_bytes);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!bytes.windows(6).any(|w| w == b"/Image"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_export_falls_back_to_bundled_template() {
        let dir = temp_dir("fallback");
        let exporter = FormExporter::new(&AppConfig::default())
            .with_clock(Arc::new(FixedClock::new(today())));
        let options = ExportOptions {
            template_url: Some(dir.join("missing.png").display().to_string()),
            output_dir: dir.clone(),
            ..ExportOptions::default()
        };

        let exported = exporter.export(&member(), &options).await.unwrap();
        assert_eq!(exported.background, Some(TemplateOrigin::Fallback));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_default_template_url_prefers_public_url() {
        let mut config = AppConfig::default();
        config.portal.public_url = Some("https://cdn.example.org/portal/".to_string());
        let exporter = FormExporter::new(&config);
        assert_eq!(
            exporter.default_template_url(),
            "https://cdn.example.org/portal/membership-form-template.png"
        );
    }
}
