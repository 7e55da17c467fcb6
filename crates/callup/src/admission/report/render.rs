use super::pdf::{render_pdf, Heading};
use super::views::{ReportData, ReportRow};
use chrono::{DateTime, Local};
use minijinja::{context, Environment, Value};
use serde::Serialize;
use std::path::{Path, PathBuf};

const REPORT_TITLE: &str = "Call-Up List";
const REPORT_SUBTITLE: &str = "Candidates called for the training course";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

static REPORT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  @page { size: A4 landscape; margin: 1.5cm; }
  body { font-family: Arial, Helvetica, sans-serif; font-size: 12px; }
  h1, h2 { text-align: center; }
  table { width: 100%; border-collapse: collapse; }
  th { background: #3333b3; color: #f5f5f5; padding-bottom: 12px; }
  td, th { border: 1px solid #000; text-align: center; padding: 2px 4px; }
  tr.general { background: #d9f2d9; }
  tr.quota { background: #f2e6cc; }
  tr.general_reallocated { background: #e6e6ff; }
  section.page { page-break-after: always; }
  section.page:last-of-type { page-break-after: auto; }
  footer { text-align: right; font-size: 10px; margin-top: 4px; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<h2>{{ subtitle }}</h2>
<p>Generated at: {{ generated_at }}</p>
<h2>Simulation summary</h2>
<ul>
  <li>Total called: {{ summary.total_seated }} of {{ summary.requested_seats }} seats</li>
  <li>Called on general merit: {{ summary.general_total }}
    <ul>
      <li>{{ summary.quota_eligible_via_general }} quota-eligible candidates admitted on general merit</li>
      {% if summary.reallocated > 0 %}<li>{{ summary.reallocated }} seats reallocated from unfilled quota</li>{% endif %}
    </ul>
  </li>
  <li>Called on quota seats: {{ summary.quota_total }}</li>
  <li>Quota-eligible candidates called: {{ summary.quota_eligible_seated }}</li>
  {% if summary.unfilled_seats > 0 %}<li>Seats left unfilled (pool exhausted): {{ summary.unfilled_seats }}</li>{% endif %}
</ul>
{% for page in pages %}
<section class="page">
<table>
  <thead>
    <tr><th>#</th><th>Registration</th><th>Candidate name</th><th>Seat type</th><th>General rank</th><th>Quota rank</th><th>Note</th></tr>
  </thead>
  <tbody>
  {% for row in page %}
    <tr class="{{ row.track }}"><td>{{ row.index }}</td><td>{{ row.registration_id }}</td><td>{{ row.name }}</td><td>{{ row.track_label }}</td><td>{{ row.general_rank }}</td><td>{{ row.quota_rank }}</td><td>{{ row.note }}</td></tr>
  {% endfor %}
  </tbody>
</table>
<footer>Page {{ loop.index }} of {{ loop.length }}</footer>
</section>
{% endfor %}
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Html,
    Csv,
    Pdf,
}

impl ReportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Html => mime::TEXT_HTML_UTF_8,
            Self::Csv => mime::TEXT_CSV_UTF_8,
            Self::Pdf => mime::APPLICATION_PDF,
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!(
                "unsupported report format '{other}' (expected html, csv or pdf)"
            )),
        }
    }
}

/// A rendered report ready to be served or written to disk.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Timestamped name used when the document is persisted.
    pub file_name: String,
    /// Name suggested to clients downloading the document.
    pub download_name: String,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    pub fn content_type(&self) -> mime::Mime {
        self.format.content_type()
    }

    pub fn persist(&self, directory: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(directory)?;
        let path = directory.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("report template failed: {0}")]
    Template(#[from] minijinja::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export could not be flushed: {0}")]
    Flush(String),
    #[error("pdf export failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    rows_per_page: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self { rows_per_page: 25 }
    }
}

impl ReportRenderer {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn render(
        &self,
        data: &ReportData,
        format: ReportFormat,
        generated_at: DateTime<Local>,
    ) -> Result<ReportDocument, RenderError> {
        let bytes = match format {
            ReportFormat::Html => self.render_html(data, generated_at)?.into_bytes(),
            ReportFormat::Csv => render_csv(&data.rows)?,
            ReportFormat::Pdf => {
                let heading = Heading {
                    title: REPORT_TITLE,
                    subtitle: REPORT_SUBTITLE,
                    generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
                };
                render_pdf(data, &heading, self.rows_per_page)?
            }
        };

        Ok(ReportDocument {
            file_name: format!(
                "simulation_{}.{}",
                generated_at.format("%Y%m%d_%H%M%S"),
                format.extension()
            ),
            download_name: format!(
                "callup_{}_seats.{}",
                data.summary.requested_seats,
                format.extension()
            ),
            format,
            bytes,
        })
    }

    fn render_html(
        &self,
        data: &ReportData,
        generated_at: DateTime<Local>,
    ) -> Result<String, RenderError> {
        let mut env = Environment::new();
        env.add_template("report.html", REPORT_TEMPLATE)?;
        let template = env.get_template("report.html")?;

        let pages: Vec<&[ReportRow]> = data.rows.chunks(self.rows_per_page).collect();
        let rendered = template.render(context! {
            title => REPORT_TITLE,
            subtitle => REPORT_SUBTITLE,
            generated_at => Value::from_safe_string(
                generated_at.format(TIMESTAMP_FORMAT).to_string()
            ),
            summary => &data.summary,
            pages => pages,
        })?;

        Ok(rendered)
    }
}

fn render_csv(rows: &[ReportRow]) -> Result<Vec<u8>, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "index",
        "registration_id",
        "name",
        "track",
        "general_rank",
        "quota_rank",
        "note",
    ])?;

    for row in rows {
        let index = row.index.to_string();
        writer.write_record([
            index.as_str(),
            row.registration_id.as_str(),
            row.name.as_str(),
            row.track_label,
            row.general_rank.as_str(),
            row.quota_rank.as_str(),
            row.note,
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| RenderError::Flush(err.to_string()))
}
