use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use thiserror::Error;

use crate::models::amount::{format_amount, format_khr};
use crate::models::invoice_form::DEFAULT_UNIT;
use crate::models::{FormErrors, InvoiceForm};

/// Resolution multiplier every export is rendered with
pub const RESOLUTION_MULTIPLIER: u32 = 2;
/// Base name used when the form has no sender code
pub const DEFAULT_FILE_STEM: &str = "invoice";

const BASE_DPI: u32 = 96;
const MISSING: &str = "N/A";
const EMPTY_NOTE: &str = "........................";

#[derive(Debug, Error)]
pub enum PdfGenerationError {
    #[error("failed to write the rendered document: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not run {program}: {source}")]
    RendererUnavailable {
        program: String,
        source: std::io::Error,
    },

    #[error("renderer exited unsuccessfully: {stderr}")]
    RendererFailed { stderr: String },
}

/// Turns a rendered document into a PDF file.
pub trait PdfExporter {
    /// Write `filename` and return where it landed
    fn export(
        &self,
        document: &str,
        filename: &str,
        resolution: u32,
    ) -> Result<PathBuf, PdfGenerationError>;
}

/// Exporter that hands the HTML document to pandoc
pub struct PandocExporter {
    output_dir: PathBuf,
    program: String,
}

impl PandocExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        // Create the output directory if it doesn't exist
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
            program: "pandoc".to_string(),
        })
    }

    /// Use a different renderer executable with pandoc's command line
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl PdfExporter for PandocExporter {
    fn export(
        &self,
        document: &str,
        filename: &str,
        resolution: u32,
    ) -> Result<PathBuf, PdfGenerationError> {
        let pdf_path = self.output_dir.join(filename);
        let html_path = pdf_path.with_extension("html");

        fs::write(&html_path, document)?;

        let output = Command::new(&self.program)
            .arg(&html_path)
            .arg("-o")
            .arg(&pdf_path)
            .arg(format!("--dpi={}", BASE_DPI * resolution))
            .output()
            .map_err(|source| PdfGenerationError::RendererUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PdfGenerationError::RendererFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(pdf_path)
    }
}

/// Result of pressing submit on the form
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was rendered
    Blocked(FormErrors),
    Exported(PathBuf),
    Failed(PdfGenerationError),
}

impl SubmitOutcome {
    /// Message for the blocking notification shown after submit
    pub fn notification(&self) -> &'static str {
        match self {
            SubmitOutcome::Blocked(_) => "Please fix the errors before submitting.",
            SubmitOutcome::Exported(_) => "Invoice submitted successfully! PDF downloaded.",
            SubmitOutcome::Failed(_) => "Failed to generate PDF. Check the log for details.",
        }
    }
}

/// Validate the form and, when it is clean, export it
pub fn submit(form: &InvoiceForm, exporter: &dyn PdfExporter) -> SubmitOutcome {
    let errors = form.validate();
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "submit blocked by validation");
        return SubmitOutcome::Blocked(errors);
    }

    let filename = pdf_filename(form);
    let document = render_document(form);

    match exporter.export(&document, &filename, RESOLUTION_MULTIPLIER) {
        Ok(path) => {
            tracing::info!(path = %path.display(), items = form.items.len(), "invoice exported");
            SubmitOutcome::Exported(path)
        }
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "PDF generation failed");
            SubmitOutcome::Failed(e)
        }
    }
}

/// `<sender code>.pdf`, or `invoice.pdf` when the code is empty
pub fn pdf_filename(form: &InvoiceForm) -> String {
    let stem = if form.sender.code.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        form.sender
            .code
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect()
    };
    format!("{stem}.pdf")
}

fn or_missing(value: &str) -> String {
    if value.is_empty() {
        MISSING.to_string()
    } else {
        escape(value)
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the printable copy of the form as a standalone HTML document
pub fn render_document(form: &InvoiceForm) -> String {
    let mut content = String::new();

    content.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    content.push_str("<title>Monthly Price List</title>\n");
    content.push_str("<style>body { font-family: \"Noto Sans Khmer\", Arial, sans-serif; width: 800px; } ");
    content.push_str("table { width: 100%; border-collapse: collapse; } ");
    content.push_str("th, td { border: 1px solid black; padding: 0.5rem; }</style>\n");
    content.push_str("</head>\n<body>\n");

    // Heading
    content.push_str("<div style=\"text-align: center;\">\n");
    content.push_str("<h1>Monthly Price List</h1>\n");
    content.push_str(&format!("<h2>{}</h2>\n", escape(&form.institution_name)));
    let preparer = if form.preparer_name.is_empty() {
        "Preparer name".to_string()
    } else {
        escape(&form.preparer_name)
    };
    content.push_str(&format!("<h3>{preparer}</h3>\n"));
    content.push_str("</div>\n\n");

    // Sender and receiver side by side
    content.push_str("<div style=\"display: flex; justify-content: space-between;\">\n");
    content.push_str("<div>\n");
    content.push_str(&format!("<p>Inventory reference code: {}</p>\n", or_missing(&form.sender.code)));
    content.push_str(&format!("<p>Address (house no., street): {}</p>\n", or_missing(&form.sender.address)));
    content.push_str(&format!("<p>Contact phone: {}</p>\n", or_missing(&form.sender.phone)));
    content.push_str("</div>\n<div>\n");
    content.push_str(&format!("<p>Inventory code: {}</p>\n", or_missing(&form.receiver.code)));
    content.push_str(&format!("<p>Address: {}</p>\n", or_missing(&form.receiver.address)));
    content.push_str(&format!("<p>Contact phone: {}</p>\n", or_missing(&form.receiver.phone)));
    content.push_str("</div>\n</div>\n\n");

    // Line items
    content.push_str("<table>\n<tr>\n");
    for heading in ["No.", "Item", "Quantity", "Unit", "Unit price", "Total", "Note"] {
        content.push_str(&format!("<th>{heading}</th>\n"));
    }
    content.push_str("</tr>\n");

    for item in &form.items {
        let unit = if item.unit.is_empty() { DEFAULT_UNIT } else { item.unit.as_str() };
        let note = if item.note.is_empty() {
            "(item type)".to_string()
        } else {
            escape(&item.note)
        };

        content.push_str("<tr>\n");
        content.push_str(&format!("<td>{}</td>\n", item.id));
        content.push_str(&format!("<td>{}</td>\n", or_missing(&item.name)));
        content.push_str(&format!("<td>{}</td>\n", format_amount(item.quantity)));
        content.push_str(&format!("<td>{}</td>\n", escape(unit)));
        content.push_str(&format!("<td>{}</td>\n", format_khr(item.price)));
        content.push_str(&format!("<td>{}</td>\n", format_khr(item.total)));
        content.push_str(&format!("<td>{note}</td>\n"));
        content.push_str("</tr>\n");
    }

    content.push_str("<tr>\n<td colspan=\"5\" style=\"text-align: right;\">Total</td>\n");
    content.push_str(&format!("<td>{}</td>\n<td></td>\n</tr>\n", format_khr(form.total)));
    content.push_str("</table>\n\n");

    // Reference notes, four per row
    content.push_str("<p>Reference numbers</p>\n");
    content.push_str("<div style=\"display: grid; grid-template-columns: 1fr 1fr 1fr 1fr;\">\n");
    for (i, note) in form.notes.iter().enumerate() {
        let text = if note.is_empty() { EMPTY_NOTE.to_string() } else { escape(note) };
        content.push_str(&format!("<p>No({}) {text}</p>\n", i + 1));
    }
    content.push_str("</div>\n\n");

    // Signatures
    let prepared_by = if form.preparer_name.is_empty() {
        "Signature".to_string()
    } else {
        escape(&form.preparer_name)
    };
    content.push_str("<div style=\"display: grid; grid-template-columns: 1fr 1fr 1fr 1fr; text-align: center;\">\n");
    for (role, line) in [
        ("Head of institution", "Signature".to_string()),
        ("Chief accountant", "Signature".to_string()),
        ("Prepared by", prepared_by),
        ("Approved", "Signature".to_string()),
    ] {
        content.push_str(&format!("<div><p>{role}</p><p>{line}</p></div>\n"));
    }
    content.push_str("</div>\n</body>\n</html>\n");

    content
}
