use docx_rs::{Docx, LineSpacing, Paragraph, Run};
use std::io::Cursor;

use super::header_lines;
use crate::error::{H2Error, H2Result};
use crate::models::Report;

fn paragraph(run: Run, after: u32) -> Paragraph {
    Paragraph::new()
        .add_run(run)
        .line_spacing(LineSpacing::new().after(after))
}

/// One paragraph per content line, after a four-line header
pub fn render_docx(report: &Report) -> H2Result<Vec<u8>> {
    let [title, kind, project, content_label] = header_lines(report);

    let mut docx = Docx::new()
        .add_paragraph(paragraph(
            Run::new().add_text(title).size(32).bold().underline("single"),
            300,
        ))
        .add_paragraph(paragraph(Run::new().add_text(kind), 200))
        .add_paragraph(paragraph(Run::new().add_text(project), 200))
        .add_paragraph(paragraph(Run::new().add_text(content_label), 200));

    for line in report.content.split('\n') {
        docx = docx.add_paragraph(paragraph(Run::new().add_text(line), 100));
    }

    let mut bytes = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut bytes))
        .map_err(|e| H2Error::Internal(format!("Failed to generate DOCX: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportType;
    use chrono::Utc;
    use regex::Regex;
    use std::io::Read;

    /// Text of every paragraph in word/document.xml
    fn paragraphs(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        let para = Regex::new(r"(?s)<w:p[ >].*?</w:p>").unwrap();
        let text = Regex::new(r"(?s)<w:t[^>]*>(.*?)</w:t>").unwrap();
        para.find_iter(&xml)
            .map(|p| {
                text.captures_iter(p.as_str())
                    .map(|c| c[1].to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn report(content: &str) -> Report {
        Report {
            id: "r1".into(),
            project_id: "p1".into(),
            user_id: Some("u1".into()),
            title: "Hydrogen Storage Review".into(),
            content: content.into(),
            report_type: ReportType::Project,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn content_paragraphs_survive_round_trip() {
        let content = "Executive Summary\nThe site stores 900 kg of gaseous hydrogen.\nSetbacks follow NFPA 2 Table 7.3.2.3.1.1";
        let bytes = render_docx(&report(content)).unwrap();
        let paras = paragraphs(&bytes);

        assert_eq!(paras[0], "Report Title: Hydrogen Storage Review");
        assert_eq!(paras[1], "Type: project");
        assert_eq!(paras[2], "Project ID: p1");
        assert_eq!(paras[3], "Content:");

        let body: Vec<String> = paras[4..].iter().map(|p| p.trim().to_string()).collect();
        let expected: Vec<String> = content.split('\n').map(|l| l.trim().to_string()).collect();
        assert_eq!(body, expected);
    }

    #[test]
    fn blank_lines_become_empty_paragraphs() {
        let bytes = render_docx(&report("First\n\nThird")).unwrap();
        let paras = paragraphs(&bytes);
        assert_eq!(&paras[4..], ["First", "", "Third"]);
    }
}
