//! Server-rendered HTML for the project viewer page.

use crate::view::ProjectView;
use std::fmt::Write;
use torx_domain::{ProjectId, ProjectRecord, ProjectSummary};
use torx_store::format_timestamp;

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything the page shows
pub struct Page<'a> {
    /// Projects for the selector, most recent first
    pub projects: &'a [ProjectSummary],
    /// Project currently shown
    pub selected: Option<&'a ProjectRecord>,
    /// Requested project that does not exist
    pub missing: Option<&'a ProjectId>,
}

impl Page<'_> {
    /// Render the full document
    pub fn render(&self) -> String {
        let mut body = String::new();
        body.push_str("<h1>📂 TOR Document Extraction Viewer</h1>\n<hr>\n");
        self.sidebar(&mut body);

        body.push_str("<main>\n");
        if let Some(id) = self.missing {
            let _ = writeln!(
                body,
                "<p class=\"warning\">ไม่พบโครงการ {}</p>",
                escape(id.as_str())
            );
        }
        if let Some(record) = self.selected {
            project(&mut body, record);
        }
        body.push_str("</main>\n");

        format!(
            "<!DOCTYPE html>\n<html lang=\"th\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>TOR Document Viewer</title>\n<style>{}</style>\n</head>\n\
             <body>\n{}</body>\n</html>\n",
            STYLE, body
        )
    }

    fn sidebar(&self, out: &mut String) {
        out.push_str("<aside>\n<h2>🔍 เลือกโครงการ</h2>\n");

        if self.projects.is_empty() {
            out.push_str("<p class=\"warning\">ไม่พบข้อมูลในฐานข้อมูล</p>\n");
        } else {
            let selected = self.selected.map(|r| &r.project_id);
            out.push_str(
                "<form method=\"get\" action=\"/\">\n<label for=\"project\">Project ID:</label>\n\
                 <select id=\"project\" name=\"project\" onchange=\"this.form.submit()\">\n",
            );
            for summary in self.projects {
                let id = escape(summary.project_id.as_str());
                let mark = if Some(&summary.project_id) == selected {
                    " selected"
                } else {
                    ""
                };
                let _ = writeln!(out, "<option value=\"{}\"{}>{}</option>", id, mark, id);
            }
            out.push_str("</select>\n<button type=\"submit\">เปิด</button>\n</form>\n");
        }

        out.push_str(
            "<form method=\"post\" action=\"/refresh\">\n\
             <button type=\"submit\">🔄 Refresh Data</button>\n</form>\n</aside>\n",
        );
    }
}

fn project(out: &mut String, record: &ProjectRecord) {
    let _ = writeln!(
        out,
        "<h2>📌 Project ID: {}</h2>\n<p class=\"caption\">Extraction Date: {}</p>",
        escape(record.project_id.as_str()),
        format_timestamp(record.updated_at)
    );

    match serde_json::from_str::<serde_json::Value>(&record.payload) {
        Ok(payload) => {
            sections(out, &ProjectView::from_value(&payload));
            let pretty =
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| record.payload.clone());
            raw_json(out, &pretty);
        }
        Err(e) => {
            let _ = writeln!(
                out,
                "<p class=\"warning\">Stored payload is not valid JSON: {}</p>",
                escape(&e.to_string())
            );
            raw_json(out, &record.payload);
        }
    }
}

fn sections(out: &mut String, view: &ProjectView) {
    out.push_str(
        "<section>\n<h3>🏢 1. เอกสารสำหรับนิติบุคคล</h3>\n<div class=\"columns\">\n\
         <div>\n<h4>ห้างหุ้นส่วนสามัญ/จำกัด</h4>\n",
    );
    document_list(out, &view.partnership, "📄");
    out.push_str("</div>\n<div>\n<h4>บริษัทจำกัด</h4>\n");
    document_list(out, &view.company, "📄");
    out.push_str("</div>\n</div>\n</section>\n");

    out.push_str("<section>\n<h3>👤 2. เอกสารสำหรับบุคคลธรรมดา</h3>\n");
    document_list(out, &view.individual, "👤");
    out.push_str("</section>\n");

    out.push_str("<section>\n<h3>🤝 3. เอกสารสำหรับผู้ร่วมค้า</h3>\n");
    document_list(out, &view.joint_venture, "🤝");
    out.push_str("</section>\n");

    out.push_str("<section>\n<h3>💰 4. หลักฐานแสดงฐานะการเงิน</h3>\n");
    if let Some(note) = &view.financial_note {
        let _ = writeln!(out, "<p class=\"warning\">⚠️ หมายเหตุ: {}</p>", escape(note));
    }
    if view.financial_options.is_empty() {
        out.push_str("<p class=\"caption\">ไม่มีข้อมูลทางเลือก</p>\n");
    } else {
        for (idx, option) in view.financial_options.iter().enumerate() {
            let _ = writeln!(
                out,
                "<details open>\n<summary>ทางเลือกที่ {}: {}</summary>\n\
                 <p>📄 <strong>เอกสารที่ต้องใช้:</strong> {}</p>\n</details>",
                idx + 1,
                escape(&option.condition),
                escape(&option.document)
            );
        }
    }
    out.push_str("</section>\n");

    out.push_str("<section>\n<h3>📎 5. เอกสารอื่นๆ / บัญชีเอกสาร</h3>\n");
    document_list(out, &view.general, "📎");
    out.push_str("</section>\n");
}

fn document_list(out: &mut String, docs: &[String], icon: &str) {
    out.push_str("<p><strong>รายการเอกสาร:</strong></p>\n");
    if docs.is_empty() {
        out.push_str("<p class=\"caption\">(ไม่มีรายการเอกสาร)</p>\n");
        return;
    }
    out.push_str("<ul>\n");
    for doc in docs {
        let _ = writeln!(out, "<li>{} {}</li>", icon, escape(doc));
    }
    out.push_str("</ul>\n");
}

fn raw_json(out: &mut String, text: &str) {
    let _ = writeln!(
        out,
        "<hr>\n<details>\n<summary>🛠️ View Raw JSON Data</summary>\n<pre>{}</pre>\n</details>",
        escape(text)
    );
}

const STYLE: &str = "body{font-family:sans-serif;margin:0 2rem}\
aside{float:left;width:16rem;margin-right:2rem}\
main{overflow:hidden}\
.columns{display:flex;gap:2rem}\
.warning{background:#fff4e5;padding:.5rem}\
.caption{color:#777;font-size:.9em}\
li{background:#eef5fc;margin:.25rem 0;padding:.4rem;list-style:none}\
pre{background:#f6f6f6;padding:1rem;overflow:auto}";

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, updated_at: u64) -> ProjectSummary {
        ProjectSummary {
            project_id: ProjectId::new(id),
            updated_at,
        }
    }

    fn record(id: &str, payload: &str) -> ProjectRecord {
        ProjectRecord {
            project_id: ProjectId::new(id),
            payload: payload.to_string(),
            updated_at: 0,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("สำเนา"), "สำเนา");
    }

    #[test]
    fn test_empty_store() {
        let html = Page {
            projects: &[],
            selected: None,
            missing: None,
        }
        .render();
        assert!(html.contains("ไม่พบข้อมูลในฐานข้อมูล"));
        assert!(html.contains("action=\"/refresh\""));
        assert!(!html.contains("<select"));
    }

    #[test]
    fn test_selected_project_marked() {
        let projects = [summary("b", 2), summary("a", 1)];
        let selected = record("a", r#"{"5_general_documents":{"required_documents":["x"]}}"#);
        let html = Page {
            projects: &projects,
            selected: Some(&selected),
            missing: None,
        }
        .render();

        assert!(html.contains("<option value=\"a\" selected>a</option>"));
        assert!(html.contains("<option value=\"b\">b</option>"));
        assert!(html.contains("<li>📎 x</li>"));
        assert!(html.contains("(ไม่มีรายการเอกสาร)"));
    }

    #[test]
    fn test_invalid_payload_shows_raw_text() {
        let selected = record("a", "not json <b>");
        let projects = [summary("a", 1)];
        let html = Page {
            projects: &projects,
            selected: Some(&selected),
            missing: None,
        }
        .render();

        assert!(html.contains("not valid JSON"));
        assert!(html.contains("not json &lt;b&gt;"));
    }
}
