//! Static HTML rendering of the cumulative report.
//!
//! The page is a self-contained snapshot regenerated in full on every save;
//! it is never patched incrementally.

use std::fs;
use std::path::Path;

use seqgate::{AccumulatedReport, StatusTier, ValidationRecord};

/// Render the report to a complete HTML document.
pub fn render(report: &AccumulatedReport) -> String {
    let mut rows = String::new();
    for record in &report.records {
        rows.push_str(&render_row(record));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Seqgate Validation Report</title>
<style>
  body {{ font-family: system-ui, sans-serif; margin: 2em; color: #222; }}
  h1 {{ font-size: 1.4em; }}
  .summary {{ display: flex; gap: 1em; margin: 1em 0; }}
  .box {{ padding: 0.8em 1.4em; border-radius: 6px; text-align: center; }}
  .box .count {{ font-size: 1.6em; font-weight: bold; }}
  .pass {{ background: #e6f4ea; color: #137333; }}
  .warn {{ background: #fef7e0; color: #b06000; }}
  .fail {{ background: #fce8e6; color: #c5221f; }}
  table {{ border-collapse: collapse; width: 100%; }}
  th, td {{ text-align: left; padding: 0.5em 0.8em; border-bottom: 1px solid #ddd; }}
  th {{ background: #f8f9fa; }}
  .tier {{ font-weight: bold; }}
  ul.diag {{ margin: 0.2em 0; padding-left: 1.2em; font-size: 0.9em; }}
  li.advisory {{ color: #666; }}
  .meta {{ color: #666; font-size: 0.85em; }}
</style>
</head>
<body>
<h1>Seqgate Validation Report</h1>
<p class="meta">Version {version} &middot; generated {generated}</p>
<div class="summary">
  <div class="box pass"><div class="count">{pass}</div>PASS</div>
  <div class="box warn"><div class="count">{warn}</div>WARN</div>
  <div class="box fail"><div class="count">{fail}</div>FAIL</div>
</div>
<p>{total} sample(s) total</p>
<table>
<thead>
<tr><th>Sample</th><th>Format</th><th>Status</th><th>Size (bytes)</th><th>Diagnostics</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
        version = escape(&report.version),
        generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        pass = report.summary.pass,
        warn = report.summary.warn,
        fail = report.summary.fail,
        total = report.total_samples,
        rows = rows,
    )
}

/// Render the report and write it to `path`.
pub fn save(report: &AccumulatedReport, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render(report))?;
    Ok(())
}

fn render_row(record: &ValidationRecord) -> String {
    let tier_class = match record.status_tier {
        StatusTier::Pass => "pass",
        StatusTier::Warn => "warn",
        StatusTier::Fail => "fail",
    };

    let mut items = String::new();
    for finding in &record.diagnostics {
        items.push_str(&format!("<li>{}</li>", escape(finding)));
    }
    for advisory in &record.advisories {
        items.push_str(&format!("<li class=\"advisory\">{}</li>", escape(advisory)));
    }
    let diagnostics = if items.is_empty() {
        "&mdash;".to_string()
    } else {
        format!("<ul class=\"diag\">{}</ul>", items)
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td class=\"tier {}\">{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&record.sample_identity),
        record.format_kind.label(),
        tier_class,
        record.status_tier.label(),
        record.byte_size,
        diagnostics,
    )
}

/// Minimal HTML escaping for text interpolated into the document.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqgate::{Diagnostics, FormatDetails, FormatKind, ValidationRecord};
    use std::path::Path;

    fn report_with(findings: usize) -> AccumulatedReport {
        let mut diag = Diagnostics::new();
        for i in 0..findings {
            diag.push(format!("line {}: <bad> value", i));
        }
        let record = ValidationRecord::assemble(
            "sample_a",
            FormatKind::CountMatrix,
            Path::new("/data/sample_a.tsv"),
            diag,
            FormatDetails::none(),
        );
        let mut report = AccumulatedReport::new();
        report.merge(vec![record]);
        report
    }

    #[test]
    fn test_render_is_complete_document() {
        let html = render(&report_with(0));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("sample_a"));
        assert!(html.contains("PASS"));
    }

    #[test]
    fn test_diagnostics_are_escaped() {
        let html = render(&report_with(1));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(!html.contains("<bad>"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");
        save(&report_with(0), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Seqgate"));
    }
}
