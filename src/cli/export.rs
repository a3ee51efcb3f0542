//! Saving research runs to disk
//!
//! `deepr-server research --output <dir>` writes the full result, the report
//! on its own, and a Markdown rendering of the report.

use crate::research::ResearchResult;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Paths written by [`save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFiles {
    pub result_json: PathBuf,
    pub report_json: PathBuf,
    pub report_markdown: PathBuf,
}

/// Local time formatted for file names, e.g. `2024-05-01_13-45-10`.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Write `research_<ts>.json`, `report_<ts>.json` and `report_<ts>.md`
/// into `dir`, creating it if needed.
pub fn save(dir: &Path, result: &ResearchResult, timestamp: &str) -> io::Result<SavedFiles> {
    fs::create_dir_all(dir)?;

    let files = SavedFiles {
        result_json: dir.join(format!("research_{timestamp}.json")),
        report_json: dir.join(format!("report_{timestamp}.json")),
        report_markdown: dir.join(format!("report_{timestamp}.md")),
    };

    fs::write(&files.result_json, serde_json::to_string_pretty(result)?)?;
    fs::write(&files.report_json, serde_json::to_string_pretty(&result.report)?)?;
    fs::write(&files.report_markdown, report_markdown(result))?;

    Ok(files)
}

pub fn report_markdown(result: &ResearchResult) -> String {
    let report = &result.report;
    let validation = &result.validation;
    let mut md = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(md, "# {}\n", report.title);
    let _ = writeln!(md, "**Research Query:** {}\n", result.query);
    let _ = writeln!(md, "---\n\n## Summary\n\n{}\n", report.summary);

    md.push_str("---\n\n## Key Findings\n\n");
    for (i, finding) in report.key_findings.iter().enumerate() {
        let _ = writeln!(md, "{}. {finding}\n", i + 1);
    }

    md.push_str("---\n\n## Sources\n\n");
    for (i, source) in report.sources.iter().enumerate() {
        let _ = writeln!(md, "{}. [{source}]({source})", i + 1);
    }

    let _ = writeln!(md, "\n---\n\n## Limitations\n\n{}\n", report.limitations);

    md.push_str("---\n\n## Quality Validation\n\n");
    let _ = writeln!(md, "- **Valid:** {}", validation.is_valid());
    let _ = writeln!(
        md,
        "- **Confidence Score:** {:.2}",
        validation.confidence_score()
    );

    if !validation.issues_found().is_empty() {
        md.push_str("\n**Issues Found:**\n\n");
        for issue in validation.issues_found() {
            let _ = writeln!(md, "- {issue}");
        }
    }

    if !validation.recommendations().is_empty() {
        md.push_str("\n**Recommendations:**\n\n");
        for recommendation in validation.recommendations() {
            let _ = writeln!(md, "- {recommendation}");
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::demo::demo_research_result;
    use crate::research::ValidationResult;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_three_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("outputs");
        let result = demo_research_result("quantum").unwrap();

        let files = save(&out, &result, "2024-05-01_13-45-10").unwrap();

        assert_eq!(
            files.result_json,
            out.join("research_2024-05-01_13-45-10.json")
        );
        let saved: ResearchResult =
            serde_json::from_str(&fs::read_to_string(&files.result_json).unwrap()).unwrap();
        assert_eq!(saved, result);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.report_json).unwrap()).unwrap();
        assert_eq!(report["title"], result.report.title.as_str());

        let markdown = fs::read_to_string(&files.report_markdown).unwrap();
        assert_eq!(markdown, report_markdown(&result));
    }

    #[test]
    fn test_markdown_sections() {
        let result = demo_research_result("my question").unwrap();
        let md = report_markdown(&result);

        assert!(md.starts_with(&format!("# {}\n", result.report.title)));
        assert!(md.contains("**Research Query:** my question"));
        assert!(md.contains(&format!("1. {}\n", result.report.key_findings[0])));
        let source = &result.report.sources[0];
        assert!(md.contains(&format!("1. [{source}]({source})")));
        assert!(md.contains("- **Valid:** true"));
        assert!(md.contains("- **Confidence Score:** 0.85"));
        assert!(md.contains("**Issues Found:**"));
        assert!(md.contains("**Recommendations:**"));
    }

    #[test]
    fn test_markdown_omits_empty_validation_lists() {
        let mut result = demo_research_result("q").unwrap();
        result.validation = ValidationResult::new(false, 0.3, vec![], vec![]).unwrap();

        let md = report_markdown(&result);
        assert!(md.contains("- **Valid:** false"));
        assert!(md.contains("- **Confidence Score:** 0.30"));
        assert!(!md.contains("**Issues Found:**"));
        assert!(!md.contains("**Recommendations:**"));
    }
}
