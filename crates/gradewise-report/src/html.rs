//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use gradewise_core::model::Exam;
use gradewise_core::statistics::ExamStats;
use gradewise_core::submission::{LetterGrade, Submission, SubmissionSet};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report for a graded set of submissions.
///
/// `exam` supplies the question texts and per-question statistics; it should
/// be the exam the set was graded against.
pub fn generate_html(set: &SubmissionSet, exam: &Exam) -> String {
    let stats = ExamStats::compute(exam, &set.submissions);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradewise report: {}</title>\n",
        html_escape(&set.exam.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gradewise report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Exam: <strong>{}</strong> ({}) | {} questions | {} marks | {} submissions | {}</p>\n",
        html_escape(&set.exam.title),
        html_escape(&set.exam.id),
        set.exam.question_count,
        set.exam.total_marks,
        set.submissions.len(),
        set.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Mean</th><th>Median</th><th>Min</th><th>Max</th><th>Std Dev</th><th>Pass Rate</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.2}</td><td>{:.1}% ({}/{})</td></tr></tbody>\n",
        stats.mean_percentage,
        stats.median_percentage,
        stats.min_percentage,
        stats.max_percentage,
        stats.std_dev,
        stats.pass_rate,
        stats.pass_count,
        stats.submission_count,
    ));
    html.push_str("</table>\n");

    if stats.submission_count > 0 {
        html.push_str("<h3>Grade distribution</h3>\n");
        html.push_str(&generate_grade_chart(
            &stats.grade_distribution,
            stats.submission_count,
        ));
    }
    html.push_str("</section>\n");

    // Per-student results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Students</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Student</th><th onclick=\"sortTable(1)\">Name</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Percentage</th><th onclick=\"sortTable(4)\">Grade</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &set.submissions {
        let grade = s.letter_grade();
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{} / {}</td><td>{:.1}%</td><td>{} ({})</td></tr>\n",
            grade_class(grade),
            html_escape(&s.student_id),
            html_escape(&s.student_name),
            s.total_score,
            s.total_marks,
            s.percentage,
            grade,
            grade.description(),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-question statistics
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Question</th><th>Avg Score</th><th>Similarity</th><th>Keywords</th><th>Coherence</th><th>Blank</th><th>Most missed</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (q, qs) in exam.questions.iter().zip(&stats.questions) {
        let missed = qs
            .most_missed_keywords
            .iter()
            .map(|(k, n)| format!("{} ({n})", html_escape(k)))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<tr><td><strong>{}</strong> {}</td><td>{} / {}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&q.id),
            html_escape(&q.text),
            qs.average_score,
            qs.max_marks,
            qs.average_similarity,
            qs.average_keyword_score,
            qs.average_coherence,
            qs.no_answer_count,
            missed,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-answer breakdown
    html.push_str("<section class=\"breakdown\">\n");
    html.push_str("<h2>Answers</h2>\n");
    for s in &set.submissions {
        html.push_str(&student_breakdown(s));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(set).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(set: &SubmissionSet, exam: &Exam, path: &Path) -> Result<()> {
    let html = generate_html(set, exam);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

fn grade_class(grade: LetterGrade) -> &'static str {
    match grade {
        LetterGrade::A | LetterGrade::B => "pass",
        LetterGrade::C | LetterGrade::D => "partial",
        LetterGrade::F => "fail",
    }
}

fn student_breakdown(s: &Submission) -> String {
    let mut out = format!(
        "<details>\n<summary>{} ({}): {:.1}%</summary>\n",
        html_escape(&s.student_name),
        html_escape(&s.student_id),
        s.percentage
    );
    out.push_str("<table>\n");
    out.push_str("<thead><tr><th>Question</th><th>Answer</th><th>Score</th><th>Feedback</th></tr></thead>\n<tbody>\n");
    for r in &s.results {
        let overridden = if r.overridden {
            " <span class=\"tag\">overridden</span>"
        } else {
            ""
        };
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{} / {}{}</td><td>{}</td></tr>\n",
            html_escape(&r.question_id),
            html_escape(&r.answer_text),
            r.result.score,
            r.result.max_marks,
            overridden,
            html_escape(&r.result.feedback),
        ));
    }
    out.push_str("</tbody></table>\n</details>\n");
    out
}

fn generate_grade_chart(distribution: &BTreeMap<LetterGrade, usize>, total: usize) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 60;

    let total_height = distribution.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (grade, count)) in distribution.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = *count as f64 / total.max(1) as f64;
        let width = (share * max_width as f64) as usize;

        let color = match grade_class(*grade) {
            "pass" => "#22c55e",
            "partial" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            grade
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{} ({:.0}%)</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count,
            share * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --partial: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --partial: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.partial { background: var(--partial); }
.fail { background: var(--fail); }
.tag { font-size: 0.75rem; padding: 0 0.4rem; border: 1px solid currentColor; border-radius: 4px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
