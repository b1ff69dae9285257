//! gradewise-report: report generation for graded submissions.

pub mod html;
