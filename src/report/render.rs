use chrono::{DateTime, Local};

use crate::intake::catalog::{FieldKey, SECTIONS};
use crate::intake::Profile;

pub const REPORT_SUBJECT: &str = "Business Information Form Report";

const NA: &str = "N/A";

/// Plain-text report of everything collected in `profile`.
pub fn render_report(profile: &Profile, generated_at: DateTime<Local>) -> String {
    let heavy = "=".repeat(50);
    let light = "-".repeat(50);
    let field = |key: FieldKey| profile.get(key).unwrap_or(NA);

    let mut report = String::new();
    report.push_str("BUSINESS INFORMATION FORM REPORT\n");
    report.push_str(&format!("{heavy}\n\n"));
    report.push_str(&format!(
        "Date: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    report.push_str(&format!("COMPANY INFORMATION\n{light}\n"));
    report.push_str(&format!("Company Name: {}\n", field(FieldKey::CompanyName)));
    report.push_str(&format!("Business Sphere: {}\n", field(FieldKey::Sphere)));
    report.push_str(&format!("Location: {}\n\n", field(FieldKey::Location)));

    report.push_str(&format!("PERSONAL INFORMATION\n{light}\n"));
    report.push_str(&format!("Preferred Language: {}\n", field(FieldKey::Language)));
    report.push_str(&format!("Education: {}\n", field(FieldKey::Education)));
    report.push_str(&format!("Experience: {}\n\n", field(FieldKey::Experience)));

    report.push_str(&format!("CONTACT INFORMATION\n{light}\n"));
    report.push_str(&format!("Email: {}\n\n", profile.email().unwrap_or(NA)));

    for section in &SECTIONS {
        let answered: Vec<_> = section
            .core_questions
            .iter()
            .chain(section.optional_questions)
            .filter_map(|q| profile.get(q.key).map(|answer| (q.label, answer)))
            .collect();
        if answered.is_empty() {
            continue;
        }
        report.push_str(&format!("{}\n{light}\n", section.title.to_uppercase()));
        for (label, answer) in answered {
            report.push_str(&format!("{label}:\n{answer}\n\n"));
        }
    }

    report.push_str(&format!("{heavy}\n\n"));
    report.push_str("This report was generated automatically by the Business Form Assistant.\n");
    report.push_str("Thank you for providing your information!\n");
    report
}
