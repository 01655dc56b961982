// src/render/markdown.rs
//! Markdown rendering, the source of the Word export

use std::fmt::Write;

use super::html::contact_line;
use crate::types::CvRecord;

pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Name, title and contact line, then PROFESSIONAL SUMMARY, WORK EXPERIENCE,
/// EDUCATION and SKILLS. Empty sections are left out.
pub fn render_markdown(record: &CvRecord) -> String {
    let mut md = String::new();
    let e = escape_markdown;

    let _ = writeln!(md, "# {}\n", e(&record.header.name));
    if !record.header.title.trim().is_empty() {
        let _ = writeln!(md, "**{}**\n", e(&record.header.title));
    }
    let contact = contact_line(record);
    if !contact.is_empty() {
        let _ = writeln!(md, "{}\n", e(&contact));
    }

    if !record.summary.trim().is_empty() {
        let _ = writeln!(md, "## PROFESSIONAL SUMMARY\n\n{}\n", e(record.summary.trim()));
    }

    if !record.experience.is_empty() {
        md.push_str("## WORK EXPERIENCE\n\n");
        for exp in &record.experience {
            let _ = writeln!(md, "**{}** | {}\n", e(&exp.title), e(&exp.dates));
            if !exp.company.trim().is_empty() {
                let _ = writeln!(md, "{}\n", e(&exp.company));
            }
            push_list(&mut md, &exp.bullets);
        }
    }

    if !record.education.is_empty() {
        md.push_str("## EDUCATION\n\n");
        for edu in &record.education {
            let _ = writeln!(md, "**{}** | {}\n", e(&edu.degree), e(&edu.graduation_date));
            let _ = writeln!(md, "{}\n", e(&edu.school));
        }
    }

    if !record.skills.is_empty() {
        md.push_str("## SKILLS\n\n");
        for category in record.skills.iter() {
            let _ = writeln!(
                md,
                "{}: {}\n",
                e(&category.name),
                e(&category.skills.join(", "))
            );
        }
    }

    for (title, items) in [
        ("CERTIFICATIONS", &record.certifications),
        ("LANGUAGES", &record.languages),
        ("PROJECTS", &record.projects),
    ] {
        if items.iter().any(|i| !i.trim().is_empty()) {
            let _ = writeln!(md, "## {}\n", title);
            push_list(&mut md, items);
        }
    }

    md.trim_end().to_string() + "\n"
}

fn push_list(md: &mut String, items: &[String]) {
    let mut any = false;
    for item in items.iter().filter(|i| !i.trim().is_empty()) {
        let _ = writeln!(md, "- {}", escape_markdown(item.trim()));
        any = true;
    }
    if any {
        md.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EducationEntry, ExperienceEntry, Header, SkillCategories};

    #[test]
    fn test_word_layout() {
        let record = CvRecord {
            header: Header {
                name: "Ada Lovelace".to_string(),
                title: "Engineer".to_string(),
                email: "ada@example.com".to_string(),
                phone: "123".to_string(),
                location: "London".to_string(),
            },
            summary: "Writes programs.".to_string(),
            experience: vec![ExperienceEntry {
                company: "Analytical Co".to_string(),
                title: "Programmer".to_string(),
                dates: "1842 - 1843".to_string(),
                bullets: vec!["Wrote notes".to_string(), "Found bugs".to_string()],
            }],
            education: vec![EducationEntry {
                school: "Home".to_string(),
                degree: "Mathematics".to_string(),
                graduation_date: "1835".to_string(),
                ..Default::default()
            }],
            skills: SkillCategories::parse("Technical: Rust, Typst\nSoft: Writing"),
            ..Default::default()
        };

        let expected = "# Ada Lovelace\n\n\
**Engineer**\n\n\
ada@example.com | 123 | London\n\n\
## PROFESSIONAL SUMMARY\n\nWrites programs.\n\n\
## WORK EXPERIENCE\n\n\
**Programmer** | 1842 - 1843\n\n\
Analytical Co\n\n\
- Wrote notes\n- Found bugs\n\n\
## EDUCATION\n\n\
**Mathematics** | 1835\n\n\
Home\n\n\
## SKILLS\n\n\
Technical: Rust, Typst\n\n\
Soft: Writing\n";
        assert_eq!(render_markdown(&record), expected);
    }

    #[test]
    fn test_markdown_specials_escaped() {
        let record = CvRecord {
            header: Header {
                name: "#1 *Star*".to_string(),
                ..Default::default()
            },
            languages: vec!["C_sharp".to_string()],
            ..Default::default()
        };
        let md = render_markdown(&record);
        assert!(md.starts_with("# \\#1 \\*Star\\*\n"));
        assert!(md.contains("## LANGUAGES\n\n- C\\_sharp\n"));
        assert!(!md.contains("SUMMARY"));
    }
}
