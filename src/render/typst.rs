// src/render/typst.rs
//! Typst source for the PDF and PNG exports.
//!
//! User text only ever appears inside Typst string literals, never as markup.

use std::fmt::Write;

use super::customization::{is_hex_color, Customization};
use crate::core::template_engine::{
    HeaderStyle, Layout, Palette, PhotoPosition, Section, SkillStyle, TemplateInfo, TemplateStyle,
};
use crate::types::CvRecord;

const FALLBACK_FONT: &str = "Libertinus Serif";

/// A Typst string literal.
pub fn typst_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Font names from a CSS font-family list, generic families dropped.
fn font_list(css: &str) -> String {
    const GENERIC: &[&str] = &[
        "serif",
        "sans-serif",
        "monospace",
        "system-ui",
        "-apple-system",
        "cursive",
    ];
    let mut fonts: Vec<String> = css
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|f| !f.is_empty() && !GENERIC.contains(&f.to_lowercase().as_str()))
        .map(typst_string)
        .collect();
    fonts.push(typst_string(FALLBACK_FONT));
    format!("({},)", fonts.join(", "))
}

fn color(value: &str, fallback: &str) -> String {
    let value = if is_hex_color(value) { value } else { fallback };
    format!("rgb({})", typst_string(value))
}

pub fn render_typst(
    record: &CvRecord,
    template: &TemplateInfo,
    customization: &Customization,
    photo: Option<&str>,
) -> String {
    let style = customization.apply(&template.style);
    let photo = photo.filter(|_| style.photo_position != PhotoPosition::None);

    let mut doc = preamble(&style);
    doc.push_str(&header(record, &style, photo));

    match style.layout {
        Layout::Left | Layout::TwoCol => {
            let (main, side): (Vec<&Section>, Vec<&Section>) = style
                .section_order
                .iter()
                .partition(|s| matches!(s, Section::Summary | Section::Experience));
            let main: String = main.iter().filter_map(|s| section(record, &style, **s)).collect();
            let side: String = side.iter().filter_map(|s| section(record, &style, **s)).collect();
            let (first, second, columns) = if style.layout == Layout::Left {
                (side, main, "(1fr, 2fr)")
            } else {
                (main, side, "(2fr, 1fr)")
            };
            let _ = writeln!(
                doc,
                "#grid(columns: {}, gutter: 18pt,\n[\n{}],\n[\n{}],\n)",
                columns, first, second
            );
        }
        _ => {
            for s in &style.section_order {
                if let Some(body) = section(record, &style, *s) {
                    doc.push_str(&body);
                }
            }
        }
    }

    for (title, items) in [
        ("Certifications", &record.certifications),
        ("Languages", &record.languages),
        ("Projects", &record.projects),
    ] {
        let items: Vec<&String> = items.iter().filter(|i| !i.trim().is_empty()).collect();
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(doc, "#section({})", typst_string(title));
        for item in items {
            let _ = writeln!(doc, "#item({})", typst_string(item.trim()));
        }
    }
    doc
}

fn preamble(style: &TemplateStyle) -> String {
    let defaults = Palette::default();
    let p = &style.palette;
    let marker = style.bullet_style.marker();
    let item = if marker.is_empty() {
        "#let item(body) = block(spacing: 4pt, pad(left: 8pt, body))".to_string()
    } else {
        format!(
            "#let item(body) = block(spacing: 4pt, pad(left: 8pt, [#text(fill: accent, {}) #body]))",
            typst_string(marker)
        )
    };

    format!(
        "#set page(paper: \"a4\", margin: 1.6cm, fill: {bg})\n\
         #set text(font: {fonts}, size: 10pt, fill: {text})\n\
         #set par(justify: false, leading: 0.6em)\n\
         #let accent = {accent}\n\
         #let section(title) = {{\n  v(10pt)\n  text(fill: accent, weight: \"bold\", size: 11pt, upper(title))\n  v(-6pt)\n  line(length: 100%, stroke: 0.6pt + accent)\n  v(2pt)\n}}\n\
         #let role(title, dates, org) = {{\n  v(4pt)\n  grid(columns: (1fr, auto), text(weight: \"bold\", title), text(size: 9pt, dates))\n  if org != \"\" {{ text(fill: accent, org) }}\n}}\n\
         #let pill(body) = box(inset: (x: 6pt, y: 3pt), radius: 8pt, stroke: 0.6pt + accent, body)\n\
         {item}\n\n",
        bg = color(&p.background, &defaults.background),
        fonts = font_list(&style.font_family),
        text = color(&p.text, &defaults.text),
        accent = color(&p.accent, &defaults.accent),
        item = item,
    )
}

fn header(record: &CvRecord, style: &TemplateStyle, photo: Option<&str>) -> String {
    let h = &record.header;
    let contact: Vec<&str> = [&h.email, &h.phone, &h.location]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut block = format!(
        "  text(size: 24pt, weight: \"bold\", {})\n",
        typst_string(&h.name)
    );
    if !h.title.trim().is_empty() {
        let _ = writeln!(
            block,
            "  linebreak()\n  text(size: 14pt, fill: accent, {})",
            typst_string(&h.title)
        );
    }
    if !contact.is_empty() {
        let _ = writeln!(
            block,
            "  linebreak()\n  text(size: 9pt, {})",
            typst_string(&contact.join(" | "))
        );
    }

    let centered = style.header_style == HeaderStyle::Centered || style.layout == Layout::Center;
    let align = if centered { "center" } else { "left" };
    let mut out = String::new();

    let image = photo.map(|p| {
        format!(
            "box(clip: true, radius: 50%, image({}, width: 2.8cm, height: 2.8cm, fit: \"cover\"))",
            typst_string(p)
        )
    });

    match (image, style.photo_position) {
        (Some(img), PhotoPosition::Top) => {
            let _ = writeln!(out, "#align(center, {})", img);
            let _ = writeln!(out, "#align({}, {{\n{}}})", align, block);
        }
        (Some(img), PhotoPosition::Left) => {
            let _ = writeln!(
                out,
                "#grid(columns: (auto, 1fr), gutter: 14pt, {}, {{\n{}}})",
                img, block
            );
        }
        (Some(img), _) => {
            let _ = writeln!(
                out,
                "#grid(columns: (1fr, auto), gutter: 14pt, {{\n{}}}, {})",
                block, img
            );
        }
        (None, _) => {
            let _ = writeln!(out, "#align({}, {{\n{}}})", align, block);
        }
    }

    match style.header_style {
        HeaderStyle::Underline | HeaderStyle::Stripe => {
            out.push_str("#line(length: 100%, stroke: 2pt + accent)\n");
        }
        HeaderStyle::Boxed | HeaderStyle::Centered => out.push_str("#v(6pt)\n"),
    }
    out
}

fn section(record: &CvRecord, style: &TemplateStyle, section: Section) -> Option<String> {
    let mut out = String::new();
    match section {
        Section::Summary => {
            let summary = record.summary.trim();
            if summary.is_empty() {
                return None;
            }
            let _ = writeln!(out, "#section(\"Professional Summary\")");
            let _ = writeln!(out, "#text({})", typst_string(summary));
        }
        Section::Experience => {
            if record.experience.is_empty() {
                return None;
            }
            let _ = writeln!(out, "#section(\"Experience\")");
            for exp in &record.experience {
                let _ = writeln!(
                    out,
                    "#role({}, {}, {})",
                    typst_string(&exp.title),
                    typst_string(&exp.dates),
                    typst_string(&exp.company)
                );
                for bullet in exp.bullets.iter().filter(|b| !b.trim().is_empty()) {
                    let _ = writeln!(out, "#item({})", typst_string(bullet.trim()));
                }
            }
        }
        Section::Education => {
            if record.education.is_empty() {
                return None;
            }
            let _ = writeln!(out, "#section(\"Education\")");
            for edu in &record.education {
                let degree = if edu.field.trim().is_empty() {
                    edu.degree.clone()
                } else {
                    format!("{} in {}", edu.degree, edu.field)
                };
                let _ = writeln!(
                    out,
                    "#role({}, {}, {})",
                    typst_string(&degree),
                    typst_string(&edu.graduation_date),
                    typst_string(&edu.school)
                );
                if !edu.gpa.trim().is_empty() {
                    let _ = writeln!(out, "#text(size: 9pt, {})", typst_string(&format!("GPA: {}", edu.gpa.trim())));
                }
            }
        }
        Section::Skills => {
            if record.skills.is_empty() {
                return None;
            }
            let _ = writeln!(out, "#section(\"Skills\")");
            for category in record.skills.iter() {
                match style.skill_style {
                    SkillStyle::Inline => {
                        let _ = writeln!(
                            out,
                            "#block(spacing: 4pt)[#text(weight: \"bold\", {}) #text({})]",
                            typst_string(&format!("{}:", category.name)),
                            typst_string(&category.skills.join(", "))
                        );
                    }
                    SkillStyle::Pills => {
                        let pills: Vec<String> = category
                            .skills
                            .iter()
                            .map(|s| format!("pill({})", typst_string(s)))
                            .collect();
                        let _ = writeln!(
                            out,
                            "#block(spacing: 6pt)[#text(weight: \"bold\", {}) \\ #{{ ({},).join(h(4pt)) }}]",
                            typst_string(&category.name),
                            pills.join(", ")
                        );
                    }
                    SkillStyle::List => {
                        let _ = writeln!(out, "#text(weight: \"bold\", {})", typst_string(&category.name));
                        for skill in &category.skills {
                            let _ = writeln!(out, "#item({})", typst_string(skill));
                        }
                    }
                }
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TemplateEngine;
    use crate::types::{ExperienceEntry, Header, SkillCategories};

    fn record() -> CvRecord {
        CvRecord {
            header: Header {
                name: "Ada \"The Countess\" Lovelace".to_string(),
                title: "#Engineer".to_string(),
                ..Default::default()
            },
            summary: "Line one\nline two \\ with slash".to_string(),
            experience: vec![ExperienceEntry {
                company: "Analytical Co".to_string(),
                title: "Programmer".to_string(),
                dates: "1842".to_string(),
                bullets: vec!["Wrote *notes*".to_string()],
            }],
            skills: SkillCategories::parse("Core: Rust, Typst"),
            ..Default::default()
        }
    }

    fn template(id: &str) -> TemplateInfo {
        TemplateEngine::builtin_only().get_template(id).unwrap().clone()
    }

    #[test]
    fn test_typst_string_escapes() {
        assert_eq!(typst_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_user_text_only_in_strings() {
        let src = render_typst(&record(), &template("modern"), &Customization::default(), None);
        assert!(src.contains(r#""Ada \"The Countess\" Lovelace""#));
        assert!(src.contains(r##""#Engineer""##));
        assert!(src.contains(r#"#text("Line one\nline two \\ with slash")"#));
        assert!(src.contains(r#"#item("Wrote *notes*")"#));
        assert!(!src.contains("image("));
    }

    #[test]
    fn test_font_list_drops_generic_families() {
        assert_eq!(
            font_list("'Times New Roman', serif"),
            r#"("Times New Roman", "Libertinus Serif",)"#
        );
    }

    #[test]
    fn test_photo_and_palette() {
        let custom = Customization {
            accent_color: Some("#ff0000".to_string()),
            ..Default::default()
        };
        let src = render_typst(&record(), &template("modern"), &custom, Some("photo.png"));
        assert!(src.contains(r##"#let accent = rgb("#ff0000")"##));
        assert!(src.contains(r#"image("photo.png""#));

        let src = render_typst(&record(), &template("minimal"), &custom, Some("photo.png"));
        assert!(!src.contains("image("));
    }

    #[test]
    fn test_two_column_layout_uses_grid() {
        let src = render_typst(&record(), &template("cleanCard"), &Customization::default(), None);
        assert!(src.contains("#grid(columns: (2fr, 1fr)"));
        assert!(src.contains("pill(\"Rust\")"));
    }
}
