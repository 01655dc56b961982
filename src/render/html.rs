// src/render/html.rs
//! Standalone HTML document for preview and the HTML export

use std::collections::HashMap;
use std::fmt::Write;

use super::customization::Customization;
use crate::core::template_engine::{
    BulletStyle, HeaderStyle, Layout, PhotoPosition, Section, SkillStyle, TemplateEngine,
    TemplateInfo, TemplateStyle,
};
use crate::types::CvRecord;

pub fn escape_html(text: &str) -> String {
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

/// Only web and inline image URLs are embedded.
fn safe_photo_url(url: &str) -> Option<&str> {
    let url = url.trim();
    let allowed = url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with("data:image/png;base64,")
        || url.starts_with("data:image/jpeg;base64,");
    allowed.then_some(url)
}

pub fn render_html(
    record: &CvRecord,
    template: &TemplateInfo,
    customization: &Customization,
    photo_url: Option<&str>,
) -> String {
    let style = customization.apply(&template.style);
    let photo = photo_url
        .and_then(safe_photo_url)
        .filter(|_| style.photo_position != PhotoPosition::None);

    let css = build_css(&style);
    let header = render_header(record, &style, photo);
    let body = render_body(record, &style);

    if let Some(skeleton) = &template.skeleton {
        let vars: HashMap<String, String> = [
            ("name", escape_html(&record.header.name)),
            ("title", escape_html(&record.header.title)),
            ("contact", escape_html(&contact_line(record))),
            ("header", header),
            ("body", body),
            ("style", css),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        return TemplateEngine::process_variables(skeleton, &vars);
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - CV</title>\n<style>\n{}</style>\n</head>\n<body>\n\
         <div id=\"cv-preview\" class=\"cv template-{} layout-{}\">\n{}{}</div>\n</body>\n</html>\n",
        escape_html(&record.header.name),
        css,
        escape_html(&template.id),
        layout_class(style.layout),
        header,
        body
    )
}

pub(crate) fn contact_line(record: &CvRecord) -> String {
    [
        &record.header.email,
        &record.header.phone,
        &record.header.location,
    ]
    .iter()
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" | ")
}

fn layout_class(layout: Layout) -> &'static str {
    match layout {
        Layout::Header => "header",
        Layout::Left => "left",
        Layout::TwoCol => "two-col",
        Layout::Center => "center",
        Layout::Timeline => "timeline",
    }
}

/// A 10% alpha version of `accent`. Short hex is widened first so the alpha
/// pair lands in the right place; other CSS colours go through `color-mix`.
fn accent_tint(accent: &str) -> String {
    let accent = accent.trim();
    let hex = accent.strip_prefix('#').filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()));

    match hex {
        Some(h) if h.len() == 3 => {
            let wide: String = h.chars().flat_map(|c| [c, c]).collect();
            format!("#{}1a", wide)
        }
        Some(h) if h.len() == 6 => format!("#{}1a", h),
        _ => format!("color-mix(in srgb, {} 10%, transparent)", accent),
    }
}

fn build_css(style: &TemplateStyle) -> String {
    let p = &style.palette;
    let mut css = String::new();
    let _ = writeln!(
        css,
        "body {{ margin: 0; background: #e5e7eb; }}\n\
         .cv {{ max-width: 56rem; margin: 0 auto; padding: 3rem; background: {bg}; color: {text}; font-family: {font}; line-height: 1.5; }}\n\
         .cv h1 {{ margin: 0; font-size: 2.5rem; }}\n\
         .cv .headline {{ color: {accent}; font-size: 1.4rem; font-weight: 600; margin: 0.25rem 0; }}\n\
         .cv .contact {{ font-size: 0.9rem; opacity: 0.8; }}\n\
         .cv .photo {{ width: 8rem; height: 8rem; border-radius: 50%; object-fit: cover; }}\n\
         .cv section {{ margin-top: 1.75rem; }}\n\
         .cv h3 {{ color: {accent}; text-transform: uppercase; letter-spacing: 0.05em; font-size: 1rem; }}\n\
         .cv .role {{ margin-bottom: 1rem; }}\n\
         .cv .role-head {{ display: flex; justify-content: space-between; font-weight: 600; }}\n\
         .cv .company {{ color: {accent}; }}\n\
         .cv ul.bullets {{ list-style: none; padding-left: 1rem; margin: 0.25rem 0; }}\n\
         .cv .pill {{ display: inline-block; padding: 0.15rem 0.6rem; margin: 0.15rem; border-radius: 999px; background: {tint}; border: 1px solid {accent}; }}",
        bg = p.background,
        text = p.text,
        font = style.font_family,
        accent = p.accent,
        tint = accent_tint(&p.accent),
    );

    let marker = style.bullet_style.marker();
    if style.bullet_style != BulletStyle::None {
        let _ = writeln!(
            css,
            ".cv ul.bullets li::before {{ content: \"{} \"; color: {}; }}",
            marker, p.accent
        );
    }

    let header_rule = match style.header_style {
        HeaderStyle::Stripe => format!(
            ".cv header {{ border-left: 6px solid {a}; padding-left: 1rem; }}",
            a = p.accent
        ),
        HeaderStyle::Boxed => format!(
            ".cv header {{ border: 2px solid {a}; border-radius: 0.5rem; padding: 1.25rem; }}",
            a = p.accent
        ),
        HeaderStyle::Centered => ".cv header { text-align: center; }".to_string(),
        HeaderStyle::Underline => format!(
            ".cv header {{ border-bottom: 4px solid {a}; padding-bottom: 1.5rem; }}",
            a = p.accent
        ),
    };
    let _ = writeln!(css, "{}", header_rule);

    let layout_rule = match style.layout {
        Layout::Header => "",
        Layout::Center => ".cv { text-align: center; } .cv ul.bullets { display: inline-block; text-align: left; }",
        Layout::Left | Layout::TwoCol => {
            ".cv .columns { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }"
        }
        Layout::Timeline => ".cv .role { border-left: 2px solid currentColor; padding-left: 1rem; }",
    };
    if !layout_rule.is_empty() {
        let _ = writeln!(css, "{}", layout_rule);
    }
    if style.layout == Layout::Left {
        let _ = writeln!(css, ".cv .columns {{ grid-template-columns: 1fr 2fr; }} .cv .columns aside {{ order: -1; }}");
    }
    if style.skills_background {
        let _ = writeln!(
            css,
            ".cv section.skills {{ background: {}10; padding: 1rem; border-radius: 0.5rem; }}",
            p.accent
        );
    }
    css
}

fn render_header(record: &CvRecord, style: &TemplateStyle, photo: Option<&str>) -> String {
    let mut html = String::from("<header>\n");
    let photo_tag = photo.map(|url| {
        format!(
            "<img class=\"photo photo-{}\" src=\"{}\" alt=\"{}\">\n",
            format!("{:?}", style.photo_position).to_lowercase(),
            escape_html(url),
            escape_html(&record.header.name)
        )
    });

    if let Some(tag) = photo_tag.as_deref() {
        if matches!(style.photo_position, PhotoPosition::Top | PhotoPosition::Left) {
            html.push_str(tag);
        }
    }
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&record.header.name));
    if !record.header.title.trim().is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"headline\">{}</p>",
            escape_html(&record.header.title)
        );
    }
    let contact = contact_line(record);
    if !contact.is_empty() {
        let _ = writeln!(html, "<p class=\"contact\">{}</p>", escape_html(&contact));
    }
    if let Some(tag) = photo_tag.as_deref() {
        if style.photo_position == PhotoPosition::Right {
            html.push_str(tag);
        }
    }
    html.push_str("</header>\n");
    html
}

fn render_body(record: &CvRecord, style: &TemplateStyle) -> String {
    let render = |section: &Section| render_section(record, style, *section);

    let mut body = match style.layout {
        Layout::Left | Layout::TwoCol => {
            let (main, side): (Vec<&Section>, Vec<&Section>) = style
                .section_order
                .iter()
                .partition(|s| matches!(s, Section::Summary | Section::Experience));
            let main: String = main.into_iter().filter_map(render).collect();
            let side: String = side.into_iter().filter_map(render).collect();
            format!(
                "<div class=\"columns\">\n<main>\n{}</main>\n<aside>\n{}</aside>\n</div>\n",
                main, side
            )
        }
        _ => style.section_order.iter().filter_map(render).collect(),
    };

    for (title, class, items) in [
        ("Certifications", "certifications", &record.certifications),
        ("Languages", "languages", &record.languages),
        ("Projects", "projects", &record.projects),
    ] {
        if let Some(section) = render_lines(title, class, items) {
            body.push_str(&section);
        }
    }
    body
}

fn render_section(record: &CvRecord, style: &TemplateStyle, section: Section) -> Option<String> {
    match section {
        Section::Summary => {
            let summary = record.summary.trim();
            (!summary.is_empty()).then(|| {
                format!(
                    "<section class=\"summary\">\n<h3>Professional Summary</h3>\n<p>{}</p>\n</section>\n",
                    escape_html(summary)
                )
            })
        }
        Section::Experience => {
            if record.experience.is_empty() {
                return None;
            }
            let mut html = String::from("<section class=\"experience\">\n<h3>Experience</h3>\n");
            for exp in &record.experience {
                let _ = write!(
                    html,
                    "<div class=\"role\">\n<div class=\"role-head\"><span>{}</span><span class=\"dates\">{}</span></div>\n\
                     <div class=\"company\">{}</div>\n",
                    escape_html(&exp.title),
                    escape_html(&exp.dates),
                    escape_html(&exp.company)
                );
                html.push_str(&bullet_list(&exp.bullets));
                html.push_str("</div>\n");
            }
            html.push_str("</section>\n");
            Some(html)
        }
        Section::Education => {
            if record.education.is_empty() {
                return None;
            }
            let mut html = String::from("<section class=\"education\">\n<h3>Education</h3>\n");
            for edu in &record.education {
                let degree = if edu.field.trim().is_empty() {
                    escape_html(&edu.degree)
                } else {
                    format!("{} in {}", escape_html(&edu.degree), escape_html(&edu.field))
                };
                let _ = write!(
                    html,
                    "<div class=\"role\">\n<div class=\"role-head\"><span>{}</span><span class=\"dates\">{}</span></div>\n\
                     <div class=\"company\">{}</div>\n",
                    degree,
                    escape_html(&edu.graduation_date),
                    escape_html(&edu.school)
                );
                if !edu.gpa.trim().is_empty() {
                    let _ = writeln!(html, "<div class=\"gpa\">GPA: {}</div>", escape_html(&edu.gpa));
                }
                html.push_str("</div>\n");
            }
            html.push_str("</section>\n");
            Some(html)
        }
        Section::Skills => {
            if record.skills.is_empty() {
                return None;
            }
            let mut html = String::from("<section class=\"skills\">\n<h3>Skills</h3>\n");
            for category in record.skills.iter() {
                let name = escape_html(&category.name);
                match style.skill_style {
                    SkillStyle::Inline => {
                        let skills: Vec<String> =
                            category.skills.iter().map(|s| escape_html(s)).collect();
                        let _ = writeln!(html, "<p><strong>{}:</strong> {}</p>", name, skills.join(", "));
                    }
                    SkillStyle::Pills => {
                        let _ = write!(html, "<div class=\"skill-group\"><h4>{}</h4>", name);
                        for skill in &category.skills {
                            let _ = write!(html, "<span class=\"pill\">{}</span>", escape_html(skill));
                        }
                        html.push_str("</div>\n");
                    }
                    SkillStyle::List => {
                        let _ = writeln!(html, "<h4>{}</h4>", name);
                        html.push_str(&bullet_list(&category.skills));
                    }
                }
            }
            html.push_str("</section>\n");
            Some(html)
        }
    }
}

fn render_lines(title: &str, class: &str, items: &[String]) -> Option<String> {
    if items.iter().all(|i| i.trim().is_empty()) {
        return None;
    }
    Some(format!(
        "<section class=\"{}\">\n<h3>{}</h3>\n{}</section>\n",
        class,
        title,
        bullet_list(items)
    ))
}

fn bullet_list(items: &[String]) -> String {
    let items: Vec<&String> = items.iter().filter(|i| !i.trim().is_empty()).collect();
    if items.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"bullets\">\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape_html(item));
    }
    html.push_str("</ul>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExperienceEntry, Header, SkillCategories};

    fn record() -> CvRecord {
        CvRecord {
            header: Header {
                name: "Ada <Lovelace>".to_string(),
                title: "Engineer & Writer".to_string(),
                email: "ada@example.com".to_string(),
                phone: String::new(),
                location: "London".to_string(),
            },
            summary: "Builds \"analytical\" engines.".to_string(),
            experience: vec![ExperienceEntry {
                company: "Analytical Co".to_string(),
                title: "Programmer".to_string(),
                dates: "1842 - 1843".to_string(),
                bullets: vec!["Wrote <script>alert(1)</script>".to_string()],
            }],
            education: vec![],
            skills: SkillCategories::parse("Languages: Rust, Typst"),
            ..Default::default()
        }
    }

    fn template(id: &str) -> TemplateInfo {
        TemplateEngine::builtin_only().get_template(id).unwrap().clone()
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render_html(&record(), &template("modern"), &Customization::default(), None);
        assert!(html.contains("<h1>Ada &lt;Lovelace&gt;</h1>"));
        assert!(html.contains("Engineer &amp; Writer"));
        assert!(html.contains("&quot;analytical&quot;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_sections_omitted_and_order_kept() {
        let html = render_html(&record(), &template("modern"), &Customization::default(), None);
        assert!(!html.contains("<h3>Education</h3>"));
        let summary = html.find("Professional Summary").unwrap();
        let experience = html.find("<h3>Experience</h3>").unwrap();
        let skills = html.find("<h3>Skills</h3>").unwrap();
        assert!(summary < experience && experience < skills);
    }

    #[test]
    fn test_custom_section_order() {
        let mut tpl = template("modern");
        tpl.style.section_order = vec![Section::Skills, Section::Summary];
        let html = render_html(&record(), &tpl, &Customization::default(), None);
        assert!(html.find("<h3>Skills</h3>").unwrap() < html.find("Professional Summary").unwrap());
        assert!(!html.contains("<h3>Experience</h3>"));
    }

    #[test]
    fn test_contact_line_skips_blanks() {
        assert_eq!(contact_line(&record()), "ada@example.com | London");
    }

    #[test]
    fn test_photo_rules() {
        let custom = Customization::default();
        let html = render_html(&record(), &template("modern"), &custom, Some("https://x.test/me.png"));
        assert!(html.contains("src=\"https://x.test/me.png\""));

        let html = render_html(&record(), &template("modern"), &custom, Some("javascript:alert(1)"));
        assert!(!html.contains("<img"));

        // minimal has no photo slot
        let html = render_html(&record(), &template("minimal"), &custom, Some("https://x.test/me.png"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_skill_styles() {
        let mut tpl = template("modern");
        tpl.style.skill_style = SkillStyle::Pills;
        let html = render_html(&record(), &tpl, &Customization::default(), None);
        assert!(html.contains("<span class=\"pill\">Rust</span>"));

        tpl.style.skill_style = SkillStyle::Inline;
        let html = render_html(&record(), &tpl, &Customization::default(), None);
        assert!(html.contains("<strong>Languages:</strong> Rust, Typst"));
    }

    #[test]
    fn test_skeleton_receives_variables() {
        let mut tpl = template("modern");
        tpl.skeleton = Some("<html><style>{{style}}</style><h1>${name}</h1>{{body}}</html>".to_string());
        let html = render_html(&record(), &tpl, &Customization::default(), None);
        assert!(html.starts_with("<html><style>"));
        assert!(html.contains("<h1>Ada &lt;Lovelace&gt;</h1>"));
        assert!(html.contains("Professional Summary"));
    }

    #[test]
    fn test_two_column_layout_splits_sections() {
        let html = render_html(&record(), &template("cleanCard"), &Customization::default(), None);
        let aside = html.find("<aside>").unwrap();
        assert!(html.find("<h3>Experience</h3>").unwrap() < aside);
        assert!(html.find("<h3>Skills</h3>").unwrap() > aside);
    }

    #[test]
    fn test_accent_tint_widens_short_hex() {
        assert_eq!(accent_tint("#abc"), "#aabbcc1a");
        assert_eq!(accent_tint("#1E40AF"), "#1E40AF1a");
        assert_eq!(accent_tint("teal"), "color-mix(in srgb, teal 10%, transparent)");
        assert_eq!(
            accent_tint("#12345678"),
            "color-mix(in srgb, #12345678 10%, transparent)"
        );
    }
}
