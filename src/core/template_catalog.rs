// src/core/template_catalog.rs
//! Built-in template styles

use super::template_engine::{
    BulletStyle as Bullet, HeaderStyle as Head, Layout, Palette, PhotoPosition as Photo,
    SkillStyle as Skill, TemplateInfo, TemplateStyle,
};

type NamedRow = (
    &'static str,
    &'static str,
    &'static str,
    Layout,
    Head,
    Bullet,
    Skill,
    Photo,
    &'static str,
    [&'static str; 3],
);

#[rustfmt::skip]
const NAMED: &[NamedRow] = &[
    ("modern", "Modern", "Clean, contemporary", Layout::Header, Head::Underline, Bullet::Arrow, Skill::Inline, Photo::Right, "Inter, system-ui", ["#2563eb", "#ffffff", "#111827"]),
    ("classic", "Classic", "Traditional, ATS", Layout::Center, Head::Centered, Bullet::Dot, Skill::List, Photo::Top, "'Times New Roman', serif", ["#374151", "#ffffff", "#111827"]),
    ("creative", "Creative", "Artistic, vibrant", Layout::Header, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Right, "Inter, system-ui", ["#9333ea", "#faf5ff", "#1f2937"]),
    ("executive", "Executive", "Premium, bold", Layout::Header, Head::Stripe, Bullet::Dash, Skill::List, Photo::Right, "Georgia, serif", ["#1e3a8a", "#ffffff", "#111827"]),
    ("minimal", "Minimal", "Ultra-clean", Layout::Center, Head::Underline, Bullet::None, Skill::Inline, Photo::None, "Inter, system-ui", ["#6b7280", "#ffffff", "#111827"]),
    ("tech", "Tech", "Dark, technical", Layout::Header, Head::Stripe, Bullet::Arrow, Skill::Pills, Photo::Right, "'Courier New', monospace", ["#22c55e", "#0f172a", "#e2e8f0"]),
    ("corporate", "Corporate", "Formal, structured", Layout::Header, Head::Underline, Bullet::Dot, Skill::List, Photo::Right, "Arial, sans-serif", ["#1d4ed8", "#ffffff", "#111827"]),
    ("elegant", "Elegant", "Refined, centered", Layout::Center, Head::Centered, Bullet::Dot, Skill::List, Photo::Top, "Garamond, serif", ["#78716c", "#fafaf9", "#1c1917"]),
    ("dynamic", "Dynamic", "Energetic, bold", Layout::Header, Head::Stripe, Bullet::Arrow, Skill::Pills, Photo::Right, "Inter, system-ui", ["#f97316", "#ffffff", "#111827"]),
    ("artistic", "Artistic", "Visual, creative", Layout::TwoCol, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Left, "Georgia, serif", ["#db2777", "#fdf2f8", "#1f2937"]),
    ("gradient", "Gradient", "Modern colors", Layout::Header, Head::Stripe, Bullet::Arrow, Skill::Pills, Photo::Right, "Inter, system-ui", ["#6366f1", "#ffffff", "#111827"]),
    ("retro", "Retro", "Vintage vibes", Layout::Header, Head::Centered, Bullet::Dash, Skill::Inline, Photo::Top, "Georgia, serif", ["#b45309", "#fefce8", "#422006"]),
    ("flat", "Flat", "Flat design", Layout::Header, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Right, "Arial, sans-serif", ["#0891b2", "#ffffff", "#111827"]),
    ("cyberpunk", "Cyberpunk", "Neon, futuristic", Layout::Header, Head::Boxed, Bullet::Arrow, Skill::Pills, Photo::Right, "monospace", ["#ec4899", "#000000", "#ffffff"]),
    ("pastel", "Pastel", "Soft, dreamy", Layout::Header, Head::Centered, Bullet::Dot, Skill::Pills, Photo::Top, "Georgia, serif", ["#a78bfa", "#fdf4ff", "#374151"]),
    ("professionalBlue", "Pro Blue", "Professional", Layout::Header, Head::Stripe, Bullet::Dot, Skill::List, Photo::Right, "Arial, sans-serif", ["#1e40af", "#ffffff", "#111827"]),
    ("modernGradient", "Gradient Pro", "Modern gradient", Layout::Header, Head::Stripe, Bullet::Arrow, Skill::Pills, Photo::Right, "Inter, system-ui", ["#8b5cf6", "#ffffff", "#111827"]),
    ("vertical", "Vertical", "Side panel", Layout::Left, Head::Boxed, Bullet::Dot, Skill::List, Photo::Left, "Arial, sans-serif", ["#0f766e", "#ffffff", "#111827"]),
    ("minimalist", "Minimalist", "Extremely minimal", Layout::Center, Head::Underline, Bullet::None, Skill::Inline, Photo::None, "Inter, system-ui", ["#000000", "#ffffff", "#000000"]),
    ("boldAccent", "Bold Accent", "High contrast", Layout::Header, Head::Stripe, Bullet::Arrow, Skill::Pills, Photo::Right, "Inter, system-ui", ["#ff6b6b", "#ffffff", "#1a1a1a"]),
    ("sidebarDark", "Sidebar Dark", "Modern dark layout", Layout::Left, Head::Boxed, Bullet::Arrow, Skill::List, Photo::Left, "Inter, system-ui", ["#60a5fa", "#1f2937", "#ffffff"]),
    ("neonFuture", "Neon", "Futuristic neon", Layout::Header, Head::Boxed, Bullet::Arrow, Skill::Pills, Photo::Right, "monospace", ["#22d3ee", "#030712", "#f9fafb"]),
    ("magazine", "Magazine", "Editorial style", Layout::TwoCol, Head::Underline, Bullet::Dot, Skill::Inline, Photo::Top, "Georgia, serif", ["#dc2626", "#ffffff", "#1f2937"]),
    ("cleanCard", "Clean Card", "Card-based modular", Layout::TwoCol, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Right, "Inter, system-ui", ["#3b82f6", "#f9fafb", "#111827"]),
    ("progressive", "Progressive", "Timeline design", Layout::Timeline, Head::Underline, Bullet::Dot, Skill::List, Photo::Left, "Inter, system-ui", ["#10b981", "#ffffff", "#111827"]),
    ("elegantGold", "Elegant Gold", "Luxury gold theme", Layout::Center, Head::Centered, Bullet::Dot, Skill::List, Photo::Top, "Garamond, serif", ["#b8860b", "#fffbeb", "#1c1917"]),
    ("techMinimal", "Tech Minimal", "Monospace tech", Layout::Header, Head::Underline, Bullet::Dash, Skill::Inline, Photo::None, "'Courier New', monospace", ["#16a34a", "#ffffff", "#111827"]),
    ("splashCreative", "Splash", "Colorful creative", Layout::Header, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Right, "Inter, system-ui", ["#ec4899", "#ffffff", "#111827"]),
    ("profileFocus", "Profile Focus", "Photo emphasis", Layout::Center, Head::Centered, Bullet::Arrow, Skill::Pills, Photo::Top, "Inter, system-ui", ["#7c3aed", "#ffffff", "#111827"]),
    ("infographic", "Infographic", "Data visualization", Layout::TwoCol, Head::Stripe, Bullet::None, Skill::Pills, Photo::Right, "Inter, system-ui", ["#f59e0b", "#ffffff", "#111827"]),
    ("geometric", "Geometric", "Bold geometric shapes", Layout::Header, Head::Boxed, Bullet::Dot, Skill::Pills, Photo::Right, "Inter, system-ui", ["#0ea5e9", "#ffffff", "#111827"]),
    ("luxuryDark", "Luxury Dark", "Premium dark", Layout::Header, Head::Stripe, Bullet::Dash, Skill::List, Photo::Right, "'Garamond', serif", ["#fbbf24", "#030712", "#f3f4f6"]),
];

type VariantRow = (
    &'static str,
    &'static str,
    &'static str,
    Layout,
    &'static str,
    Photo,
    bool,
    Bullet,
    Skill,
    Head,
);

/// Variants of the generic layout, sharing the default palette.
#[rustfmt::skip]
const VARIANTS: &[VariantRow] = &[
    ("leftProfileModern", "Left Profile Modern", "Left photo, clean headers", Layout::Left, "Inter, system-ui, -apple-system", Photo::Left, false, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("rightProfileModern", "Right Profile Modern", "Right photo, modern layout", Layout::Header, "Inter, system-ui, -apple-system", Photo::Right, false, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("centeredHeaderClassic", "Centered Header Classic", "Centered title & contact info", Layout::Center, "'Times New Roman', serif", Photo::Top, false, Bullet::Dot, Skill::List, Head::Centered),
    ("headerStripeExecutive", "Header Stripe Executive", "Top stripe with bold title", Layout::Header, "Georgia, serif", Photo::Right, false, Bullet::Dash, Skill::Inline, Head::Stripe),
    ("sidebarCompact", "Sidebar Compact", "Compact left sidebar layout", Layout::Left, "Arial, sans-serif", Photo::Left, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("timelineLeftElegant", "Timeline Left Elegant", "Left timeline for roles", Layout::Timeline, "Garamond, serif", Photo::Left, false, Bullet::Dot, Skill::List, Head::Underline),
    ("twoColBalanced", "Two Column Balanced", "Two-column distribution of sections", Layout::TwoCol, "Inter, system-ui", Photo::Right, false, Bullet::Arrow, Skill::List, Head::Centered),
    ("twoColSharp", "Two Column Sharp", "Two columns with sharp spacing", Layout::TwoCol, "Arial, sans-serif", Photo::Right, true, Bullet::Dash, Skill::Inline, Head::Boxed),
    ("infographicSimple", "Infographic Simple", "Skill bars & visual data-friendly", Layout::TwoCol, "Inter, system-ui", Photo::Right, true, Bullet::None, Skill::Pills, Head::Centered),
    ("infographicColorful", "Infographic Colorful", "Colorful charts & skill badges", Layout::TwoCol, "Inter, system-ui", Photo::Right, true, Bullet::None, Skill::Pills, Head::Stripe),
    ("magazineBold", "Magazine Bold", "Bold headings and editorial feel", Layout::Header, "'Georgia', serif", Photo::Top, true, Bullet::Dot, Skill::Inline, Head::Boxed),
    ("magazineLight", "Magazine Light", "Editorial with light spacing", Layout::Header, "'Times New Roman', serif", Photo::Top, false, Bullet::Dot, Skill::List, Head::Centered),
    ("boldAccentLeft", "Bold Accent Left", "Strong left accent color", Layout::Left, "Inter, system-ui", Photo::Left, false, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("boldAccentRight", "Bold Accent Right", "Strong right accent color", Layout::Header, "Inter, system-ui", Photo::Right, false, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("splitModern", "Split Modern", "Split page content into two clean blocks", Layout::TwoCol, "Inter, system-ui", Photo::Left, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("splitClassic", "Split Classic", "Split with classic typography", Layout::TwoCol, "'Times New Roman', serif", Photo::Right, false, Bullet::Dash, Skill::List, Head::Centered),
    ("verticalTimeline", "Vertical Timeline", "Vertical timeline for career progression", Layout::Timeline, "Inter, system-ui", Photo::Left, false, Bullet::Dot, Skill::List, Head::Underline),
    ("retroSimple", "Retro Simple", "Vintage fonts and retro layout", Layout::Header, "'Courier New', monospace", Photo::Top, false, Bullet::Dash, Skill::Inline, Head::Centered),
    ("retroBold", "Retro Bold", "Bold retro styling", Layout::Header, "'Courier New', monospace", Photo::Top, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("pastelSoft", "Pastel Soft", "Soft colors and gentle spacing", Layout::Header, "Georgia, serif", Photo::Top, true, Bullet::Dot, Skill::List, Head::Centered),
    ("minimalistWhitespace", "Minimalist Whitespace", "Much whitespace, minimal decorations", Layout::Center, "Inter, system-ui", Photo::None, false, Bullet::None, Skill::Inline, Head::Centered),
    ("luxuryGoldAccent", "Luxury Gold Accent", "Gold accents and luxury typography", Layout::Header, "'Garamond', serif", Photo::Right, false, Bullet::Dot, Skill::List, Head::Boxed),
    ("luxuryDarkClassic", "Luxury Dark Classic", "Dark luxury layout for executives", Layout::Header, "'Times New Roman', serif", Photo::Right, false, Bullet::Dash, Skill::List, Head::Stripe),
    ("techMonospace", "Tech Monospace", "Monospace font with micro spacing", Layout::Header, "'Courier New', monospace", Photo::Top, true, Bullet::Dot, Skill::Inline, Head::Centered),
    ("techDarkMinimal", "Tech Dark Minimal", "Dark, minimal layout for engineering CVs", Layout::Header, "Inter, system-ui", Photo::Right, true, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("corporateSimple", "Corporate Simple", "Professional corporate layout", Layout::Header, "Arial, sans-serif", Photo::Right, false, Bullet::Dot, Skill::List, Head::Underline),
    ("corporateClassic", "Corporate Classic", "Formal corporate classic layout", Layout::Header, "'Times New Roman', serif", Photo::Right, false, Bullet::Dash, Skill::List, Head::Centered),
    ("cleanCardSoft", "Clean Card Soft", "Card-based modular sections with soft edges", Layout::TwoCol, "Inter, system-ui", Photo::Right, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("cleanCardSharp", "Clean Card Sharp", "Sharp card-based modular layout", Layout::TwoCol, "Arial, sans-serif", Photo::Right, true, Bullet::Arrow, Skill::Pills, Head::Boxed),
    ("progressiveTimeline", "Progressive Timeline", "Progressive, timeline-style layout for careers", Layout::Timeline, "Inter, system-ui", Photo::Left, false, Bullet::Dot, Skill::List, Head::Underline),
    ("geometricShapes", "Geometric Shapes", "Geometric accents & shapes", Layout::Header, "Inter, system-ui", Photo::Right, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("profileFocusLarge", "Profile Focus Large", "Large profile image and personality", Layout::Header, "Inter, system-ui", Photo::Top, false, Bullet::Arrow, Skill::Inline, Head::Centered),
    ("photoLeftCompact", "Photo Left Compact", "Compact with left photo and compact header", Layout::Left, "Inter, system-ui", Photo::Left, false, Bullet::Dot, Skill::Inline, Head::Stripe),
    ("photoRightCompact", "Photo Right Compact", "Compact with right photo and compact header", Layout::Header, "Inter, system-ui", Photo::Right, false, Bullet::Dot, Skill::Inline, Head::Stripe),
    ("verticalSidebar", "Vertical Sidebar", "Vertical sidebar for contact and skills", Layout::Left, "Arial, sans-serif", Photo::Left, true, Bullet::Dot, Skill::List, Head::Boxed),
    ("photoCenteredLarge", "Photo Centered Large", "Large centered photo with focused header", Layout::Center, "Inter, system-ui", Photo::Top, false, Bullet::Arrow, Skill::Inline, Head::Centered),
    ("elegantSerif", "Elegant Serif", "Serif elegant look with traditional spacing", Layout::Header, "Garamond, serif", Photo::Right, false, Bullet::Dot, Skill::List, Head::Underline),
    ("neatSans", "Neat Sans", "San-serif focused modern layout", Layout::Header, "Inter, system-ui", Photo::Right, false, Bullet::Arrow, Skill::Inline, Head::Stripe),
    ("executiveTwoPanel", "Executive Two-Panel", "Executive layout with two panels and summary", Layout::TwoCol, "'Times New Roman', serif", Photo::Right, false, Bullet::Dash, Skill::List, Head::Boxed),
    ("verticalBold", "Vertical Bold", "Bold vertical layout emphasizing dates and roles", Layout::Timeline, "Arial, sans-serif", Photo::Left, false, Bullet::Dash, Skill::Inline, Head::Underline),
    ("timelineDots", "Timeline Dots", "Timeline with dot markers", Layout::Timeline, "Inter, system-ui", Photo::Left, false, Bullet::Dot, Skill::List, Head::Centered),
    ("highlightedSkills", "Highlighted Skills", "Skill blocks with highlighted background", Layout::Header, "Inter, system-ui", Photo::Right, true, Bullet::Arrow, Skill::Pills, Head::Boxed),
    ("skillsPills", "Skills Pills", "Skills shown as rounded pills", Layout::Header, "Inter, system-ui", Photo::Right, true, Bullet::None, Skill::Pills, Head::Stripe),
    ("skillsLabels", "Skills Labels", "Skills grouped with labels", Layout::Header, "Inter, system-ui", Photo::Right, true, Bullet::Dot, Skill::List, Head::Centered),
    ("skillsBar", "Skills Bar", "Visual skill bars (simple)", Layout::TwoCol, "Inter, system-ui", Photo::Right, true, Bullet::None, Skill::Pills, Head::Boxed),
    ("academicClassic", "Academic Classic", "Academic style with publications & honors", Layout::Header, "'Times New Roman', serif", Photo::None, false, Bullet::Dash, Skill::List, Head::Centered),
    ("academicMinimal", "Academic Minimal", "Minimal academic CV with ample whitespace", Layout::Center, "Garamond, serif", Photo::None, false, Bullet::None, Skill::List, Head::Centered),
    ("startupFounder", "Startup Founder", "Founder layout emphasizing impact & product", Layout::Header, "Inter, system-ui", Photo::Top, true, Bullet::Arrow, Skill::Pills, Head::Boxed),
    ("creativeDesigner", "Creative Designer", "Visual design with color accents", Layout::Header, "'Georgia', serif", Photo::Right, true, Bullet::Dot, Skill::Pills, Head::Boxed),
    ("creativeArtist", "Creative Artist", "Artistic visual layout with illustrations", Layout::Header, "'Courier New', monospace", Photo::Right, true, Bullet::Dot, Skill::Pills, Head::Boxed),
];

pub fn builtin_templates() -> Vec<TemplateInfo> {
    let named = NAMED.iter().map(
        |&(id, label, description, layout, header_style, bullet_style, skill_style, photo, font, [accent, background, text])| {
            TemplateInfo::builtin(
                id,
                label,
                description,
                TemplateStyle {
                    layout,
                    header_style,
                    bullet_style,
                    skill_style,
                    photo_position: photo,
                    font_family: font.to_string(),
                    skills_background: skill_style == Skill::Pills,
                    palette: Palette::new(accent, background, text),
                    ..TemplateStyle::default()
                },
            )
        },
    );

    let variants = VARIANTS.iter().map(
        |&(id, label, description, layout, font, photo, skills_background, bullet_style, skill_style, header_style)| {
            TemplateInfo::builtin(
                id,
                label,
                description,
                TemplateStyle {
                    layout,
                    header_style,
                    bullet_style,
                    skill_style,
                    photo_position: photo,
                    font_family: font.to_string(),
                    skills_background,
                    ..TemplateStyle::default()
                },
            )
        },
    );

    named.chain(variants).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let templates = builtin_templates();
        assert_eq!(NAMED.len(), 32);
        assert_eq!(VARIANTS.len(), 50);
        assert_eq!(templates.len(), 82);

        let ids: HashSet<_> = templates.iter().map(|t| t.id.to_lowercase()).collect();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_variants_use_default_palette() {
        let templates = builtin_templates();
        let variant = templates.iter().find(|t| t.id == "skillsPills").unwrap();
        assert_eq!(variant.style.palette, Palette::default());
        assert_eq!(variant.style.bullet_style, Bullet::None);
    }
}
