//! SVG generation for barn maps

use crate::stylesheet::Stylesheet;

use super::map::{MapView, PenView};
use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    background: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            background: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet, sorted by token
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut tokens: Vec<_> = stylesheet.colors.iter().collect();
        tokens.sort();

        let mut css = String::from(":root {\n");
        for (token, value) in tokens {
            css.push_str(&format!("    --{}: {};\n", token, value));
        }
        css.push_str("  }");
        self.styles.push(css);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Draw the cell grid behind the pens
    pub fn add_grid(&mut self, columns: u32, rows: u32, stroke: &str) {
        let prefix = self.prefix();
        let width = self.config.span_length(columns) + 2.0 * self.config.padding;
        let height = self.config.span_length(rows) + 2.0 * self.config.padding;

        self.background.push(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}" fill="var(--background)"/>"#,
            self.indent_str(),
            prefix,
            width,
            height
        ));
        for col in 0..columns {
            let x = self.config.cell_offset(col);
            for row in 0..rows {
                let y = self.config.cell_offset(row);
                self.background.push(format!(
                    r#"{}<rect class="{}cell" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}"/>"#,
                    self.indent_str(),
                    prefix,
                    x,
                    y,
                    self.config.cell_size,
                    self.config.cell_size,
                    stroke
                ));
            }
        }
    }

    /// Add a rounded rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[String], styles: &str) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="6"{}/>"#,
            self.indent_str(),
            classes.join(" "),
            x,
            y,
            w,
            h,
            styles
        ));
    }

    /// Add a centred text element
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, class: &str, styles: &str) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<text class="{}{}" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            prefix,
            class,
            x,
            y,
            styles,
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, width: f64, height: f64, title: &str) -> String {
        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            width, height, width, height
        ));
        svg.push_str(nl);
        svg.push_str(&format!("  <title>{}</title>", escape_xml(title)));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in self.background.iter().chain(&self.elements) {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a barn map to an SVG string (with default stylesheet)
pub fn render_svg(view: &MapView, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(view, config, &Stylesheet::default())
}

/// Render a barn map to an SVG string with a custom stylesheet
pub fn render_svg_with_stylesheet(
    view: &MapView,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());

    let mut palette = Stylesheet::default();
    palette.colors.extend(stylesheet.colors.clone());
    builder.add_stylesheet(&palette);
    builder.add_grid(view.columns, view.rows, &palette.resolve_or_default("grid-line"));

    for pen in &view.pens {
        render_pen(pen, view, &palette, &mut builder);
    }

    let width = config.span_length(view.columns) + 2.0 * config.padding;
    let height = config.span_length(view.rows) + 2.0 * config.padding;
    builder.build(width, height, &view.barn_name)
}

/// Render a single pen: its box, name, head count and status
fn render_pen(pen: &PenView, view: &MapView, palette: &Stylesheet, builder: &mut SvgBuilder) {
    let config = builder.config.clone();
    let prefix = builder.prefix();
    let rect = pen.pen.rect;
    let status = pen.status.token();

    let x = config.cell_offset(rect.x);
    let y = config.cell_offset(rect.y);
    let w = config.span_length(rect.w);
    let h = config.span_length(rect.h);

    let mut classes = vec![format!("{}pen", prefix), format!("{}{}", prefix, status)];
    if view
        .overlaps
        .iter()
        .any(|(a, b)| *a == pen.pen.id || *b == pen.pen.id)
    {
        classes.push(format!("{}overlap", prefix));
    }

    let group_id = format!("pen-{}", pen.pen.id);
    builder.start_group(Some(&group_id), &classes);

    let styles = format!(
        r#" fill="{}" stroke="{}" stroke-width="2""#,
        palette.resolve_or_default(&format!("status-{}-fill", status)),
        palette.resolve_or_default(&format!("status-{}-stroke", status)),
    );
    builder.add_rect(x, y, w, h, &[format!("{}pen-box", prefix)], &styles);

    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let text_fill = format!(r#" fill="{}""#, palette.resolve_or_default("text"));
    let muted_fill = format!(r#" fill="{}""#, palette.resolve_or_default("text-muted"));
    builder.add_text(&pen.pen.name, cx, cy - 18.0, "pen-name", &text_fill);
    builder.add_text(
        &format!("{} / {}", pen.count, pen.pen.capacity),
        cx,
        cy,
        "pen-count",
        &muted_fill,
    );
    builder.add_text(&pen.status.to_string(), cx, cy + 18.0, "pen-status", &muted_fill);

    builder.end_group();
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridRect, PenId, PlacedPen};
    use crate::renderer::map::OccupancyStatus;

    fn view() -> MapView {
        let pen = |id: i64, name: &str, x: u32, count: u32, status| PenView {
            pen: PlacedPen::new(PenId(id), name, 10, GridRect::new(x, 0, 1, 1).unwrap()),
            count,
            status,
        };
        MapView {
            barn_id: 1,
            barn_name: "Barn <A>".to_string(),
            columns: 2,
            rows: 1,
            pens: vec![
                pen(1, "North", 0, 2, OccupancyStatus::Good),
                pen(2, "South & Co", 1, 10, OccupancyStatus::Overcrowded),
            ],
            overlaps: vec![],
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
    }

    #[test]
    fn test_render_pens() {
        let svg = render_svg(&view(), &SvgConfig::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<title>Barn &lt;A&gt;</title>"));
        assert!(svg.contains(r#"<g id="pen-1" class="barn-pen barn-good">"#));
        assert!(svg.contains(r#"<g id="pen-2" class="barn-pen barn-overcrowded">"#));
        assert!(svg.contains("South &amp; Co"));
        assert!(svg.contains(">10 / 10<"));
        assert!(svg.contains(r##"fill="#fecaca""##));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_viewbox_covers_grid() {
        let svg = render_svg(&view(), &SvgConfig::default());
        // 2 columns: 2*100 + 1*2 + 2*12 = 226, 1 row: 100 + 24 = 124
        assert!(svg.contains(r#"viewBox="0 0 226 124""#));
    }

    #[test]
    fn test_stylesheet_override() {
        let mut colors = std::collections::HashMap::new();
        colors.insert("status-good-fill".to_string(), "#00ff00".to_string());
        let svg = render_svg_with_stylesheet(
            &view(),
            &SvgConfig::default().with_standalone(false),
            &Stylesheet::from_colors(colors),
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"fill="#00ff00""##));
    }

    #[test]
    fn test_overlap_flagged() {
        let mut view = view();
        view.overlaps.push((PenId(1), PenId(2)));
        let svg = render_svg(&view, &SvgConfig::default().without_class_prefix());
        assert!(svg.contains(r#"class="pen good overlap""#));
    }
}
