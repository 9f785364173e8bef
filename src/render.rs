use crate::config::RenderConfig;
use crate::interaction::{Breadcrumb, HighlightController};
use crate::layout::{FanLayout, WedgeLayout};
use crate::session::{Caption, ChartSession};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// The fan itself, as embedded in the host page: transparent background,
/// rotated so the half circle opens upwards.
pub fn render_svg(layout: &FanLayout, theme: &Theme, highlight: &HighlightController) -> String {
    let geo = &layout.geometry;
    let width = geo.svg_width();
    let height = geo.svg_height();
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    push_fan(&mut svg, layout, theme, highlight, 0.0);
    svg.push_str("</svg>");
    svg
}

/// A self-contained image: background, fan, caption and, when a lineage is
/// highlighted, the breadcrumb trail underneath.
pub fn render_standalone_svg(session: &ChartSession) -> String {
    let layout = session.layout();
    let theme = &session.config().theme;
    let highlight = session.highlight();
    let geo = &layout.geometry;
    let row_height = session.config().layout.breadcrumb_row_height;
    let width = geo.svg_width().max(200.0);
    let fan_height = geo.svg_height();
    let trail_height = if highlight.breadcrumbs_visible() {
        highlight.breadcrumbs().len() as f32 * row_height + session.config().layout.breadcrumb_pad
    } else {
        0.0
    };
    let height = (fan_height + trail_height).max(100.0);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        session.config().render.background
    ));
    // The canvas may be wider than the fan; keep everything on one axis.
    let offset_x = (width - geo.svg_width()) / 2.0;
    push_fan(&mut svg, layout, theme, highlight, offset_x);
    push_caption(&mut svg, layout, theme, session.caption(), offset_x);

    let mut y = fan_height + session.config().layout.breadcrumb_pad;
    for crumb in highlight.breadcrumbs() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
            width / 2.0,
            escape_xml(&theme.font_family),
            theme.font_size * 0.85,
            theme.caption_note_color,
        ));
        svg.push_str(&escape_xml(&crumb.relationship_text()));
        svg.push_str("</text>");
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            width / 2.0,
            y + theme.font_size * 1.2,
            escape_xml(&theme.font_family),
            theme.font_size,
            crumb_text_color(crumb, theme),
            escape_xml(&crumb.name)
        ));
        y += row_height;
    }

    svg.push_str("</svg>");
    svg
}

/// The fixed container structure the host page expects: wrapper, chart,
/// caption and breadcrumb list.
pub fn render_html(session: &ChartSession) -> String {
    let layout = session.layout();
    let geo = &layout.geometry;
    let highlight = session.highlight();
    let mut html = String::new();

    html.push_str(&format!(
        "<div id=\"d3fanwrapper\" style=\"height:{:.0}px\">",
        highlight.container_height()
    ));
    html.push_str(&format!(
        "<div id=\"d3fanchart\" width=\"{:.2}\" style=\"padding-left:{:.2}px;z-index:100\">",
        geo.width, geo.padding_left
    ));
    html.push_str(&render_svg(layout, &session.config().theme, highlight));
    html.push_str(&format!(
        "<div id=\"description\" style=\"width:{:.2}px;top:{:.2}px;z-index:-1\">",
        geo.width, geo.description_top
    ));

    let caption = session.caption();
    html.push_str("<div id=\"caption\"><div></div>");
    html.push_str(&format!(
        "<div class=\"capname\">{}</div>",
        escape_xml(&caption.name)
    ));
    html.push_str(&format!(
        "<div class=\"capnote\">{}</div>",
        escape_xml(&caption.note)
    ));
    html.push_str("</div>");

    let display = if highlight.breadcrumbs_visible() {
        "block"
    } else {
        "none"
    };
    html.push_str(&format!("<ul id=\"breadcrumbs\" style=\"display:{display}\">"));
    for crumb in highlight.breadcrumbs() {
        html.push_str(&breadcrumb_html(crumb));
    }
    html.push_str("</ul></div></div></div>");
    html
}

fn breadcrumb_html(crumb: &Breadcrumb) -> String {
    let quality = crumb
        .quality_label
        .as_deref()
        .map(|label| format!("{} : ", escape_xml(label)))
        .unwrap_or_default();
    format!(
        "<li data-anum=\"{}\"><div class=\"relationship\"><span>(</span><span class=\"quality\">{}</span><span class=\"ofkind\">{}</span><span>)</span></div><div class=\"ancestor\" style=\"color:{}\">{}</div></li>",
        crumb.anum,
        quality,
        escape_xml(&crumb.relationship),
        crumb.color,
        escape_xml(&crumb.name)
    )
}

fn push_fan(
    svg: &mut String,
    layout: &FanLayout,
    theme: &Theme,
    highlight: &HighlightController,
    offset_x: f32,
) {
    let geo = &layout.geometry;
    svg.push_str(&format!(
        "<g id=\"container\" transform=\"translate({:.2},{:.2}) rotate(-90)\">",
        geo.center.0 + offset_x,
        geo.center.1
    ));
    // Invisible disc so leaving the fan is detected on its outline.
    svg.push_str(&format!(
        "<circle r=\"{:.2}\" style=\"opacity:0\"/>",
        geo.radius
    ));
    for wedge in layout.visible_wedges() {
        svg.push_str(&format!(
            "<path data-anum=\"{}\" d=\"{}\" fill-rule=\"evenodd\" style=\"stroke:{};stroke-width:{};fill:{};opacity:{}\">",
            wedge.anum,
            arc_path(wedge),
            theme.wedge_stroke,
            theme.wedge_stroke_width,
            theme.quality_color(wedge.quality),
            highlight.opacity(wedge.anum)
        ));
        if !wedge.name.is_empty() {
            svg.push_str(&format!("<title>{}</title>", escape_xml(&wedge.name)));
        }
        svg.push_str("</path>");
    }
    svg.push_str("</g>");
}

fn push_caption(
    svg: &mut String,
    layout: &FanLayout,
    theme: &Theme,
    caption: &Caption,
    offset_x: f32,
) {
    let geo = &layout.geometry;
    let inner = layout
        .wedges
        .iter()
        .find(|w| w.depth == 1)
        .map(|w| w.inner_radius)
        .unwrap_or(geo.radius);
    let (cx, cy) = (geo.center.0 + offset_x, geo.center.1);
    svg.push_str(&format!(
        "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        cy - inner * 0.45,
        escape_xml(&theme.font_family),
        theme.font_size * 1.2,
        theme.text_color,
        escape_xml(&caption.name)
    ));
    svg.push_str(&format!(
        "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        cy - inner * 0.15,
        escape_xml(&theme.font_family),
        theme.font_size * 0.85,
        theme.caption_note_color,
        escape_xml(&caption.note)
    ));
}

/// Collapse and missing colors are near-white; they would vanish as text.
fn crumb_text_color<'a>(crumb: &'a Breadcrumb, theme: &'a Theme) -> &'a str {
    if crumb.color == theme.collapse_color || crumb.color == theme.missing_color {
        &theme.text_color
    } else {
        &crumb.color
    }
}

/// SVG path of an annular sector, in the unrotated frame where angle 0
/// points up and angles grow clockwise.
pub fn arc_path(wedge: &WedgeLayout) -> String {
    let (a0, a1) = (wedge.start_angle, wedge.end_angle);
    let (r0, r1) = (wedge.inner_radius, wedge.outer_radius);
    let large = if a1 - a0 > std::f32::consts::PI { 1 } else { 0 };
    let point = |r: f32, a: f32| (r * a.sin(), -r * a.cos());

    let (ox0, oy0) = point(r1, a0);
    let (ox1, oy1) = point(r1, a1);
    let mut d = format!(
        "M{ox0:.2},{oy0:.2}A{r1:.2},{r1:.2} 0 {large} 1 {ox1:.2},{oy1:.2}"
    );
    if r0 > 0.0 {
        let (ix1, iy1) = point(r0, a1);
        let (ix0, iy0) = point(r0, a0);
        d.push_str(&format!(
            "L{ix1:.2},{iy1:.2}A{r0:.2},{r0:.2} 0 {large} 0 {ix0:.2},{iy0:.2}Z"
        ));
    } else {
        d.push_str("L0,0Z");
    }
    d
}

pub fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
