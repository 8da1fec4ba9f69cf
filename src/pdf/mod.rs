mod canvas;
mod images;
mod report;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::config::Config;
use crate::error::Error;
use crate::fonts::{FontEntry, FontFinder, FontRole, register_font};
use crate::model::{Placement, RenderNode, Report};

pub use canvas::{Paint, Surface, TextFrame, TextStyle};
pub use report::{ReportLayout, draw_general_info, draw_node, draw_report};

const LEGEND_LABELS: [&str; 3] = ["Good", "To be improved", "No benchmark"];

/// Characters each font role has to cover, so the embedded subsets stay small.
fn used_chars(report: &Report, nodes: &[RenderNode]) -> HashMap<FontRole, HashSet<char>> {
    let mut heading: HashSet<char> = report.title.to_uppercase().chars().collect();
    heading.insert(' ');

    let mut body: HashSet<char> = HashSet::from([' ', '%', '.', '-']);
    body.extend('0'..='9');
    body.extend(LEGEND_LABELS.iter().flat_map(|l| l.chars()));
    body.extend(report.summary.iter().flat_map(|s| s.chars()));
    for node in nodes {
        match node {
            RenderNode::Category { label, .. } => body.extend(label.to_uppercase().chars()),
            RenderNode::Question { label, .. } => body.extend(label.chars()),
        }
    }

    HashMap::from([(FontRole::Heading, heading), (FontRole::Body, body)])
}

/// Render the report page and return the finished PDF bytes.
pub fn render(
    report: &Report,
    placement: &Placement,
    nodes: &[RenderNode],
    config: &Config,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let page_id = alloc();
    let content_id = alloc();

    // Phase 1: fonts
    let finder = FontFinder::new(&config.fonts.dirs);
    let mut chars = used_chars(report, nodes);
    let mut fonts: HashMap<FontRole, FontEntry> = HashMap::new();
    for (i, (role, family)) in [
        (FontRole::Heading, &config.fonts.heading),
        (FontRole::Body, &config.fonts.body),
    ]
    .into_iter()
    .enumerate()
    {
        let used = chars.remove(&role).unwrap_or_default();
        let entry = register_font(&mut pdf, &finder, family, format!("F{}", i + 1), &mut alloc, &used);
        fonts.insert(role, entry);
    }
    let t_fonts = t0.elapsed();

    // Phase 2: logo, a broken logo only costs the logo
    let mut xobjects: Vec<(String, Ref)> = Vec::new();
    if let Some(path) = &config.logo {
        match images::load_image(path) {
            Ok(img) => {
                let xobj_ref = images::embed_image(&mut pdf, &img, &mut alloc);
                xobjects.push(("Im1".to_string(), xobj_ref));
            }
            Err(e) => log::warn!("Skipping logo {}: {e}", path.display()),
        }
    }
    let t_images = t0.elapsed();

    // Phase 3: page content
    let layout = ReportLayout::new(&config.page, placement.total_columns);
    let mut canvas = canvas::PdfCanvas::new(&fonts, config.page.height);
    let logo = xobjects.first().map(|(name, _)| name.as_str());
    draw_report(&mut canvas, report, nodes, &layout, &config.palette, logo);
    let content = canvas.finish();
    pdf.stream(content_id, &content).filter(Filter::FlateDecode);
    let t_layout = t0.elapsed();

    // Phase 4: document structure
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    pdf.document_info(alloc())
        .title(TextStr(&report.title))
        .producer(TextStr("survey-pdf"));

    let mut font_pairs: Vec<(&str, Ref)> = fonts
        .values()
        .map(|entry| (entry.pdf_name.as_str(), entry.font_ref))
        .collect();
    font_pairs.sort_unstable_by_key(|&(name, _)| name);

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, config.page.width, config.page.height))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in &font_pairs {
                font_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !xobjects.is_empty() {
            let mut xobj_dict = resources.x_objects();
            for (name, xobj_ref) in &xobjects {
                xobj_dict.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let bytes = pdf.finish();
    log::info!(
        "Render phases: fonts={:.1}ms, images={:.1}ms, layout={:.1}ms, assembly={:.1}ms",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_layout - t_images).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_layout).as_secs_f64() * 1000.0,
    );
    Ok(bytes)
}
