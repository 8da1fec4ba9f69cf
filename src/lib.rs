pub mod config;
mod error;
mod fonts;
pub mod model;
pub mod palette;
pub mod pdf;
pub mod placement;
pub mod survey;
pub mod text;
pub mod tree;

pub use config::{Config, load_config};
pub use error::Error;
pub use fonts::FontRole;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use model::Report;

pub fn convert_json_to_pdf(input: &Path, output: &Path, config: &Config) -> Result<(), Error> {
    let t0 = Instant::now();
    let report = survey::parse(input)?;
    let t_parse = t0.elapsed();
    write_report(&report, output, config, t0, t_parse)
}

pub fn convert_json_bytes_to_pdf(input: &[u8], output: &Path, config: &Config) -> Result<(), Error> {
    let t0 = Instant::now();
    let report = survey::parse_bytes(input)?;
    let t_parse = t0.elapsed();
    write_report(&report, output, config, t0, t_parse)
}

/// Place, flatten and draw `report`. Each call runs its own placement.
pub fn render_report(report: &Report, config: &Config) -> Result<Vec<u8>, Error> {
    config.validate()?;
    let placement = placement::place(&report.categories)?;
    log::debug!(
        "Placement: {} nodes in {} columns{}",
        placement.positions.len(),
        placement.total_columns,
        if placement.shifted { " (shifted start)" } else { "" },
    );
    let nodes = tree::build_nodes(&report.categories, &placement.positions)?;
    pdf::render(report, &placement, &nodes, config)
}

fn write_report(
    report: &Report,
    output: &Path,
    config: &Config,
    t0: Instant,
    t_parse: std::time::Duration,
) -> Result<(), Error> {
    let bytes = render_report(report, config)?;
    let t_render = t0.elapsed();

    write_atomic(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}

/// Write next to the target and rename, so readers never see a half-written PDF.
fn write_atomic(output: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut tmp = OsString::from(output.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, output)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    Ok(())
}
