use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    Heading,
    Body,
}

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) widths_1000: Vec<f32>,
    pub(crate) line_h_ratio: Option<f32>,
    pub(crate) ascender_ratio: Option<f32>,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
    pub(crate) char_widths_1000: Option<HashMap<char, f32>>,
}

impl FontEntry {
    /// Width of a single character in 1000-units. Uses the per-char cache built from
    /// the embedded face, falls back to the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(w) = self.char_widths_1000.as_ref().and_then(|m| m.get(&ch)) {
            return *w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_h_ratio.unwrap_or(1.2)
    }

    pub(crate) fn ascent(&self, font_size: f32) -> f32 {
        font_size * self.ascender_ratio.unwrap_or(0.75)
    }

    /// Bytes for a `Tj` operand: glyph IDs for embedded fonts, WinAnsi otherwise.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Lowercase face name -> (file path, face index within TTC)
type FontLookup = HashMap<String, (PathBuf, u32)>;

static SYSTEM_INDEX: OnceLock<FontLookup> = OnceLock::new();

/// Family (ID 1) and full name (ID 4). "Myriad Pro Bold" is a full name, "Futura" a family.
fn face_names(face: &Face) -> Vec<String> {
    face.names()
        .into_iter()
        .filter(|name| {
            (name.name_id == ttf_parser::name_id::FAMILY
                || name.name_id == ttf_parser::name_id::FULL_NAME)
                && name.is_unicode()
        })
        .filter_map(|name| name.to_string())
        .collect()
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("SURVEY_PDF_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        dirs.extend(
            val.split(sep)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(PathBuf::from),
        );
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

fn index_font_file(index: &mut FontLookup, file_path: &Path) {
    let Ok(file) = std::fs::File::open(file_path) else {
        return;
    };
    // SAFETY: font files are only read, and a truncated map just fails to parse.
    let Ok(data) = (unsafe { Mmap::map(&file) }) else {
        return;
    };
    let face_count = if is_font_collection(file_path) {
        ttf_parser::fonts_in_collection(&data).unwrap_or(1)
    } else {
        1
    };
    for face_idx in 0..face_count {
        let Ok(face) = Face::parse(&data, face_idx) else {
            continue;
        };
        for name in face_names(&face) {
            index
                .entry(name.to_lowercase())
                .or_insert((file_path.to_path_buf(), face_idx));
        }
    }
}

fn scan_font_dirs(dirs: Vec<PathBuf>) -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut files_scanned = 0u32;

    // Depth-first, but earlier roots win on name collisions
    let mut stack: Vec<PathBuf> = dirs.into_iter().rev().collect();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if is_font_file(&path) {
                files_scanned += 1;
                index_font_file(&mut index, &path);
            }
        }
        stack.extend(subdirs);
    }

    log::info!(
        "Font scan: {:.1}ms, {} files parsed → {} names",
        t0.elapsed().as_secs_f64() * 1000.0,
        files_scanned,
        index.len(),
    );

    index
}

fn system_index() -> &'static FontLookup {
    SYSTEM_INDEX.get_or_init(|| scan_font_dirs(system_font_directories()))
}

/// Font lookup that checks configured directories before the system ones.
pub(crate) struct FontFinder {
    local: FontLookup,
}

impl FontFinder {
    pub(crate) fn new(dirs: &[PathBuf]) -> Self {
        let local = if dirs.is_empty() {
            FontLookup::new()
        } else {
            scan_font_dirs(dirs.to_vec())
        };
        Self { local }
    }

    fn find(&self, font_name: &str) -> Option<(PathBuf, u32)> {
        let key = font_name.trim().to_lowercase();
        self.local
            .get(&key)
            .or_else(|| system_index().get(&key))
            .cloned()
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes. Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => None,
            byte => Some(byte),
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.extend_from_slice(&gid.to_be_bytes());
    }
    out
}

/// Approximate Helvetica-Bold widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            37 => 889.0,                          // %
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 => 278.0,                          // I
            74 => 556.0,                          // J
            77 => 833.0,                          // M
            87 => 944.0,                          // W
            65..=90 => 722.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 => 889.0,                         // m
            119 => 778.0,                         // w
            97..=122 => 611.0,                    // lowercase a-z (average)
            _ => 611.0,
        })
        .collect()
}

struct FaceMetrics {
    line_h_ratio: f32,
    ascender_ratio: f32,
    char_to_gid: HashMap<char, u16>,
    char_widths_1000: HashMap<char, f32>,
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding,
/// subsetted to the glyphs in `used_chars`.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<FaceMetrics> {
    let face = Face::parse(font_data, face_index).ok()?;

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| to_1000(h as f32))
        .unwrap_or(700.0);
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    // Subset glyph IDs are assigned in a stable order so output is reproducible
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for ch in chars {
        let Some(gid) = face.glyph_index(ch) else {
            continue;
        };
        let new_gid = remapper.remap(gid.0);
        let width = face
            .glyph_hor_advance(gid)
            .map(|adv| to_1000(adv as f32))
            .unwrap_or(0.0);
        char_to_gid.insert(ch, new_gid);
        char_widths_1000.insert(ch, width);
        gid_widths.push((new_gid, width));
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    let line_gap = face.line_gap() as f32;
    Some(FaceMetrics {
        line_h_ratio: (face.ascender() as f32 - face.descender() as f32 + line_gap) / units,
        ascender_ratio: face.ascender() as f32 / units,
        char_to_gid,
        char_widths_1000,
    })
}

/// Embed `font_name` (found through `finder`) or fall back to Helvetica-Bold.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    finder: &FontFinder,
    font_name: &str,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let metrics = finder.find(font_name).and_then(|(path, face_index)| {
        let data = std::fs::read(&path).ok()?;
        log::debug!("{font_name} → {} (face {face_index})", path.display());
        embed_truetype(pdf, font_ref, font_name, &data, face_index, used_chars, alloc)
    });

    let entry = match metrics {
        Some(m) => FontEntry {
            pdf_name,
            font_ref,
            widths_1000: helvetica_bold_widths(),
            line_h_ratio: Some(m.line_h_ratio),
            ascender_ratio: Some(m.ascender_ratio),
            char_to_gid: Some(m.char_to_gid),
            char_widths_1000: Some(m.char_widths_1000),
        },
        None => {
            log::warn!("Font not found: {font_name}, using Helvetica-Bold");
            pdf.type1_font(font_ref)
                .base_font(Name(b"Helvetica-Bold"))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            FontEntry {
                pdf_name,
                font_ref,
                widths_1000: helvetica_bold_widths(),
                line_h_ratio: None,
                ascender_ratio: None,
                char_to_gid: None,
                char_widths_1000: None,
            }
        }
    };

    log::debug!(
        "register_font: {font_name} → {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    entry
}
