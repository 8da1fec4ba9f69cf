use std::path::Path;

use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;
use crate::model::{EmbeddedImage, ImageFormat};

/// Read and decode a PNG or JPEG. Everything that can fail happens here, so
/// embedding a loaded image always succeeds.
pub(crate) fn load_image(path: &Path) -> Result<EmbeddedImage, Error> {
    let data = std::fs::read(path).map_err(|e| Error::io_at(e, path))?;
    let format = match data.as_slice() {
        [0x89, b'P', b'N', b'G', ..] => ImageFormat::Png,
        [0xFF, 0xD8, ..] => ImageFormat::Jpeg,
        _ => {
            return Err(Error::Image(format!(
                "{}: only PNG and JPEG are supported",
                path.display()
            )));
        }
    };
    let decoded = image::load_from_memory(&data)
        .map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;

    Ok(EmbeddedImage {
        data,
        format,
        decoded,
    })
}

/// Write `img` as an image XObject (plus an SMask for transparent PNGs).
pub(crate) fn embed_image(
    pdf: &mut Pdf,
    img: &EmbeddedImage,
    alloc: &mut impl FnMut() -> Ref,
) -> Ref {
    let xobj_ref = alloc();
    let (w, h) = (img.decoded.width(), img.decoded.height());

    // RGB JPEGs pass through untouched; everything else is re-encoded as Flate RGB.
    if img.format == ImageFormat::Jpeg && img.decoded.color() == image::ColorType::Rgb8 {
        let mut xobj = pdf.image_xobject(xobj_ref, &img.data);
        xobj.filter(Filter::DctDecode);
        xobj.width(w as i32);
        xobj.height(h as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        return xobj_ref;
    }

    let rgba: image::RgbaImage = img.decoded.to_rgba8();
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    xobj_ref
}
