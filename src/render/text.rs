use std::sync::{Arc, OnceLock};

use crate::foundation::error::{ReelError, ReelResult};
use crate::project::TextAnchor;
use crate::render::frame::FrameRgba;

/// Rasterize `text` as an SVG layer at the configured anchor and composite it
/// over `frame`.
///
/// The layer is white with a black outline so it stays legible on arbitrary
/// footage. Fonts come from the system font database; when no fonts are
/// installed the layer rasterizes empty, which is not an error.
pub(crate) fn composite_text_overlay(
    frame: &mut FrameRgba,
    text: &str,
    anchor: TextAnchor,
) -> ReelResult<()> {
    let svg = overlay_svg(frame.width, frame.height, text, anchor);
    let layer = rasterize_overlay(&svg, frame.width, frame.height)?;
    premul_over_opaque(&mut frame.data, &layer);
    Ok(())
}

fn overlay_svg(width: u32, height: u32, text: &str, anchor: TextAnchor) -> String {
    let font_size = (f64::from(height) / 12.0).max(12.0).round();
    let margin = (f64::from(height) / 18.0).round();
    let stroke_width = (font_size / 14.0).max(1.0).round();

    let mid_x = f64::from(width) / 2.0;
    let bottom_y = f64::from(height) - margin;
    let (x, y, align) = match anchor {
        TextAnchor::Bottom => (mid_x, bottom_y, "middle"),
        TextAnchor::Top => (mid_x, margin + font_size, "middle"),
        TextAnchor::Center => (mid_x, (f64::from(height) + font_size * 0.7) / 2.0, "middle"),
        TextAnchor::BottomLeft => (margin, bottom_y, "start"),
        TextAnchor::BottomRight => (f64::from(width) - margin, bottom_y, "end"),
    };

    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"##,
            r##"<text x="{x}" y="{y}" text-anchor="{align}" font-family="sans-serif" "##,
            r##"font-size="{fs}" fill="#ffffff" stroke="#000000" stroke-width="{sw}" "##,
            r##"paint-order="stroke">{body}</text></svg>"##
        ),
        w = width,
        h = height,
        x = x,
        y = y,
        align = align,
        fs = font_size,
        sw = stroke_width,
        body = xml_escape(text),
    )
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Rasterize an SVG document into premultiplied RGBA8 at exactly `width x height`.
fn rasterize_overlay(svg: &str, width: u32, height: u32) -> ReelResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb: system_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
        .map_err(|e| ReelError::validation(format!("text overlay svg failed to parse: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ReelError::validation("failed to allocate text overlay pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.data().to_vec())
}

/// Composite a premultiplied RGBA8 layer over an opaque straight-alpha frame.
///
/// With an opaque destination the premultiplied over operator reduces to
/// `dst = src + dst * (255 - src_a) / 255` per channel.
fn premul_over_opaque(dst: &mut [u8], src_premul: &[u8]) {
    debug_assert_eq!(dst.len(), src_premul.len());
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 0 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let blended = u16::from(s[c]) + (u16::from(d[c]) * inv + 127) / 255;
            d[c] = blended.min(255) as u8;
        }
        d[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(xml_escape("a & b < c > \"d\" 'e'"), "a &amp; b &lt; c &gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn svg_places_anchor_attributes() {
        let svg = overlay_svg(640, 360, "hi", TextAnchor::BottomRight);
        assert!(svg.contains(r#"text-anchor="end""#));
        let svg = overlay_svg(640, 360, "hi", TextAnchor::Top);
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn over_with_transparent_layer_is_identity() {
        let mut dst = vec![10u8, 20, 30, 255, 40, 50, 60, 255];
        let src = vec![0u8; 8];
        let before = dst.clone();
        premul_over_opaque(&mut dst, &src);
        assert_eq!(dst, before);
    }

    #[test]
    fn over_with_opaque_layer_replaces() {
        let mut dst = vec![10u8, 20, 30, 255];
        let src = vec![200u8, 100, 50, 255];
        premul_over_opaque(&mut dst, &src);
        assert_eq!(dst, vec![200, 100, 50, 255]);
    }
}
