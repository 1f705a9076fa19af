use image::Rgba;
use image::imageops::FilterType;

use crate::effects::TransitionKind;
use crate::foundation::error::{ReelError, ReelResult};
use crate::project::{ProjectSettings, Scene};
use crate::render::frame::FrameRgba;
use crate::render::text::composite_text_overlay;

/// One scene rendered to a reusable still frame plus its timing.
#[derive(Clone, Debug)]
pub struct SceneClip {
    /// The composited still (image + optional text layer) at output size.
    pub frame: FrameRgba,
    /// Hold duration in seconds.
    pub duration_secs: f64,
    /// Transition at this clip's entry boundary.
    pub transition: TransitionKind,
}

/// Build one scene's clip: decode, letterbox onto the output canvas, and
/// composite the text overlay when present.
///
/// A missing or undecodable source yields [`ReelError::MediaUnavailable`];
/// the caller decides whether that is fatal.
pub fn build_scene_clip(scene: &Scene, settings: &ProjectSettings) -> ReelResult<SceneClip> {
    let img = image::open(&scene.content)
        .map_err(|_| ReelError::media_unavailable(&scene.content))?
        .to_rgba8();

    let target_w = settings.resolution.width;
    let target_h = settings.resolution.height;

    // Fit inside the canvas preserving aspect ratio, centered on black.
    let scale = f64::min(
        f64::from(target_w) / f64::from(img.width()),
        f64::from(target_h) / f64::from(img.height()),
    );
    let scaled_w = ((f64::from(img.width()) * scale).round() as u32).clamp(1, target_w);
    let scaled_h = ((f64::from(img.height()) * scale).round() as u32).clamp(1, target_h);
    let resized = image::imageops::resize(&img, scaled_w, scaled_h, FilterType::Lanczos3);

    let mut canvas = image::RgbaImage::from_pixel(target_w, target_h, Rgba([0, 0, 0, 255]));
    let off_x = i64::from((target_w - scaled_w) / 2);
    let off_y = i64::from((target_h - scaled_h) / 2);
    image::imageops::overlay(&mut canvas, &resized, off_x, off_y);

    let mut frame = FrameRgba {
        width: target_w,
        height: target_h,
        data: canvas.into_raw(),
    };

    if !scene.text_overlay.is_empty() {
        composite_text_overlay(&mut frame, &scene.text_overlay, settings.text_anchor)?;
    }

    Ok(SceneClip {
        frame,
        duration_secs: scene.duration_secs,
        transition: scene.transition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::TextAnchor;

    fn settings_64() -> ProjectSettings {
        let mut settings = ProjectSettings::default();
        settings.resolution = crate::Resolution::new(64, 64).unwrap();
        settings.text_anchor = TextAnchor::Center;
        settings
    }

    fn scene_for(path: &std::path::Path) -> Scene {
        Scene {
            content: path.to_path_buf(),
            start_secs: 0.0,
            duration_secs: 2.0,
            text_overlay: String::new(),
            transition: TransitionKind::None,
        }
    }

    fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) -> std::path::PathBuf {
        let path = dir.join(name);
        let img = image::RgbaImage::from_pixel(w, h, Rgba(rgba));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn missing_source_is_media_unavailable() {
        let scene = scene_for(std::path::Path::new("definitely/not/here.png"));
        let err = build_scene_clip(&scene, &settings_64()).unwrap_err();
        assert!(matches!(err, ReelError::MediaUnavailable { .. }));
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let store = crate::assets::SessionStore::create().unwrap();
        let path = write_png(store.root(), "wide.png", 128, 32, [255, 0, 0, 255]);

        let clip = build_scene_clip(&scene_for(&path), &settings_64()).unwrap();
        assert_eq!(clip.frame.width, 64);
        assert_eq!(clip.frame.height, 64);
        // 128x32 fits as 64x16 centered: rows above and below are black bars.
        assert_eq!(clip.frame.pixel(32, 2), [0, 0, 0, 255]);
        assert_eq!(clip.frame.pixel(32, 32), [255, 0, 0, 255]);
        assert_eq!(clip.frame.pixel(32, 61), [0, 0, 0, 255]);
    }

    #[test]
    fn overlay_text_does_not_fail_on_plain_strings() {
        let store = crate::assets::SessionStore::create().unwrap();
        let path = write_png(store.root(), "solid.png", 64, 64, [0, 128, 0, 255]);

        let mut scene = scene_for(&path);
        scene.text_overlay = "Hello & <world>".to_string();
        let clip = build_scene_clip(&scene, &settings_64()).unwrap();
        assert_eq!(clip.frame.data.len(), 64 * 64 * 4);
    }
}
