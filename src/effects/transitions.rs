use crate::foundation::error::{ReelError, ReelResult};

/// Closed set of transition identifiers selectable per scene.
///
/// Only [`TransitionKind::Crossfade`] is backed by a real compositing
/// algorithm; `Fade`, `SlideLeft` and `SlideRight` are accepted and carried
/// through the model but currently render as hard cuts (a documented
/// capability gap, see `is_composited`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// Hard cut, no boundary composition.
    None,
    /// Outgoing and incoming clips overlap with inverse opacity ramps.
    #[default]
    Crossfade,
    /// Fade to black. Currently degrades to a hard cut.
    Fade,
    /// Slide in from the right edge. Currently degrades to a hard cut.
    SlideLeft,
    /// Slide in from the left edge. Currently degrades to a hard cut.
    SlideRight,
}

impl TransitionKind {
    /// Parse a user-facing transition identifier.
    pub fn parse(kind: &str) -> ReelResult<Self> {
        let kind = kind.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(ReelError::validation("transition kind must be non-empty"));
        }

        match kind.as_str() {
            "none" | "cut" => Ok(Self::None),
            "crossfade" | "cross-fade" | "dissolve" => Ok(Self::Crossfade),
            "fade" | "fade-to-black" | "fadeblack" => Ok(Self::Fade),
            "slide-left" | "slideleft" => Ok(Self::SlideLeft),
            "slide-right" | "slideright" => Ok(Self::SlideRight),
            other => Err(ReelError::validation(format!(
                "unknown transition kind '{other}'"
            ))),
        }
    }

    /// `true` when boundaries using this kind are composited rather than cut.
    pub fn is_composited(self) -> bool {
        matches!(self, Self::Crossfade)
    }
}

/// Blend two same-size straight-alpha RGBA8 frames into `dst`.
///
/// `t` is the incoming clip's weight in `[0, 1]`: 0 yields `outgoing`
/// verbatim, 1 yields `incoming` verbatim.
pub(crate) fn crossfade_rgba8(dst: &mut [u8], outgoing: &[u8], incoming: &[u8], t: f64) {
    debug_assert_eq!(dst.len(), outgoing.len());
    debug_assert_eq!(dst.len(), incoming.len());

    let w = (t.clamp(0.0, 1.0) * 255.0).round() as u16;
    let inv = 255 - w;
    for ((d, a), b) in dst.iter_mut().zip(outgoing).zip(incoming) {
        *d = ((u16::from(*a) * inv + u16::from(*b) * w + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(TransitionKind::parse("  Crossfade ").unwrap(), TransitionKind::Crossfade);
        assert_eq!(TransitionKind::parse("dissolve").unwrap(), TransitionKind::Crossfade);
        assert_eq!(TransitionKind::parse("cut").unwrap(), TransitionKind::None);
        assert_eq!(TransitionKind::parse("fade-to-black").unwrap(), TransitionKind::Fade);
        assert_eq!(TransitionKind::parse("slideleft").unwrap(), TransitionKind::SlideLeft);
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert!(TransitionKind::parse("wipe").is_err());
        assert!(TransitionKind::parse("   ").is_err());
    }

    #[test]
    fn only_crossfade_is_composited() {
        assert!(TransitionKind::Crossfade.is_composited());
        assert!(!TransitionKind::None.is_composited());
        assert!(!TransitionKind::Fade.is_composited());
        assert!(!TransitionKind::SlideLeft.is_composited());
        assert!(!TransitionKind::SlideRight.is_composited());
    }

    #[test]
    fn crossfade_endpoints_are_exact() {
        let a = [255u8, 0, 0, 255];
        let b = [0u8, 0, 255, 255];
        let mut dst = [0u8; 4];

        crossfade_rgba8(&mut dst, &a, &b, 0.0);
        assert_eq!(dst, a);
        crossfade_rgba8(&mut dst, &a, &b, 1.0);
        assert_eq!(dst, b);

        crossfade_rgba8(&mut dst, &a, &b, 0.5);
        assert!(dst[0] > 100 && dst[0] < 155);
        assert!(dst[2] > 100 && dst[2] < 155);
        assert_eq!(dst[3], 255);
    }
}
