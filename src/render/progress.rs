/// Fraction reported once every clip has been built.
pub(crate) const STAGE_CLIPS: f32 = 0.5;
/// Fraction reported once the concatenation plan exists.
pub(crate) const STAGE_ASSEMBLY: f32 = 0.7;
/// Fraction reported once audio is attached and the sink is open.
pub(crate) const STAGE_AUDIO: f32 = 0.8;

/// Monotone progress fan-out over an optional callback.
///
/// Reported values never decrease and never exceed 1.0; 1.0 is only reported
/// once the whole render has succeeded.
pub(crate) struct ProgressReporter<'a> {
    callback: Option<&'a mut dyn FnMut(f32)>,
    last: f32,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(callback: Option<&'a mut dyn FnMut(f32)>) -> Self {
        Self {
            callback,
            last: 0.0,
        }
    }

    pub(crate) fn report(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0).max(self.last);
        self.last = fraction;
        if let Some(callback) = self.callback.as_mut() {
            callback(fraction);
        }
    }
}
