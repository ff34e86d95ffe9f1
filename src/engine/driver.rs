use super::registry::EffectRegistry;
use crate::audio::{AudioFeatures, CaptureSource};
use crate::render::{Canvas, Rgba};

/// Default alpha of the black fade overlay painted before each frame.
pub const FADE_ALPHA: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Running,
}

/// The frame clock. The host owns the refresh signal and calls [`tick`]
/// once per refresh; the driver turns that into fade compositing, feature
/// extraction, and active-effect dispatch.
///
/// [`tick`]: Driver::tick
pub struct Driver {
    state: State,
    started_at: f64,
    fade_alpha: f32,
}

impl Driver {
    pub fn new(fade_alpha: f32) -> Self {
        Self {
            state: State::Idle,
            started_at: 0.0,
            fade_alpha: fade_alpha.clamp(0.0, 1.0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Idle -> Running, recording `now` as the time origin.
    /// No-op while already running.
    pub fn start(&mut self, now: f64) {
        if self.state == State::Idle {
            self.state = State::Running;
            self.started_at = now;
            log::info!("driver started");
        }
    }

    /// Running -> Idle; the host must stop delivering ticks.
    /// No-op while idle.
    pub fn stop(&mut self) {
        if self.state == State::Running {
            self.state = State::Idle;
            log::info!("driver stopped");
        }
    }

    /// Seconds since `start`, for the given host timestamp.
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.started_at).max(0.0) as f32
    }

    /// Run one frame: paint the trailing-fade overlay, then render the
    /// active effect from a fresh capture snapshot. When capture is
    /// inactive only the fade is painted, so stale imagery still decays.
    /// Ignored while idle.
    pub fn tick(
        &mut self,
        now: f64,
        canvas: &mut Canvas,
        capture: &mut dyn CaptureSource,
        registry: &mut EffectRegistry,
    ) {
        if self.state != State::Running {
            return;
        }
        let time = self.elapsed(now);

        let fade = Rgba::new(0, 0, 0, (self.fade_alpha * 255.0) as u8);
        canvas.fill_rect(0, 0, canvas.width(), canvas.height(), fade);

        if capture.is_active() {
            capture.refresh();
            let audio = AudioFeatures::extract(capture.frequency_bins(), capture.waveform());
            registry.render_active(canvas, &audio, time);
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(FADE_ALPHA)
    }
}

/// Backing pixel dimensions for a displayed size and device pixel scale.
pub fn device_pixel_size(display_w: f32, display_h: f32, scale: f32) -> (u32, u32) {
    (
        (display_w * scale).round().max(1.0) as u32,
        (display_h * scale).round().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SyntheticCapture;
    use crate::effects::Effect;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CountingEffect(Rc<RefCell<usize>>);

    impl Effect for CountingEffect {
        fn name(&self) -> &str {
            "Counting"
        }
        fn render(&mut self, _: &mut Canvas, _: &AudioFeatures<'_>, _: f32) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn counting_registry() -> (EffectRegistry, Rc<RefCell<usize>>) {
        let count = Rc::new(RefCell::new(0));
        let mut reg = EffectRegistry::new();
        reg.register("count", Box::new(CountingEffect(Rc::clone(&count))));
        reg.activate("count");
        (reg, count)
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut d = Driver::default();
        assert!(!d.is_running());
        d.stop();
        assert!(!d.is_running());
        d.start(1.0);
        d.start(99.0);
        assert!(d.is_running());
        // Second start did not move the time origin
        assert_eq!(d.elapsed(3.0), 2.0);
        d.stop();
        d.stop();
        assert!(!d.is_running());
    }

    #[test]
    fn idle_driver_ignores_ticks() {
        let mut d = Driver::default();
        let mut canvas = Canvas::new(16, 16);
        let mut capture = SyntheticCapture::new(64, 64);
        let (mut reg, count) = counting_registry();
        d.tick(0.5, &mut canvas, &mut capture, &mut reg);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn running_tick_renders_effect() {
        let mut d = Driver::default();
        let mut canvas = Canvas::new(16, 16);
        let mut capture = SyntheticCapture::new(64, 64);
        let (mut reg, count) = counting_registry();
        d.start(0.0);
        d.tick(0.1, &mut canvas, &mut capture, &mut reg);
        d.tick(0.2, &mut canvas, &mut capture, &mut reg);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn inactive_capture_still_fades_but_skips_effect() {
        let mut d = Driver::default();
        let mut canvas = Canvas::new(4, 4);
        canvas.clear(Rgba::opaque(200, 200, 200));
        let mut capture = SyntheticCapture::new(64, 64);
        capture.set_active(false);
        let (mut reg, count) = counting_registry();

        d.start(0.0);
        d.tick(0.1, &mut canvas, &mut capture, &mut reg);

        assert_eq!(*count.borrow(), 0);
        // Fade overlay darkened the surface anyway
        assert!(canvas.pixel(2, 2).unwrap().r < 200);
    }

    #[test]
    fn device_pixel_size_scales_and_clamps() {
        assert_eq!(device_pixel_size(800.0, 600.0, 2.0), (1600, 1200));
        assert_eq!(device_pixel_size(799.6, 599.6, 1.0), (800, 600));
        assert_eq!(device_pixel_size(0.1, 0.1, 1.0), (1, 1));
    }
}
