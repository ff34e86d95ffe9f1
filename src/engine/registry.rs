use std::collections::HashMap;

use crate::audio::AudioFeatures;
use crate::config::EffectsConfig;
use crate::effects::{
    Circular, Effect, Geiss, Matrix, Oscilloscope, Particles, Plasma, Spectrum, Starfield,
    Terrain,
};
use crate::render::Canvas;

/// Maps an identifier to an effect instance and enforces at most one active
/// effect. Switching away runs the outgoing effect's teardown hook so the
/// incoming one never sees leftover state.
#[derive(Default)]
pub struct EffectRegistry {
    effects: HashMap<String, Box<dyn Effect>>,
    current: Option<String>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the nine stock effects. `seed` feeds the
    /// randomness of the effects that consume it, offset per effect so they
    /// do not share sequences.
    pub fn with_defaults(cfg: &EffectsConfig, seed: u64) -> Self {
        let mut reg = Self::new();
        reg.register("oscilloscope", Box::new(Oscilloscope));
        reg.register("spectrum", Box::<Spectrum>::default());
        reg.register("circular", Box::<Circular>::default());
        reg.register(
            "particles",
            Box::new(Particles::new(cfg.particle_max, seed ^ 0x7061_7274)),
        );
        reg.register(
            "starfield",
            Box::new(Starfield::new(cfg.star_count, seed ^ 0x7374_6172)),
        );
        reg.register("plasma", Box::new(Plasma::new(cfg.plasma_scale)));
        reg.register("matrix", Box::new(Matrix::new(seed ^ 0x6d74_7278)));
        reg.register("terrain", Box::new(Terrain::new(cfg.terrain_depth)));
        reg.register("geiss", Box::new(Geiss::new(cfg.geiss_scale, seed ^ 0x6765_7373)));
        reg
    }

    /// Insert under `id`; a later registration for the same id wins.
    pub fn register(&mut self, id: &str, effect: Box<dyn Effect>) {
        self.effects.insert(id.to_string(), effect);
    }

    /// Make `id` the active effect, tearing down the previous one first.
    /// An unknown id is logged and leaves the current effect unchanged.
    pub fn activate(&mut self, id: &str) {
        if !self.effects.contains_key(id) {
            log::warn!("unknown effect id: {:?}", id);
            return;
        }
        if let Some(prev) = self.current.take() {
            if let Some(effect) = self.effects.get_mut(&prev) {
                effect.teardown();
            }
        }
        self.current = Some(id.to_string());
    }

    /// Display name of the active effect, or empty string if none.
    pub fn current_name(&self) -> &str {
        self.current
            .as_ref()
            .and_then(|id| self.effects.get(id))
            .map_or("", |e| e.name())
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.effects.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Paint one frame with the active effect, if any.
    pub fn render_active(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        if let Some(id) = &self.current {
            if let Some(effect) = self.effects.get_mut(id) {
                effect.render(canvas, audio, time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Effect for Probe {
        fn name(&self) -> &str {
            self.label
        }
        fn render(&mut self, _: &mut Canvas, _: &AudioFeatures<'_>, _: f32) {
            self.log.borrow_mut().push(format!("render {}", self.label));
        }
        fn teardown(&mut self) {
            self.log.borrow_mut().push(format!("teardown {}", self.label));
        }
    }

    fn probe(label: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Effect> {
        Box::new(Probe { label, log: Rc::clone(log) })
    }

    #[test]
    fn switch_tears_down_before_next_render() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = EffectRegistry::new();
        reg.register("a", probe("A", &log));
        reg.register("b", probe("B", &log));

        let mut canvas = Canvas::new(8, 8);
        let audio = AudioFeatures::silent();
        reg.activate("a");
        reg.render_active(&mut canvas, &audio, 0.0);
        reg.activate("b");
        reg.render_active(&mut canvas, &audio, 0.1);

        assert_eq!(
            *log.borrow(),
            vec!["render A", "teardown A", "render B"]
        );
    }

    #[test]
    fn unknown_id_keeps_current() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = EffectRegistry::new();
        reg.register("a", probe("A", &log));
        reg.activate("a");
        reg.activate("nope");
        assert_eq!(reg.current_name(), "A");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = EffectRegistry::new();
        reg.register("x", probe("First", &log));
        reg.register("x", probe("Second", &log));
        reg.activate("x");
        assert_eq!(reg.current_name(), "Second");
    }

    #[test]
    fn no_active_effect_is_empty_name() {
        let reg = EffectRegistry::new();
        assert_eq!(reg.current_name(), "");
    }

    #[test]
    fn defaults_register_all_nine() {
        let reg = EffectRegistry::with_defaults(&EffectsConfig::default(), 1);
        assert_eq!(
            reg.ids(),
            vec![
                "circular",
                "geiss",
                "matrix",
                "oscilloscope",
                "particles",
                "plasma",
                "spectrum",
                "starfield",
                "terrain"
            ]
        );
    }
}
