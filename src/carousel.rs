use std::collections::HashMap;

use log::debug;

/// The two navigation arrows of a carousel section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Prev,
    Next,
}

/// Capabilities the controller needs from the page. An implementation owns
/// the markup; the controller only queries slide counts, toggles active
/// class membership, rebuilds dot indicators and flips `disabled` on the
/// arrows.
pub trait UiSurface {
    /// Number of slides the section currently renders.
    fn slide_count(&self, section: &str) -> usize;
    fn set_slide_active(&mut self, section: &str, index: usize, active: bool);
    fn set_dot_active(&mut self, section: &str, index: usize, active: bool);
    /// Discard every dot indicator of `section` and create `count` fresh
    /// ones, with the dot at `active` marked active.
    fn rebuild_dots(&mut self, section: &str, count: usize, active: usize);
    fn set_arrow_enabled(&mut self, section: &str, arrow: Arrow, enabled: bool);
    fn hide_all_panels(&mut self);
    fn deactivate_all_buttons(&mut self);
    fn show_panel(&mut self, panel: &str);
    fn activate_button(&mut self, button: &str);
}

/// Slide state of the tabbed carousels: one current-slide index per named
/// section, all starting at 0 on construction (page load) and mutated only
/// by the navigation operations. Section names and indices are assumed
/// valid and backed by markup; an unknown section panics rather than being
/// handled.
pub struct CarouselController {
    sections: Vec<String>,
    current: HashMap<String, usize>,
}

impl CarouselController {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sections: Vec<String> = sections.into_iter().map(Into::into).collect();
        let current = sections.iter().map(|s| (s.clone(), 0)).collect();
        CarouselController { sections, current }
    }

    /// Index of the slide `section` is currently showing.
    pub fn current(&self, section: &str) -> usize {
        self.current[section]
    }

    /// Page-load initialization: build the dot indicators and arrow state
    /// of every section.
    pub fn init(&self, ui: &mut dyn UiSurface) {
        self.rebuild_all_dots(ui);
        for section in &self.sections {
            self.update_arrows(ui, section);
        }
    }

    /// Jumps `section` to `index` (caller-supplied, assumed in range).
    pub fn go_to_slide(&mut self, ui: &mut dyn UiSurface, section: &str, index: usize) {
        let count = ui.slide_count(section);
        debug!("{section}: slide {} -> {index}", self.current[section]);

        self.set_current_active(ui, section, count, false);
        *self.current.get_mut(section).unwrap() = index;
        self.set_current_active(ui, section, count, true);
        self.update_arrows(ui, section);
    }

    /// Steps `section` by `direction` (+1 or -1), wrapping at both ends.
    pub fn change_slide(&mut self, ui: &mut dyn UiSurface, section: &str, direction: isize) {
        let count = ui.slide_count(section);
        let next = (self.current[section] as isize + direction).rem_euclid(count as isize) as usize;
        debug!("{section}: slide {} -> {next}", self.current[section]);

        self.set_current_active(ui, section, count, false);
        *self.current.get_mut(section).unwrap() = next;
        self.set_current_active(ui, section, count, true);
        self.update_arrows(ui, section);
    }

    /// Activates the `tab` panel and the triggering `button`, then rebuilds
    /// every carousel's dot indicators; when the selected tab carries a
    /// carousel its arrows are recomputed too.
    pub fn open_tab(&mut self, ui: &mut dyn UiSurface, tab: &str, button: &str) {
        ui.hide_all_panels();
        ui.deactivate_all_buttons();
        ui.show_panel(tab);
        ui.activate_button(button);

        self.rebuild_all_dots(ui);
        if self.sections.iter().any(|s| s == tab) {
            self.update_arrows(ui, tab);
        }
    }

    /// A section with at most one slide gets both arrows disabled;
    /// otherwise both stay enabled, since navigation wraps instead of
    /// clamping at the ends.
    pub fn update_arrows(&self, ui: &mut dyn UiSurface, section: &str) {
        let enabled = ui.slide_count(section) > 1;
        ui.set_arrow_enabled(section, Arrow::Prev, enabled);
        ui.set_arrow_enabled(section, Arrow::Next, enabled);
    }

    /// Dots are rebuilt wholesale, never patched. Sections with a single
    /// slide render no dots at all.
    fn rebuild_all_dots(&self, ui: &mut dyn UiSurface) {
        for section in &self.sections {
            let count = ui.slide_count(section);
            if count > 1 {
                ui.rebuild_dots(section, count, self.current[section]);
            }
        }
    }

    fn set_current_active(&self, ui: &mut dyn UiSurface, section: &str, count: usize, active: bool) {
        let index = self.current[section];
        ui.set_slide_active(section, index, active);
        // dot indicators only exist when there is more than one slide
        if count > 1 {
            ui.set_dot_active(section, index, active);
        }
    }
}
