use log::info;
use std::collections::BTreeSet;

/// Dashboard view state: which bodies are plotted and whether live refresh
/// is frozen. Mutated only by the UI event handlers, read once per refresh
/// tick; constructor-injected so the refresh path stays a pure function of
/// (log contents, view state).
pub struct ViewState {
    active: BTreeSet<String>,
    paused: bool,
}

impl ViewState {
    pub fn new(active: impl IntoIterator<Item = String>) -> Self {
        ViewState {
            active: active.into_iter().collect(),
            paused: false,
        }
    }

    /// Flips membership of `body` in the active set.
    pub fn toggle_body(&mut self, body: &str) {
        if !self.active.remove(body) {
            self.active.insert(body.to_string());
        }
        info!("active bodies: {:?}", self.active);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("paused: {}", self.paused);
    }

    pub fn is_active(&self, body: &str) -> bool {
        self.active.contains(body)
    }

    pub fn active(&self) -> &BTreeSet<String> {
        &self.active
    }

    pub fn paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewState {
        ViewState::new(["Sun", "Moon", "Mars"].map(String::from))
    }

    #[test]
    fn toggle_body_is_self_inverse() {
        let mut view = state();
        let before: Vec<_> = view.active().iter().cloned().collect();

        view.toggle_body("Mars");
        assert!(!view.is_active("Mars"));
        view.toggle_body("Mars");
        let after: Vec<_> = view.active().iter().cloned().collect();
        assert_eq!(before, after);

        view.toggle_body("Jupiter");
        assert!(view.is_active("Jupiter"));
        view.toggle_body("Jupiter");
        assert!(!view.is_active("Jupiter"));
    }

    #[test]
    fn toggle_pause_flips_the_flag() {
        let mut view = state();
        assert!(!view.paused());
        view.toggle_pause();
        assert!(view.paused());
        view.toggle_pause();
        assert!(!view.paused());
    }
}
