use std::collections::VecDeque;
use std::sync::Arc;

use crate::wizard::menu::Menu;

/// Back stack, current menu and forward stack of a wizard session.
///
/// `back` holds past menus nearest-last, `forward` holds redo targets
/// nearest-first. Neither ever contains `current`.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    back: Vec<Arc<Menu>>,
    current: Option<Arc<Menu>>,
    forward: VecDeque<Arc<Menu>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate into a new menu. Starting a fresh branch drops any redo targets.
    pub fn push(&mut self, menu: Arc<Menu>) {
        self.forward.clear();
        self.advance(menu);
    }

    fn advance(&mut self, menu: Arc<Menu>) {
        if let Some(previous) = self.current.take() {
            self.back.push(previous);
        }
        self.current = Some(menu);
    }

    /// Returns the new current menu, or `None` when there is nothing to go back to.
    pub fn go_back(&mut self) -> Option<&Arc<Menu>> {
        let previous = self.back.pop()?;
        if let Some(current) = self.current.replace(previous) {
            self.forward.push_front(current);
        }
        self.current.as_ref()
    }

    pub fn go_forward(&mut self) -> Option<&Arc<Menu>> {
        let next = self.forward.pop_front()?;
        self.advance(next);
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Arc<Menu>> {
        self.current.as_ref()
    }

    /// Number of menus from the root to `current`, inclusive.
    pub fn depth(&self) -> usize {
        self.back.len() + usize::from(self.current.is_some())
    }

    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    pub fn forward_len(&self) -> usize {
        self.forward.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(title: &str) -> Arc<Menu> {
        Arc::new(Menu::new(title))
    }

    #[test]
    fn push_moves_current_onto_back_stack() {
        let mut history = NavigationHistory::new();
        assert!(history.current().is_none());
        history.push(menu("top"));
        history.push(menu("widgets"));
        assert_eq!(history.current().unwrap().title(), "widgets");
        assert_eq!(history.depth(), 2);
        assert_eq!(history.back_len(), 1);
    }

    #[test]
    fn go_back_then_forward_restores_same_menu() {
        let mut history = NavigationHistory::new();
        history.push(menu("top"));
        let nested = menu("widgets");
        history.push(nested.clone());

        let previous = history.go_back().unwrap();
        assert_eq!(previous.title(), "top");
        assert_eq!(history.forward_len(), 1);

        let restored = history.go_forward().unwrap();
        assert!(Arc::ptr_eq(restored, &nested));
        assert_eq!(history.back_len(), 1);
        assert_eq!(history.forward_len(), 0);
    }

    #[test]
    fn cannot_go_back_past_first_menu() {
        let mut history = NavigationHistory::new();
        let top = menu("top");
        history.push(top.clone());
        assert!(history.go_back().is_none());
        assert!(Arc::ptr_eq(history.current().unwrap(), &top));
        assert!(history.go_forward().is_none());
    }

    #[test]
    fn repeated_oscillation_keeps_path() {
        let mut history = NavigationHistory::new();
        history.push(menu("a"));
        history.push(menu("b"));
        history.push(menu("c"));
        history.go_back();
        history.go_back();
        assert_eq!(history.current().unwrap().title(), "a");
        assert_eq!(history.forward_len(), 2);
        history.go_forward();
        assert_eq!(history.current().unwrap().title(), "b");
        history.go_forward();
        assert_eq!(history.current().unwrap().title(), "c");
        history.go_back();
        assert_eq!(history.current().unwrap().title(), "b");
    }

    #[test]
    fn fresh_push_discards_stale_forward_stack() {
        let mut history = NavigationHistory::new();
        history.push(menu("top"));
        history.push(menu("s3"));
        history.go_back();
        history.push(menu("ec2"));
        assert_eq!(history.forward_len(), 0);
        assert!(history.go_forward().is_none());
        assert_eq!(history.current().unwrap().title(), "ec2");
    }
}
