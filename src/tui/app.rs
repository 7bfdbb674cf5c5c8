use ratatui::widgets::ListState;

use crate::menu::{MenuAction, MenuItem};

pub const PAGE_SIZE: usize = 10;

/// One open menu. `opened_by` is `None` for the root menu.
pub struct MenuLevel {
    pub title: String,
    pub opened_by: Option<MenuAction>,
    pub items: Vec<MenuItem>,
    pub index: usize,
    pub list_state: ListState,
}

impl MenuLevel {
    pub fn new(title: String, opened_by: Option<MenuAction>, items: Vec<MenuItem>) -> Self {
        let mut level = Self {
            title,
            opened_by,
            items,
            index: 0,
            list_state: ListState::default(),
        };
        level.settle(0, true);
        level
    }

    /// Swap in freshly built items, keeping the selection where it was if possible.
    pub fn replace_items(&mut self, items: Vec<MenuItem>) {
        let selected = self.selected().cloned();
        self.items = items;

        let index = selected
            .and_then(|old| self.items.iter().position(|i| *i == old))
            .unwrap_or(self.index);
        self.settle(index, true);
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.index).filter(|i| i.is_selectable())
    }

    pub fn selected_action(&self) -> Option<&MenuAction> {
        self.selected().and_then(|i| i.action.as_ref())
    }

    pub fn move_up(&mut self) {
        if let Some(i) = (0..self.index).rev().find(|&i| self.items[i].is_selectable()) {
            self.select(i);
        }
    }

    pub fn move_down(&mut self) {
        if let Some(i) = (self.index + 1..self.items.len()).find(|&i| self.items[i].is_selectable()) {
            self.select(i);
        }
    }

    pub fn next_page(&mut self) {
        let target = (self.index + PAGE_SIZE).min(self.items.len().saturating_sub(1));
        self.settle(target, false);
    }

    pub fn prev_page(&mut self) {
        self.settle(self.index.saturating_sub(PAGE_SIZE), true);
    }

    /// Select the nearest selectable item to `index`, searching forward first
    /// when `forward` is set. Falls back to `index` if nothing is selectable.
    fn settle(&mut self, index: usize, forward: bool) {
        let index = index.min(self.items.len().saturating_sub(1));
        let ahead = (index..self.items.len()).find(|&i| self.items[i].is_selectable());
        let behind = (0..index).rev().find(|&i| self.items[i].is_selectable());

        let chosen = if forward {
            ahead.or(behind)
        } else {
            behind.or(ahead)
        };
        self.select(chosen.unwrap_or(index));
    }

    fn select(&mut self, index: usize) {
        self.index = index;
        self.list_state.select(Some(index));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a handle to follow
    Follow { input: String },
    /// Waiting for y/n before removing `handle`
    ConfirmRemove { handle: String },
}

pub struct TuiApp {
    pub title: String,
    pub stack: Vec<MenuLevel>,
    pub mode: InputMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub is_refreshing: bool,
}

impl TuiApp {
    pub fn new(title: String, root: Vec<MenuItem>) -> Self {
        Self {
            title,
            stack: vec![MenuLevel::new("Accounts".to_string(), None, root)],
            mode: InputMode::Normal,
            should_quit: false,
            status_message: None,
            is_refreshing: false,
        }
    }

    pub fn current(&self) -> &MenuLevel {
        // The root level is never popped.
        &self.stack[self.stack.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut MenuLevel {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn push(&mut self, level: MenuLevel) {
        self.stack.push(level);
    }

    /// Close the current submenu. Returns false at the root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Drop every submenu that belongs to `handle`.
    pub fn close_account(&mut self, handle: &str) {
        let first = self.stack.iter().position(|level| {
            matches!(
                &level.opened_by,
                Some(MenuAction::ShowAccount { handle: h } | MenuAction::ShowPost { handle: h, .. })
                    if h == handle
            )
        });
        if let Some(first) = first {
            self.stack.truncate(first.max(1));
        }
    }

    /// Breadcrumb of open menus: `Accounts › @deals`.
    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|level| level.title.as_str())
            .collect::<Vec<_>>()
            .join(" › ")
    }

    /// Handle the selection refers to, for the remove shortcut.
    pub fn selected_handle(&self) -> Option<String> {
        let from_action = |action: &MenuAction| match action {
            MenuAction::ShowAccount { handle }
            | MenuAction::ShowPost { handle, .. }
            | MenuAction::OpenPost { handle, .. }
            | MenuAction::Remove { handle } => Some(handle.clone()),
            MenuAction::Follow => None,
        };

        self.current()
            .selected_action()
            .and_then(from_action)
            .or_else(|| self.current().opened_by.as_ref().and_then(from_action))
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
