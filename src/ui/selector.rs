//! Single-choice selector with roving focus.
//!
//! Exactly one option holds keyboard focus at a time. Arrow keys (and
//! `j`/`k`) move it, wrapping at either end; Home/End jump to the first and
//! last option. In radio mode moving focus also selects; in check mode focus
//! and selection are separate and Enter/Space commits the focused option.
//!
//! When a correct value is known the selector doubles as answer feedback:
//! once something is selected, the correct option shows as correct and a
//! wrong selection as incorrect.

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> RadioOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// How one option should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct RadioGroup<V> {
    options: Vec<RadioOption<V>>,
    selected: Option<V>,
    active: usize,
    correct_value: Option<V>,
    select_follows_focus: bool,
    disabled: bool,
}

impl<V: Clone + PartialEq> RadioGroup<V> {
    /// Radio mode: moving focus selects.
    pub fn new(options: Vec<RadioOption<V>>) -> Self {
        Self {
            options,
            selected: None,
            active: 0,
            correct_value: None,
            select_follows_focus: true,
            disabled: false,
        }
    }

    /// Check mode: focus moves freely, Enter or Space selects.
    pub fn check(options: Vec<RadioOption<V>>) -> Self {
        Self {
            select_follows_focus: false,
            ..Self::new(options)
        }
    }

    /// Preselect `value`; focus starts on it.
    pub fn with_selected(mut self, value: V) -> Self {
        self.select(value);
        self
    }

    pub fn with_correct_value(mut self, value: Option<V>) -> Self {
        self.correct_value = value;
        self
    }

    pub fn options(&self) -> &[RadioOption<V>] {
        &self.options
    }

    pub fn selected(&self) -> Option<&V> {
        self.selected.as_ref()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn correct_value(&self) -> Option<&V> {
        self.correct_value.as_ref()
    }

    pub fn set_correct_value(&mut self, value: Option<V>) {
        self.correct_value = value;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn selects_on_focus(&self) -> bool {
        self.select_follows_focus
    }

    /// Select `value` and move focus to it. Unknown values are ignored.
    /// Returns whether the selection changed.
    pub fn select(&mut self, value: V) -> bool {
        let Some(index) = self.options.iter().position(|o| o.value == value) else {
            return false;
        };
        self.active = index;

        if self.selected.as_ref() == Some(&value) {
            return false;
        }
        self.selected = Some(value);
        true
    }

    pub fn focus_next(&mut self) -> Option<V> {
        if self.options.is_empty() {
            return None;
        }
        self.focus((self.active + 1) % self.options.len())
    }

    pub fn focus_prev(&mut self) -> Option<V> {
        if self.options.is_empty() {
            return None;
        }
        let len = self.options.len();
        self.focus((self.active + len - 1) % len)
    }

    pub fn focus_first(&mut self) -> Option<V> {
        if self.options.is_empty() {
            return None;
        }
        self.focus(0)
    }

    pub fn focus_last(&mut self) -> Option<V> {
        if self.options.is_empty() {
            return None;
        }
        self.focus(self.options.len() - 1)
    }

    // Returns the value if moving focus changed the selection.
    fn focus(&mut self, index: usize) -> Option<V> {
        self.active = index;
        if !self.select_follows_focus {
            return None;
        }
        let value = self.options[index].value.clone();
        self.select(value.clone()).then_some(value)
    }

    /// Commit the focused option.
    pub fn select_active(&mut self) -> Option<V> {
        let value = self.options.get(self.active)?.value.clone();
        self.select(value.clone()).then_some(value)
    }

    /// Apply a key press. Returns the newly selected value, if the key
    /// changed the selection. A disabled group ignores every key.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<V> {
        if self.disabled {
            return None;
        }

        match key {
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
                self.focus_next()
            }
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                self.focus_prev()
            }
            KeyCode::Home => self.focus_first(),
            KeyCode::End => self.focus_last(),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_active(),
            _ => None,
        }
    }

    /// Presentation state of the option at `index`.
    pub fn state_of(&self, index: usize) -> ChoiceState {
        let (Some(option), Some(selected)) = (self.options.get(index), self.selected.as_ref())
        else {
            return ChoiceState::Idle;
        };

        match &self.correct_value {
            Some(correct) if option.value == *correct => ChoiceState::Correct,
            Some(_) if option.value == *selected => ChoiceState::Incorrect,
            Some(_) => ChoiceState::Idle,
            None if option.value == *selected => ChoiceState::Selected,
            None => ChoiceState::Idle,
        }
    }
}

fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map(char::from)
        .unwrap_or('*')
}

fn style_for(state: ChoiceState, focused: bool) -> Style {
    let style = match state {
        ChoiceState::Idle => Style::default().fg(Color::Gray),
        ChoiceState::Selected => Style::default().fg(Color::Cyan).bold(),
        ChoiceState::Correct => Style::default().fg(Color::Green).bold(),
        ChoiceState::Incorrect => Style::default().fg(Color::Red).bold(),
    };
    if focused && state == ChoiceState::Idle {
        style.fg(Color::White)
    } else {
        style
    }
}

/// Draw `group` inside a bordered block titled `title`.
pub fn render_radio_group<V: Clone + PartialEq>(
    frame: &mut Frame,
    area: Rect,
    group: &RadioGroup<V>,
    title: &str,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(group.options().len() * 2);

    for (index, option) in group.options().iter().enumerate() {
        let state = group.state_of(index);
        let focused = index == group.active() && !group.is_disabled();
        let style = style_for(state, focused);

        let cursor = if focused { ">" } else { " " };
        let radio = if group.selected() == Some(&option.value) {
            "(•)"
        } else {
            "( )"
        };
        let verdict = match state {
            ChoiceState::Correct => " ✓",
            ChoiceState::Incorrect => " ✗",
            _ => "",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {cursor} {radio} "), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.label.as_str(), style),
            Span::styled(verdict, style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
