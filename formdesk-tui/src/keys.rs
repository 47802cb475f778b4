//! Key bindings, resolved against whatever currently owns the keyboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    CycleRowsPerPage,
    EditSearch,
    EditStartDate,
    EditEndDate,
    ClearFilters,
    ToggleScope,
    NewItem,
    EditItem,
    DeleteItem,
    Refresh,
    Confirm,
    Cancel,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    ChoiceNext,
    ChoicePrev,
}

/// What currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Table,
    TextInput,
    Form,
    ConfirmDialog,
}

pub fn map_key(event: KeyEvent, context: KeyContext) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match context {
        KeyContext::Table => map_table_key(code),
        KeyContext::TextInput => match code {
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        KeyContext::Form => match code {
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Right => Some(Action::ChoiceNext),
            KeyCode::Left => Some(Action::ChoicePrev),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        KeyContext::ConfirmDialog => match code {
            KeyCode::Enter | KeyCode::Char('y') => Some(Action::Confirm),
            KeyCode::Esc | KeyCode::Char('n') => Some(Action::Cancel),
            _ => None,
        },
    }
}

fn map_table_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::EditSearch),
        KeyCode::Char('s') => Some(Action::EditStartDate),
        KeyCode::Char('u') => Some(Action::EditEndDate),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('p') => Some(Action::ToggleScope),
        KeyCode::Char('r') => Some(Action::CycleRowsPerPage),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        // '1'..'9' select the first nine screens, '0' the tenth.
        KeyCode::Char(c @ '0'..='9') => c
            .to_digit(10)
            .map(|d| Action::SwitchView((d as usize + 9) % 10)),
        _ => None,
    }
}
