//! Key bindings. Form edits are turned into whole-field `FieldEdited`
//! messages built from the text currently on screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use research_core::{AppViewModel, FormField, Msg, ScreenView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Send(Msg),
    Quit,
    Ignore,
}

pub fn map_key(view: &AppViewModel, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match &view.screen {
        ScreenView::Form {
            topic,
            questions,
            focus,
        } => map_form_key(topic, questions, *focus, key, ctrl),
        ScreenView::Progress { .. } => match key.code {
            KeyCode::Char('n') => KeyAction::Send(Msg::NewResearchClicked),
            other => map_common_key(other),
        },
        ScreenView::Results { .. } => match key.code {
            KeyCode::Char('d') if view.can_download => KeyAction::Send(Msg::DownloadClicked),
            KeyCode::Char('n') => KeyAction::Send(Msg::NewResearchClicked),
            other => map_common_key(other),
        },
        ScreenView::Error { .. } => match key.code {
            KeyCode::Esc => KeyAction::Send(Msg::DismissError),
            KeyCode::Char('n') => KeyAction::Send(Msg::NewResearchClicked),
            other => map_common_key(other),
        },
    }
}

fn map_common_key(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('r') => KeyAction::Send(Msg::RefreshHistoryClicked),
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

fn map_form_key(
    topic: &str,
    questions: &str,
    focus: FormField,
    key: KeyEvent,
    ctrl: bool,
) -> KeyAction {
    let current = match focus {
        FormField::Topic => topic,
        FormField::Questions => questions,
    };
    let edited = |text: String| {
        KeyAction::Send(Msg::FieldEdited {
            field: focus,
            text,
        })
    };

    match key.code {
        KeyCode::Char('s') if ctrl => KeyAction::Send(Msg::SubmitClicked),
        KeyCode::Tab | KeyCode::BackTab => KeyAction::Send(Msg::FocusNext),
        KeyCode::Enter => match focus {
            FormField::Topic => KeyAction::Send(Msg::FocusNext),
            FormField::Questions => edited(format!("{current}\n")),
        },
        KeyCode::Backspace => {
            let mut text = current.to_string();
            if text.pop().is_none() {
                return KeyAction::Ignore;
            }
            edited(text)
        }
        KeyCode::Char(c) if !ctrl => edited(format!("{current}{c}")),
        _ => KeyAction::Ignore,
    }
}
