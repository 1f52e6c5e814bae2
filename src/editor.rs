use std::borrow::Cow::{self, Borrowed, Owned};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::{Context, Helper, Hinter, Validator};

/// Line editor helper that completes the buttons of the last keyboard the bot sent
#[derive(Helper, Hinter, Validator)]
pub(crate) struct ButtonHelper {
    buttons: Vec<String>,
    colored_prompt: String,
}

impl ButtonHelper {
    pub(crate) fn new(colored_prompt: &str) -> ButtonHelper {
        ButtonHelper { buttons: vec![], colored_prompt: colored_prompt.to_string() }
    }

    pub(crate) fn set_buttons(&mut self, buttons: Vec<String>) {
        self.buttons = buttons;
    }

    fn matching(&self, line: &str) -> Vec<Pair> {
        let typed = line.to_lowercase();
        self.buttons.iter()
            .filter(|button| button.to_lowercase().starts_with(&typed))
            .map(|button| Pair { display: button.clone(), replacement: button.clone() })
            .collect()
    }
}

impl Completer for ButtonHelper {
    type Candidate = Pair;

    /// Buttons are whole-line answers, so the entire line is replaced
    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok((0, self.matching(line)))
    }
}

impl Highlighter for ButtonHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default && !self.colored_prompt.is_empty() {
            Borrowed(&self.colored_prompt)
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned("\x1b[2m".to_owned() + hint + "\x1b[m")
    }
}
