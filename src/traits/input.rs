use std::collections::VecDeque;

/// Player intent, decoded from keys, clicks or typed commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Answer button / number key, 0 = Do .. 6 = Si.
    SelectNote(usize),
    ToggleSound,
    /// Training mode only.
    ChangeClef,
    Quit,
}

impl InputEvent {
    /// Decode a typed command: `1`-`7` answer, `m` sound, `c` clef, `q` quit.
    /// Note labels such as `sol` or `Ré` are accepted as answers too.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_lowercase().as_str() {
            "m" => return Some(InputEvent::ToggleSound),
            "c" => return Some(InputEvent::ChangeClef),
            "q" | "quit" | "esc" => return Some(InputEvent::Quit),
            _ => {}
        }
        if let Ok(n) = text.parse::<usize>() {
            return (1..=crate::model::note::NOTE_COUNT)
                .contains(&n)
                .then(|| InputEvent::SelectNote(n - 1));
        }
        crate::model::note::NoteName::from_label(text).map(|n| InputEvent::SelectNote(n.index()))
    }
}

/// Abstraction over input sources.
/// Implementations: StdinInput (terminal front end), ScriptedInput (testing).
pub trait InputSource {
    /// Next event, or None when the source is exhausted. May block.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Plays back a fixed list of events.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}
