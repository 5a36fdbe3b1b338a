use tracing::debug;

use crate::game::{Feedback, GameSession, SessionSnapshot, TrainingSession};
use crate::model::note::{Clef, Note};
use crate::stats::StatisticsRecord;
use crate::traits::audio::AudioSink;
use crate::traits::input::{InputEvent, InputSource};
use crate::traits::time::TimeProvider;

/// Whether the loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Routes input events to a [`GameSession`].
pub struct GameController<'a, A: AudioSink, T: TimeProvider> {
    session: GameSession<'a, A, T>,
    last_feedback: Option<Feedback>,
}

impl<'a, A: AudioSink, T: TimeProvider> GameController<'a, A, T> {
    pub fn new(session: GameSession<'a, A, T>) -> Self {
        Self {
            session,
            last_feedback: None,
        }
    }

    /// Apply one event. An expired round is settled first, so an answer
    /// that arrives after the deadline is dropped rather than applied to
    /// the next note.
    pub fn handle(&mut self, event: InputEvent) -> Flow {
        if let Some(feedback) = self.session.update() {
            self.last_feedback = Some(feedback);
            if matches!(event, InputEvent::SelectNote(_)) {
                debug!("late answer dropped");
                return Flow::Continue;
            }
        }

        match event {
            InputEvent::SelectNote(index) => {
                self.last_feedback = Some(self.session.submit_answer(index));
            }
            InputEvent::ToggleSound => {
                self.session.toggle_sound();
            }
            InputEvent::ChangeClef => debug!("clef is fixed during a game"),
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Drive the session from `input` until it quits or runs dry, calling
    /// `render` before every event.
    pub fn run<I: InputSource>(&mut self, input: &mut I, mut render: impl FnMut(&SessionSnapshot)) {
        loop {
            render(&self.session.snapshot());
            let Some(event) = input.next_event() else {
                break;
            };
            if self.handle(event) == Flow::Quit {
                break;
            }
        }
    }

    /// Feedback from the most recent event, even if no longer on screen.
    pub fn last_feedback(&self) -> Option<Feedback> {
        self.last_feedback
    }

    pub fn session(&self) -> &GameSession<'a, A, T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<'a, A, T> {
        &mut self.session
    }

    /// End the game and persist statistics.
    pub fn finish(self) -> StatisticsRecord {
        self.session.finish()
    }
}

/// Routes input events to a [`TrainingSession`].
pub struct TrainingController<'a, A: AudioSink> {
    training: TrainingSession<'a, A>,
}

impl<'a, A: AudioSink> TrainingController<'a, A> {
    pub fn new(training: TrainingSession<'a, A>) -> Self {
        Self { training }
    }

    pub fn handle(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::SelectNote(index) => {
                self.training.select_note(index);
            }
            InputEvent::ToggleSound => {
                self.training.toggle_sound();
            }
            InputEvent::ChangeClef => {
                self.training.change_clef();
            }
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    pub fn run<I: InputSource>(
        &mut self,
        input: &mut I,
        mut render: impl FnMut(Clef, Option<Note>, bool),
    ) {
        loop {
            render(
                self.training.clef(),
                self.training.shown_note(),
                self.training.sound_enabled(),
            );
            let Some(event) = input.next_event() else {
                break;
            };
            if self.handle(event) == Flow::Quit {
                break;
            }
        }
    }

    pub fn training(&self) -> &TrainingSession<'a, A> {
        &self.training
    }
}
