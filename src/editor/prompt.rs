//! User-facing prompts and notifications

use std::collections::VecDeque;
use std::fmt;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Info => write!(f, "{}", self.message),
            NoticeKind::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Confirmation dialogs and alerts provided by the host
pub trait Prompter {
    /// Ask a yes/no question; `true` means go ahead
    fn confirm(&mut self, question: &str) -> bool;

    /// Show a notification
    fn notify(&mut self, notice: Notice);
}

/// Prompter with pre-recorded answers that keeps every notice it receives.
///
/// Questions beyond the recorded answers get the default answer.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    default_answer: bool,
    pub questions: Vec<String>,
    pub notices: Vec<Notice>,
}

impl ScriptedPrompter {
    /// Answers every question with `answer`
    pub fn always(answer: bool) -> Self {
        Self {
            default_answer: answer,
            ..Self::default()
        }
    }

    /// Queue an answer for the next question
    pub fn then_answer(mut self, answer: bool) -> Self {
        self.answers.push_back(answer);
        self
    }

    /// Messages of the error notices received so far
    pub fn errors(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Error)
            .map(|n| n.message.as_str())
            .collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(self.default_answer)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn confirm(&mut self, question: &str) -> bool {
        (**self).confirm(question)
    }

    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_then_default() {
        let mut prompter = ScriptedPrompter::always(true).then_answer(false);
        assert!(!prompter.confirm("first?"));
        assert!(prompter.confirm("second?"));
        assert_eq!(prompter.questions, vec!["first?", "second?"]);
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::info("saved").to_string(), "saved");
        assert_eq!(Notice::error("boom").to_string(), "error: boom");
    }
}
