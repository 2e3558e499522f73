/// Widget results shared by all level widgets.

/// Modal text shown after a validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub success: bool,
    pub title: String,
    pub text: String,
}

impl Feedback {
    pub fn hit(title: &str, text: &str) -> Self {
        Feedback { success: true, title: title.to_string(), text: text.to_string() }
    }

    pub fn miss(title: &str, text: &str) -> Self {
        Feedback { success: false, title: title.to_string(), text: text.to_string() }
    }
}

/// Outcome of a validating widget operation. The shell turns it into a
/// score mutation on `GameState`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// Returned by acknowledge steps.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Signal {
    Idle,
    Complete,
}
