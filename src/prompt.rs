//! Asking the user for the edges of the `?` textobject.

use tracing::debug;

/// Source of interactive answers.
pub trait Prompt {
    /// Ask for a line of input. `None` means the user cancelled.
    fn ask(&mut self, label: &str) -> Option<String>;
}

/// A prompt that is always cancelled, for hosts without interaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, _label: &str) -> Option<String> {
        None
    }
}

impl<F> Prompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn ask(&mut self, label: &str) -> Option<String> {
        self(label)
    }
}

/// Left and right edges given at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptedPair {
    pub left: String,
    pub right: String,
}

/// Remembers the last prompted pair so a repeated gesture does not ask again.
#[derive(Debug, Clone, Default)]
pub struct PromptCache {
    pair: Option<PromptedPair>,
}

impl PromptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached pair; called when a fresh gesture starts.
    pub fn clear(&mut self) {
        self.pair = None;
    }

    pub fn cached(&self) -> Option<&PromptedPair> {
        self.pair.as_ref()
    }

    /// The cached pair, or a new one read from `prompt`.
    ///
    /// An empty or cancelled answer yields `None` and caches nothing.
    pub fn get_or_ask(&mut self, prompt: &mut dyn Prompt) -> Option<PromptedPair> {
        if let Some(pair) = &self.pair {
            return Some(pair.clone());
        }
        let left = prompt.ask("Left edge: ").filter(|s| !s.is_empty())?;
        let right = prompt.ask("Right edge: ").filter(|s| !s.is_empty())?;
        debug!(%left, %right, "prompted pair");
        let pair = PromptedPair { left, right };
        self.pair = Some(pair.clone());
        Some(pair)
    }
}
