//! Play-by-play sinks.
//!
//! The reducer describes what happened through a [`Narrator`]; presentation
//! lives entirely on the other side of this trait.

/// Receives one line of play-by-play text per event.
pub trait Narrator {
    fn narrate(&mut self, line: &str);
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn narrate(&mut self, line: &str) {
        (**self).narrate(line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecNarrator {
    lines: Vec<String>,
}

impl VecNarrator {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the collected lines, leaving the narrator empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Narrator for VecNarrator {
    fn narrate(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Forwards every line to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn narrate(&mut self, line: &str) {
        log::info!(target: "sandlot::play", "{line}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn narrate(&mut self, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_narrator_keeps_order() {
        let mut narrator = VecNarrator::new();
        narrator.narrate("first");
        narrator.narrate("second");
        assert_eq!(narrator.lines(), ["first", "second"]);
        assert_eq!(narrator.drain().len(), 2);
        assert!(narrator.lines().is_empty());
    }
}
