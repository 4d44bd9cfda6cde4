//! Message styles and their visual treatment.
//!
//! A style tag on an inbound message decides two things: how the message is
//! laid out (alignment, tone) and whether it takes part in placeholder
//! replacement. Each client variant recognizes only a subset of styles; the
//! rest get the variant's fallback tone.

use std::fmt;

/// Style tag carried by a message.
///
/// Parsing never fails: unknown tags are kept verbatim in [`Style::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// Text typed by the local user.
    Human,
    /// Final answer from the agent. Replaces the placeholder.
    Speak,
    /// Transient status from the agent. Becomes the placeholder.
    System,
    /// Task announcement. Replaces the placeholder.
    Task,
    /// Agent thought.
    Thought,
    /// Agent reasoning.
    Reasoning,
    /// Agent plan.
    Plan,
    /// Agent self-criticism.
    Criticism,
    /// Resource the agent consulted.
    Resource,
    /// Any other tag.
    Other(String),
}

impl Style {
    /// Every named style.
    pub const ALL: [Style; 9] = [
        Style::Human,
        Style::Speak,
        Style::System,
        Style::Task,
        Style::Thought,
        Style::Reasoning,
        Style::Plan,
        Style::Criticism,
        Style::Resource,
    ];

    /// Parse a wire tag.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "human" => Self::Human,
            "speak" => Self::Speak,
            "system" => Self::System,
            "task" => Self::Task,
            "thought" => Self::Thought,
            "reasoning" => Self::Reasoning,
            "plan" => Self::Plan,
            "criticism" => Self::Criticism,
            "resource" => Self::Resource,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Human => "human",
            Self::Speak => "speak",
            Self::System => "system",
            Self::Task => "task",
            Self::Thought => "thought",
            Self::Reasoning => "reasoning",
            Self::Plan => "plan",
            Self::Criticism => "criticism",
            Self::Resource => "resource",
            Self::Other(tag) => tag,
        }
    }

    /// Human messages sit on the right, everything else on the left.
    pub fn alignment(&self) -> Alignment {
        match self {
            Self::Human => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// Tone from the fixed lookup. `None` for [`Style::Other`].
    pub fn tone(&self) -> Option<Tone> {
        match self {
            Self::Human => Some(Tone::Primary),
            Self::Speak => Some(Tone::Success),
            Self::System | Self::Task => Some(Tone::Light),
            Self::Thought | Self::Reasoning => Some(Tone::Info),
            Self::Plan => Some(Tone::Warning),
            Self::Criticism => Some(Tone::Danger),
            Self::Resource => Some(Tone::Dark),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for Style {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal placement of a message in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

/// Visual class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Emphasis (the user's own messages).
    Primary,
    /// Neutral default.
    Secondary,
    /// Positive.
    Success,
    /// Negative.
    Danger,
    /// Caution.
    Warning,
    /// Informational.
    Info,
    /// Low contrast.
    Light,
    /// High contrast.
    Dark,
}

/// Set of styles a client variant recognizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSet {
    styles: Vec<Style>,
}

impl StyleSet {
    /// Recognize nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Recognize every named style.
    pub fn all() -> Self {
        Self::of(&Style::ALL)
    }

    /// Recognize exactly `styles`.
    pub fn of(styles: &[Style]) -> Self {
        let mut set = Self::none();
        for style in styles {
            if !set.styles.contains(style) {
                set.styles.push(style.clone());
            }
        }
        set
    }

    /// Whether `style` gets its own treatment.
    pub fn contains(&self, style: &Style) -> bool {
        self.styles.contains(style)
    }

    /// Tone for `style`: its lookup tone if recognized, `fallback` otherwise.
    pub fn tone_of(&self, style: &Style, fallback: Tone) -> Tone {
        if self.contains(style) { style.tone().unwrap_or(fallback) } else { fallback }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_tags() {
        for style in Style::ALL {
            assert_eq!(Style::parse(style.as_str()), style);
        }
    }

    #[test]
    fn unknown_tags_are_kept_verbatim() {
        assert_eq!(Style::parse("primary"), Style::Other("primary".into()));
        assert_eq!(Style::parse("").as_str(), "");
        assert_eq!(Style::parse("Speak"), Style::Other("Speak".into()));
    }

    #[test]
    fn human_is_right_aligned_everything_else_left() {
        assert_eq!(Style::Human.alignment(), Alignment::Right);
        assert_eq!(Style::Speak.alignment(), Alignment::Left);
        assert_eq!(Style::Other("x".into()).alignment(), Alignment::Left);
    }

    #[test]
    fn unrecognized_style_gets_fallback_tone() {
        let set = StyleSet::of(&[Style::Human, Style::Speak]);

        assert_eq!(set.tone_of(&Style::Speak, Tone::Secondary), Tone::Success);
        assert_eq!(set.tone_of(&Style::Plan, Tone::Secondary), Tone::Secondary);
        assert_eq!(set.tone_of(&Style::Other("x".into()), Tone::Primary), Tone::Primary);
    }

    #[test]
    fn full_set_uses_lookup_table() {
        let set = StyleSet::all();
        let tones: Vec<Tone> = Style::ALL.iter().map(|s| set.tone_of(s, Tone::Secondary)).collect();

        assert_eq!(tones, vec![
            Tone::Primary,
            Tone::Success,
            Tone::Light,
            Tone::Light,
            Tone::Info,
            Tone::Info,
            Tone::Warning,
            Tone::Danger,
            Tone::Dark,
        ]);
    }
}
