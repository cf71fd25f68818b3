//! Phase duration resolution.
//!
//! Maps (stimulus kind, writing sub-phase) to a whole-second phase
//! duration. The writing check comes first so an active writing window
//! always wins over the kind's display duration.

use crate::item::StimulusKind;

/// Writing window after a visual prompt's display phase.
pub const WRITING_SECS: u32 = 240;
/// Initial display window for a visual prompt.
pub const VISUAL_DISPLAY_SECS: u32 = 30;
/// Display window for a single-word prompt.
pub const WORD_DISPLAY_SECS: u32 = 15;
/// Display window for a sentence-fragment prompt.
pub const SENTENCE_DISPLAY_SECS: u32 = 30;
/// Fallback display window for unclassified items.
pub const FALLBACK_DISPLAY_SECS: u32 = 15;

/// Resolves the duration of the phase about to start, in whole seconds.
///
/// Case order is authoritative: `writing_subphase` is checked before
/// `kind`, so the 240-second writing window applies whenever the engine
/// reports an active writing sub-phase (only ever true for
/// [`StimulusKind::VisualPrompt`]).
#[must_use]
pub const fn phase_seconds(kind: StimulusKind, writing_subphase: bool) -> u32 {
    if writing_subphase {
        WRITING_SECS
    } else {
        match kind {
            StimulusKind::VisualPrompt => VISUAL_DISPLAY_SECS,
            StimulusKind::WordPrompt => WORD_DISPLAY_SECS,
            StimulusKind::SentencePrompt => SENTENCE_DISPLAY_SECS,
            StimulusKind::Other => FALLBACK_DISPLAY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_durations() {
        assert_eq!(phase_seconds(StimulusKind::VisualPrompt, false), 30);
        assert_eq!(phase_seconds(StimulusKind::WordPrompt, false), 15);
        assert_eq!(phase_seconds(StimulusKind::SentencePrompt, false), 30);
        assert_eq!(phase_seconds(StimulusKind::Other, false), 15);
    }

    #[test]
    fn test_writing_wins_over_kind() {
        assert_eq!(phase_seconds(StimulusKind::VisualPrompt, true), 240);
        // The engine never asks for these, but the resolver is total.
        assert_eq!(phase_seconds(StimulusKind::WordPrompt, true), 240);
        assert_eq!(phase_seconds(StimulusKind::Other, true), 240);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_kind() -> impl Strategy<Value = StimulusKind> {
            prop_oneof![
                Just(StimulusKind::VisualPrompt),
                Just(StimulusKind::WordPrompt),
                Just(StimulusKind::SentencePrompt),
                Just(StimulusKind::Other),
            ]
        }

        proptest! {
            #[test]
            fn resolver_is_pure(kind in arb_kind(), writing in any::<bool>()) {
                prop_assert_eq!(
                    phase_seconds(kind, writing),
                    phase_seconds(kind, writing)
                );
            }

            #[test]
            fn resolver_is_positive(kind in arb_kind(), writing in any::<bool>()) {
                prop_assert!(phase_seconds(kind, writing) > 0);
            }
        }
    }
}
