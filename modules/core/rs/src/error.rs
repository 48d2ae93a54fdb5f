use thiserror::Error as ThisError;

/// Failures raised by the cyclizability pipeline.
///
/// Library functions return [eyre::Result] and raise these variants through it, callers classify
/// them back with [Error::classify].
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A symbol outside of {A, C, G, T, N} (any case) was found while encoding a sequence.
    #[error("invalid nucleotide {symbol:?} at position {position}")]
    InvalidCharacter { position: usize, symbol: char },

    /// The sequence can't host a single window.
    #[error("sequence of length {length} is shorter than the {required}-base window")]
    SequenceTooShort { length: usize, required: usize },

    /// An internal invariant of the pipeline was violated. Aborts the whole run.
    #[error("pipeline invariant violated: {0}")]
    FatalPipeline(String),
}

impl Error {
    /// Only too short sequences can be skipped, everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::SequenceTooShort { .. })
    }

    /// Find the pipeline error (if any) behind the given report, looking through the attached
    /// context.
    pub fn classify(report: &eyre::Report) -> Option<&Error> {
        report
            .chain()
            .find_map(|cause| cause.downcast_ref::<Error>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn test_only_short_sequences_are_recoverable() {
        for (err, expected) in [
            (
                Error::SequenceTooShort {
                    length: 10,
                    required: 50,
                },
                true,
            ),
            (
                Error::InvalidCharacter {
                    position: 3,
                    symbol: 'X',
                },
                false,
            ),
            (Error::FatalPipeline("mismatch".to_string()), false),
        ] {
            assert_eq!(err.is_recoverable(), expected, "{err:?}");
        }
    }

    #[test]
    fn test_classify_through_context() {
        let report = Err::<(), _>(Error::SequenceTooShort {
            length: 40,
            required: 50,
        })
        .wrap_err("Failed to process line 3")
        .unwrap_err();

        assert_eq!(
            Error::classify(&report),
            Some(&Error::SequenceTooShort {
                length: 40,
                required: 50
            })
        );
        assert!(Error::classify(&eyre::eyre!("Unrelated failure")).is_none());
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidCharacter {
            position: 7,
            symbol: 'X',
        };
        assert_eq!(err.to_string(), "invalid nucleotide 'X' at position 7");
    }
}
