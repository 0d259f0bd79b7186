//! Verdict and routing-decision types
//!
//! Every raw response from the reputation service maps to exactly one
//! `Verdict` variant; unmapped or unparseable codes map to `Unknown`. The
//! routing decision derived from a verdict is what the orchestrator acts on.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Normalized classification of a file's reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Benign,
    Malware,
    Phishing,
    CommandAndControl,
    Grayware,
    /// The sample exists but analysis has not finished.
    Pending,
    /// Service reported a code outside the verdict set. Carries the raw
    /// reason code; `None` when the response could not be parsed at all.
    Unknown(Option<i32>),
    /// Service reported an analysis error for this sample.
    AnalysisError,
}

impl Verdict {
    /// Total mapping from the service's raw verdict codes.
    pub fn from_code(code: i32) -> Verdict {
        match code {
            0 => Verdict::Benign,
            1 => Verdict::Malware,
            2 => Verdict::Grayware,
            4 => Verdict::Phishing,
            5 => Verdict::CommandAndControl,
            -100 => Verdict::Pending,
            other => Verdict::Unknown(Some(other)),
        }
    }

    /// A terminal verdict yields a definitive routing destination without
    /// further polling.
    pub fn is_terminal(&self) -> bool {
        !matches!(RoutingDecision::from_verdict(*self), RoutingDecision::AwaitAnalysis)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Verdict::Benign => write!(f, "benign"),
            Verdict::Malware => write!(f, "malware"),
            Verdict::Phishing => write!(f, "phishing"),
            Verdict::CommandAndControl => write!(f, "c2"),
            Verdict::Grayware => write!(f, "grayware"),
            Verdict::Pending => write!(f, "pending"),
            Verdict::Unknown(Some(code)) => write!(f, "unknown({})", code),
            Verdict::Unknown(None) => write!(f, "unknown"),
            Verdict::AnalysisError => write!(f, "analysis-error"),
        }
    }
}

/// What the pipeline does with a file, derived from its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    MoveToClean,
    MoveToQuarantine,
    /// Non-terminal: submit (if not yet submitted) and keep polling.
    AwaitAnalysis,
}

impl RoutingDecision {
    pub fn from_verdict(verdict: Verdict) -> RoutingDecision {
        match verdict {
            Verdict::Benign => RoutingDecision::MoveToClean,
            Verdict::Malware | Verdict::Phishing | Verdict::CommandAndControl => {
                RoutingDecision::MoveToQuarantine
            }
            // Grayware has no defined destination, so it is never terminal
            // and always re-enters the polling path.
            Verdict::Grayware
            | Verdict::Pending
            | Verdict::Unknown(_)
            | Verdict::AnalysisError => RoutingDecision::AwaitAnalysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_code_mapping_matches_service_table() {
        assert_eq!(Verdict::from_code(0), Verdict::Benign);
        assert_eq!(Verdict::from_code(1), Verdict::Malware);
        assert_eq!(Verdict::from_code(2), Verdict::Grayware);
        assert_eq!(Verdict::from_code(4), Verdict::Phishing);
        assert_eq!(Verdict::from_code(5), Verdict::CommandAndControl);
        assert_eq!(Verdict::from_code(-100), Verdict::Pending);
        assert_eq!(Verdict::from_code(-101), Verdict::Unknown(Some(-101)));
        assert_eq!(Verdict::from_code(-102), Verdict::Unknown(Some(-102)));
        assert_eq!(Verdict::from_code(-103), Verdict::Unknown(Some(-103)));
    }

    #[test]
    fn unmapped_codes_fall_through_to_unknown() {
        assert_eq!(Verdict::from_code(3), Verdict::Unknown(Some(3)));
        assert_eq!(Verdict::from_code(42), Verdict::Unknown(Some(42)));
        assert_eq!(Verdict::from_code(i32::MIN), Verdict::Unknown(Some(i32::MIN)));
    }

    #[test]
    fn mapping_is_pure() {
        for code in [-103, -100, 0, 1, 2, 4, 5, 99] {
            assert_eq!(Verdict::from_code(code), Verdict::from_code(code));
        }
    }

    #[test]
    fn terminal_verdicts_route_to_exactly_one_destination() {
        assert_eq!(
            RoutingDecision::from_verdict(Verdict::Benign),
            RoutingDecision::MoveToClean
        );
        for v in [Verdict::Malware, Verdict::Phishing, Verdict::CommandAndControl] {
            assert_eq!(
                RoutingDecision::from_verdict(v),
                RoutingDecision::MoveToQuarantine
            );
        }
    }

    #[test]
    fn grayware_is_never_terminal() {
        // No grayware destination is defined; it must poll, not route.
        assert_eq!(
            RoutingDecision::from_verdict(Verdict::Grayware),
            RoutingDecision::AwaitAnalysis
        );
        assert!(!Verdict::Grayware.is_terminal());
    }

    #[test]
    fn non_terminal_verdicts_await_analysis() {
        for v in [
            Verdict::Pending,
            Verdict::Unknown(Some(-101)),
            Verdict::Unknown(None),
            Verdict::AnalysisError,
        ] {
            assert_eq!(RoutingDecision::from_verdict(v), RoutingDecision::AwaitAnalysis);
            assert!(!v.is_terminal());
        }
    }
}
