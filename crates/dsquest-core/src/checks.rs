//! Test expectation evaluation against captured output.

use crate::model::TestExpectation;

/// Result of checking output against a lesson's expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub ok: bool,
    pub message: String,
}

impl CheckOutcome {
    fn pass(message: &str) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
        }
    }

    fn fail(message: String) -> Self {
        Self { ok: false, message }
    }
}

/// CRLF to LF, then trim surrounding whitespace.
pub fn normalize_output(s: &str) -> String {
    s.replace("\r\n", "\n").trim().to_string()
}

/// Evaluate expectations in order; the first failure short-circuits.
pub fn run_checks(output: &str, tests: &[TestExpectation]) -> CheckOutcome {
    if tests.is_empty() {
        return CheckOutcome::pass("No tests.");
    }

    let out = normalize_output(output);
    for test in tests {
        match test {
            TestExpectation::StdoutEquals { expected } => {
                if out != normalize_output(expected) {
                    return CheckOutcome::fail(format!(
                        "Expected exact output:\n{expected}\n\nGot:\n{out}"
                    ));
                }
            }
            TestExpectation::StdoutContains { expected } => {
                // Empty fragments match trivially.
                if let Some(missing) = expected
                    .iter()
                    .filter(|frag| !frag.is_empty())
                    .find(|frag| !out.contains(frag.as_str()))
                {
                    return CheckOutcome::fail(format!(
                        "Expected output to contain:\n{missing}\n\nGot:\n{out}"
                    ));
                }
            }
        }
    }

    CheckOutcome::pass("All checks passed")
}
