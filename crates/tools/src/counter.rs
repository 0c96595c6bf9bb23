//! Section Counter
//!
//! Section numbers are assigned from the executor's own tally of successful
//! writes. The ordinal the model sends is a hint, logged when it disagrees and
//! otherwise ignored, so a repeated or stale tool call cannot duplicate or
//! skip a section.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a section write touches the document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// First section: write the document header, then the content.
    Create,
    /// Later sections: append.
    Append,
}

/// What the dispatch does after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStep {
    /// More sections follow; return an intermediate result.
    Continue,
    /// This was the last section; run finalize in the same dispatch.
    Finalize,
}

/// Number and mode the executor assigned to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionAssignment {
    pub number: u32,
    pub mode: WriteMode,
    pub step: SectionStep,
    /// Ordinal the model claimed, kept for diagnostics only.
    pub claimed: Option<i64>,
}

impl SectionAssignment {
    pub fn is_last(&self) -> bool {
        self.step == SectionStep::Finalize
    }
}

/// Tally of successful section writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounter {
    written: u32,
}

impl SectionCounter {
    pub fn new(written: u32) -> Self {
        Self { written }
    }

    pub fn written(&self) -> u32 {
        self.written
    }

    /// Assign the next section. Does not advance the tally; call `commit`
    /// once the write has actually succeeded.
    pub fn assign(&self, claimed: Option<i64>, is_last_section: bool) -> SectionAssignment {
        let number = self.written + 1;
        match claimed {
            Some(c) if c != i64::from(number) => {
                warn!(
                    claimed = c,
                    assigned = number,
                    "Model-supplied section number disagrees with tally; using tally"
                );
            }
            _ => debug!(assigned = number, "Section number assigned"),
        }

        SectionAssignment {
            number,
            mode: if self.written == 0 {
                WriteMode::Create
            } else {
                WriteMode::Append
            },
            step: if is_last_section {
                SectionStep::Finalize
            } else {
                SectionStep::Continue
            },
            claimed,
        }
    }

    /// Record a successful write. Stale assignments (from before another
    /// commit) are rejected so the tally only ever moves forward by one.
    pub fn commit(&mut self, assignment: &SectionAssignment) -> Result<u32, String> {
        if assignment.number != self.written + 1 {
            return Err(format!(
                "Section {} is out of sequence; {} section(s) already written",
                assignment.number, self.written
            ));
        }
        self.written = assignment.number;
        Ok(self.written)
    }
}

/// Progress line appended to a section-write confirmation.
pub fn progress_message(written: u32, total: u32) -> Option<String> {
    if total == 0 {
        return None;
    }
    let remaining = total.saturating_sub(written);
    Some(format!(
        "Progress: {written}/{total} sections complete. {remaining} section(s) remaining."
    ))
}
