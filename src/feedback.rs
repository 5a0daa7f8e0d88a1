//! Delivery of rendered reports to the review-feedback mechanism.
//!
//! [`FeedbackSink`] has the three primitives a code-review host offers:
//! informational messages, markdown blocks and failures. The binary writes to
//! the terminal through [`WriterFeedback`]; posting to a real review host is
//! left to other sinks.

use colored::*;
use std::io::{self, Write};

pub trait FeedbackSink {
    fn message(&mut self, text: &str) -> io::Result<()>;

    fn markdown(&mut self, text: &str) -> io::Result<()>;

    /// Report a failure. Any failure makes the run unsuccessful.
    fn fail(&mut self, text: &str) -> io::Result<()>;
}

/// Writes messages and markdown to `out` and failures to `err`.
pub struct WriterFeedback<O: Write, E: Write> {
    out: O,
    err: E,
    failures: usize,
}

/// Terminal feedback: stdout for the report, stderr for failures.
pub type StdoutFeedback = WriterFeedback<io::Stdout, io::Stderr>;

impl StdoutFeedback {
    pub fn stdout() -> Self {
        WriterFeedback::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> WriterFeedback<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            failures: 0,
        }
    }

    /// Number of failures reported so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> FeedbackSink for WriterFeedback<O, E> {
    fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        writeln!(self.out)
    }

    fn markdown(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    fn fail(&mut self, text: &str) -> io::Result<()> {
        self.failures += 1;
        writeln!(self.err, "{} {}", "FAIL".red().bold(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_report_and_failures_go_to_separate_streams() {
        colored::control::set_override(false);
        let mut sink = WriterFeedback::new(Vec::new(), Vec::new());

        sink.message("Project coverage: 50.09%").unwrap();
        sink.markdown("| File | Coverage ||\n").unwrap();
        sink.fail("too low").unwrap();

        assert_eq!(sink.failures(), 1);
        let (out, err) = sink.into_inner();
        assert_eq!(
            text(out),
            "Project coverage: 50.09%\n\n| File | Coverage ||\n\n"
        );
        assert_eq!(text(err), "FAIL too low\n");
    }

    #[test]
    fn test_no_failures_by_default() {
        let sink = WriterFeedback::new(Vec::new(), Vec::new());

        assert_eq!(sink.failures(), 0);
    }
}
