//! A [`FeedbackSink`] that records what it was sent.

use crate::feedback::FeedbackSink;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    Message(String),
    Markdown(String),
    Fail(String),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    pub events: Vec<FeedbackEvent>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.collect(|event| match event {
            FeedbackEvent::Message(text) => Some(text),
            _ => None,
        })
    }

    pub fn markdowns(&self) -> Vec<&str> {
        self.collect(|event| match event {
            FeedbackEvent::Markdown(text) => Some(text),
            _ => None,
        })
    }

    pub fn failures(&self) -> Vec<&str> {
        self.collect(|event| match event {
            FeedbackEvent::Fail(text) => Some(text),
            _ => None,
        })
    }

    fn collect<'a>(&'a self, pick: impl Fn(&'a FeedbackEvent) -> Option<&'a String>) -> Vec<&'a str> {
        self.events
            .iter()
            .filter_map(pick)
            .map(String::as_str)
            .collect()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn message(&mut self, text: &str) -> io::Result<()> {
        self.events.push(FeedbackEvent::Message(text.to_string()));
        Ok(())
    }

    fn markdown(&mut self, text: &str) -> io::Result<()> {
        self.events.push(FeedbackEvent::Markdown(text.to_string()));
        Ok(())
    }

    fn fail(&mut self, text: &str) -> io::Result<()> {
        self.events.push(FeedbackEvent::Fail(text.to_string()));
        Ok(())
    }
}
