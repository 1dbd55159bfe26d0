//! Well-formedness gate
//!
//! Drives quick-xml over the whole document token by token and stops at the first
//! structural error. At most one issue is ever reported.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::Checker;
use crate::issue::{Issue, IssueKind, Phase};
use crate::position;

/// First structural error found by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fault {
    message: String,
    /// Byte offset of the error, when the tokenizer knows it
    offset: Option<usize>,
}

impl Fault {
    fn at(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset: Some(offset),
        }
    }

    fn into_issue(self, content: &[u8]) -> Issue {
        match self.offset {
            Some(offset) if !content.is_empty() => {
                // errors at end of input point at the last byte
                let pos = position::resolve(content, offset.min(content.len() - 1));
                Issue {
                    line: pos.line,
                    column: pos.column,
                    line_text: pos.line_text,
                    kind: IssueKind::SyntaxError,
                    message: self.message,
                    highlight: String::new(),
                }
            }
            _ => Issue::unpositioned(IssueKind::XmlError, self.message),
        }
    }
}

/// Checks basic XML syntax: tag nesting, attribute syntax, entity references and
/// encoding
#[derive(Debug, Default, Clone, Copy)]
pub struct WellFormednessChecker;

impl WellFormednessChecker {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize the whole document, returning the first fault
    fn scan(content: &[u8]) -> Result<(), Fault> {
        let mut reader = Reader::from_reader(content);
        reader.config_mut().check_end_names = true;

        let mut open_elements: Vec<(String, usize)> = Vec::new();

        loop {
            let event_start = reader.buffer_position() as usize;
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    check_attributes(&e, event_start)?;
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    open_elements.push((name, event_start));
                }
                Ok(Event::End(_)) => {
                    open_elements.pop();
                }
                Ok(Event::Empty(e)) => check_attributes(&e, event_start)?,
                Ok(Event::Text(e)) => {
                    e.unescape()
                        .map_err(|err| Fault::at(err.to_string(), event_start))?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(quick_xml::Error::Io(err)) => {
                    return Err(Fault {
                        message: err.to_string(),
                        offset: None,
                    });
                }
                Err(err) => {
                    return Err(Fault::at(err.to_string(), reader.error_position() as usize));
                }
            }
        }

        match open_elements.pop() {
            Some((name, start)) => Err(Fault::at(
                format!("unexpected end of input: element <{}> is never closed", name),
                start,
            )),
            None => Ok(()),
        }
    }
}

fn check_attributes(tag: &BytesStart<'_>, tag_start: usize) -> Result<(), Fault> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|err| Fault::at(err.to_string(), tag_start))?;
        attr.unescape_value()
            .map_err(|err| Fault::at(err.to_string(), tag_start))?;
    }
    Ok(())
}

impl Checker for WellFormednessChecker {
    fn phase(&self) -> Phase {
        Phase::WellFormedness
    }

    fn check(&self, content: &[u8], _budget: usize) -> Vec<Issue> {
        match Self::scan(content) {
            Ok(()) => Vec::new(),
            Err(fault) => {
                log::debug!("well-formedness fault: {:?}", fault);
                vec![fault.into_issue(content)]
            }
        }
    }
}
