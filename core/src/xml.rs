use crate::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// The streaming XML response-parsing contract.
///
/// Service responses are consumed incrementally as tag-open/tag-close events
/// rather than built into a document tree first. A consumer is effectively a
/// table keyed by tag name: `tag_start` may open a per-record accumulator for
/// a repeating wrapper element, `tag_end` inspects the closed tag and either
/// assigns the accumulated text to the result or appends the in-progress
/// record to it.
pub trait XmlConsumer {
    /// (Re)initialize the result accumulator.
    ///
    /// Called once by [`parse_xml`] before any event is delivered, so a
    /// consumer instance can be driven over a fresh document at any time.
    fn reset(&mut self) {}

    /// Called for each opening tag with its local name.
    fn tag_start(&mut self, _name: &str) {}

    /// Called for each closing tag with its local name and the character
    /// data accumulated since the last tag boundary.
    fn tag_end(&mut self, name: &str, text: &str) -> Result<()>;
}

/// Drive a consumer over an XML document.
///
/// Character data between tags is accumulated into a scratch buffer that is
/// reset at each tag boundary, matching what `tag_end` receives. Malformed
/// XML surfaces as a [`crate::ErrorKind::ResponseInvalid`] error.
pub fn parse_xml(body: &[u8], consumer: &mut impl XmlConsumer) -> Result<()> {
    consumer.reset();

    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                text.clear();
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                consumer.tag_start(&name);
            }
            Ok(Event::Text(e)) => {
                let unescaped = e.unescape().map_err(|err| {
                    Error::response_invalid("failed to unescape text content").with_source(err)
                })?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                consumer.tag_end(&name, &text)?;
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                // A self-closing tag is an open immediately followed by a
                // close with no character data in between.
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                consumer.tag_start(&name);
                consumer.tag_end(&name, "")?;
                text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(Error::response_invalid("failed to parse response xml")
                    .with_source(err))
            }
        }
        buf.clear();
    }

    Ok(())
}
