//! Wire-level XML stream framing: bytes in, decoded stanza trees out, and
//! back. The stream root (`<stream:stream ...>`) is opened once and never
//! closed by either side for the life of the connection; everything after
//! it is a sequence of complete top-level elements, each one stanza.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use xmpp_router_core::stanza::{Node, Stanza};

/// A unit of decoded input: either the stream-opening tag or a stanza.
pub enum Frame {
    StreamOpen(Stanza),
    Stanza(Stanza),
}

/// Accumulates bytes until they form one or more complete frames.
///
/// Re-parses its whole buffer from the start on every `feed`: stanzas are
/// small, so this is simpler than tracking parser state across partial
/// reads and cheap enough in practice.
#[derive(Default)]
pub struct StreamCodec {
    buf: Vec<u8>,
    opened: bool,
}

impl StreamCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes buffered but not yet resolved into a frame. A caller should
    /// treat a buffer that keeps growing without ever draining as a
    /// misbehaving peer and close the connection.
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    pub fn feed(&mut self, data: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        let mut stack: Vec<Stanza> = Vec::new();
        let mut committed = 0usize;

        let mut reader = Reader::from_reader(&self.buf[..]);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Err(_) => break, // incomplete or malformed; wait for more bytes
                Ok(Event::Start(start)) => {
                    let stanza = match start_to_stanza(&start) {
                        Some(s) => s,
                        None => break,
                    };
                    if !self.opened && stack.is_empty() {
                        self.opened = true;
                        committed = reader.buffer_position() as usize;
                        frames.push(Frame::StreamOpen(stanza));
                    } else {
                        stack.push(stanza);
                    }
                }
                Ok(Event::Empty(start)) => {
                    let stanza = match start_to_stanza(&start) {
                        Some(s) => s,
                        None => break,
                    };
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.push_element(stanza);
                        }
                        None => {
                            committed = reader.buffer_position() as usize;
                            frames.push(Frame::Stanza(stanza));
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(done) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.push_element(done),
                            None => {
                                committed = reader.buffer_position() as usize;
                                frames.push(Frame::Stanza(done));
                            }
                        }
                    }
                    // An empty stack here with no pushed element is the peer
                    // closing `</stream:stream>`; the caller learns the
                    // stream ended from the socket's own EOF instead.
                }
                Ok(Event::Text(text)) => {
                    if let Some(top) = stack.last_mut() {
                        if let Ok(unescaped) = text.unescape() {
                            let s = unescaped.into_owned();
                            if !s.is_empty() {
                                top.push_child(Node::Text(s));
                            }
                        }
                    }
                }
                Ok(_) => {}
            }
        }

        self.buf.drain(..committed);
        frames
    }
}

fn start_to_stanza(start: &BytesStart) -> Option<Stanza> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut stanza = Stanza::new(name);
    for attr in start.attributes() {
        let attr = attr.ok()?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().ok()?.into_owned();
        if key == "xmlns" {
            stanza.namespace = Some(value);
        } else {
            stanza.set_attr(key, value);
        }
    }
    Some(stanza)
}

/// Serialize a decoded stanza back to wire bytes.
pub fn serialize(stanza: &Stanza) -> String {
    let mut out = String::new();
    write_element(stanza, &mut out);
    out
}

fn write_element(stanza: &Stanza, out: &mut String) {
    out.push('<');
    out.push_str(&stanza.name);
    if let Some(ns) = &stanza.namespace {
        out.push_str(" xmlns=\"");
        out.push_str(&escape_attr(ns));
        out.push('"');
    }
    for (key, value) in stanza.attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if stanza.children().is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in stanza.children() {
        match child {
            Node::Element(el) => write_element(el, out),
            Node::Text(text) => out.push_str(&escape_text(text)),
        }
    }
    out.push_str("</");
    out.push_str(&stanza.name);
    out.push('>');
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// The stream-opening tag the router sends in reply to a peer's own open.
/// Left unclosed, per XMPP stream framing.
pub fn stream_open_reply(id: &str) -> String {
    format!(
        "<stream:stream xmlns:stream=\"http://etherx.jabber.org/streams\" \
         xmlns=\"jabber:component:accept\" id=\"{id}\">"
    )
}

/// A stream-level error, followed by the closing stream tag.
pub fn stream_error(condition: &str) -> String {
    format!(
        "<stream:error><{condition} xmlns=\"urn:ietf:params:xml:ns:xmpp-streams\"/></stream:error></stream:stream>"
    )
}

pub fn stream_close() -> &'static str {
    "</stream:stream>"
}
