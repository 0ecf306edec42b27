//! XML text codec for the document tree
//!
//! Parsing accepts any single-rooted document: the declaration, comments,
//! processing instructions and doctype are skipped, CDATA is merged into the
//! surrounding text, entities are unescaped. Whitespace-only text inside an
//! element that has children is indentation and is dropped; leaf text is
//! kept verbatim.
//!
//! Writing emits elements in tree order with escaped text and attributes.
//! A childless element with empty text is written self-closing, so indenting
//! never injects whitespace into an empty leaf.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::errors::{DocumentError, DocumentResult};
use super::node::Element;

/// Formatting options for [`write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Whether to emit `<?xml version="1.0" encoding="utf-8"?>`
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Parses XML text into its root element.
///
/// # Errors
///
/// - `DocumentError::Xml` for syntax errors, bad escapes or non-UTF-8 names
/// - `DocumentError::Malformed` for a missing root, several roots, stray
///   text outside the root, or unclosed elements
pub fn parse(input: &str) -> DocumentResult<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(open_element(&start, position)?);
            }
            Ok(Event::Empty(start)) => {
                let element = open_element(&start, position)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(end)) => {
                let element = stack.pop().ok_or_else(|| {
                    DocumentError::malformed(format!(
                        "unexpected end tag '{}'",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| DocumentError::xml(position, e))?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(data)) => {
                let bytes = data.into_inner();
                let text =
                    std::str::from_utf8(&bytes).map_err(|e| DocumentError::xml(position, e))?;
                append_text(&mut stack, text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DocumentError::xml(reader.buffer_position(), e)),
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::malformed(format!(
            "unclosed element '{}'",
            open.name()
        )));
    }

    root.ok_or_else(|| DocumentError::malformed("document has no root element"))
}

fn open_element(start: &BytesStart<'_>, position: usize) -> DocumentResult<Element> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(|e| DocumentError::xml(position, e))?;
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::xml(position, e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| DocumentError::xml(position, e))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| DocumentError::xml(position, e))?;
        element.set_attribute(key, value.into_owned());
    }

    Ok(element)
}

fn close_element(
    mut element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> DocumentResult<()> {
    if !element.is_leaf() && element.text().trim().is_empty() {
        element.text_mut().clear();
    }

    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
        }
        None if root.is_some() => {
            return Err(DocumentError::malformed(format!(
                "second root element '{}'",
                element.name()
            )));
        }
        None => *root = Some(element),
    }

    Ok(())
}

fn append_text(stack: &mut [Element], text: &str) -> DocumentResult<()> {
    match stack.last_mut() {
        Some(element) => {
            element.text_mut().push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DocumentError::malformed("text outside the root element")),
    }
}

/// Serializes `root` to XML text, terminated by a newline.
pub fn write(root: &Element, options: &WriteOptions) -> DocumentResult<String> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };

    if options.declaration {
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
    }

    write_element(&mut writer, root)?;

    let mut output =
        String::from_utf8(writer.into_inner()).map_err(|e| DocumentError::xml(0, e))?;
    output.push('\n');
    Ok(output)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> DocumentResult<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.is_leaf() && element.text().is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if element.is_leaf() {
        emit(writer, Event::Text(BytesText::new(element.text())))?;
    } else {
        for child in element.children() {
            write_element(writer, child)?;
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> DocumentResult<()> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::xml(writer.get_ref().len(), e))
}
