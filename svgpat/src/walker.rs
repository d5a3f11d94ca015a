//! Structural document walk.
//!
//! Streams the SVG with quick-xml, depth first, keeping one composed
//! transform per open element. Path-bearing elements are interpreted
//! immediately with the transform on top of the stack. All mutable state
//! lives in the [`Walker`], which is consumed by [`Walker::walk`].

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

use crate::accumulator::Accumulator;
use crate::error::{ConvertError, Result};
use crate::flatten::Flattening;
use crate::geometry::Polyline;
use crate::page::Page;
use crate::path::PathInterpreter;
use crate::shapes::{Rect, is_unsupported_shape};
use crate::transform::Transform;

/// Unescaped attributes of one element, keyed by their qualified name.
#[derive(Debug, Clone, Default)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn from_element(e: &BytesStart) -> Result<Self> {
        let mut map = HashMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| ConvertError::xml(format!("attribute name: {err}")))?;
            let value = attr.unescape_value()?;
            map.insert(key.to_string(), value.into_owned());
        }
        Ok(Self(map))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Output of the structural walk: the page and every finalized polyline,
/// in page inches.
#[derive(Debug, Clone, PartialEq)]
pub struct Walked {
    pub page: Page,
    pub polylines: Vec<Polyline>,
}

/// Per-document conversion context.
pub struct Walker {
    flattening: Flattening,
    /// One composed transform per open element.
    stack: Vec<Transform>,
    page: Option<Page>,
    accumulator: Accumulator,
}

impl Walker {
    pub fn new(flattening: Flattening) -> Self {
        Self {
            flattening,
            stack: Vec::new(),
            page: None,
            accumulator: Accumulator::new(),
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current_transform(&self) -> Transform {
        self.stack.last().copied().unwrap_or(Transform::IDENTITY)
    }

    /// Walk a complete document.
    pub fn walk(mut self, svg: &str) -> Result<Walked> {
        let mut reader = Reader::from_str(svg);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => self.enter(e)?,
                Ok(Event::Empty(ref e)) => {
                    self.enter(e)?;
                    self.leave();
                }
                Ok(Event::End(_)) => self.leave(),
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::xml(format!(
                        "at position {}: {}",
                        reader.error_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        let page = self.page.unwrap_or_else(|| {
            warn!("no svg element found, assuming a 1in x 1in page");
            Page::default()
        });

        Ok(Walked {
            page,
            polylines: self.accumulator.finish(),
        })
    }

    fn enter(&mut self, e: &BytesStart) -> Result<()> {
        let local_name = e.local_name();
        let name = std::str::from_utf8(local_name.as_ref())
            .map_err(|err| ConvertError::xml(format!("element name: {err}")))?;
        let attrs = Attributes::from_element(e)?;

        let local = match attrs.get("transform") {
            Some(value) => Transform::parse(value)?,
            None => Transform::IDENTITY,
        };

        let establishes_page = name == "svg" && self.page.is_none();
        let active = if establishes_page {
            let (page, page_transform) = Page::from_root_attributes(
                attrs.get("width"),
                attrs.get("height"),
                attrs.get("viewBox"),
            )?;
            self.page = Some(page);
            Transform::compose(&page_transform, &local)
        } else {
            Transform::compose(&self.current_transform(), &local)
        };
        self.stack.push(active);

        match name {
            "svg" if !establishes_page => {
                warn!("nested svg element treated as a group");
            }
            "svg" | "g" => {}
            "path" => match attrs.get("d") {
                Some(d) => {
                    debug!(depth = self.depth(), "path");
                    PathInterpreter::new(active, self.flattening, &mut self.accumulator).run(d)?;
                }
                None => debug!("path without d attribute"),
            },
            "rect" => {
                if let Some(rect) = Rect::from_attributes(&attrs)? {
                    let mut path =
                        PathInterpreter::new(active, self.flattening, &mut self.accumulator);
                    rect.trace(&mut path);
                    path.finish();
                }
            }
            other if is_unsupported_shape(other) => {
                warn!(element = other, "unsupported element skipped");
            }
            _ => {}
        }

        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

// ============================================================================
// TESTS
// ============================================================================
