//! Depth-first traversal of a MusicXML tree
//!
//! The browser walks every element in document order and hands the known
//! ones to an `ElementVisitor`, once on entry and once on exit. Unknown
//! elements are not reported but their children still are, so wrappers
//! such as `<attributes>`, `<pitch>` or `<notations>` need no handler.

use crate::converters::musicxml::musicxml_to_msr::element::{ElementKind, MusicXmlElement};
use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;
use roxmltree::Node;

/// Receives enter/exit events for recognized elements
pub trait ElementVisitor {
    fn visit_start(
        &mut self,
        kind: ElementKind,
        element: &dyn MusicXmlElement,
    ) -> Result<(), TranslationError>;

    fn visit_end(
        &mut self,
        kind: ElementKind,
        element: &dyn MusicXmlElement,
    ) -> Result<(), TranslationError>;
}

/// Walks a roxmltree element and its descendants
pub struct TreeBrowser;

impl TreeBrowser {
    /// Visit `node` and everything below it; the first visitor error stops
    /// the walk
    pub fn browse<V>(node: Node<'_, '_>, visitor: &mut V) -> Result<(), TranslationError>
    where
        V: ElementVisitor + ?Sized,
    {
        if !node.is_element() {
            return Ok(());
        }

        let kind = ElementKind::from_tag(node.tag_name().name());

        if let Some(kind) = kind {
            visitor.visit_start(kind, &node)?;
        }

        for child in node.children().filter(|child| child.is_element()) {
            Self::browse(child, visitor)?;
        }

        if let Some(kind) = kind {
            visitor.visit_end(kind, &node)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl ElementVisitor for Recorder {
        fn visit_start(
            &mut self,
            _kind: ElementKind,
            element: &dyn MusicXmlElement,
        ) -> Result<(), TranslationError> {
            if self.fail_on == Some(element.tag()) {
                return Err(TranslationError::internal("-", element.input_line(), "stop"));
            }
            self.events.push(format!("+{}", element.tag()));
            Ok(())
        }

        fn visit_end(
            &mut self,
            _kind: ElementKind,
            element: &dyn MusicXmlElement,
        ) -> Result<(), TranslationError> {
            self.events.push(format!("-{}", element.tag()));
            Ok(())
        }
    }

    const XML: &str = "<note><pitch><step>C</step><octave>4</octave></pitch><notehead>x</notehead><duration>1</duration></note>";

    #[test]
    fn test_known_elements_in_document_order() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let mut recorder = Recorder::default();

        TreeBrowser::browse(doc.root_element(), &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec!["+note", "+step", "-step", "+octave", "-octave", "+duration", "-duration", "-note"]
        );
    }

    #[test]
    fn test_visitor_error_stops_the_walk() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let mut recorder = Recorder {
            fail_on: Some("octave"),
            ..Recorder::default()
        };

        let err = TreeBrowser::browse(doc.root_element(), &mut recorder).unwrap_err();

        assert_eq!(err.line(), Some(1));
        assert!(!recorder.events.contains(&"+duration".to_string()));
    }
}
