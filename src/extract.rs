//! Carving "around" and "inside" spans out of a matched span.

use crate::composed::Matcher;
use crate::error::DefinitionError;
use crate::options::AiType;
use crate::span::Span;

/// Both parts of a found textobject, as neighborhood spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSpans {
    pub around: Span,
    pub inside: Span,
}

impl AiSpans {
    pub fn get(&self, ai_type: AiType) -> Span {
        match ai_type {
            AiType::Around => self.around,
            AiType::Inside => self.inside,
        }
    }
}

/// Apply `template` to the text of `span` and read back its position captures.
///
/// Two captures mark the inside, and the whole span is around. Four captures
/// mark the start of around, the inside, and the end of around. Anything
/// else means the textobject definition is broken.
pub fn extract(text: &[u8], span: Span, template: &Matcher) -> Result<AiSpans, DefinitionError> {
    let pattern = match template {
        Matcher::Pattern(pattern) => pattern,
        Matcher::Finder(finder) => {
            return Err(DefinitionError::FinderTemplate {
                finder: finder.name().to_string(),
            });
        }
    };
    let subject = text.get(span.byte_range()).unwrap_or_default();
    let captures = match pattern.find(subject) {
        Some(m) => m.positions().ok_or_else(|| DefinitionError::NonPositionCapture {
            template: pattern.source().to_string(),
        })?,
        None => Vec::new(),
    };

    // Capture `c` sits before byte `c` of the span, i.e. at offset `left + c`
    let at = |c: usize| span.left + c;
    match captures.as_slice() {
        &[inner_start, inner_end] => Ok(AiSpans {
            around: span,
            inside: Span::new(at(inner_start), at(inner_end) - 1),
        }),
        &[outer_start, inner_start, inner_end, outer_end] => Ok(AiSpans {
            around: Span::new(at(outer_start), at(outer_end) - 1),
            inside: Span::new(at(inner_start), at(inner_end) - 1),
        }),
        other => Err(DefinitionError::ExtractionArity {
            template: pattern.source().to_string(),
            found: other.len(),
        }),
    }
}
