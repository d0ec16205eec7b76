//! Free-form question pages.

use super::rules::{MIN_ANSWER_GAP, QUESTION_KEYWORDS, QUESTION_MIN_FONT, QUESTION_PREFIXES};
use super::{PageContext, Placements, TemplateHandler};
use crate::model::{FieldPlacement, Rect, TextSpan};

/// Space kept between a prompt and its answer area.
const ANSWER_PADDING: f32 = 2.0;

/// Places one answer area below every question prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuestionsHandler;

impl QuestionsHandler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self
    }

    /// Check whether a span reads as a question prompt.
    pub fn is_question(span: &TextSpan, top_margin: f32) -> bool {
        if span.font_size < QUESTION_MIN_FONT || span.bbox.y0 <= top_margin {
            return false;
        }
        let text = span.trimmed();
        text.contains('?')
            || QUESTION_KEYWORDS.iter().any(|k| text.contains(k))
            || QUESTION_PREFIXES.iter().any(|p| text.starts_with(p))
    }
}

impl TemplateHandler for QuestionsHandler {
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        // Anchor index is already in reading order
        let questions: Vec<&TextSpan> = ctx
            .anchors
            .spans()
            .iter()
            .copied()
            .filter(|s| Self::is_question(s, ctx.geometry.top_margin))
            .collect();

        let column = ctx.text_column();
        let page_bottom = ctx.bottom_edge();

        for (i, question) in questions.iter().enumerate() {
            let top = question.bbox.y1 + ANSWER_PADDING;
            let bottom = questions
                .get(i + 1)
                .map_or(page_bottom, |next| next.bbox.y0 - ANSWER_PADDING);

            if bottom - top < MIN_ANSWER_GAP {
                log::debug!(
                    "question_{}: gap {:.1}pt below '{}' is too small",
                    i + 1,
                    bottom - top,
                    question.trimmed()
                );
                continue;
            }

            out.push(FieldPlacement::textarea(
                format!("question_{}", i + 1),
                Rect::new(column.x0, top, column.x1, bottom),
            ));
        }

        log::debug!(
            "write questions: {} prompts, {} answer areas",
            questions.len(),
            out.len()
        );
    }
}
