//! Per-tool view state.
//!
//! These structs hold the state each interactive flow progresses through
//! and enforce its transition rules; the loops in `app.rs` only sequence
//! gateway calls and rendering around them.

use std::collections::HashSet;

use tutor_core::model::{Presentation, Quiz, QuizQuestion, Slide};

/// Progression through a loaded quiz.
///
/// Answering is one-shot per question: once an answer is recorded, further
/// selections on the same question are ignored. The score increments by
/// exactly one when the selected index equals the question's correct index.
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    selected: Option<usize>,
    score: u32,
    finished: bool,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            current: 0,
            selected: None,
            score: 0,
            finished: false,
        }
    }

    /// 0-based index of the current question
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.finished {
            None
        } else {
            self.quiz.questions.get(self.current)
        }
    }

    /// Records an answer for the current question. Returns whether it was
    /// correct, or `None` when the selection is ignored (already answered,
    /// quiz finished, or index out of range).
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        if self.finished || self.selected.is_some() {
            return None;
        }
        let question = self.quiz.questions.get(self.current)?;
        if index >= question.options.len() {
            return None;
        }

        self.selected = Some(index);
        let correct = index == question.correct_answer_index;
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Moves to the next question, or finishes the quiz after the last one.
    /// Does nothing until the current question has been answered.
    pub fn advance(&mut self) {
        if self.finished || self.selected.is_none() {
            return;
        }
        if self.current + 1 < self.quiz.questions.len() {
            self.current += 1;
            self.selected = None;
        } else {
            self.finished = true;
        }
    }
}

/// Bounded navigation over a presentation plus the per-slide image
/// back-fill bookkeeping.
///
/// Image generation is idempotent-if-absent: beginning a generation for a
/// slide that already has one pending (or already has an image) is a no-op.
/// Results are written into their slide slot by index, so two outstanding
/// generations may resolve in any order.
pub struct SlideViewer {
    presentation: Presentation,
    index: usize,
    pending_images: HashSet<usize>,
}

impl SlideViewer {
    pub fn new(presentation: Presentation) -> Self {
        Self {
            presentation,
            index: 0,
            pending_images: HashSet::new(),
        }
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.presentation.slides.len()
    }

    pub fn current(&self) -> &Slide {
        &self.presentation.slides[self.index]
    }

    pub fn next(&mut self) {
        if self.index + 1 < self.len() {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Jumps to a slide, clamping to the valid range
    pub fn jump(&mut self, index: usize) {
        self.index = index.min(self.len().saturating_sub(1));
    }

    pub fn image_pending(&self, index: usize) -> bool {
        self.pending_images.contains(&index)
    }

    /// Marks a slide's image generation as in flight. Returns false without
    /// side effects when the slide is out of range, already has an image,
    /// or already has a generation pending.
    pub fn begin_image_generation(&mut self, index: usize) -> bool {
        let Some(slide) = self.presentation.slides.get(index) else {
            return false;
        };
        if slide.generated_image_base64.is_some() || self.pending_images.contains(&index) {
            return false;
        }
        self.pending_images.insert(index)
    }

    /// Completes a pending generation, back-filling the slide slot when a
    /// payload was produced
    pub fn finish_image_generation(&mut self, index: usize, result: Option<String>) {
        self.pending_images.remove(&index);
        if let (Some(slide), Some(image)) = (self.presentation.slides.get_mut(index), result) {
            slide.generated_image_base64 = Some(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> Quiz {
        Quiz {
            topic: "Tabela Periódica".to_string(),
            questions: vec![
                QuizQuestion {
                    question: "Símbolo do ouro?".to_string(),
                    options: vec!["Au".into(), "Ag".into(), "Fe".into(), "Cu".into()],
                    correct_answer_index: 0,
                    explanation: "Aurum.".to_string(),
                },
                QuizQuestion {
                    question: "Símbolo da prata?".to_string(),
                    options: vec!["Au".into(), "Ag".into(), "Fe".into(), "Cu".into()],
                    correct_answer_index: 1,
                    explanation: "Argentum.".to_string(),
                },
            ],
        }
    }

    fn presentation(count: usize) -> Presentation {
        Presentation {
            topic: "Tema".to_string(),
            slides: (0..count)
                .map(|i| Slide {
                    title: format!("Slide {}", i + 1),
                    subtitle: None,
                    content: vec!["ponto".to_string()],
                    image_prompt: "prompt".to_string(),
                    generated_image_base64: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_correct_answer_scores_once() {
        let mut session = QuizSession::new(quiz());
        assert_eq!(session.answer(0), Some(true));
        assert_eq!(session.score(), 1);

        // Further selections on the same question are ignored
        assert_eq!(session.answer(1), None);
        assert_eq!(session.answer(0), None);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_wrong_answer_does_not_score() {
        let mut session = QuizSession::new(quiz());
        assert_eq!(session.answer(2), Some(false));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let mut session = QuizSession::new(quiz());
        assert_eq!(session.answer(4), None);
        assert!(!session.is_answered());
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut session = QuizSession::new(quiz());
        session.advance();
        assert_eq!(session.current_index(), 0);

        session.answer(0);
        session.advance();
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_answered());
    }

    #[test]
    fn test_advance_past_last_question_finishes() {
        let mut session = QuizSession::new(quiz());
        session.answer(0);
        session.advance();
        session.answer(1);
        session.advance();

        assert!(session.is_finished());
        assert!(session.current_question().is_none());
        assert_eq!(session.score(), 2);

        // Answers after the end are ignored
        assert_eq!(session.answer(0), None);
    }

    #[test]
    fn test_viewer_navigation_is_bounded() {
        let mut viewer = SlideViewer::new(presentation(3));
        viewer.prev();
        assert_eq!(viewer.index(), 0);

        viewer.next();
        viewer.next();
        viewer.next();
        assert_eq!(viewer.index(), 2);

        viewer.jump(10);
        assert_eq!(viewer.index(), 2);
        viewer.jump(1);
        assert_eq!(viewer.index(), 1);
    }

    #[test]
    fn test_begin_image_generation_is_idempotent_while_pending() {
        let mut viewer = SlideViewer::new(presentation(2));
        assert!(viewer.begin_image_generation(0));
        // Second invocation while the first is pending is a no-op
        assert!(!viewer.begin_image_generation(0));
        assert!(viewer.image_pending(0));

        // A different slide is independent
        assert!(viewer.begin_image_generation(1));
    }

    #[test]
    fn test_finish_image_generation_backfills_slot() {
        let mut viewer = SlideViewer::new(presentation(2));
        viewer.begin_image_generation(0);
        viewer.begin_image_generation(1);

        // Out-of-order completion writes each result into its own slot
        viewer.finish_image_generation(1, Some("data:image/png;base64,Qg==".to_string()));
        viewer.finish_image_generation(0, None);

        assert!(!viewer.image_pending(0));
        assert!(!viewer.image_pending(1));
        assert!(viewer.presentation().slides[0].generated_image_base64.is_none());
        assert_eq!(
            viewer.presentation().slides[1].generated_image_base64.as_deref(),
            Some("data:image/png;base64,Qg==")
        );
    }

    #[test]
    fn test_slide_with_image_does_not_regenerate() {
        let mut viewer = SlideViewer::new(presentation(1));
        viewer.begin_image_generation(0);
        viewer.finish_image_generation(0, Some("data:image/png;base64,Qg==".to_string()));

        assert!(!viewer.begin_image_generation(0));
    }

    #[test]
    fn test_begin_image_generation_out_of_range() {
        let mut viewer = SlideViewer::new(presentation(1));
        assert!(!viewer.begin_image_generation(5));
    }
}
