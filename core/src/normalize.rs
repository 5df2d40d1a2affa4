//! Parsing and validation of model output.
//!
//! Structured payloads are parsed into the typed domain model and validated
//! against the data-model invariants. Validation fails loudly: a malformed
//! or out-of-range payload is rejected, never silently coerced.

use std::collections::HashSet;

use crate::errors::{TutorError, TutorResult};
use crate::model::{EssayResult, MindMapNode, Presentation, Quiz, Source};
use crate::types::GenerateContentResponse;

/// Maximum total essay score
pub const MAX_ESSAY_SCORE: u32 = 1000;

/// Maximum per-competency essay score
pub const MAX_COMPETENCY_SCORE: u32 = 200;

/// Extracts the first text part of the first candidate, if any
pub fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;
    content
        .parts
        .iter()
        .find_map(|part| part.text.as_deref())
        .map(str::to_string)
}

/// Scans the first candidate for the first inline binary payload and returns
/// its (mime type, base64 data), if any
pub fn first_inline_image(response: &GenerateContentResponse) -> Option<(String, String)> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;
    content.parts.iter().find_map(|part| {
        part.inline_data
            .as_ref()
            .map(|inline| (inline.mime_type.clone(), inline.data.clone()))
    })
}

/// Extracts web citations from the first candidate's grounding metadata.
/// Returns an empty list when no grounding chunks are present.
pub fn grounding_sources(response: &GenerateContentResponse) -> Vec<Source> {
    let mut sources = Vec::new();
    if let Some(candidate) = response.candidates.first() {
        if let Some(metadata) = &candidate.grounding_metadata {
            for chunk in &metadata.grounding_chunks {
                if let Some(web) = &chunk.web {
                    sources.push(Source {
                        title: web.title.clone().unwrap_or_else(|| "Fonte Web".to_string()),
                        uri: web.uri.clone(),
                    });
                }
            }
        }
    }
    sources
}

/// Parses and validates a slide-deck payload
pub fn parse_presentation(raw: &str) -> TutorResult<Presentation> {
    let presentation: Presentation = serde_json::from_str(raw)?;

    if presentation.topic.trim().is_empty() {
        return Err(TutorError::InvalidData(
            "Presentation topic is empty".to_string(),
        ));
    }
    if presentation.slides.is_empty() {
        return Err(TutorError::InvalidData(
            "Presentation has no slides".to_string(),
        ));
    }
    for (index, slide) in presentation.slides.iter().enumerate() {
        if slide.title.trim().is_empty() {
            return Err(TutorError::InvalidData(format!(
                "Slide {} has an empty title",
                index
            )));
        }
        if slide.content.is_empty() {
            return Err(TutorError::InvalidData(format!(
                "Slide {} has no content",
                index
            )));
        }
        if slide.image_prompt.trim().is_empty() {
            return Err(TutorError::InvalidData(format!(
                "Slide {} has an empty image prompt",
                index
            )));
        }
    }

    Ok(presentation)
}

/// Parses and validates a quiz payload
pub fn parse_quiz(raw: &str) -> TutorResult<Quiz> {
    let quiz: Quiz = serde_json::from_str(raw)?;

    if quiz.questions.is_empty() {
        return Err(TutorError::InvalidData("Quiz has no questions".to_string()));
    }
    for (index, question) in quiz.questions.iter().enumerate() {
        if question.options.len() < 2 {
            return Err(TutorError::InvalidData(format!(
                "Question {} has fewer than two options",
                index
            )));
        }
        if question.correct_answer_index >= question.options.len() {
            return Err(TutorError::InvalidData(format!(
                "Question {} has correctAnswerIndex {} out of range for {} options",
                index,
                question.correct_answer_index,
                question.options.len()
            )));
        }
    }

    Ok(quiz)
}

/// Parses and validates a mind-map payload. Node ids must be unique across
/// the whole tree; ownership by value already guarantees the tree property.
pub fn parse_mind_map(raw: &str) -> TutorResult<MindMapNode> {
    let root: MindMapNode = serde_json::from_str(raw)?;

    let mut seen = HashSet::new();
    check_unique_ids(&root, &mut seen)?;

    Ok(root)
}

fn check_unique_ids<'a>(node: &'a MindMapNode, seen: &mut HashSet<&'a str>) -> TutorResult<()> {
    if node.id.trim().is_empty() {
        return Err(TutorError::InvalidData(
            "Mind map node has an empty id".to_string(),
        ));
    }
    if !seen.insert(node.id.as_str()) {
        return Err(TutorError::InvalidData(format!(
            "Mind map node id {:?} appears twice",
            node.id
        )));
    }
    for child in node.children.iter().flatten() {
        check_unique_ids(child, seen)?;
    }
    Ok(())
}

/// Parses and validates an essay grading payload. The total and competency
/// scores are range-checked only; their sum is not cross-checked.
pub fn parse_essay(raw: &str) -> TutorResult<EssayResult> {
    let result: EssayResult = serde_json::from_str(raw)?;

    if result.score > MAX_ESSAY_SCORE {
        return Err(TutorError::InvalidData(format!(
            "Essay score {} exceeds {}",
            result.score, MAX_ESSAY_SCORE
        )));
    }
    for competency in &result.competencies {
        if competency.score > MAX_COMPETENCY_SCORE {
            return Err(TutorError::InvalidData(format!(
                "Competency {:?} score {} exceeds {}",
                competency.name, competency.score, MAX_COMPETENCY_SCORE
            )));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, Content, GroundingChunk, GroundingMetadata, Part, WebChunk};

    fn text_response(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part::text(text.to_string())],
                    role: Some("model".to_string()),
                }),
                grounding_metadata: None,
            }],
        }
    }

    #[test]
    fn test_response_text_first_part() {
        let response = text_response("olá");
        assert_eq!(response_text(&response).as_deref(), Some("olá"));
    }

    #[test]
    fn test_response_text_empty_candidates() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(response_text(&response).is_none());
    }

    #[test]
    fn test_first_inline_image_scans_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![
                        Part::text("legenda".to_string()),
                        Part::inline_data("image/png".to_string(), "QUJD".to_string()),
                    ],
                    role: Some("model".to_string()),
                }),
                grounding_metadata: None,
            }],
        };

        let (mime, data) = first_inline_image(&response).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "QUJD");
    }

    #[test]
    fn test_grounding_sources_empty_when_absent() {
        let response = text_response("sem fontes");
        assert!(grounding_sources(&response).is_empty());
    }

    #[test]
    fn test_grounding_sources_skip_non_web_chunks() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: None,
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![
                        GroundingChunk {
                            web: Some(WebChunk {
                                title: None,
                                uri: "https://example.com".to_string(),
                            }),
                        },
                        GroundingChunk { web: None },
                    ],
                }),
            }],
        };

        let sources = grounding_sources(&response);
        assert_eq!(sources.len(), 1);
        // Missing titles fall back to the generic label
        assert_eq!(sources[0].title, "Fonte Web");
        assert_eq!(sources[0].uri, "https://example.com");
    }

    #[test]
    fn test_parse_presentation_valid() {
        let raw = r#"{
            "topic": "Fotossíntese",
            "slides": [
                {"title": "Capa", "subtitle": "Introdução", "content": ["Visão geral"], "imagePrompt": "Folha ao sol"},
                {"title": "Conclusão", "content": ["Resumo"], "imagePrompt": "Planta crescendo"}
            ]
        }"#;

        let presentation = parse_presentation(raw).unwrap();
        assert_eq!(presentation.topic, "Fotossíntese");
        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.slides[1].subtitle, None);
        assert!(presentation.slides[0].generated_image_base64.is_none());
    }

    #[test]
    fn test_parse_presentation_rejects_missing_image_prompt() {
        let raw = r#"{"topic": "X", "slides": [{"title": "A", "content": ["b"]}]}"#;
        assert!(matches!(
            parse_presentation(raw),
            Err(TutorError::SerdeError(_))
        ));
    }

    #[test]
    fn test_parse_presentation_rejects_empty_slides() {
        let raw = r#"{"topic": "X", "slides": []}"#;
        assert!(matches!(
            parse_presentation(raw),
            Err(TutorError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_quiz_valid() {
        let raw = r#"{
            "topic": "Tabela Periódica",
            "questions": [{
                "question": "Símbolo do ouro?",
                "options": ["Au", "Ag", "Fe", "Cu"],
                "correctAnswerIndex": 0,
                "explanation": "Aurum."
            }]
        }"#;

        let quiz = parse_quiz(raw).unwrap();
        assert_eq!(quiz.questions[0].correct_answer_index, 0);
    }

    #[test]
    fn test_parse_quiz_rejects_out_of_range_answer() {
        let raw = r#"{
            "topic": "X",
            "questions": [{
                "question": "Q",
                "options": ["a", "b"],
                "correctAnswerIndex": 2,
                "explanation": "e"
            }]
        }"#;
        assert!(matches!(parse_quiz(raw), Err(TutorError::InvalidData(_))));
    }

    #[test]
    fn test_parse_mind_map_valid() {
        let raw = r#"{
            "id": "1", "label": "Raiz",
            "children": [
                {"id": "1.1", "label": "A"},
                {"id": "1.2", "label": "B", "children": [{"id": "1.2.1", "label": "C"}]}
            ]
        }"#;

        let root = parse_mind_map(raw).unwrap();
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn test_parse_mind_map_rejects_duplicate_ids() {
        let raw = r#"{
            "id": "1", "label": "Raiz",
            "children": [{"id": "1", "label": "Duplicado"}]
        }"#;
        assert!(matches!(
            parse_mind_map(raw),
            Err(TutorError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_essay_valid() {
        let raw = r#"{
            "score": 920,
            "feedback": "Muito bom.",
            "competencies": [
                {"name": "Gramática", "score": 180, "comment": "Poucos desvios."},
                {"name": "Coesão", "score": 200, "comment": "Excelente."}
            ],
            "correctedVersion": "Texto corrigido."
        }"#;

        let result = parse_essay(raw).unwrap();
        assert_eq!(result.score, 920);
        assert_eq!(result.competencies.len(), 2);
    }

    #[test]
    fn test_parse_essay_rejects_score_above_limit() {
        let raw = r#"{
            "score": 1001,
            "feedback": "f",
            "competencies": [],
            "correctedVersion": "c"
        }"#;
        assert!(matches!(parse_essay(raw), Err(TutorError::InvalidData(_))));
    }

    #[test]
    fn test_parse_essay_rejects_competency_above_limit() {
        let raw = r#"{
            "score": 500,
            "feedback": "f",
            "competencies": [{"name": "Gramática", "score": 250, "comment": "c"}],
            "correctedVersion": "c"
        }"#;
        assert!(matches!(parse_essay(raw), Err(TutorError::InvalidData(_))));
    }
}
