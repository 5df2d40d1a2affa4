//! Response schemas for structured generation.
//!
//! Each schema describes the exact JSON shape the model must return for one
//! structured kind. They are passed in the request's generation config so the
//! provider constrains its output; the normalizer can then assume required
//! fields are present while optional fields (subtitle, children) may be
//! absent.

use serde_json::{json, Value};

/// Schema for a slide deck
pub fn slide_deck_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING", "description": "O tema principal da apresentação" },
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "subtitle": { "type": "STRING" },
                        "content": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "Pontos principais do slide (bullet points)"
                        },
                        "imagePrompt": {
                            "type": "STRING",
                            "description": "Um prompt altamente detalhado, descritivo e artístico para gerar uma imagem educativa relacionada a este slide específico usando uma IA de geração de imagem. O prompt deve ser escrito em Português."
                        }
                    },
                    "required": ["title", "content", "imagePrompt"]
                }
            }
        },
        "required": ["topic", "slides"]
    })
}

/// Schema for a quiz
pub fn quiz_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "correctAnswerIndex": {
                            "type": "INTEGER",
                            "description": "Index of the correct option (0-3)"
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Why the answer is correct"
                        }
                    },
                    "required": ["question", "options", "correctAnswerIndex", "explanation"]
                }
            }
        },
        "required": ["topic", "questions"]
    })
}

/// Schema for a mind map.
///
/// The schema dialect cannot express recursion, so the nesting is written
/// out explicitly to the conventional depth of three levels below the root.
pub fn mind_map_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "label": { "type": "STRING" },
            "children": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "label": { "type": "STRING" },
                        "children": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "id": { "type": "STRING" },
                                    "label": { "type": "STRING" },
                                    "children": {
                                        "type": "ARRAY",
                                        "items": {
                                            "type": "OBJECT",
                                            "properties": {
                                                "id": { "type": "STRING" },
                                                "label": { "type": "STRING" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "required": ["id", "label"]
    })
}

/// Schema for an essay grading result
pub fn essay_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": "Total score from 0 to 1000" },
            "feedback": { "type": "STRING", "description": "General feedback" },
            "competencies": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {
                            "type": "STRING",
                            "description": "Name of competency (e.g. Gramática, Coesão)"
                        },
                        "score": {
                            "type": "INTEGER",
                            "description": "Score for this competency (0-200)"
                        },
                        "comment": { "type": "STRING" }
                    },
                    "required": ["name", "score", "comment"]
                }
            },
            "correctedVersion": {
                "type": "STRING",
                "description": "Rewritten version of the essay with improvements"
            }
        },
        "required": ["score", "feedback", "competencies", "correctedVersion"]
    })
}
