use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name used in provider request contents
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A single chat turn. The sequence is append-only within a session and is
/// not persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// User-attached image as a data URI, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: String) -> Self {
        Self {
            role: Role::User,
            text,
            image: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user_with_image(text: String, image: String) -> Self {
        Self {
            role: Role::User,
            text,
            image: Some(image),
            timestamp: Utc::now(),
        }
    }

    pub fn model(text: String) -> Self {
        Self {
            role: Role::Model,
            text,
            image: None,
            timestamp: Utc::now(),
        }
    }
}

/// One slide of a generated presentation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Bullet points
    pub content: Vec<String>,
    /// Detailed prompt for generating this slide's illustration
    pub image_prompt: String,
    /// Generated image as a data URI, back-filled after an on-demand
    /// image-generation call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_base64: Option<String>,
}

/// A generated slide deck
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Presentation {
    pub topic: String,
    pub slides: Vec<Slide>,
}

/// A multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`
    pub correct_answer_index: usize,
    pub explanation: String,
}

/// A generated quiz
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub topic: String,
    pub questions: Vec<QuizQuestion>,
}

/// Node of a mind-map tree. Parent owns children; the whole tree is
/// created and destroyed as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MindMapNode>>,
}

impl MindMapNode {
    /// Number of nodes in the subtree rooted at this node
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(MindMapNode::node_count)
            .sum::<usize>()
    }
}

/// Per-competency essay evaluation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Competency {
    pub name: String,
    /// 0 to 200
    pub score: u32,
    pub comment: String,
}

/// Essay grading result. The total score and the competency scores are
/// independently supplied by the model; no cross-check is applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EssayResult {
    /// 0 to 1000
    pub score: u32,
    pub feedback: String,
    pub competencies: Vec<Competency>,
    pub corrected_version: String,
}

/// A grounding citation extracted from the provider response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Result of a grounded search query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub sources: Vec<Source>,
}
