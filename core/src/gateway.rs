//! Capability layer over the generative backend.
//!
//! One method per capability: conversation, image analysis, structured
//! generation (slides, quiz, mind map, essay grade), image synthesis and
//! grounded search. The backend is a trait so tests can substitute a
//! deterministic fake for the remote provider. All calls are plain
//! request/response; abandoning a returned future drops the underlying
//! HTTP request.

use async_trait::async_trait;
use tracing::debug;

use crate::config::TutorConfig;
use crate::data_uri;
use crate::errors::{TutorError, TutorResult};
use crate::model::{
    ChatMessage, EssayResult, MindMapNode, Presentation, Quiz, SearchResult,
};
use crate::normalize;
use crate::schema;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, Part,
    Tool,
};

/// System instruction shared by the conversational capabilities
pub const SYSTEM_INSTRUCTION: &str = "\
Você é o \"Tutor Escolar\", um assistente educacional inteligente, amigável, paciente e didático.
Seu objetivo é ensinar, explicar, resolver exercícios e criar materiais educativos para estudantes de todos os níveis.

DIRETRIZES DE COMPORTAMENTO:
1.  **Personalidade:** Seja encorajador, use emojis ocasionalmente, e adapte a linguagem à complexidade da pergunta.
2.  **Precisão:** Nunca invente dados. Se não souber, admita. Sempre verifique cálculos matemáticos.
3.  **Explicação:** Para perguntas de exatas (Matemática, Física, Química), explique o raciocínio passo a passo. Não dê apenas a resposta final.
4.  **Imagens:** Se o usuário enviar uma imagem de um exercício, descreva o que vê, transcreva o problema e depois resolva.
5.  **Matérias:** Você domina Matemática, Português, História, Geografia, Ciências, Química, Física, Biologia, Inglês e Redação.

Se o usuário pedir algo fora do contexto educacional, gentilmente traga-o de volta aos estudos.";

/// Default task prompt for one-shot image analysis
pub const DEFAULT_ANALYZE_PROMPT: &str = "Analise esta imagem educacional. Se for um texto, resuma. Se for um exercício, resolva passo a passo.";

/// Fallback chat reply when the model returns no usable text
const CHAT_FALLBACK: &str = "Desculpe, não consegui processar sua solicitação.";

/// Fallback search body when the model returns no usable text
const SEARCH_FALLBACK: &str = "Sem resultados.";

/// Style suffix appended to every image synthesis prompt
const IMAGE_STYLE_SUFFIX: &str = ", estilo educacional, alta qualidade, 4k, realista";

/// Abstraction over the remote generative provider
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> TutorResult<GenerateContentResponse>;
}

/// Capability gateway bound to a backend and a configuration
pub struct Gateway<B: GenerativeBackend> {
    backend: B,
    text_model: String,
    image_model: String,
    system_prompt: String,
}

impl<B: GenerativeBackend> Gateway<B> {
    pub fn new(backend: B, config: &TutorConfig) -> Self {
        Self {
            backend,
            text_model: config.text_model().to_string(),
            image_model: config.image_model().to_string(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| SYSTEM_INSTRUCTION.to_string()),
        }
    }

    fn system_content(&self) -> Content {
        Content {
            parts: vec![Part::text(self.system_prompt.clone())],
            role: Some("system".to_string()),
        }
    }

    /// Multi-turn conversation. The new message may carry an image as a
    /// data URI; its prefix is stripped before transmission and the binary
    /// part is placed ahead of the text in the same turn.
    pub async fn converse(
        &self,
        history: &[ChatMessage],
        message: &str,
        image: Option<&str>,
    ) -> TutorResult<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                parts: vec![Part::text(turn.text.clone())],
                role: Some(turn.role.as_str().to_string()),
            })
            .collect();

        let mut parts = vec![Part::text(message.to_string())];
        if let Some(image) = image {
            let mime = data_uri::mime_type(image).unwrap_or("image/jpeg");
            parts.insert(
                0,
                Part::inline_data(mime.to_string(), data_uri::strip_prefix(image).to_string()),
            );
        }
        contents.push(Content {
            parts,
            role: Some("user".to_string()),
        });

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(self.system_content()),
            tools: None,
            generation_config: None,
        };

        let response = self.backend.generate(&self.text_model, request).await?;
        Ok(normalize::response_text(&response).unwrap_or_else(|| CHAT_FALLBACK.to_string()))
    }

    /// One-shot multimodal analysis of a single image, no history
    pub async fn analyze_image(&self, image: &str, prompt: Option<&str>) -> TutorResult<String> {
        let task = prompt.unwrap_or(DEFAULT_ANALYZE_PROMPT);
        let mime = data_uri::mime_type(image).unwrap_or("image/jpeg");

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_data(mime.to_string(), data_uri::strip_prefix(image).to_string()),
                    Part::text(format!("{}\n\nTarefa: {}", self.system_prompt, task)),
                ],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            tools: None,
            generation_config: None,
        };

        let response = self.backend.generate(&self.text_model, request).await?;
        normalize::response_text(&response).ok_or(TutorError::EmptyResponse)
    }

    /// Generates a complete slide deck for a topic
    pub async fn generate_slide_content(&self, topic: &str) -> TutorResult<Presentation> {
        let prompt = format!(
            "Crie uma apresentação educacional completa sobre: \"{}\".\n\
             Estrutura:\n\
             1. Capa (Título, Subtítulo, Prompt de imagem introdutória).\n\
             2. 3 a 5 Slides de conteúdo (Título, Tópicos explicativos, Prompt de imagem específico).\n\
             3. Conclusão (Resumo, Prompt de imagem final).\n\n\
             Certifique-se de que os prompts de imagem sejam visuais, descritivos e adequados para um ambiente escolar.",
            topic
        );

        let raw = self
            .generate_structured(&prompt, schema::slide_deck_schema())
            .await?;
        normalize::parse_presentation(&raw)
    }

    /// Generates a five-question multiple-choice quiz for a topic
    pub async fn generate_quiz(&self, topic: &str) -> TutorResult<Quiz> {
        let prompt = format!(
            "Crie um quiz educativo com 5 perguntas de múltipla escolha sobre: \"{}\".\n\
             As perguntas devem ser desafiadoras mas adequadas para estudantes.",
            topic
        );

        let raw = self.generate_structured(&prompt, schema::quiz_schema()).await?;
        normalize::parse_quiz(&raw)
    }

    /// Generates a hierarchical mind map for a topic
    pub async fn generate_mind_map(&self, topic: &str) -> TutorResult<MindMapNode> {
        let prompt = format!(
            "Gere uma estrutura de mapa mental hierárquico sobre: \"{}\".\n\
             O nó raiz deve ser o tema. Crie sub-tópicos relevantes e seus detalhes.\n\
             Use IDs únicos (1, 1.1, 1.2, etc). Limite a 3 níveis de profundidade.",
            topic
        );

        let raw = self
            .generate_structured(&prompt, schema::mind_map_schema())
            .await?;
        normalize::parse_mind_map(&raw)
    }

    /// Grades an essay against a topic on the 0-1000 scale
    pub async fn grade_essay(&self, topic: &str, essay: &str) -> TutorResult<EssayResult> {
        let prompt = format!(
            "Corrija esta redação com base no tema: \"{}\".\n\
             Use critérios similares ao ENEM (Brasil). Dê nota de 0 a 1000.\n\n\
             Redação:\n{}",
            topic, essay
        );

        let raw = self.generate_structured(&prompt, schema::essay_schema()).await?;
        normalize::parse_essay(&raw)
    }

    /// Requests image synthesis. A clean empty result is `Ok(None)`;
    /// transport failures propagate as errors.
    pub async fn generate_image(&self, prompt: &str) -> TutorResult<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(format!("{}{}", prompt, IMAGE_STYLE_SUFFIX))],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: "16:9".to_string(),
                }),
                ..Default::default()
            }),
        };

        let response = self.backend.generate(&self.image_model, request).await?;
        Ok(normalize::first_inline_image(&response)
            .map(|(mime, data)| data_uri::build(&mime, &data)))
    }

    /// Search-grounded generation. Returns the answer text plus extracted
    /// web citations; the source list is empty when the provider attached
    /// no grounding chunks.
    pub async fn search_library(&self, query: &str) -> TutorResult<SearchResult> {
        let prompt = format!(
            "Pesquise e explique detalhadamente sobre: \"{}\". Forneça dados atualizados e fontes.",
            query
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            tools: Some(vec![Tool::google_search()]),
            generation_config: None,
        };

        let response = self.backend.generate(&self.text_model, request).await?;
        let text =
            normalize::response_text(&response).unwrap_or_else(|| SEARCH_FALLBACK.to_string());
        let sources = normalize::grounding_sources(&response);

        Ok(SearchResult { text, sources })
    }

    /// Shared path for the schema-constrained kinds: send the prompt with
    /// the schema attached and return the raw JSON text, failing on an
    /// empty response.
    async fn generate_structured(
        &self,
        prompt: &str,
        response_schema: serde_json::Value,
    ) -> TutorResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt.to_string())],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(response_schema),
                ..Default::default()
            }),
        };

        let response = self.backend.generate(&self.text_model, request).await?;
        debug!(candidates = response.candidates.len(), "Structured response received");
        normalize::response_text(&response).ok_or(TutorError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;
    use std::sync::Mutex;

    /// Deterministic stand-in for the remote provider. Returns the canned
    /// response and records the last request for inspection.
    struct FakeBackend {
        canned: Box<dyn Fn() -> TutorResult<GenerateContentResponse> + Send + Sync>,
        last: Mutex<Option<(String, GenerateContentRequest)>>,
    }

    impl FakeBackend {
        fn text(text: &str) -> Self {
            let text = text.to_string();
            Self {
                canned: Box::new(move || {
                    Ok(GenerateContentResponse {
                        candidates: vec![Candidate {
                            content: Some(Content {
                                parts: vec![Part::text(text.clone())],
                                role: Some("model".to_string()),
                            }),
                            grounding_metadata: None,
                        }],
                    })
                }),
                last: Mutex::new(None),
            }
        }

        fn empty() -> Self {
            Self {
                canned: Box::new(|| Ok(GenerateContentResponse { candidates: vec![] })),
                last: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                canned: Box::new(|| {
                    Err(TutorError::HttpError {
                        status_code: 500,
                        message: "boom".to_string(),
                    })
                }),
                last: Mutex::new(None),
            }
        }

        fn inline_image(mime: &str, data: &str) -> Self {
            let mime = mime.to_string();
            let data = data.to_string();
            Self {
                canned: Box::new(move || {
                    Ok(GenerateContentResponse {
                        candidates: vec![Candidate {
                            content: Some(Content {
                                parts: vec![Part::inline_data(mime.clone(), data.clone())],
                                role: Some("model".to_string()),
                            }),
                            grounding_metadata: None,
                        }],
                    })
                }),
                last: Mutex::new(None),
            }
        }

        fn last_request(&self) -> (String, GenerateContentRequest) {
            self.last.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl GenerativeBackend for FakeBackend {
        async fn generate(
            &self,
            model: &str,
            request: GenerateContentRequest,
        ) -> TutorResult<GenerateContentResponse> {
            *self.last.lock().unwrap() = Some((model.to_string(), request));
            (self.canned)()
        }
    }

    fn gateway(backend: FakeBackend) -> Gateway<FakeBackend> {
        Gateway::new(backend, &TutorConfig::default())
    }

    #[tokio::test]
    async fn test_converse_builds_history_and_strips_image_prefix() {
        let gateway = gateway(FakeBackend::text("resposta do tutor"));
        let history = vec![
            ChatMessage::user("Oi".to_string()),
            ChatMessage::model("Olá! Como posso ajudar?".to_string()),
        ];

        let reply = gateway
            .converse(
                &history,
                "Resolva este exercício",
                Some("data:image/png;base64,QUJD"),
            )
            .await
            .unwrap();
        assert_eq!(reply, "resposta do tutor");

        let (model, request) = gateway.backend.last_request();
        assert_eq!(model, "gemini-2.5-flash");
        assert!(request.system_instruction.is_some());

        // Two history turns plus the new user turn
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));

        // The image part comes first and carries the bare payload
        let new_turn = &request.contents[2];
        let inline = new_turn.parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "QUJD");
        assert_eq!(new_turn.parts[1].text.as_deref(), Some("Resolva este exercício"));
    }

    #[tokio::test]
    async fn test_converse_falls_back_on_empty_response() {
        let gateway = gateway(FakeBackend::empty());
        let reply = gateway.converse(&[], "oi", None).await.unwrap();
        assert_eq!(reply, CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn test_analyze_image_is_single_turn() {
        let gateway = gateway(FakeBackend::text("análise"));
        let reply = gateway
            .analyze_image("data:image/jpeg;base64,AA==", None)
            .await
            .unwrap();
        assert_eq!(reply, "análise");

        let (_, request) = gateway.backend.last_request();
        assert_eq!(request.contents.len(), 1);
        assert!(request.system_instruction.is_none());
        let text = request.contents[0].parts[1].text.as_ref().unwrap();
        assert!(text.contains(DEFAULT_ANALYZE_PROMPT));
    }

    #[tokio::test]
    async fn test_generate_slide_content_end_to_end() {
        // Cover + four body slides + conclusion, per the prompt contract
        let deck = serde_json::json!({
            "topic": "Fotossíntese",
            "slides": [
                {"title": "Fotossíntese", "subtitle": "Como as plantas produzem energia", "content": ["Visão geral"], "imagePrompt": "Folha verde iluminada pelo sol"},
                {"title": "Luz e Clorofila", "content": ["Captura de luz", "Pigmentos"], "imagePrompt": "Cloroplastos em detalhe"},
                {"title": "Fase Clara", "content": ["Fotólise da água", "Produção de ATP"], "imagePrompt": "Reações na membrana do tilacoide"},
                {"title": "Fase Escura", "content": ["Ciclo de Calvin"], "imagePrompt": "Diagrama do ciclo de Calvin"},
                {"title": "Importância", "content": ["Oxigênio", "Base das cadeias alimentares"], "imagePrompt": "Floresta vista de cima"},
                {"title": "Conclusão", "content": ["Resumo dos conceitos"], "imagePrompt": "Planta saudável em vaso"}
            ]
        });
        let gateway = gateway(FakeBackend::text(&deck.to_string()));

        let presentation = gateway.generate_slide_content("Fotossíntese").await.unwrap();
        assert_eq!(presentation.topic, "Fotossíntese");
        assert!((5..=7).contains(&presentation.slides.len()));
        for slide in &presentation.slides {
            assert!(!slide.title.is_empty());
            assert!(!slide.content.is_empty());
            assert!(!slide.image_prompt.is_empty());
            assert!(slide.generated_image_base64.is_none());
        }

        // The schema constraint was attached
        let (_, request) = gateway.backend.last_request();
        let config = request.generation_config.unwrap();
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(config.response_schema.is_some());
    }

    #[tokio::test]
    async fn test_generate_structured_empty_response_fails() {
        let gateway = gateway(FakeBackend::empty());
        assert!(matches!(
            gateway.generate_quiz("Frações").await,
            Err(TutorError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_generate_quiz_rejects_invalid_payload() {
        let quiz = serde_json::json!({
            "topic": "X",
            "questions": [{
                "question": "Q",
                "options": ["a", "b", "c", "d"],
                "correctAnswerIndex": 4,
                "explanation": "e"
            }]
        });
        let gateway = gateway(FakeBackend::text(&quiz.to_string()));
        assert!(matches!(
            gateway.generate_quiz("X").await,
            Err(TutorError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_grade_essay_ranges() {
        let graded = serde_json::json!({
            "score": 840,
            "feedback": "Bom domínio da norma culta.",
            "competencies": [
                {"name": "Gramática", "score": 160, "comment": "Alguns desvios."},
                {"name": "Coesão", "score": 180, "comment": "Bem articulado."}
            ],
            "correctedVersion": "Versão corrigida da redação."
        });
        let gateway = gateway(FakeBackend::text(&graded.to_string()));

        let result = gateway.grade_essay("Educação digital", "texto").await.unwrap();
        assert!(result.score <= 1000);
        assert!(result.competencies.iter().all(|c| c.score <= 200));
    }

    #[tokio::test]
    async fn test_generate_image_returns_data_uri() {
        let gateway = gateway(FakeBackend::inline_image("image/png", "QUJD"));
        let image = gateway.generate_image("uma célula vegetal").await.unwrap();
        assert_eq!(image.as_deref(), Some("data:image/png;base64,QUJD"));

        let (model, request) = gateway.backend.last_request();
        assert_eq!(model, "gemini-2.5-flash-image");
        let text = request.contents[0].parts[0].text.as_ref().unwrap();
        assert!(text.ends_with(IMAGE_STYLE_SUFFIX));
        let config = request.generation_config.unwrap();
        assert_eq!(config.image_config.unwrap().aspect_ratio, "16:9");
    }

    #[tokio::test]
    async fn test_generate_image_clean_empty_is_none() {
        let gateway = gateway(FakeBackend::text("sem imagem desta vez"));
        assert_eq!(gateway.generate_image("algo").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_generate_image_transport_failure_propagates() {
        let gateway = gateway(FakeBackend::failing());
        assert!(matches!(
            gateway.generate_image("algo").await,
            Err(TutorError::HttpError { status_code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_search_library_without_grounding() {
        let gateway = gateway(FakeBackend::text("A fotossíntese é..."));
        let result = gateway.search_library("fotossíntese").await.unwrap();
        assert_eq!(result.text, "A fotossíntese é...");
        assert!(result.sources.is_empty());

        let (_, request) = gateway.backend.last_request();
        assert!(request.tools.unwrap()[0].google_search.is_some());
    }

    #[tokio::test]
    async fn test_search_library_empty_text_falls_back() {
        let gateway = gateway(FakeBackend::empty());
        let result = gateway.search_library("qualquer coisa").await.unwrap();
        assert_eq!(result.text, SEARCH_FALLBACK);
        assert!(result.sources.is_empty());
    }
}
