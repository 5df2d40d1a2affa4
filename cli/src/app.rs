use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tutor_core::client::GeminiClient;
use tutor_core::data_uri;
use tutor_core::gateway::Gateway;
use tutor_core::model::ChatMessage;
use tutor_deck::export::{write_presentation_data, write_presentation_pdf};

use crate::output::{
    print_essay_result, print_mind_map, print_quiz_summary, print_search_result, print_slide,
    print_tutor_response,
};
use crate::session::{QuizSession, SlideViewer};

/// Display a spinner while waiting for a generation call
fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Reads an image file and encodes it as a data URI for transport
fn load_image_data_uri(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;

    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        // Canvas and camera inputs are JPEG in practice
        _ => "image/jpeg",
    };

    Ok(data_uri::build(mime, &STANDARD.encode(bytes)))
}

/// Runs a single tutor query or an interactive chat session
pub async fn run_tutor(
    gateway: &Gateway<GeminiClient>,
    prompt: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    match prompt {
        Some(prompt) => {
            let image_uri = image.as_deref().map(load_image_data_uri).transpose()?;
            let progress = spinner("Processando pergunta...");
            let result = gateway.converse(&[], &prompt, image_uri.as_deref()).await;
            progress.finish_and_clear();

            let reply = result.context("Failed to reach the tutor")?;
            print_tutor_response(&reply);
            Ok(())
        }
        None => run_interactive_chat(gateway, image).await,
    }
}

/// Runs an interactive chat session with the tutor
async fn run_interactive_chat(
    gateway: &Gateway<GeminiClient>,
    first_image: Option<PathBuf>,
) -> Result<()> {
    println!("Sessão de chat com o Tutor Escolar.");
    println!("Digite 'sair' para encerrar.");
    println!();

    let mut history: Vec<ChatMessage> = Vec::new();
    let mut pending_image = first_image.as_deref().map(load_image_data_uri).transpose()?;

    loop {
        // Prompt for user input
        print!("{}: ", "Você".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("sair") || input.eq_ignore_ascii_case("exit") {
            println!("Até a próxima!");
            break;
        }

        let progress = spinner("Processando pergunta...");
        debug!("Sending chat turn, history length {}", history.len());
        let result = gateway
            .converse(&history, input, pending_image.as_deref())
            .await;
        progress.finish_and_clear();

        match result {
            Ok(reply) => {
                print_tutor_response(&reply);
                // Record both turns only after a successful exchange
                match pending_image.take() {
                    Some(image) => {
                        history.push(ChatMessage::user_with_image(input.to_string(), image))
                    }
                    None => history.push(ChatMessage::user(input.to_string())),
                }
                history.push(ChatMessage::model(reply));
            }
            Err(e) => {
                error!("Chat turn failed: {}", e);
                eprintln!("{}", format!("Erro: {}", e).red());
            }
        }

        println!(); // Add spacing between interactions
    }

    Ok(())
}

/// Analyzes a single image file
pub async fn run_analyze(
    gateway: &Gateway<GeminiClient>,
    image: PathBuf,
    prompt: Option<String>,
) -> Result<()> {
    let image_uri = load_image_data_uri(&image)?;

    let progress = spinner("Analisando imagem...");
    let result = gateway.analyze_image(&image_uri, prompt.as_deref()).await;
    progress.finish_and_clear();

    let analysis = result.context("Image analysis failed")?;
    print_tutor_response(&analysis);
    Ok(())
}

/// Generates a slide deck, optionally back-fills images, and exports it
pub async fn run_slides(
    gateway: &Gateway<GeminiClient>,
    topic: String,
    images: bool,
    out_dir: PathBuf,
    interactive: bool,
) -> Result<()> {
    let progress = spinner("Gerando apresentação...");
    let result = gateway.generate_slide_content(&topic).await;
    progress.finish_and_clear();

    let presentation = result.context("Slide generation failed")?;
    let mut viewer = SlideViewer::new(presentation);
    println!(
        "{} {} slides sobre \"{}\"",
        "Gerado:".green().bold(),
        viewer.len(),
        viewer.presentation().topic
    );

    if images {
        generate_all_images(gateway, &mut viewer).await;
    }

    if interactive {
        if !browse_deck(gateway, &mut viewer).await? {
            return Ok(());
        }
    } else {
        let total = viewer.len();
        for (index, slide) in viewer.presentation().slides.iter().enumerate() {
            print_slide(slide, index, total);
        }
    }

    let pdf_path = write_presentation_pdf(viewer.presentation(), &out_dir)
        .context("Failed to write PDF export")?;
    let data_path = write_presentation_data(viewer.presentation(), &out_dir)
        .context("Failed to write data export")?;
    println!();
    println!("{} {}", "PDF:".cyan().bold(), pdf_path.display());
    println!("{} {}", "Dados:".cyan().bold(), data_path.display());
    Ok(())
}

/// Back-fills an illustration for every slide that lacks one
async fn generate_all_images(gateway: &Gateway<GeminiClient>, viewer: &mut SlideViewer) {
    for index in 0..viewer.len() {
        if !viewer.begin_image_generation(index) {
            continue;
        }
        let prompt = viewer.presentation().slides[index].image_prompt.clone();

        let progress = spinner(&format!("Gerando imagem do slide {}...", index + 1));
        let result = gateway.generate_image(&prompt).await;
        progress.finish_and_clear();

        match result {
            Ok(Some(image)) => viewer.finish_image_generation(index, Some(image)),
            Ok(None) => {
                viewer.finish_image_generation(index, None);
                println!(
                    "{}",
                    format!("Slide {}: nenhuma imagem produzida.", index + 1).yellow()
                );
            }
            Err(e) => {
                viewer.finish_image_generation(index, None);
                error!("Image generation for slide {} failed: {}", index + 1, e);
                eprintln!("{}", format!("Erro ao gerar imagem: {}", e).red());
            }
        }
    }
}

/// Interactive deck browser. Returns whether the deck should be exported.
async fn browse_deck(gateway: &Gateway<GeminiClient>, viewer: &mut SlideViewer) -> Result<bool> {
    println!();
    println!("Comandos: n (próximo), p (anterior), j N (ir para), i (gerar imagem), e (exportar), q (sair)");

    loop {
        print_slide(viewer.current(), viewer.index(), viewer.len());

        print!("{} ", ">".bold());
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        let input = input.trim();

        match input {
            "n" => viewer.next(),
            "p" => viewer.prev(),
            "i" => {
                let index = viewer.index();
                if viewer.begin_image_generation(index) {
                    let prompt = viewer.current().image_prompt.clone();
                    let progress = spinner("Gerando imagem...");
                    let result = gateway.generate_image(&prompt).await;
                    progress.finish_and_clear();

                    match result {
                        Ok(image) => {
                            if image.is_none() {
                                println!(
                                    "{}",
                                    "Não foi possível gerar a imagem no momento. Tente novamente."
                                        .yellow()
                                );
                            }
                            viewer.finish_image_generation(index, image);
                        }
                        Err(e) => {
                            viewer.finish_image_generation(index, None);
                            eprintln!("{}", format!("Erro ao gerar imagem: {}", e).red());
                        }
                    }
                } else if viewer.image_pending(index) {
                    println!("{}", "Geração de imagem já em andamento para este slide.".dimmed());
                } else {
                    println!("{}", "Este slide já tem imagem.".dimmed());
                }
            }
            "e" => return Ok(true),
            "q" => return Ok(false),
            _ => {
                if let Some(rest) = input.strip_prefix("j ") {
                    match rest.trim().parse::<usize>() {
                        Ok(n) if n >= 1 => viewer.jump(n - 1),
                        _ => println!("{}", "Número de slide inválido.".dimmed()),
                    }
                } else if !input.is_empty() {
                    println!("{}", "Comando desconhecido.".dimmed());
                }
            }
        }
    }
}

/// Generates a quiz and plays it through
pub async fn run_quiz(gateway: &Gateway<GeminiClient>, topic: String) -> Result<()> {
    let progress = spinner("Gerando desafios...");
    let result = gateway.generate_quiz(&topic).await;
    progress.finish_and_clear();

    let quiz = result.context("Quiz generation failed")?;
    println!("{} {}", "Quiz:".bold(), quiz.topic.cyan().bold());

    let mut session = QuizSession::new(quiz);
    while let Some(question) = session.current_question().cloned() {
        println!();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "({}/{}) {}",
                session.current_index() + 1,
                session.total(),
                question.question
            ))
            .items(&question.options)
            .default(0)
            .interact()
            .context("Failed to read answer")?;

        if let Some(correct) = session.answer(selection) {
            if correct {
                println!("{}", "Correto!".green().bold());
            } else {
                println!(
                    "{} A resposta certa era: {}",
                    "Incorreto.".red().bold(),
                    question.options[question.correct_answer_index].bold()
                );
            }
            println!("{}", question.explanation.dimmed());
        }
        session.advance();
    }

    print_quiz_summary(session.score(), session.total());
    Ok(())
}

/// Generates and prints a mind map
pub async fn run_mind_map(gateway: &Gateway<GeminiClient>, topic: String) -> Result<()> {
    let progress = spinner("Montando mapa mental...");
    let result = gateway.generate_mind_map(&topic).await;
    progress.finish_and_clear();

    let root = result.context("Mind map generation failed")?;
    println!();
    print_mind_map(&root);
    Ok(())
}

/// Grades an essay file against a topic
pub async fn run_essay(
    gateway: &Gateway<GeminiClient>,
    topic: String,
    essay_file: PathBuf,
) -> Result<()> {
    let essay = std::fs::read_to_string(&essay_file)
        .with_context(|| format!("Failed to read essay file {}", essay_file.display()))?;

    let progress = spinner("Corrigindo redação...");
    let result = gateway.grade_essay(&topic, &essay).await;
    progress.finish_and_clear();

    let graded = result.context("Essay grading failed")?;
    print_essay_result(&graded);
    Ok(())
}

/// Runs a grounded search query
pub async fn run_library(gateway: &Gateway<GeminiClient>, query: String) -> Result<()> {
    let progress = spinner("Pesquisando...");
    let result = gateway.search_library(&query).await;
    progress.finish_and_clear();

    let search = result.context("Search failed")?;
    print_search_result(&search);
    Ok(())
}
