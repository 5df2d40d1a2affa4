use colored::*;
use tutor_core::model::{EssayResult, MindMapNode, SearchResult, Slide};

/// Print a tutor reply to the terminal
pub fn print_tutor_response(response: &str) {
    println!("{}: {}", "Tutor".blue().bold(), response);
}

/// Print one slide as text: title, subtitle, bullets and image status
pub fn print_slide(slide: &Slide, index: usize, total: usize) {
    println!();
    println!(
        "{} {}",
        format!("[{}/{}]", index + 1, total).dimmed(),
        slide.title.bold()
    );
    if let Some(subtitle) = &slide.subtitle {
        println!("  {}", subtitle.italic());
    }
    for point in &slide.content {
        println!("  {} {}", "•".yellow(), point);
    }
    if slide.generated_image_base64.is_some() {
        println!("  {}", "[imagem gerada]".green());
    } else {
        println!("  {} {}", "[sem imagem]".dimmed(), slide.image_prompt.dimmed());
    }
}

/// Print a search answer followed by its sources, if any
pub fn print_search_result(result: &SearchResult) {
    println!("{}", result.text);
    if !result.sources.is_empty() {
        println!();
        println!("{}", "Fontes:".cyan().bold());
        for (index, source) in result.sources.iter().enumerate() {
            println!(
                "  {}. {} {}",
                index + 1,
                source.title.bold(),
                source.uri.underline().dimmed()
            );
        }
    }
}

/// Print a mind map as an indented tree
pub fn print_mind_map(node: &MindMapNode) {
    print_mind_map_node(node, 0);
}

fn print_mind_map_node(node: &MindMapNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if depth == 0 {
        println!("{}{}", indent, node.label.bold().cyan());
    } else {
        println!("{}{} {}", indent, "-".dimmed(), node.label);
    }
    for child in node.children.iter().flatten() {
        print_mind_map_node(child, depth + 1);
    }
}

/// Print an essay grading result: total, competency table, feedback and
/// the corrected version
pub fn print_essay_result(result: &EssayResult) {
    println!(
        "{} {}",
        "Nota final:".bold(),
        format!("{}/1000", result.score).green().bold()
    );
    println!();
    for competency in &result.competencies {
        println!(
            "  {} {} — {}",
            format!("{:>3}/200", competency.score).yellow(),
            competency.name.bold(),
            competency.comment
        );
    }
    println!();
    println!("{}", "Comentário geral:".cyan().bold());
    println!("{}", result.feedback);
    println!();
    println!("{}", "Versão corrigida:".cyan().bold());
    println!("{}", result.corrected_version);
}

/// Print the final quiz score screen
pub fn print_quiz_summary(score: u32, total: usize) {
    println!();
    println!(
        "{} {}",
        "Resultado:".bold(),
        format!("{}/{}", score, total).green().bold()
    );
}
