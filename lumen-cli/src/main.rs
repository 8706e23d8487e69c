//! Lumen CLI
//!
//! Parses an XHTML document, lays it out and prints what came out.
//!
//! - `lumen page.html`            # Layout primitives as text
//! - `lumen --json page.html`     # Layout primitives as JSON
//! - `lumen --tree -d page.html`  # Element tree and parser diagnostics

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use lumen_browser::{LoadedDocument, fonts_or_approximate, load_document, parse_document};
use lumen_css::{Document, FontCollection, FormattedElement, LayoutConfig, ScrollView};
use lumen_dom::Color;
use lumen_html::{Diagnostic, Severity, dump_tree};
use owo_colors::OwoColorize;

/// Lumen - XHTML parser and single-pass layout engine
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print layout primitives
    lumen ./index.html

    # Narrow viewport, larger text
    lumen --width 320 --text-size 20 ./index.html

    # JSON output with a custom layout configuration
    lumen --json --config layout.json ./index.html

    # Element tree and parser diagnostics
    lumen --tree --diagnostics ./index.html

    # Which link is at a point
    lumen --hit 40 12 ./index.html

    # Parse inline markup
    lumen --html '<p>Hello <b>World</b></p>'
"#)]
struct Cli {
    /// Path to an XHTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse markup directly instead of a file
    #[arg(long, value_name = "XHTML")]
    html: Option<String>,

    /// Print the element tree
    #[arg(short = 't', long)]
    tree: bool,

    /// Print parser diagnostics
    #[arg(short = 'd', long)]
    diagnostics: bool,

    /// Print layout output as JSON
    #[arg(short = 'j', long)]
    json: bool,

    /// Skip layout
    #[arg(long)]
    no_layout: bool,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: f32,

    /// Base text size in pixels
    #[arg(long, default_value = "16")]
    text_size: f32,

    /// Layout configuration as a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use fixed-ratio metrics instead of installed fonts
    #[arg(long)]
    approximate_fonts: bool,

    /// Report the link under a viewport point
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    hit: Option<Vec<f32>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut loaded = load_doc(&cli)?;

    if let Some(ref path) = cli.config {
        *loaded.document.config_mut() = read_config(path)?;
    }

    if cli.tree {
        println!("{}", "=== Element Tree ===".bold());
        let tree = loaded.document.tree();
        print!("{}", dump_tree(tree, tree.root()));
        println!();
    }

    if cli.diagnostics {
        print_diagnostics(&loaded.diagnostics);
    }

    if cli.no_layout {
        return Ok(());
    }

    let fonts = if cli.approximate_fonts {
        FontCollection::approximate()
    } else {
        let (fonts, error) = fonts_or_approximate();
        if let Some(e) = error {
            eprintln!("{}", format!("[Lumen Fonts] {e}; using approximate metrics").yellow());
        }
        fonts
    };

    let document = &mut loaded.document;
    document.layout(
        (cli.width, cli.height),
        cli.text_size,
        Color::BLACK,
        1.0,
        &fonts,
        false,
    )?;

    if cli.json {
        println!("{}", layout_json(document)?);
    } else {
        print_layout(document);
    }

    if let Some(point) = cli.hit.as_deref() {
        let &[x, y] = point else {
            bail!("--hit takes exactly two values");
        };
        let mut view = ScrollView::new(cli.width, cli.height);
        view.update(document);
        match view.hit_test(document.content(), x, y) {
            Some(href) => println!("link at ({x}, {y}): {href}"),
            None => println!("no link at ({x}, {y})"),
        }
    }

    Ok(())
}

/// Load document from CLI arguments
fn load_doc(cli: &Cli) -> Result<LoadedDocument> {
    if let Some(ref markup) = cli.html {
        Ok(parse_document(markup))
    } else if let Some(ref path) = cli.path {
        load_document(path).with_context(|| format!("could not load {}", path.display()))
    } else {
        bail!("a file path or --html is required")
    }
}

fn read_config(path: &Path) -> Result<LayoutConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    println!("{}", "=== Diagnostics ===".bold());
    if diagnostics.is_empty() {
        println!("  none");
    }
    for diagnostic in diagnostics {
        let line = format!("  {diagnostic}");
        match diagnostic.severity {
            Severity::Error => println!("{}", line.red()),
            Severity::Warning => println!("{}", line.yellow()),
        }
    }
    println!();
}

fn layout_json(document: &Document) -> Result<String> {
    let (width, height) = document.occupied_layout_size();
    let value = serde_json::json!({
        "title": document.title(),
        "viewport": document.viewport(),
        "occupied": { "width": width, "height": height },
        "content": document.content(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn print_layout(document: &Document) {
    let (vw, vh) = document.viewport();
    let (w, h) = document.occupied_layout_size();
    println!(
        "{}",
        format!("=== Layout (viewport: {vw}x{vh}, occupied: {w:.1}x{h:.1}) ===").bold()
    );
    if let Some(title) = document.title() {
        println!("title: {title}");
    }
    for element in document.content() {
        println!("{}", describe(element));
    }
}

fn hex(color: Color) -> String {
    if color.a == 255 {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
    }
}

/// One line per primitive.
fn describe(element: &FormattedElement) -> String {
    let r = element.rect();
    let geometry = format!(
        "[{:7.1} {:7.1} {:6.1}x{:<6.1}]",
        r.left,
        r.top,
        r.width(),
        r.height()
    );
    match element {
        FormattedElement::TextSection(text) => {
            let mut flags = String::new();
            if text.underline {
                flags.push_str(" underline");
            }
            if text.strikethrough {
                flags.push_str(" strike");
            }
            if let Some(back) = text.back_color {
                flags.push_str(&format!(" on {}", hex(back)));
            }
            format!(
                "text  {geometry} {} {}px {}{flags} {:?}",
                text.font,
                text.font_size,
                hex(text.color),
                text.text
            )
        }
        FormattedElement::Image(image) => {
            let (pw, ph) = image.physical_size;
            let state = if image.image.is_some() {
                format!("{pw}x{ph}")
            } else {
                "placeholder".to_string()
            };
            format!("image {geometry} {state}")
        }
        FormattedElement::Rectangle(rect) => {
            let mut parts = Vec::new();
            if let Some(back) = rect.back_color {
                parts.push(format!("fill {}", hex(back)));
            }
            if rect.border_width.horizontal() + rect.border_width.vertical() > 0.0 {
                parts.push(format!("border {}", hex(rect.border_color)));
            }
            if let Some(ref href) = rect.link {
                parts.push(format!("link {href}"));
            }
            format!("rect  {geometry} {}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laid_out(markup: &str) -> Document {
        let mut doc = parse_document(markup).document;
        doc.layout_default((300.0, 200.0), &FontCollection::approximate())
            .unwrap();
        doc
    }

    #[test]
    fn cli_arguments_parse() {
        let cli = Cli::try_parse_from([
            "lumen", "--json", "--width", "320", "--hit", "4", "5", "page.html",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.width, 320.0);
        assert_eq!(cli.hit, Some(vec![4.0, 5.0]));
        assert_eq!(cli.path, Some(PathBuf::from("page.html")));
    }

    #[test]
    fn describes_each_primitive_kind() {
        let doc = laid_out(
            "<div style=\"background-color: #ff0000\"><a href=\"x.html\">go</a>\
             <img src=\"missing.png\" width=\"8\" height=\"8\"/></div>",
        );
        let lines: Vec<String> = doc.content().iter().map(describe).collect();
        assert!(lines[0].starts_with("rect "));
        assert!(lines[0].contains("fill #ff0000"));
        assert!(lines.iter().any(|l| l.contains("\"go\"") && l.contains("underline")));
        assert!(lines.iter().any(|l| l.contains("link x.html")));
        assert!(lines.iter().any(|l| l.starts_with("image") && l.ends_with("placeholder")));
    }

    #[test]
    fn json_output_has_content() {
        let doc = laid_out("<html><head><title>T</title></head><body><p>a</p></body></html>");
        let json: serde_json::Value = serde_json::from_str(&layout_json(&doc).unwrap()).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["content"][0]["text"], "a");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex(Color::rgb(255, 0, 16)), "#ff0010");
        assert_eq!(hex(Color::TRANSPARENT), "#00000000");
    }
}
