//! Widget listing command.

use std::path::PathBuf;

use clap::Args;
use pdview_config::ViewerConfig;
use pdview_core::{Widget, WidgetKind};

use super::common::parse_document;

/// List the widgets of a patch.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the `.pd` file
    pub file: PathBuf,

    /// Print the parsed document as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the inspect command.
pub fn run(args: InspectArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let doc = parse_document(&args.file, config);
    if !doc.opened() {
        anyhow::bail!("cannot open {}", args.file.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}: {} widgets", args.file.display(), doc.len());
    println!();
    println!(
        "  {:>3}  {:8}  {:>13}  {:>11}  {:16}  {:16}  {}",
        "#", "Kind", "Position", "Size", "Send", "Receive", "Value"
    );
    for (id, widget) in doc.iter() {
        let position = format!("{},{}", widget.position.x, widget.position.y);
        let size = format!("{}x{}", widget.size.width, widget.size.height);
        println!(
            "  {:>3}  {:8}  {:>13}  {:>11}  {:16}  {:16}  {}",
            id.index(),
            widget.kind_name(),
            position,
            size,
            widget.channels.send.as_deref().unwrap_or("-"),
            widget.channels.receive.as_deref().unwrap_or("-"),
            describe_value(widget),
        );
    }
    Ok(())
}

fn describe_value(widget: &Widget) -> String {
    match &widget.kind {
        WidgetKind::Label { text, background, text_color } => format!(
            "{} {background}/{text_color}",
            text.as_deref().map_or_else(|| "(no text)".to_string(), |t| format!("\"{t}\""))
        ),
        WidgetKind::Trigger => "bang".to_string(),
        _ => match widget.value_range() {
            Some(range) => format!("{} in [{}, {}]", widget.initial_value(), range.min, range.max),
            None => String::new(),
        },
    }
}
