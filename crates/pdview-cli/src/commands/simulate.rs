//! Pointer simulation command.

use std::path::PathBuf;
use std::sync::mpsc;

use clap::Args;
use pdview_config::ViewerConfig;
use pdview_core::{Point, Session};

use super::common::{parse_document, parse_message, parse_point, widget_label};

/// Click on a patch and print what its widgets emit.
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to the `.pd` file
    pub file: PathBuf,

    /// Click at X,Y (repeatable, applied in order)
    #[arg(long, value_name = "X,Y", value_parser = parse_point, number_of_values = 1)]
    pub click: Vec<Point>,

    /// Drag from the preceding click to X,Y before releasing
    #[arg(long, value_name = "X,Y", value_parser = parse_point, number_of_values = 1)]
    pub drag: Vec<Point>,

    /// Send TEXT out of widget ID after the clicks (repeatable)
    #[arg(long, value_name = "ID=TEXT", value_parser = parse_message, number_of_values = 1)]
    pub send: Vec<(usize, String)>,
}

enum Emitted {
    Value(String, f32),
    Message(String, String),
}

/// Run the simulate command.
///
/// With `--drag`, the n-th drag target applies to the n-th click. Messages
/// from `--send` go out once all clicks are done.
pub fn run(args: SimulateArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let doc = parse_document(&args.file, config);
    if !doc.opened() {
        anyhow::bail!("cannot open {}", args.file.display());
    }
    if args.click.is_empty() && args.send.is_empty() {
        anyhow::bail!("nothing to simulate; pass --click X,Y or --send ID=TEXT");
    }

    let mut session = Session::new(doc).with_drag_sensitivity(config.number_box.drag_sensitivity);
    let (tx, rx) = mpsc::channel();
    let message_tx = tx.clone();
    session.registry_mut().bind_all(
        move |channel: &str, value: f32| {
            let _ = tx.send(Emitted::Value(channel.to_string(), value));
        },
        move |channel: &str, text: &str| {
            let _ = message_tx.send(Emitted::Message(channel.to_string(), text.to_string()));
        },
    );

    for (index, point) in args.click.iter().enumerate() {
        let hit = session.press(*point);
        if let Some(target) = args.drag.get(index) {
            session.drag(*target);
        }
        session.release();

        match hit.and_then(|id| session.document().get(id).map(|w| (id, w))) {
            Some((id, widget)) => {
                println!("click {},{} -> {}", point.x, point.y, widget_label(id.index(), widget));
            }
            None => println!("click {},{} -> nothing", point.x, point.y),
        }
        print_emitted(&rx);
    }

    for (index, text) in &args.send {
        let Some((id, widget)) = session.document().iter().nth(*index) else {
            anyhow::bail!("no widget #{index}");
        };
        println!("send #{index} {} \"{text}\"", widget.kind_name());
        session.send_message(id, text);
        print_emitted(&rx);
    }
    Ok(())
}

fn print_emitted(rx: &mpsc::Receiver<Emitted>) {
    for emitted in rx.try_iter() {
        match emitted {
            Emitted::Value(channel, value) => println!("  {channel} = {value}"),
            Emitted::Message(channel, text) => println!("  {channel} = \"{text}\""),
        }
    }
}
