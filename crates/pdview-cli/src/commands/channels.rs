//! Channel listing command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use pdview_config::ViewerConfig;

use super::common::{parse_document, widget_label};

/// Show which widgets use each channel.
#[derive(Args)]
pub struct ChannelsArgs {
    /// Path to the `.pd` file
    pub file: PathBuf,
}

#[derive(Default)]
struct Usage {
    senders: Vec<String>,
    receivers: Vec<String>,
}

/// Run the channels command.
pub fn run(args: ChannelsArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let doc = parse_document(&args.file, config);
    if !doc.opened() {
        anyhow::bail!("cannot open {}", args.file.display());
    }

    let mut channels: BTreeMap<&str, Usage> = BTreeMap::new();
    for (id, widget) in doc.iter() {
        let label = widget_label(id.index(), widget);
        if let Some(send) = widget.channels.send.as_deref() {
            channels.entry(send).or_default().senders.push(label.clone());
        }
        if let Some(receive) = widget.channels.receive.as_deref() {
            channels.entry(receive).or_default().receivers.push(label);
        }
    }

    if channels.is_empty() {
        println!("No channels bound in {}", args.file.display());
        return Ok(());
    }

    for (name, usage) in &channels {
        println!("{name}");
        if !usage.senders.is_empty() {
            println!("  sent by:     {}", usage.senders.join(", "));
        }
        if !usage.receivers.is_empty() {
            println!("  received by: {}", usage.receivers.join(", "));
        }
    }
    Ok(())
}
