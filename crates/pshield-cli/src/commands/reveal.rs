use anyhow::Result;
use pshield_core::RevealView;

use super::{MappingFile, read_input, write_output};
use crate::cli::RevealArgs;

pub fn handle(args: RevealArgs) -> Result<()> {
    let file = MappingFile::load(&args.mapping)?;
    let text = read_input(&args.input)?;

    let result = if args.occurrences.is_empty() {
        file.mapping.restore(&text, &file.aliases)
    } else {
        let mut view = RevealView::new(&text, &file.mapping, &file.aliases);
        for &n in &args.occurrences {
            let toggled = n.checked_sub(1).and_then(|index| view.toggle(index));
            if toggled.is_none() {
                eprintln!(
                    "  Warning: occurrence {} cannot be revealed ({} placeholder(s) in text)",
                    n,
                    view.occurrences().len()
                );
            }
        }
        view.render()
    };

    write_output(args.output.as_deref(), &result)
}
