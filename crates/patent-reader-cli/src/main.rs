use anyhow::{Context, Result, anyhow, bail};
use patent_reader_config::Config;
use patent_reader_engine::{
    DocumentId, HighlightColor, HighlightPatch, HighlightSession, JsonFilePersistence,
    LogicalPosition, OutlineDocument, OverlayMetrics, PatentFile, PositionOrder, Selection, io,
};
use relative_path::RelativePathBuf;
use std::cmp::Ordering;
use std::{env, path::PathBuf, process};

const USAGE: &str = "\
Usage: patent-reader-cli [--config PATH] <command>

Commands:
  docs                           List documents under the patents directory
  list <doc>                     Show a document's highlights
  add <doc> <from> <to> [color]  Highlight from..to (node:offset or offset)
  remove <doc> <from> <to>       Clear highlighting from..to
  rects <doc>                    Show overlay rectangles for a document";

#[derive(Debug, PartialEq)]
enum Command {
    Docs,
    List {
        doc: String,
    },
    Add {
        doc: String,
        from: String,
        to: String,
        color: Option<String>,
    },
    Remove {
        doc: String,
        from: String,
        to: String,
    },
    Rects {
        doc: String,
    },
}

#[derive(Debug, PartialEq)]
struct Invocation {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut config_path = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or_else(|| anyhow!("--config needs a path"))?;
            config_path = Some(PathBuf::from(path));
        } else {
            rest.push(arg.clone());
        }
    }

    let command = match rest.as_slice() {
        [cmd] if cmd == "docs" => Command::Docs,
        [cmd, doc] if cmd == "list" => Command::List { doc: doc.clone() },
        [cmd, doc] if cmd == "rects" => Command::Rects { doc: doc.clone() },
        [cmd, doc, from, to] if cmd == "add" => Command::Add {
            doc: doc.clone(),
            from: from.clone(),
            to: to.clone(),
            color: None,
        },
        [cmd, doc, from, to, color] if cmd == "add" => Command::Add {
            doc: doc.clone(),
            from: from.clone(),
            to: to.clone(),
            color: Some(color.clone()),
        },
        [cmd, doc, from, to] if cmd == "remove" => Command::Remove {
            doc: doc.clone(),
            from: from.clone(),
            to: to.clone(),
        },
        [] => bail!("no command given"),
        [cmd, ..] => bail!("unknown command or wrong arguments for '{cmd}'"),
    };

    Ok(Invocation {
        config_path,
        command,
    })
}

/// A patent document read from disk and split into nodes
struct OpenDocument {
    id: DocumentId,
    outline: OutlineDocument,
}

impl OpenDocument {
    fn load(config: &Config, doc: &str) -> Result<Self> {
        let file = PatentFile::new(RelativePathBuf::from(doc));
        let bytes = io::read_document(file.relative_path(), &config.patents_path)
            .with_context(|| format!("could not read '{doc}'"))?;
        let outline = OutlineDocument::from_bytes(&bytes)?;
        log::debug!("loaded {doc} with {} node(s)", outline.len());

        Ok(Self {
            id: file.document_id(),
            outline,
        })
    }

    fn position(&self, input: &str) -> Result<LogicalPosition> {
        self.outline
            .parse_position(input)
            .ok_or_else(|| anyhow!("'{input}' is not a position in this document"))
    }

    fn selection(&self, from: &str, to: &str) -> Result<Selection> {
        Ok(Selection::new(self.position(from)?, self.position(to)?))
    }
}

fn session(config: &Config) -> HighlightSession<JsonFilePersistence> {
    HighlightSession::new(JsonFilePersistence::new(config.highlights_dir()))
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Docs => {
            for file in io::scan_documents(&config.patents_path)? {
                println!("{}\t{}", file.relative_path(), file.display_name());
            }
        }
        Command::List { doc } => {
            let document = OpenDocument::load(config, &doc)?;
            let mut session = session(config);
            session.open_document(&document.id);

            let mut ranges = session.highlights(&document.id).to_vec();
            ranges.sort_by(|a, b| {
                document
                    .outline
                    .compare_positions(&a.start, &b.start)
                    .unwrap_or(Ordering::Equal)
            });
            for range in &ranges {
                let text = document.outline.text_of(range).unwrap_or_default();
                println!("{range}\t{text:?}");
            }
        }
        Command::Add {
            doc,
            from,
            to,
            color,
        } => {
            let document = OpenDocument::load(config, &doc)?;
            let selection = document.selection(&from, &to)?;
            let color = HighlightColor::new(color.unwrap_or_else(|| config.default_color.clone()));

            let mut session = session(config);
            let patch = session.add_highlight(&document.id, &document.outline, &selection, color);
            report(&patch);
        }
        Command::Remove { doc, from, to } => {
            let document = OpenDocument::load(config, &doc)?;
            let selection = document.selection(&from, &to)?;

            let mut session = session(config);
            let patch = session.remove_highlight(&document.id, &document.outline, &selection, None);
            report(&patch);
        }
        Command::Rects { doc } => {
            let document = OpenDocument::load(config, &doc)?;
            let mut session = session(config);
            session.open_document(&document.id);

            let metrics = OverlayMetrics {
                line_height: config.overlay.line_height,
                char_width: config.overlay.char_width,
                wrap_column: config.overlay.wrap_column,
            };
            let layout = document.outline.layout(metrics);
            for overlay in session.overlay_rects(&document.id, &layout) {
                println!("{} {}", overlay.range_id, overlay.color);
                for rect in overlay.rects {
                    println!(
                        "  top={} left={} width={} height={}",
                        rect.top, rect.left, rect.width, rect.height
                    );
                }
            }
        }
    }
    Ok(())
}

fn report(patch: &HighlightPatch) {
    if patch.is_empty() {
        println!("Nothing to change");
        return;
    }
    println!(
        "{}: removed {}, added {} (version {})",
        patch.document,
        patch.removed.len(),
        patch.added.len(),
        patch.version
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config_path = invocation
        .config_path
        .unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path) {
        Ok(Some(config)) => config,
        Ok(None) => {
            eprintln!("Error: No config file found");
            eprintln!("Create a config file at {}", config_path.display());
            eprintln!("containing at least: patents_path = \"/path/to/patents\"");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_patents_dir(&config.patents_path) {
        eprintln!(
            "Error: Patents path '{}' from config file '{}' is invalid: {e}",
            config.patents_path.display(),
            config_path.display()
        );
        process::exit(1);
    }

    run(invocation.command, &config)
}
