//! Inspect and edit NBT files from the command line.
//!
//! Paths into the tree are `/` separated names, with list elements named by
//! index, eg `Data/Player/Inventory/0/id`.
//!
//! ```text
//! nbt dump level.dat
//! nbt set level.dat Data/SpawnY 100
//! nbt mv player.dat XpLevel Level --out edited.dat
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use nbtedit::compression::{Compression, NbtFile};
use nbtedit::tree::{NodeId, TreeModel};

#[derive(Parser)]
#[command(name = "nbt", version, about = "Inspect and edit NBT files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the whole tree.
    Dump {
        file: PathBuf,
        /// Print as JSON instead of an indented tree.
        #[arg(long)]
        json: bool,
    },
    /// Print the value at a path, or the subtree if it is a container.
    Get { file: PathBuf, path: String },
    /// Set the value of a leaf.
    Set {
        file: PathBuf,
        path: String,
        value: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Remove a node.
    Rm {
        file: PathBuf,
        path: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rename a child of a compound.
    Mv {
        file: PathBuf,
        path: String,
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn open(path: &Path) -> Result<(TreeModel, Compression)> {
    let NbtFile { tag, compression } =
        NbtFile::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok((TreeModel::new(tag), compression))
}

/// Write the edited tree to `out`, or back over `original` in the envelope it
/// was read with.
fn save(
    model: TreeModel,
    compression: Compression,
    original: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let edited = NbtFile::new(model.into_named_tag(), compression);
    match out {
        Some(out) => edited
            .save(out)
            .with_context(|| format!("saving {}", out.display()))?,
        None => edited
            .save_preserving(original)
            .with_context(|| format!("saving {}", original.display()))?,
    }
    info!("saved {}", out.unwrap_or(original).display());
    Ok(())
}

fn dump(model: &TreeModel, id: NodeId, indent: usize) -> Result<()> {
    let name = model.display_name(id)?;
    let value = model.display_value(id)?;
    let kind = model.kind(id)?;

    if value.is_empty() {
        println!("{:indent$}{} ({})", "", name, kind, indent = indent);
    } else {
        println!("{:indent$}{} ({}): {}", "", name, kind, value, indent = indent);
    }

    for child in model.children(id)? {
        dump(model, child, indent + 4)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Dump { file, json } => {
            let (model, _) = open(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(model.named_tag())?);
            } else {
                dump(&model, model.root(), 0)?;
            }
        }
        Command::Get { file, path } => {
            let (model, _) = open(&file)?;
            let id = model.resolve(&path)?;
            if model.is_value_editable(id)? {
                println!("{}", model.display_value(id)?);
            } else {
                dump(&model, id, 0)?;
            }
        }
        Command::Set {
            file,
            path,
            value,
            out,
        } => {
            let (mut model, compression) = open(&file)?;
            let id = model.resolve(&path)?;
            if !model.is_value_editable(id)? {
                bail!("{} is a {} and has no value to set", path, model.kind(id)?);
            }
            model
                .set_value(id, &value)
                .with_context(|| format!("setting {}", path))?;
            save(model, compression, &file, out.as_deref())?;
        }
        Command::Rm { file, path, out } => {
            let (mut model, compression) = open(&file)?;
            let id = model.resolve(&path)?;
            model
                .delete_node(id)
                .with_context(|| format!("removing {}", path))?;
            save(model, compression, &file, out.as_deref())?;
        }
        Command::Mv {
            file,
            path,
            name,
            out,
        } => {
            let (mut model, compression) = open(&file)?;
            let id = model.resolve(&path)?;
            model
                .rename_node(id, &name)
                .with_context(|| format!("renaming {} to {}", path, name))?;
            save(model, compression, &file, out.as_deref())?;
        }
    }

    Ok(())
}
