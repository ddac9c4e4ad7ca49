mod cli;

use crate::cli::{Commands, RsidxCli};
use anyhow::Result;
use rs2_index::types::MatchKindId;
use rs2_index::workspace::WorkspaceIndex;
use std::fs;
use std::path::PathBuf;
use std::process;

async fn build_index(workspace_path: PathBuf) -> Result<WorkspaceIndex> {
    let mut index = WorkspaceIndex::new(workspace_path);
    index.rebuild_all().await?;
    Ok(index)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RsidxCli::parse_args();

    match cli.command {
        Commands::Index {
            workspace_path,
            verbose,
        } => {
            logging::init(verbose);
            let mut index = WorkspaceIndex::new(workspace_path);
            let stats = index.rebuild_all().await?;
            println!(
                "{} files, {} identifiers, {} ms",
                stats.files,
                stats.identifiers,
                stats.elapsed.as_millis()
            );
        }
        Commands::Dump {
            workspace_path,
            output,
            verbose,
        } => {
            logging::init(verbose);
            let index = build_index(workspace_path).await?;
            let json = serde_json::to_string_pretty(&index.serialize())?;
            match output {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
        Commands::Keys {
            workspace_path,
            verbose,
        } => {
            logging::init(verbose);
            let index = build_index(workspace_path).await?;
            for key in index.keys() {
                println!("{key}");
            }
        }
        Commands::Lookup {
            name,
            kind,
            workspace_path,
            verbose,
        } => {
            logging::init(verbose);
            let kind = MatchKindId::from_tag(&kind)
                .ok_or_else(|| anyhow::anyhow!("unknown kind tag `{kind}`"))?;
            let index = build_index(workspace_path).await?;
            match index.lookup(&name, kind) {
                Some(identifier) => println!("{}", serde_json::to_string_pretty(identifier)?),
                None => {
                    eprintln!("{name} ({kind}) is not in the index");
                    process::exit(1);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_index_over_a_small_workspace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs2"), "[proc,helper]\n~helper;\n").unwrap();

        let index = build_index(dir.path().to_path_buf()).await.unwrap();
        assert!(index
            .lookup("helper", MatchKindId::Proc)
            .is_some());
    }
}
