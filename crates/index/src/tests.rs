//! End-to-end tests through the async orchestrator, against real workspaces
//! laid out in a temp directory.

use crate::types::MatchKindId;
use crate::workspace::WorkspaceIndex;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

async fn build_workspace(files: &[(&str, &str)]) -> (TempDir, WorkspaceIndex) {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        write(dir.path(), name, content);
    }
    let mut index = WorkspaceIndex::new(dir.path());
    index.rebuild_all().await.unwrap();
    (dir, index)
}

#[tokio::test]
async fn one_declaration_and_n_references() {
    let (_dir, index) = build_workspace(&[
        (
            "scripts/helper.rs2",
            "// Adds one\n[proc,helper](int $x)(int)\nreturn(calc($x + 1));\n",
        ),
        ("scripts/use.rs2", "~helper(1);\n~helper(2);\n"),
    ])
    .await;

    let identifier = index.lookup("helper", MatchKindId::Proc).unwrap();
    let declaration = identifier.declaration.as_ref().unwrap();
    assert_eq!(declaration.file, "scripts/helper.rs2");
    assert_eq!(declaration.line, 1);
    assert_eq!(identifier.info.as_deref(), Some("Adds one"));
    // Two call sites plus the declaration's own position.
    assert_eq!(identifier.reference_count(), 3);
}

#[tokio::test]
async fn rebuilds_are_idempotent() {
    let files = &[
        ("engine.rs2", "[command,anim](seq $seq, int $delay)\n"),
        ("configs/wave.seq", "[wave]\nframe1=wave_frame\n"),
        ("scripts/dance.rs2", "anim(wave, 10);\nanim(wave, 20);\n"),
        ("pack/obj.pack", "10\tcoins\n"),
    ];
    let (_dir, mut index) = build_workspace(files).await;
    let first = serde_json::to_string(&index.serialize()).unwrap();

    index.rebuild_all().await.unwrap();
    let second = serde_json::to_string(&index.serialize()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn forward_references_resolve_through_the_second_pass() {
    // `aaa.rs2` is parsed before the command it calls is declared; only the
    // second pass can type its arguments.
    let (_dir, index) = build_workspace(&[
        ("aaa.rs2", "anim(wave, 10);\n"),
        ("engine.rs2", "[command,anim](seq $seq, int $delay)\n"),
        ("zz/wave.seq", "[wave]\n"),
    ])
    .await;

    let wave = index.lookup("wave", MatchKindId::Seq).unwrap();
    assert!(wave.references.contains_key("aaa.rs2"));
}

#[tokio::test]
async fn clearing_a_reference_file_keeps_the_declaration() {
    let (dir, mut index) = build_workspace(&[
        ("scripts/helper.rs2", "[proc,helper](int $x)(int)\n"),
        ("scripts/use.rs2", "~helper(1);\n"),
    ])
    .await;

    index.clear_files(&[dir.path().join("scripts/use.rs2")]);
    let identifier = index.lookup("helper", MatchKindId::Proc).unwrap();
    assert!(identifier.declaration.is_some());
    assert!(!identifier.references.contains_key("scripts/use.rs2"));

    index.clear_files(&[dir.path().join("scripts/helper.rs2")]);
    assert!(index.lookup("helper", MatchKindId::Proc).is_none());
}

#[tokio::test]
async fn saving_a_file_reindexes_only_that_file() {
    let (dir, mut index) = build_workspace(&[
        ("scripts/helper.rs2", "[proc,helper](int $x)(int)\n"),
        ("scripts/use.rs2", "~helper(1);\n~helper(2);\n"),
    ])
    .await;
    assert_eq!(
        index.lookup("helper", MatchKindId::Proc).unwrap().reference_count(),
        3
    );

    write(dir.path(), "scripts/use.rs2", "~helper(1);\n");
    index
        .rebuild_file(&dir.path().join("scripts/use.rs2"))
        .await
        .unwrap();

    let identifier = index.lookup("helper", MatchKindId::Proc).unwrap();
    assert_eq!(identifier.reference_count(), 2);
    assert!(identifier.declaration.is_some());
}

#[tokio::test]
async fn renamed_files_move_their_contributions() {
    let (dir, mut index) = build_workspace(&[
        ("scripts/old.rs2", "[proc,helper]\n"),
    ])
    .await;

    let old = dir.path().join("scripts/old.rs2");
    let new = dir.path().join("scripts/new.rs2");
    fs::rename(&old, &new).unwrap();
    index.rename_files(&[(old, new)]).await.unwrap();

    let identifier = index.lookup("helper", MatchKindId::Proc).unwrap();
    assert_eq!(
        identifier.declaration.as_ref().unwrap().file,
        "scripts/new.rs2"
    );
}

#[tokio::test]
async fn pack_ids_attach_to_identifiers() {
    let (_dir, index) = build_workspace(&[
        ("configs/items.obj", "[coins]\nname=Coins\n"),
        ("pack/obj.pack", "995\tcoins\n"),
    ])
    .await;

    let coins = index.lookup("coins", MatchKindId::Obj).unwrap();
    assert_eq!(coins.pack_id.as_deref(), Some("995"));
    assert!(coins.references.contains_key("pack/obj.pack"));
}

#[tokio::test]
async fn debounced_active_rebuild_applies_the_latest_text() {
    let (_dir, mut index) = build_workspace(&[]).await;

    index.schedule_active_rebuild("a.rs2", "[proc,first]\n");
    index.schedule_active_rebuild("a.rs2", "[proc,second](int $x)\n");
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let block = index.script_at_line(0).await.unwrap();
    assert_eq!(block.name, "second");
    assert!(block.variables.contains_key("$x"));
}

#[tokio::test]
async fn cache_keys_are_sorted_and_stable() {
    let (_dir, index) = build_workspace(&[
        ("scripts/a.rs2", "[proc,zulu]\n[proc,alpha]\n"),
    ])
    .await;

    let keys = index.keys();
    let alpha = keys.iter().position(|key| key == "alpha+PROC").unwrap();
    let zulu = keys.iter().position(|key| key == "zulu+PROC").unwrap();
    assert!(alpha < zulu);
}

#[tokio::test]
async fn unreadable_files_are_skipped() {
    let (dir, mut index) = build_workspace(&[("scripts/a.rs2", "[proc,keep]\n")]).await;

    // A file that disappears between enumeration and read is simply absent
    // from that rebuild cycle.
    index
        .rebuild_file(&dir.path().join("scripts/missing.rs2"))
        .await
        .unwrap();
    assert!(index.lookup("keep", MatchKindId::Proc).is_some());
}
