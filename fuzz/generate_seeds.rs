//! Generate seed corpus for fuzzing

use std::fs;
use std::path::Path;
use wadutil_rs::{EditorConfig, TypeTagPolicy, WadSession};

/// Save `lumps` as a WAD at `path`, staging each payload in `scratch`
fn write_seed(
    path: &str,
    scratch: &Path,
    tag: TypeTagPolicy,
    lumps: &[(&str, &[u8])],
) -> Result<(), Box<dyn std::error::Error>> {
    let config = EditorConfig {
        type_tag: tag,
        ..EditorConfig::default()
    };
    let mut session = WadSession::with_config(config)?;
    for (name, data) in lumps {
        let staged = scratch.join(name);
        fs::write(&staged, data)?;
        session.add_lump(&staged)?;
    }
    session.save(path)?;
    println!("✓ Generated: {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let corpus_dir = "fuzz/corpus/fuzz_archive_parse";
    fs::create_dir_all(corpus_dir)?;
    let scratch = tempfile::tempdir()?;

    println!("Generating seed corpus...");

    // Seed 1: Empty archive (no lumps)
    write_seed(
        &format!("{}/seed_empty.wad", corpus_dir),
        scratch.path(),
        TypeTagPolicy::Iwad,
        &[],
    )?;

    // Seed 2: Single small lump
    write_seed(
        &format!("{}/seed_single_small.wad", corpus_dir),
        scratch.path(),
        TypeTagPolicy::Pwad,
        &[("dehacked", &b"Patch File for DeHackEd v3.0"[..])],
    )?;

    // Seed 3: Map with markers and data lumps
    let things = [0x11u8; 40];
    let vertexes: Vec<u8> = (0..64).collect();
    write_seed(
        &format!("{}/seed_map.wad", corpus_dir),
        scratch.path(),
        TypeTagPolicy::Pwad,
        &[
            ("map01", &b""[..]),
            ("things", &things[..]),
            ("vertexes", &vertexes[..]),
        ],
    )?;

    // Seed 4: Namespace with only markers
    write_seed(
        &format!("{}/seed_markers.wad", corpus_dir),
        scratch.path(),
        TypeTagPolicy::Iwad,
        &[("f_start", &b""[..]), ("f_end", &b""[..])],
    )?;

    // Seed 5: Binary data
    let binary_data: Vec<u8> = (0..=255).collect();
    write_seed(
        &format!("{}/seed_binary.wad", corpus_dir),
        scratch.path(),
        TypeTagPolicy::Iwad,
        &[("playpal", &binary_data[..])],
    )?;

    println!("\nGenerated 5 seed files in {}", corpus_dir);
    Ok(())
}
