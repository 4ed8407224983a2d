/// Basic example demonstrating archive creation, editing and rebuilding
///
/// Run with: cargo run --example basic
use std::error::Error;
use std::fs;
use wadutil_rs::{Direction, WadReader, WadSession};

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== wadutil-rs Basic Example ===\n");

    // Create an archive from loose files
    println!("1. Creating archive...");
    create_archive()?;

    // Edit it and save a copy
    println!("\n2. Editing archive...");
    edit_archive()?;

    // Read the result back
    println!("\n3. Reading rebuilt archive...");
    read_archive()?;

    println!("\n✓ Example complete!");
    Ok(())
}

fn create_archive() -> Result<(), Box<dyn Error>> {
    fs::create_dir_all("example_lumps")?;
    fs::write("example_lumps/map01", b"")?;
    fs::write("example_lumps/things.lmp", [0u8; 40])?;
    fs::write("example_lumps/linedefs.lmp", [1u8; 28])?;
    fs::write("example_lumps/readme.txt", b"Built by the wadutil-rs basic example.")?;

    let mut session = WadSession::new();
    for name in ["map01", "things.lmp", "linedefs.lmp", "readme.txt"] {
        session.add_lump(format!("example_lumps/{}", name))?;
    }

    let header = session.save("example_basic.wad")?;
    println!(
        "   ✓ Archive created: example_basic.wad ({}, {} lumps)",
        header.wad_type, header.lump_count
    );

    Ok(())
}

fn edit_archive() -> Result<(), Box<dyn Error>> {
    let mut session = WadSession::new();
    session.open("example_basic.wad")?;

    // Move the readme to the top and give it a clearer name
    let mut index = session.len() - 1;
    while index > 0 {
        index = session.move_lump(index, Direction::Up)?;
    }
    let name = session.rename_lump(0, "info")?;
    println!("   Renamed readme to {}", name);

    // Drop the line definitions
    session.delete_lumps(&[3])?;

    println!("   Lumps after editing:");
    println!("{}", session.listing_json()?);

    session.save("example_edited.wad")?;
    println!("   ✓ Saved: example_edited.wad");

    Ok(())
}

fn read_archive() -> Result<(), Box<dyn Error>> {
    let mut reader = WadReader::open("example_edited.wad")?;
    let directory = reader.read_directory()?;

    // List all lumps
    println!("   Lumps in archive:");
    for entry in &directory {
        println!("     - {:<8} {:>4} bytes at {}", entry.name, entry.size, entry.offset);
    }

    // Read a specific lump
    println!("\n   Reading INFO:");
    let info = reader.read_lump(&directory[0])?;
    println!("     {}", String::from_utf8_lossy(&info));

    Ok(())
}
