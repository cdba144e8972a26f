/// Listing tests against hand-assembled 8086 programs.
///
/// Fixtures live in `fixtures/listings.json`: each entry carries the machine
/// code bytes and the exact listing nasm source they were assembled from.
///
/// Run them:
///     cargo test listing_tests
///
/// The nasm round-trip over `listings/` needs `nasm` on the PATH:
///     cargo test listing_tests -- --ignored

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::decoder::disassemble;
use crate::spacing::add_spacing;

// ── JSON deserialization types ──────────────────────────────────────────

#[derive(Deserialize)]
struct Listing {
    name: String,
    bytes: Vec<u8>,
    asm: String,
}

// ── Globals ─────────────────────────────────────────────────────────────

static LISTINGS: OnceLock<Vec<Listing>> = OnceLock::new();

fn listings() -> &'static [Listing] {
    LISTINGS.get_or_init(|| {
        serde_json::from_str(include_str!("../fixtures/listings.json"))
            .expect("Failed to parse fixtures/listings.json")
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn listing(name: &str) -> &'static Listing {
    listings()
        .iter()
        .find(|l| l.name == name)
        .unwrap_or_else(|| panic!("No fixture named '{}'", name))
}

fn check_listing(name: &str) {
    let fixture = listing(name);
    let disassembly = disassemble(&fixture.bytes);
    assert!(
        disassembly.is_complete(),
        "'{}' stopped early: {:?}",
        name,
        disassembly.error
    );
    let text = disassembly.text();
    if text != fixture.asm {
        let mut msg = format!("'{}' listing differs\n", name);
        for (i, (got, want)) in text.lines().zip(fixture.asm.lines()).enumerate() {
            if got != want {
                msg.push_str(&format!("  line {}: got '{}', want '{}'\n", i + 1, got, want));
            }
        }
        let (got, want) = (text.lines().count(), fixture.asm.lines().count());
        if got != want {
            msg.push_str(&format!("  {} line(s), want {}\n", got, want));
        }
        panic!("{}", msg);
    }
}

/// Assembles `source` with nasm and returns the produced machine code.
fn nasm(source: &str, scratch: &Path) -> Result<Vec<u8>, String> {
    let asm = scratch.with_extension("asm");
    let bin = scratch.with_extension("bin");
    std::fs::write(&asm, source).map_err(|e| format!("write {}: {}", asm.display(), e))?;
    let output = Command::new("nasm")
        .arg("-f")
        .arg("bin")
        .arg("-o")
        .arg(&bin)
        .arg(&asm)
        .output()
        .map_err(|e| format!("failed to run nasm: {}", e))?;
    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).into_owned());
    }
    std::fs::read(&bin).map_err(|e| format!("read {}: {}", bin.display(), e))
}

fn listing_files() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("listings");
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_none())
        .collect();
    files.sort();
    files
}

// ── Fixture listings ────────────────────────────────────────────────────

macro_rules! listing_tests {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                check_listing(stringify!($name));
            }
        )*
    };
}

listing_tests!(
    single_register_mov,
    more_movs,
    arithmetic,
    jumps,
    prefixes,
    misc,
);

#[test]
fn fixture_names_are_unique() {
    let all = listings();
    for (i, l) in all.iter().enumerate() {
        assert!(all[i + 1..].iter().all(|o| o.name != l.name), "duplicate '{}'", l.name);
    }
}

#[test]
fn spacing_keeps_every_line() {
    for fixture in listings() {
        let spaced = add_spacing(&fixture.asm);
        let kept: Vec<&str> = spaced.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(kept, fixture.asm.lines().collect::<Vec<_>>(), "'{}'", fixture.name);
    }
}

// ── Distinct encodings ──────────────────────────────────────────────────

/// Encodings nasm must be able to tell apart. Text shared by two of them
/// cannot reassemble to both.
const ENCODING_VARIANTS: &[(&str, &[&[u8]])] = &[
    ("jmp short/near", &[&[0xEB, 0x03], &[0xE9, 0x02, 0x00]]),
    ("jmp short/near back", &[&[0xEB, 0xFE], &[0xE9, 0xFF, 0xFF]]),
    (
        "movsb overrides",
        &[&[0xA4], &[0x26, 0xA4], &[0x2E, 0xA4], &[0x36, 0xA4], &[0x3E, 0xA4]],
    ),
    ("rep movsb overrides", &[&[0xF3, 0xA4], &[0xF2, 0xA4], &[0x2E, 0xF3, 0xA4]]),
    ("lodsw overrides", &[&[0xAD], &[0x26, 0xAD]]),
    ("xlat overrides", &[&[0xD7], &[0x26, 0xD7], &[0x2E, 0xD7]]),
    ("lock", &[&[0x90], &[0xF0, 0x90]]),
    ("register override", &[&[0x89, 0xC8], &[0x26, 0x89, 0xC8]]),
    (
        "memory override",
        &[&[0x8B, 0x07], &[0x26, 0x8B, 0x07], &[0x2E, 0x8B, 0x07]],
    ),
    ("direct call", &[&[0xE8, 0x02, 0x00], &[0x9A, 0x02, 0x00, 0x00, 0x00]]),
];

#[test]
fn distinct_encodings_render_differently() {
    let mut errors: Vec<String> = Vec::new();
    for (label, variants) in ENCODING_VARIANTS {
        let rendered: Vec<String> = variants
            .iter()
            .map(|bytes| {
                let disassembly = disassemble(bytes);
                assert!(
                    disassembly.is_complete(),
                    "[{}] {:02X?} stopped early: {:?}",
                    label,
                    bytes,
                    disassembly.error
                );
                disassembly.lines.join("\n")
            })
            .collect();
        for (i, text) in rendered.iter().enumerate() {
            for (j, other) in rendered.iter().enumerate().skip(i + 1) {
                if text == other {
                    errors.push(format!(
                        "[{}] {:02X?} and {:02X?} both render '{}'",
                        label, variants[i], variants[j], text
                    ));
                }
            }
        }
    }
    if !errors.is_empty() {
        panic!("{}", errors.join("\n"));
    }
}

// ── nasm round-trip ─────────────────────────────────────────────────────

#[test]
#[ignore]
fn listing_files_reassemble() {
    let files = listing_files();
    if files.is_empty() {
        eprintln!("  skip: no files under listings/");
        return;
    }

    let mut errors: Vec<String> = Vec::new();
    for path in &files {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let original = std::fs::read(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let disassembly = disassemble(&original);
        if let Some(err) = &disassembly.error {
            errors.push(format!("[{}] decoding stopped: {}", label, err));
            continue;
        }
        let scratch = std::env::temp_dir().join(format!("disasm8086-{}", label));
        match nasm(&add_spacing(&disassembly.text()), &scratch) {
            Ok(bytes) if bytes == original => {}
            Ok(_) => errors.push(format!("[{}] reassembled bytes differ", label)),
            Err(e) => errors.push(format!("[{}] {}", label, e)),
        }
    }

    eprintln!(
        "  listings: {}/{} round-tripped",
        files.len() - errors.len(),
        files.len()
    );
    if !errors.is_empty() {
        panic!("{}", errors.join("\n"));
    }
}
