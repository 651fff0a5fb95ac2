//! Print the contents of BFFNT font containers, and rescale them.
//!
//! Logging is configured through `RUST_LOG`; at the `debug` level the byte
//! range of every section is reported as it is read and written.

use read_bffnt::{BffntRef, SectionRecord};
use write_bffnt::Document;

mod print;

use print::PrettyPrinter;

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = flags::Args::from_env().map_err(Error::new)?;
    let bytes = std::fs::read(&args.input)
        .map_err(|e| Error(format!("failed to read '{}': {e}", args.input.display())))?;
    log::debug!("read {:#X} bytes from '{}'", bytes.len(), args.input.display());
    let font = BffntRef::new(&bytes).map_err(Error::new)?;

    if args.list {
        return list_sections(&font);
    }
    if args.kerning {
        return print_kerning(&font);
    }
    if let Some(factor) = args.scale {
        let Some(output) = &args.output else {
            return Err(Error::new("--scale requires --output"));
        };
        return scale(&bytes, factor, output);
    }
    if args.output.is_some() {
        return Err(Error::new("--output is only used with --scale"));
    }
    if args.json {
        let doc = Document::decode(&bytes).map_err(Error::new)?;
        let json = serde_json::to_string_pretty(&doc).map_err(Error::new)?;
        println!("{json}");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut locked = stdout.lock();
    PrettyPrinter::new(&mut locked)
        .print_font(&font)
        .map_err(Error::new)
}

fn list_sections(font: &BffntRef) -> Result<(), Error> {
    let records = font.section_records().map_err(Error::new)?;
    println!("Tag  Offset  Length");
    println!("-------------------");

    let offset_pad = get_offset_width(&records);
    for record in &records {
        println!(
            "{0} 0x{1:02$X} {3:8}",
            record.tag, record.position, offset_pad, record.size,
        );
    }
    Ok(())
}

fn print_kerning(font: &BffntRef) -> Result<(), Error> {
    let Some(krng) = font.krng().map_err(Error::new)? else {
        println!("no kerning");
        return Ok(());
    };
    for (first, pairs) in krng.iter() {
        for pair in pairs {
            println!(
                "{} {} {:+}",
                display_char(first),
                display_char(pair.second_char()),
                pair.value()
            );
        }
    }
    Ok(())
}

fn scale(bytes: &[u8], factor: f64, output: &std::path::Path) -> Result<(), Error> {
    let mut doc = Document::decode(bytes).map_err(Error::new)?;
    doc.scale(factor).map_err(Error::new)?;
    let scaled = doc.encode().map_err(Error::new)?;
    std::fs::write(output, scaled)
        .map_err(|e| Error(format!("failed to write '{}': {e}", output.display())))
}

fn display_char(code: u16) -> String {
    match char::from_u32(code as u32) {
        Some(c) if !c.is_control() => format!("'{c}' (U+{code:04X})"),
        _ => format!("U+{code:04X}"),
    }
}

fn get_offset_width(records: &[SectionRecord]) -> usize {
    // pick how much padding we use for offsets based on the max offset
    let max_off = records
        .iter()
        .map(|record| record.position)
        .max()
        .unwrap_or_default();
    hex_width(max_off)
}

fn hex_width(val: usize) -> usize {
    match val {
        0..=0xffff => 4usize,
        0x10000..=0xffff_ff => 6,
        _ => 8,
    }
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Inspect and rescale BFFNT font containers
        cmd args {
            required input: PathBuf
                /// List every section with its offset and size.
                optional -l, --list
                /// Print every kerning pair.
                optional -k, --kerning
                /// Dump the decoded document as JSON.
                optional -j, --json
                /// Multiply every metric by this factor.
                optional -s, --scale factor: f64
                /// Where to write the scaled container.
                optional -o, --output output: PathBuf
            }
    }
}
