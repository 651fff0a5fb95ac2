//! pretty printing implementation

use std::io::Write;

use ansi_term::{Color, Style};
use read_bffnt::{
    tables::{
        cmap::{Cmap, CmapMapping},
        cwdh::Cwdh,
        finf::Finf,
        krng::Krng,
        tglp::Tglp,
    },
    types::{GlyphIndex, Tag},
    BffntRef, ReadError,
};

static MANY_SPACES: [u8; 200] = [0x20; 200];
// width of the left column, which contains the textual representation.
const L_COLUMN_WIDTH: usize = 62;
// position of array indexes, if they are printed
const ARRAY_POS_WIDTH: usize = 53;

/// A single field value, along with its on-disk representation.
#[derive(Clone, Copy, Debug)]
enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    Glyph(GlyphIndex),
    Offset(u32),
}

impl Value {
    fn to_be_bytes(self) -> Vec<u8> {
        match self {
            Value::U8(val) => val.to_be_bytes().to_vec(),
            Value::I8(val) => val.to_be_bytes().to_vec(),
            Value::U16(val) => val.to_be_bytes().to_vec(),
            Value::I16(val) => val.to_be_bytes().to_vec(),
            Value::U32(val) | Value::Offset(val) => val.to_be_bytes().to_vec(),
            Value::Glyph(val) => val.to_be_bytes().to_vec(),
        }
    }
}

pub struct PrettyPrinter<'a> {
    depth: usize,
    line_pos: usize,
    is_tty: bool,
    cur_array_item: Option<usize>,
    indent_size: usize,
    writer: &'a mut (dyn std::io::Write + 'a),
}

impl std::io::Write for PrettyPrinter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let len = self.writer.write(buf)?;
        let wrote_buf = &buf[..len];
        let wrote_str = String::from_utf8_lossy(wrote_buf);
        self.line_pos = match wrote_buf.iter().rev().position(|b| *b == b'\n') {
            Some(_) => 0,
            None => self.line_pos + wrote_str.chars().count(),
        };
        Ok(len)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(writer: &'a mut (dyn std::io::Write + 'a)) -> Self {
        PrettyPrinter {
            depth: 0,
            line_pos: 0,
            cur_array_item: None,
            is_tty: atty::is(atty::Stream::Stdout),
            indent_size: 2,
            writer,
        }
    }

    /// Print every section of the container, in the order they are linked.
    pub fn print_font(&mut self, font: &BffntRef) -> std::io::Result<()> {
        self.print_section(read_bffnt::tables::finf::TAG, |this| {
            this.print_finf(&font.finf())
        })?;
        match font.tglp() {
            Ok(tglp) => {
                self.print_section(read_bffnt::tables::tglp::TAG, |this| this.print_tglp(&tglp))?
            }
            Err(e) => self.print_error(e)?,
        }
        for cwdh in font.cwdhs() {
            match cwdh {
                Ok(cwdh) => {
                    self.print_section(read_bffnt::tables::cwdh::TAG, |this| this.print_cwdh(&cwdh))?
                }
                Err(e) => self.print_error(e)?,
            }
        }
        for cmap in font.cmaps() {
            match cmap {
                Ok(cmap) => {
                    self.print_section(read_bffnt::tables::cmap::TAG, |this| this.print_cmap(&cmap))?
                }
                Err(e) => self.print_error(e)?,
            }
        }
        match font.krng() {
            Ok(Some(krng)) => {
                self.print_section(read_bffnt::tables::krng::TAG, |this| this.print_krng(&krng))?
            }
            Ok(None) => (),
            Err(e) => self.print_error(e)?,
        }
        Ok(())
    }

    fn print_table_header(&mut self) -> std::io::Result<()> {
        writeln!(
            self,
            "┌─────────────────────────────────────────────────────────────┬─────────────┐"
        )
    }

    fn print_table_footer(&mut self) -> std::io::Result<()> {
        writeln!(
            self,
            "└─────────────────────────────────────────────────────────────┴─────────────┘"
        )
    }

    fn print_section(
        &mut self,
        tag: Tag,
        f: impl FnOnce(&mut PrettyPrinter) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        self.print_table_header()?;
        self.print_indent()?;
        self.print_with_style(Style::default().bold(), |this| write!(this, "{tag}"))?;
        self.print_hex(&[])?;
        self.print_newline()?;
        self.indented(f)?;
        self.print_table_footer()
    }

    fn print_error(&mut self, error: ReadError) -> std::io::Result<()> {
        self.print_with_style(Color::Red.into(), |this| write!(this, "Error: '{error}'"))?;
        self.print_newline()
    }

    fn print_indent(&mut self) -> std::io::Result<()> {
        let indent_len = (self.depth * self.indent_size)
            .min(MANY_SPACES.len())
            .saturating_sub(1);
        write!(self, "│")?;
        self.write_all(&MANY_SPACES[..indent_len])
    }

    fn indented(
        &mut self,
        f: impl FnOnce(&mut PrettyPrinter) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn print_newline(&mut self) -> std::io::Result<()> {
        writeln!(self)
    }

    fn print_with_style(
        &mut self,
        style: Style,
        f: impl FnOnce(&mut PrettyPrinter) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        if !self.is_tty {
            f(self)?;
        } else {
            // ansi styles aren't counted for the purpose of width calculations
            let pos = self.line_pos;
            write!(self, "{}", style.prefix())?;
            self.line_pos = pos;
            f(self)?;
            let pos = self.line_pos;
            write!(self, "{}", style.suffix())?;
            self.line_pos = pos;
        }
        Ok(())
    }

    fn print_field(&mut self, name: &str, value: Value) -> std::io::Result<()> {
        self.print_indent()?;
        self.print_with_style(Color::Cyan.into(), |this| write!(this, "{name}"))?;
        write!(self, ": ")?;
        self.print_value(value)?;
        self.print_newline()
    }

    fn print_value(&mut self, value: Value) -> std::io::Result<()> {
        match value {
            Value::U8(val) => write!(self, "{val}")?,
            Value::I8(val) => write!(self, "{val}")?,
            Value::U16(val) => write!(self, "{val}")?,
            Value::I16(val) => write!(self, "{val}")?,
            Value::U32(val) => write!(self, "{val}")?,
            Value::Glyph(val) => {
                self.print_with_style(Color::Yellow.into(), |this| write!(this, "{val}"))?
            }
            Value::Offset(val) => self.print_with_style(Color::Blue.into(), |this| match val {
                0 => write!(this, "Null"),
                _ => write!(this, "{val:#X}"),
            })?,
        }
        self.print_current_array_pos()?;
        self.print_hex(&value.to_be_bytes())
    }

    fn print_array<T>(
        &mut self,
        name: &str,
        items: impl IntoIterator<Item = T>,
        mut f: impl FnMut(&mut PrettyPrinter, T) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        self.print_indent()?;
        self.print_with_style(Color::Cyan.into(), |this| write!(this, "{name}"))?;
        let items = items.into_iter().collect::<Vec<_>>();
        write!(self, ": [{}]", items.len())?;
        self.print_hex(&[])?;
        self.print_newline()?;
        self.indented(|this| {
            for (i, item) in items.into_iter().enumerate() {
                this.cur_array_item = Some(i);
                f(this, item)?;
            }
            Ok(())
        })
    }

    fn print_finf(&mut self, finf: &Finf) -> std::io::Result<()> {
        let widths = finf.default_widths();
        self.print_field("font_type", Value::U8(finf.font_type()))?;
        self.print_field("height", Value::U8(finf.height()))?;
        self.print_field("width", Value::U8(finf.width()))?;
        self.print_field("ascent", Value::U8(finf.ascent()))?;
        self.print_field("line_feed", Value::U16(finf.line_feed()))?;
        self.print_field("alter_char_index", Value::U16(finf.alter_char_index()))?;
        self.print_field("default_left", Value::I8(widths.left()))?;
        self.print_field("default_glyph_width", Value::U8(widths.glyph_width()))?;
        self.print_field("default_char_width", Value::U8(widths.char_width()))?;
        self.print_field("encoding", Value::U8(finf.encoding()))?;
        self.print_field("tglp_offset", Value::Offset(finf.tglp_offset()))?;
        self.print_field("cwdh_offset", Value::Offset(finf.cwdh_offset()))?;
        self.print_field("cmap_offset", Value::Offset(finf.cmap_offset()))
    }

    fn print_tglp(&mut self, tglp: &Tglp) -> std::io::Result<()> {
        self.print_field("cell_width", Value::U8(tglp.cell_width()))?;
        self.print_field("cell_height", Value::U8(tglp.cell_height()))?;
        self.print_field("sheet_count", Value::U8(tglp.sheet_count()))?;
        self.print_field("max_char_width", Value::U8(tglp.max_char_width()))?;
        self.print_field("sheet_size", Value::U32(tglp.sheet_size()))?;
        self.print_field("baseline_position", Value::U16(tglp.baseline_position()))?;
        self.print_field("sheet_format", Value::U16(tglp.sheet_format()))?;
        self.print_field("num_columns", Value::U16(tglp.num_columns()))?;
        self.print_field("num_rows", Value::U16(tglp.num_rows()))?;
        self.print_field("sheet_width", Value::U16(tglp.sheet_width()))?;
        self.print_field("sheet_height", Value::U16(tglp.sheet_height()))?;
        self.print_field("sheet_data_offset", Value::Offset(tglp.sheet_data_offset()))
    }

    fn print_cwdh(&mut self, cwdh: &Cwdh) -> std::io::Result<()> {
        self.print_field("start_index", Value::U16(cwdh.start_index()))?;
        self.print_field("end_index", Value::U16(cwdh.end_index()))?;
        self.print_field("next_offset", Value::Offset(cwdh.next_offset()))?;
        self.print_array("widths", cwdh.widths(), |this, widths| {
            this.print_field("left", Value::I8(widths.left()))?;
            this.print_field("glyph_width", Value::U8(widths.glyph_width()))?;
            this.print_field("char_width", Value::U8(widths.char_width()))
        })
    }

    fn print_cmap(&mut self, cmap: &Cmap) -> std::io::Result<()> {
        self.print_field("code_begin", Value::U16(cmap.code_begin()))?;
        self.print_field("code_end", Value::U16(cmap.code_end()))?;
        self.print_field("method", Value::U16(cmap.method().to_u16()))?;
        self.print_field("reserved", Value::U16(cmap.reserved()))?;
        self.print_field("next_offset", Value::Offset(cmap.next_offset()))?;
        match cmap.mapping() {
            CmapMapping::Direct(base) => self.print_field("base_glyph", Value::U16(base)),
            CmapMapping::Table(glyphs) => self.print_array("glyphs", glyphs, |this, glyph| {
                this.print_indent()?;
                this.print_value(Value::Glyph(glyph.get()))?;
                this.print_newline()
            }),
            CmapMapping::Scan(entries) => {
                self.print_field("entry_count", Value::U16(entries.len() as u16))?;
                self.print_array("entries", entries, |this, entry| {
                    this.print_field("code", Value::U16(entry.code()))?;
                    this.print_field("glyph", Value::Glyph(entry.glyph()))
                })
            }
        }
    }

    fn print_krng(&mut self, krng: &Krng) -> std::io::Result<()> {
        self.print_field("first_char_count", Value::U16(krng.first_chars().len() as u16))?;
        self.print_array("first_chars", krng.first_chars(), |this, record| {
            this.print_field("first_char", Value::U16(record.first_char()))?;
            this.print_field("halved_offset", Value::U16(record.halved_offset.get()))?;
            this.print_array("pairs", krng.pairs(record), |this, pair| {
                this.print_field("second_char", Value::U16(pair.second_char()))?;
                this.print_field("value", Value::I16(pair.value()))
            })
        })
    }

    fn print_current_array_pos(&mut self) -> std::io::Result<()> {
        if let Some(idx) = self.cur_array_item.take() {
            let padding = ARRAY_POS_WIDTH.saturating_sub(self.line_pos);
            let wspace = &MANY_SPACES[..padding];
            self.write_all(wspace)?;
            self.print_with_style(Color::Fixed(243).italic(), |this| write!(this, " {idx}"))?;
        }
        Ok(())
    }

    fn print_hex(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        if bytes.len() > 4 {
            let (head, tail) = bytes.split_at(4);
            self.print_hex(head)?;
            self.print_newline()?;
            self.print_indent()?;
            self.print_hex(tail)?;
            return Ok(());
        }
        let padding = L_COLUMN_WIDTH.saturating_sub(self.line_pos);
        let wspace = &MANY_SPACES[..padding];
        self.write_all(wspace)?;
        self.print_with_style(Color::Fixed(250).into(), |this| {
            write!(this, "│")?;
            for b in bytes {
                write!(this, " {b:02X}")?
            }
            Ok(())
        })?;
        let padding = (4 - bytes.len()) * 3;
        let wspace = &MANY_SPACES[..padding];
        self.write_all(wspace)?;
        write!(self, " │")
    }
}
