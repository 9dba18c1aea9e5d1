//! Plain-text to PDF rendering
//!
//! Text is split into character chunks, one chunk per US-letter page, and
//! drawn in Helvetica inside 1-inch margins. Nothing is compressed so the
//! output stays easy to inspect.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const FONT_SIZE: i64 = 11;
const LEADING: i64 = 13;

/// Text box width in glyph units (1/1000 em) at `FONT_SIZE`
const LINE_WIDTH_UNITS: u32 = ((PAGE_WIDTH - 2 * MARGIN) * 1000 / FONT_SIZE) as u32;

/// Helvetica advance widths for WinAnsi codes 0x20..=0x7E (standard AFM metrics)
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica advance widths for WinAnsi codes 0xA0..=0xFF
#[rustfmt::skip]
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Baseline of the first line
const FIRST_BASELINE: i64 = PAGE_HEIGHT - MARGIN - LEADING + 1;

/// Lines that fit between the top and bottom margins
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Split `text` into chunks of at most `max_chars` characters.
///
/// A chunk that does not reach the end of the text is cut just after the
/// last newline in its window, provided that newline is not the first
/// character. Empty text yields a single empty chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len() {
            if let Some(pos) = chars[start..end].iter().rposition(|&c| c == '\n') {
                if pos > 0 {
                    end = start + pos + 1;
                }
            }
        }
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }
    chunks
}

/// WinAnsi byte drawn for `c`; anything outside printable Latin-1 becomes `?`
fn encode_char(c: char) -> u8 {
    match c as u32 {
        0x09 => b' ',
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => b'?',
    }
}

/// Advance width of `c` as drawn, in glyph units
fn glyph_width(c: char) -> u32 {
    let code = encode_char(c);
    let width = match code {
        0x20..=0x7E => ASCII_WIDTHS[(code - 0x20) as usize],
        0xA0..=0xFF => LATIN1_WIDTHS[(code - 0xA0) as usize],
        _ => ASCII_WIDTHS[(b'?' - 0x20) as usize],
    };
    width as u32
}

/// Width of `line` in points at `FONT_SIZE`
#[cfg(test)]
fn line_width_pt(line: &str) -> f64 {
    let units: u32 = line.chars().map(glyph_width).sum();
    units as f64 * FONT_SIZE as f64 / 1000.0
}

/// Wrap one chunk into display lines without dropping characters.
///
/// Each line holds as many glyphs as fit the text box, then breaks after
/// the last space on it; words wider than a line are hard-split.
fn wrap_lines(chunk: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in chunk.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut start = 0;
        while start < chars.len() {
            let mut end = start;
            let mut width = 0;
            while end < chars.len() {
                let next = glyph_width(chars[end]);
                if end > start && width + next > LINE_WIDTH_UNITS {
                    break;
                }
                width += next;
                end += 1;
            }
            if end < chars.len() {
                if let Some(pos) = chars[start..end].iter().rposition(|&c| c == ' ') {
                    if pos > 0 {
                        end = start + pos + 1;
                    }
                }
            }
            lines.push(chars[start..end].iter().collect());
            start = end;
        }
    }
    lines
}

/// Encode a line for the WinAnsi Type1 font
fn encode_line(line: &str) -> Vec<u8> {
    line.chars().map(encode_char).collect()
}

fn page_content(lines: &[String]) -> Result<Vec<u8>> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), FIRST_BASELINE.into()]),
    ];
    for line in lines {
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_line(line))],
            ));
        }
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    Ok(Content { operations }.encode()?)
}

/// Render `text` as PDF bytes, one `max_chars` chunk per page
pub fn render_pdf(text: &str, max_chars: usize) -> Result<Vec<u8>> {
    let text = text.replace("\r\n", "\n");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<ObjectId> = Vec::new();
    for chunk in chunk_text(&text, max_chars) {
        let lines = wrap_lines(&chunk);
        // Overflow continues on an extra page
        for page_lines in lines.chunks(LINES_PER_PAGE) {
            let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(page_lines)?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id);
        }
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Render `text` and write it to `path`, replacing any existing file.
///
/// The bytes go to a temporary file beside `path` which is then renamed
/// over it, so readers and concurrent writers only ever see a whole PDF.
/// Returns the number of bytes written.
pub fn generate_pdf(text: &str, path: &Path, max_chars: usize) -> Result<usize> {
    let bytes = render_pdf(text, max_chars)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".quote-")
        .suffix(".pdf.tmp")
        .tempfile_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::info!("Wrote quotation PDF to {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every `Tj` string, page by page
    fn page_texts(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let data = doc.get_page_content(page_id).unwrap();
                let content = Content::decode(&data).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        _ => None,
                    })
                    .collect::<String>()
            })
            .collect()
    }

    fn sample_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("room{} ", i % 97))
            .collect::<String>()
    }

    #[test]
    fn test_chunk_prefers_last_newline() {
        let chunks = chunk_text("aaaa\nbbbb\ncc", 8);
        assert_eq!(chunks, vec!["aaaa\n", "bbbb\ncc"]);
    }

    #[test]
    fn test_chunk_hard_split_and_empty() {
        assert_eq!(chunk_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(chunk_text("", 3000), vec![String::new()]);
        // newline at the chunk start does not shrink the chunk
        assert_eq!(chunk_text("\nabcdef", 4), vec!["\nabc", "def"]);
    }

    #[test]
    fn test_chunk_counts_chars_not_bytes() {
        let chunks = chunk_text("ééééé", 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_wrap_keeps_every_char() {
        let paragraph = sample_text(60);
        let lines = wrap_lines(&paragraph);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| line_width_pt(l) <= 468.0));
        assert_eq!(lines.concat(), paragraph);
    }

    #[test]
    fn test_wrap_measures_glyph_widths() {
        // 80 capitals are far wider than 80 lowercase letters
        let capitals = "W".repeat(80);
        let lines = wrap_lines(&capitals);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| line_width_pt(l) <= 468.0));
        assert_eq!(lines.concat(), capitals);

        let narrow = "i".repeat(150);
        assert_eq!(wrap_lines(&narrow), vec![narrow]);
    }

    #[test]
    fn test_wrap_rate_table_stays_inside_margins() {
        let row = "HERITANCE KANDALAMA | SUPERIOR DOUBLE | HB | USD 190.00 | 01 NOV - 20 DEC 2025 | MIN 2 NIGHTS";
        let lines = wrap_lines(row);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| line_width_pt(l) <= 468.0));
        assert_eq!(lines.concat(), row);
    }

    #[test]
    fn test_page_count_and_round_trip() {
        let text = sample_text(1200);
        let len = text.chars().count();
        let bytes = render_pdf(&text, 3000).unwrap();

        let pages = page_texts(&bytes);
        let expected = (len + 2999) / 3000;
        assert!(pages.len() >= expected && pages.len() <= expected + 1);
        assert_eq!(pages.concat(), text);
    }

    #[test]
    fn test_overflowing_chunk_continues_on_next_page() {
        // 120 short lines in one chunk exceed a single page
        let text = (0..120).map(|i| format!("line {}\n", i)).collect::<String>();
        let bytes = render_pdf(&text, 100_000).unwrap();

        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.concat(), text.replace('\n', ""));
    }

    #[test]
    fn test_non_latin1_replaced() {
        assert_eq!(encode_line("Rs. 5 → ශ"), b"Rs. 5 ? ?".to_vec());
        assert_eq!(encode_line("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_generate_pdf_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("quote.pdf");

        generate_pdf("first quotation", &path, 3000).unwrap();
        generate_pdf("second quotation", &path, 3000).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(page_texts(&bytes), vec!["second quotation".to_string()]);

        // no temporary files left beside the output
        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("quote.pdf")]);
    }

    #[test]
    fn test_concurrent_exports_leave_a_whole_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quote.pdf");
        let long = sample_text(2000);
        let short = "Kandalama HB USD 190".to_string();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                let text = if i % 2 == 0 { long.clone() } else { short.clone() };
                std::thread::spawn(move || generate_pdf(&text, &path, 3000).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        let text = page_texts(&bytes).concat();
        assert!(text == short || text == long);
    }
}
