// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Emit stamped page descriptors as a landscape A4 PDF byte buffer
// role: rendering/emit
// inputs: &[PageContent] from crate::layout (already footer-stamped), document title
// outputs: PDF bytes
// side_effects: None; writing the file is the orchestrator's job
// invariants:
// - One PDF page per descriptor, in order
// - Emit draws exactly what layout positioned; no layout decisions happen here
// errors: printpdf failures surface as anyhow errors with an operation tag
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Result, anyhow};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, Point, Rgb};
use std::io::{BufWriter, Cursor};

use crate::layout::{FontFace, Ink, PAGE_HEIGHT, PAGE_WIDTH, PageContent};

struct Faces {
  regular: IndirectFontRef,
  bold: IndirectFontRef,
  mono: IndirectFontRef,
}

impl Faces {
  fn pick(&self, face: FontFace) -> &IndirectFontRef {
    match face {
      FontFace::Regular => &self.regular,
      FontFace::Bold => &self.bold,
      FontFace::Mono => &self.mono,
    }
  }
}

fn ink_color(ink: Ink) -> Color {
  match ink {
    Ink::Heading => Color::Rgb(Rgb::new(0.10, 0.10, 0.10, None)),
    Ink::Body => Color::Rgb(Rgb::new(0.20, 0.20, 0.20, None)),
    Ink::Muted => Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)),
  }
}

/// Serialize stamped pages into PDF bytes.
pub fn render(pages: &[PageContent], title: &str) -> Result<Vec<u8>> {
  let (doc, first_page, first_layer) =
    PdfDocument::new(title, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");

  let faces = Faces {
    regular: doc
      .add_builtin_font(BuiltinFont::Helvetica)
      .map_err(|e| anyhow!("loading builtin font: {}", e))?,
    bold: doc
      .add_builtin_font(BuiltinFont::HelveticaBold)
      .map_err(|e| anyhow!("loading builtin font: {}", e))?,
    mono: doc
      .add_builtin_font(BuiltinFont::Courier)
      .map_err(|e| anyhow!("loading builtin font: {}", e))?,
  };

  for (i, page) in pages.iter().enumerate() {
    let layer = if i == 0 {
      doc.get_page(first_page).get_layer(first_layer)
    } else {
      let (p, l) = doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
      doc.get_page(p).get_layer(l)
    };

    layer.set_outline_thickness(0.4);
    for rule in &page.rules {
      layer.add_line(Line {
        points: vec![
          (Point::new(Mm(rule.x1 as f32), Mm(rule.y as f32)), false),
          (Point::new(Mm(rule.x2 as f32), Mm(rule.y as f32)), false),
        ],
        is_closed: false,
      });
    }

    for op in &page.text {
      layer.set_fill_color(ink_color(op.ink));
      layer.use_text(op.text.clone(), op.size as f32, Mm(op.x as f32), Mm(op.y as f32), faces.pick(op.face));
    }
  }

  let mut buf = BufWriter::new(Cursor::new(Vec::new()));
  doc.save(&mut buf).map_err(|e| anyhow!("serializing pdf: {}", e))?;

  let cursor = buf.into_inner().map_err(|e| anyhow!("flushing pdf buffer: {}", e))?;
  Ok(cursor.into_inner())
}
