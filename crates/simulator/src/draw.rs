//! Raster circuit diagrams.
//!
//! Qubit 0 is the top wire. Instructions are packed left into columns: an
//! instruction lands in the first column free on every wire it touches.

use crate::error::Result;
use crate::font;
use quantum::circuit::{Circuit, Instruction};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const GREY: Rgb = [128, 128, 128];
const ROTATION: Rgb = [187, 139, 255];
const CX_BLUE: Rgb = [0, 45, 155];
const MEASURE: Rgb = [190, 190, 190];

const LEFT: usize = 70;
const RIGHT: usize = 30;
const TOP: usize = 50;
const BOTTOM: usize = 40;
const WIRE_GAP: usize = 70;
const COL_W: usize = 64;
const BOX: usize = 48;

/// RGB8 pixel buffer.
pub struct Canvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&background);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    fn set(&mut self, x: i64, y: i64, c: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&c);
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, c: Rgb) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, c);
            }
        }
    }

    fn outline_rect(&mut self, x: i64, y: i64, w: i64, h: i64, c: Rgb) {
        self.hline(x, x + w - 1, y, c);
        self.hline(x, x + w - 1, y + h - 1, c);
        self.vline(x, y, y + h - 1, c);
        self.vline(x + w - 1, y, y + h - 1, c);
    }

    fn hline(&mut self, x0: i64, x1: i64, y: i64, c: Rgb) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set(x, y, c);
        }
    }

    fn vline(&mut self, x: i64, y0: i64, y1: i64, c: Rgb) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, c);
        }
    }

    fn dashed_vline(&mut self, x: i64, y0: i64, y1: i64, dash: i64, c: Rgb) {
        for y in y0.min(y1)..=y0.max(y1) {
            if (y - y0) / dash % 2 == 0 {
                self.set(x, y, c);
            }
        }
    }

    fn disc(&mut self, cx: i64, cy: i64, r: i64, c: Rgb) {
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y <= r * r {
                    self.set(cx + x, cy + y, c);
                }
            }
        }
    }

    fn text(&mut self, x: i64, y: i64, s: &str, scale: i64, c: Rgb) {
        let mut pen = x;
        for ch in s.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::WIDTH {
                        if (bits >> (font::WIDTH - 1 - col)) & 1 == 1 {
                            self.fill_rect(
                                pen + col as i64 * scale,
                                y + row as i64 * scale,
                                scale,
                                scale,
                                c,
                            );
                        }
                    }
                }
            }
            pen += text_advance(scale);
        }
    }

    fn text_centered(&mut self, cx: i64, cy: i64, s: &str, scale: i64, c: Rgb) {
        let w = text_width(s, scale);
        let h = font::HEIGHT as i64 * scale;
        self.text(cx - w / 2, cy - h / 2, s, scale, c);
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(
            BufWriter::new(file),
            self.width as u32,
            self.height as u32,
        );
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        writer.finish()?;
        Ok(())
    }
}

fn text_advance(scale: i64) -> i64 {
    (font::WIDTH as i64 + 1) * scale
}

fn text_width(s: &str, scale: i64) -> i64 {
    let n = s.chars().count() as i64;
    if n == 0 {
        return 0;
    }
    n * text_advance(scale) - scale
}

/// Wires an instruction blocks while it is drawn.
fn span(inst: &Instruction, num_qubits: usize) -> (usize, usize) {
    match *inst {
        Instruction::Ry { qubit, .. } | Instruction::Rz { qubit, .. } => (qubit, qubit),
        Instruction::Cx { control, target } => (control.min(target), control.max(target)),
        Instruction::Barrier => (0, num_qubits.saturating_sub(1)),
        // The line down to the classical wire crosses every lower qubit.
        Instruction::Measure { qubit, .. } => (qubit, num_qubits.saturating_sub(1)),
    }
}

/// Column of every instruction, and the total column count.
pub(crate) fn layout(circuit: &Circuit) -> (Vec<usize>, usize) {
    let n = circuit.num_qubits();
    let mut next = vec![0usize; n.max(1)];
    let mut columns = Vec::with_capacity(circuit.instructions().len());

    for inst in circuit.instructions() {
        let (lo, hi) = span(inst, n);
        let col = next[lo..=hi].iter().copied().max().unwrap_or(0);
        for slot in &mut next[lo..=hi] {
            *slot = col + 1;
        }
        columns.push(col);
    }

    let total = next.iter().copied().max().unwrap_or(0);
    (columns, total)
}

fn wire_y(qubit: usize) -> i64 {
    (TOP + qubit * WIRE_GAP) as i64
}

fn column_x(col: usize) -> i64 {
    (LEFT + col * COL_W + COL_W / 2) as i64
}

/// Rasterize `circuit` onto a fresh canvas.
pub fn render_circuit(circuit: &Circuit) -> Canvas {
    let n = circuit.num_qubits();
    let has_clbits = circuit.num_clbits() > 0;
    let (columns, total) = layout(circuit);

    let rows = n + usize::from(has_clbits);
    let width = LEFT + total.max(1) * COL_W + RIGHT;
    let height = TOP + rows.saturating_sub(1) * WIRE_GAP + BOTTOM;
    let mut canvas = Canvas::new(width, height, WHITE);
    let x_end = (width - RIGHT / 2) as i64;

    for q in 0..n {
        let y = wire_y(q);
        canvas.text_centered(LEFT as i64 / 2, y, &format!("q{}", q), 2, BLACK);
        canvas.hline(LEFT as i64 - 8, x_end, y, BLACK);
    }

    let clbit_y = wire_y(n);
    if has_clbits {
        canvas.text_centered(LEFT as i64 / 2 - 8, clbit_y, "c", 2, BLACK);
        canvas.hline(LEFT as i64 - 8, x_end, clbit_y - 2, BLACK);
        canvas.hline(LEFT as i64 - 8, x_end, clbit_y + 2, BLACK);
        canvas.text(LEFT as i64 - 12, clbit_y - 18, "/", 1, BLACK);
        canvas.text(LEFT as i64 - 4, clbit_y - 20, &circuit.num_clbits().to_string(), 1, BLACK);
    }

    let half = BOX as i64 / 2;
    for (inst, &col) in circuit.instructions().iter().zip(&columns) {
        let x = column_x(col);
        match *inst {
            Instruction::Ry { qubit, param } | Instruction::Rz { qubit, param } => {
                let label = if matches!(inst, Instruction::Ry { .. }) { "RY" } else { "RZ" };
                let y = wire_y(qubit);
                canvas.fill_rect(x - half, y - half, BOX as i64, BOX as i64, ROTATION);
                canvas.text_centered(x, y - 8, label, 2, BLACK);
                canvas.text_centered(x, y + 13, &format!("θ[{}]", param), 1, BLACK);
            }
            Instruction::Cx { control, target } => {
                let (yc, yt) = (wire_y(control), wire_y(target));
                let r = 12;
                let reach = if yt > yc { yt + r } else { yt - r };
                for dx in -1..=1 {
                    canvas.vline(x + dx, yc, reach, CX_BLUE);
                }
                canvas.disc(x, yc, 6, CX_BLUE);
                canvas.disc(x, yt, r, CX_BLUE);
                for dx in -1..=1 {
                    canvas.vline(x + dx, yt - r + 3, yt + r - 3, WHITE);
                    canvas.hline(x - r + 3, x + r - 3, yt + dx, WHITE);
                }
            }
            Instruction::Barrier => {
                let y0 = wire_y(0) - half;
                let y1 = wire_y(n.saturating_sub(1)) + half;
                canvas.fill_rect(x - 6, y0, 13, y1 - y0, [230, 230, 230]);
                for dx in -1..=1 {
                    canvas.dashed_vline(x + dx, y0, y1, 6, GREY);
                }
            }
            Instruction::Measure { qubit, clbit } => {
                let y = wire_y(qubit);
                for dx in [-3, 3] {
                    canvas.vline(x + dx, y + half, clbit_y - 8, GREY);
                }
                for k in 0..8 {
                    canvas.hline(x - 8 + k, x + 8 - k, clbit_y - 8 + k, GREY);
                }
                canvas.fill_rect(x - half, y - half, BOX as i64, BOX as i64, MEASURE);
                canvas.outline_rect(x - half, y - half, BOX as i64, BOX as i64, BLACK);
                canvas.text_centered(x, y, "M", 3, BLACK);
                canvas.text_centered(x + 14, clbit_y + 14, &clbit.to_string(), 1, BLACK);
            }
        }
    }

    canvas
}

/// Draw `circuit` and save it as an 8-bit RGB PNG at `path`.
pub fn render_circuit_png(circuit: &Circuit, path: &Path) -> Result<()> {
    let canvas = render_circuit(circuit);
    canvas.write_png(path)?;
    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        "wrote circuit diagram"
    );
    Ok(())
}
