use std::io;

/// CHIP-8 screen width in pixels
pub const WIDTH: usize = 64;
/// CHIP-8 screen height in pixels
pub const HEIGHT: usize = 32;
/// packed size of a frame, one bit per pixel
pub const FRAME_BYTES: usize = WIDTH * HEIGHT / 8;

/// Display is used by the host to draw the machine's framebuffer. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw a packed frame: `FRAME_BYTES` bytes, row-major, MSB is the
    /// leftmost pixel of each byte
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error>;
}

/// The 64x32 monochrome screen. Kept packed, in the layout the COSMAC VIP
/// used for its display page, so a snapshot is just the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; FRAME_BYTES],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            bytes: [0; FRAME_BYTES],
        }
    }

    /// every pixel off
    pub fn clear(&mut self) {
        self.bytes = [0; FRAME_BYTES];
    }

    // (byte index, bit mask) for a pixel; coordinates wrap on both axes
    fn locate(x: usize, y: usize) -> (usize, u8) {
        let offset = (y % HEIGHT) * WIDTH + (x % WIDTH);
        (offset / 8, 0x80 >> (offset % 8))
    }

    /// is the pixel at (x, y) lit; coordinates wrap
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Framebuffer::locate(x, y);
        self.bytes[byte] & mask != 0
    }

    /// XOR an 8-pixel-wide sprite, one byte per row, onto the screen with its
    /// top-left corner at (x, y). Pixels falling off an edge wrap round to
    /// the other side. Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, &row) in rows.iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80u8 >> dx) == 0 {
                    continue;
                }
                let (byte, mask) = Framebuffer::locate(x as usize + dx, y as usize + dy);
                collision |= self.bytes[byte] & mask != 0;
                self.bytes[byte] ^= mask;
            }
        }
        collision
    }

    /// the packed frame handed to a `Display`
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// (x, y) of every lit pixel, row by row
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..WIDTH * HEIGHT)
            .filter(move |&p| self.bytes[p / 8] & (0x80 >> (p % 8)) != 0)
            .map(|p| (p % WIDTH, p / WIDTH))
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}

// one row of '#' and '.' per line, handy when a test fails
impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..HEIGHT {
            let row: String = (0..WIDTH)
                .map(|x| if self.pixel(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// useful for testing and headless hosts; remembers the last frame
pub struct DummyDisplay {
    pub last_frame: Vec<u8>,
    pub frames_drawn: usize,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay {
            last_frame: Vec::new(),
            frames_drawn: 0,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        DummyDisplay::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(data);
        self.frames_drawn += 1;
        Ok(())
    }
}
