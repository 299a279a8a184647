/// Magic header of a serialized memory image.
pub const MAGIC: [u8; 4] = [0x03, 0x4E, 0x44, 0x52];

/// Addressable words. A word is two bytes; the odd byte is reserved and
/// always zero.
pub const WORDS: usize = 256;

/// Raw memory image size in bytes.
pub const IMAGE_BYTES: usize = 2 * WORDS;

pub const HEADER_BYTES: usize = MAGIC.len();

/// Exact length of the on-disk artifact: header + image.
pub const FILE_BYTES: usize = HEADER_BYTES + IMAGE_BYTES;

/// Byte offset of word `w` within the raw image.
pub fn word_offset(w: u8) -> usize {
    w as usize * 2
}

/// Byte offset of word `w` within the serialized file, past the header.
/// The emulator maps every operand through this before dereferencing.
pub fn file_offset(w: u8) -> usize {
    HEADER_BYTES + word_offset(w)
}

/// The 512-byte word-addressed memory image produced by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemImage([u8; IMAGE_BYTES]);

impl MemImage {
    pub fn new() -> Self {
        MemImage([0; IMAGE_BYTES])
    }

    pub fn set_word(&mut self, w: u8, val: u8) {
        let off = word_offset(w);
        self.0[off] = val;
        self.0[off + 1] = 0x00;
    }

    pub fn get_word(&self, w: u8) -> u8 {
        self.0[word_offset(w)]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Serialize to the on-disk format: magic header, then the image,
    /// exactly [`FILE_BYTES`] long.
    pub fn serialize(&self) -> [u8; FILE_BYTES] {
        let mut out = [0u8; FILE_BYTES];
        out[..HEADER_BYTES].copy_from_slice(&MAGIC);
        out[HEADER_BYTES..].copy_from_slice(&self.0);
        out
    }
}

impl Default for MemImage {
    fn default() -> Self {
        Self::new()
    }
}
