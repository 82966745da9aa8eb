use std::fmt;

/// # Opcodes
///
/// A fetched 16-bit big-endian instruction word. Behavior is cased on some
/// combination of:
/// - `(n, _, _, _)` the category (high nibble); applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that takes no operands (e.g. 00E0)
///
/// Nibbles not used to select the operation carry its operands:
/// - `(_, n, n, n)` a 12-bit address (`nnn`)
/// - `(_, _, n, n)` an immediate byte (`nn`)
/// - `(_, n, _, _)` the register Vx or the register range V0..Vx (`x`)
/// - `(_, _, n, _)` the register Vy (`y`)
/// - `(_, _, _, n)` a 4-bit immediate, e.g. a sprite height (`n`)
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    /// The raw instruction word.
    pub fn word(self) -> u16 {
        self.0
    }

    /// All four nibbles, most significant first; the dispatch key.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 & 0xF000) >> 12) as u8,
            self.x(),
            self.y(),
            self.n(),
        )
    }

    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__nn]`
    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode(word)
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({:#06X})", self.0)
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(Opcode::from(0xABCD).nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_x() {
        assert_eq!(Opcode::from(0xABCD).x(), 0xB);
    }

    #[test]
    fn test_y() {
        assert_eq!(Opcode::from(0xABCD).y(), 0xC);
    }

    #[test]
    fn test_n() {
        assert_eq!(Opcode::from(0xABCD).n(), 0xD);
    }

    #[test]
    fn test_nn() {
        assert_eq!(Opcode::from(0xABCD).nn(), 0xCD);
    }

    #[test]
    fn test_nnn() {
        assert_eq!(Opcode::from(0xABCD).nnn(), 0x0BCD);
    }
}
