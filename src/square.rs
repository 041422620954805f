use crate::r#move::Offset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    pub fn new(x: u8, y: u8) -> Self {
        Square { x, y }
    }

    pub fn from_index(index: usize, size: u8) -> Self {
        let n = size as usize;
        Square {
            x: (index / n) as u8,
            y: (index % n) as u8,
        }
    }

    /// Row-major index: `x` selects the row, `y` the column.
    pub fn to_index(&self, size: u8) -> usize {
        self.x as usize * size as usize + self.y as usize
    }

    pub fn is_valid(&self, size: u8) -> bool {
        self.x < size && self.y < size
    }

    /// The square `offset` away, if it is still on a `size`×`size` board.
    #[inline]
    pub fn step(&self, offset: Offset, size: u8) -> Option<Square> {
        let x = self.x as i16 + offset.dx as i16;
        let y = self.y as i16 + offset.dy as i16;
        if (0..size as i16).contains(&x) && (0..size as i16).contains(&y) {
            Some(Square::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Displacement from `self` to `other`, if it fits an `Offset`.
    pub fn offset_to(&self, other: &Square) -> Option<Offset> {
        let dx = i8::try_from(other.x as i16 - self.x as i16).ok()?;
        let dy = i8::try_from(other.y as i16 - self.y as i16).ok()?;
        Some(Offset::new(dx, dy))
    }

    pub fn is_knight_move_to(&self, other: &Square) -> bool {
        self.offset_to(other).is_some_and(|o| o.is_knight_move())
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
