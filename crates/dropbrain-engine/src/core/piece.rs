use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A Tetris piece (tetromino) in one specific rotation state.
///
/// A piece carries no position: the caller tracks the `(x, y)` of its
/// lower-left corner separately. Pieces are immutable `Copy` values, and two
/// pieces are equal iff they have the same kind and the same rotation state.
///
/// # Rotation Ring
///
/// Each kind owns a ring of distinct orientations. Rotating past the last
/// orientation returns to the first one:
///
/// - `O`: 1 state
/// - `I`, `S`, `Z`: 2 states
/// - `J`, `L`, `T`: 4 states
///
/// # Example
///
/// ```
/// use dropbrain_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::I);
/// assert_eq!((piece.width(), piece.height()), (1, 4));
///
/// let rotated = piece.next_rotation();
/// assert_eq!((rotated.width(), rotated.height()), (4, 1));
/// assert_eq!(rotated.next_rotation(), piece);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#rotation" (e.g., "S#1")
        write!(f, "{}#{}", self.kind.as_char(), self.rotation)
    }
}

/// Error returned when parsing a [`Piece`] from its `kind#rotation` notation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("expected format 'kind' or 'kind#rotation', got '{input}'")]
    InvalidFormat { input: String },
    #[display("invalid piece kind: '{input}'")]
    InvalidKind { input: String },
    #[display("rotation {rotation} is out of range for piece {kind} (ring length {ring_len})")]
    InvalidRotation {
        kind: PieceKind,
        rotation: u8,
        ring_len: usize,
    },
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_str, rotation_str) = match s.split_once('#') {
            Some((kind, rotation)) => (kind, Some(rotation)),
            None => (s, None),
        };

        let mut chars = kind_str.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ParsePieceError::InvalidKind {
            input: kind_str.to_owned(),
        })?;

        let rotation = match rotation_str {
            Some(r) => r.parse::<u8>().map_err(|_| ParsePieceError::InvalidFormat {
                input: s.to_owned(),
            })?,
            None => 0,
        };

        Piece::with_rotation(kind, rotation).ok_or(ParsePieceError::InvalidRotation {
            kind,
            rotation,
            ring_len: kind.ring_len(),
        })
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Piece {
    /// Creates a piece of the given kind in its initial rotation state.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self { kind, rotation: 0 }
    }

    /// Creates a piece in the given rotation state, or `None` if the kind has
    /// fewer rotation states.
    #[must_use]
    pub fn with_rotation(kind: PieceKind, rotation: u8) -> Option<Self> {
        (usize::from(rotation) < kind.ring_len()).then_some(Self { kind, rotation })
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Returns the next rotation state (90° counterclockwise), wrapping around
    /// to the first state after the last one.
    #[must_use]
    pub fn next_rotation(&self) -> Self {
        let ring = &PIECE_RINGS[self.kind as usize];
        Self {
            kind: self.kind,
            rotation: (self.rotation + 1) % ring.len,
        }
    }

    /// Walks the rotation ring once, starting from this piece.
    ///
    /// The iterator stops as soon as the next rotation equals the starting
    /// piece, so each distinct orientation is yielded exactly once.
    #[must_use]
    pub fn rotations(self) -> RotationRing {
        RotationRing {
            start: self,
            next: Some(self),
        }
    }

    /// Returns the occupied cells relative to the lower-left corner of the
    /// piece's bounding box.
    ///
    /// Cells are sorted bottom row first, left to right within a row.
    pub fn body(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        PIECE_RINGS[self.kind as usize].bodies[usize::from(self.rotation)]
            .into_iter()
            .map(|(x, y)| (usize::from(x), usize::from(y)))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.body().map(|(x, _)| x + 1).max().unwrap_or(0)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.body().map(|(_, y)| y + 1).max().unwrap_or(0)
    }

    /// Returns the lowest occupied row of each column of the piece.
    ///
    /// The skirt has one entry per column (`width()` entries) and is what
    /// makes a piece rest on the board surface when dropped.
    #[must_use]
    pub fn skirt(&self) -> ArrayVec<usize, 4> {
        let mut skirt: ArrayVec<usize, 4> = (0..self.width()).map(|_| usize::MAX).collect();
        for (x, y) in self.body() {
            skirt[x] = skirt[x].min(y);
        }
        skirt
    }
}

/// Iterator over the distinct rotation states of a piece.
///
/// Created by [`Piece::rotations`]. Follows [`Piece::next_rotation`] until the
/// starting piece comes around again.
#[derive(Debug, Clone)]
pub struct RotationRing {
    start: Piece,
    next: Option<Piece>,
}

impl Iterator for RotationRing {
    type Item = Piece;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let following = current.next_rotation();
        self.next = (following != self.start).then_some(following);
        Some(current)
    }
}

/// Enum representing the type of piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Deserialize, Serialize,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece (spawns vertical).
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece (spawns flat side down).
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the number of distinct rotation states of this kind.
    #[must_use]
    pub fn ring_len(self) -> usize {
        usize::from(PIECE_RINGS[self as usize].len)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropbrain_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropbrain_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Occupied cells of one orientation as `(x, y)` offsets, `y` growing upward.
type PieceBody = [(u8, u8); 4];

#[derive(Debug)]
struct RotationRingTable {
    bodies: [PieceBody; 4],
    len: u8,
}

const fn cell_before(a: (u8, u8), b: (u8, u8)) -> bool {
    a.1 < b.1 || (a.1 == b.1 && a.0 < b.0)
}

/// Sorts cells bottom row first, left to right, so equal shapes compare equal.
const fn sorted_body(mut body: PieceBody) -> PieceBody {
    let mut i = 1;
    while i < body.len() {
        let mut j = i;
        while j > 0 && cell_before(body[j], body[j - 1]) {
            let tmp = body[j];
            body[j] = body[j - 1];
            body[j - 1] = tmp;
            j -= 1;
        }
        i += 1;
    }
    body
}

const fn bodies_equal(a: &PieceBody, b: &PieceBody) -> bool {
    let mut i = 0;
    while i < a.len() {
        if a[i].0 != b[i].0 || a[i].1 != b[i].1 {
            return false;
        }
        i += 1;
    }
    true
}

/// Rotates a body 90° counterclockwise, keeping it anchored at the origin.
const fn rotated_left(body: &PieceBody) -> PieceBody {
    let mut height = 0;
    let mut i = 0;
    while i < body.len() {
        if body[i].1 + 1 > height {
            height = body[i].1 + 1;
        }
        i += 1;
    }

    let mut rotated = [(0, 0); 4];
    let mut i = 0;
    while i < body.len() {
        let (x, y) = body[i];
        rotated[i] = (height - 1 - y, x);
        i += 1;
    }
    sorted_body(rotated)
}

/// Collects the distinct orientations reachable from `base` by repeated
/// counterclockwise rotation.
const fn rotation_ring(base: PieceBody) -> RotationRingTable {
    let base = sorted_body(base);
    let mut bodies = [base; 4];
    let mut len = 1;
    let mut current = rotated_left(&base);
    while len < 4 && !bodies_equal(&current, &base) {
        bodies[len as usize] = current;
        len += 1;
        current = rotated_left(&current);
    }
    RotationRingTable { bodies, len }
}

static PIECE_RINGS: [RotationRingTable; PieceKind::LEN] = [
    // I-piece
    rotation_ring([(0, 0), (0, 1), (0, 2), (0, 3)]),
    // O-piece
    rotation_ring([(0, 0), (0, 1), (1, 0), (1, 1)]),
    // S-piece
    rotation_ring([(0, 0), (1, 0), (1, 1), (2, 1)]),
    // Z-piece
    rotation_ring([(0, 1), (1, 1), (1, 0), (2, 0)]),
    // J-piece
    rotation_ring([(0, 0), (1, 0), (1, 1), (1, 2)]),
    // L-piece
    rotation_ring([(0, 0), (0, 1), (0, 2), (1, 0)]),
    // T-piece
    rotation_ring([(0, 0), (1, 0), (1, 1), (2, 0)]),
];
