//! A square bitboard whose side length is chosen at runtime.
//!
//! Cells are packed row-major into a vector of unsigned blocks `T`, so a
//! 15×15 board (225 cells) fits in four `u64`s. The block type is generic so
//! callers can trade memory for fewer blocks. Boards only allocate once, at
//! construction.

use alloc::vec::Vec;
use core::ops::{BitAnd, BitOr, Not};
use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

use crate::common::Coord;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitBoardError {
    /// A board must have at least one row and one column.
    EmptyBoard,
    /// Row or column index is out of bounds [0..N).
    IndexOutOfBounds { row: usize, col: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::EmptyBoard => write!(f, "EmptyBoard: dimension must be positive"),
            BitBoardError::IndexOutOfBounds { row, col } => {
                write!(f, "IndexOutOfBounds: row={}, col={}", row, col)
            }
        }
    }
}

/// An N×N bitboard stored in blocks of the unsigned integer `T`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitBoard<T = u64>
where
    T: PrimInt + Unsigned + Zero,
{
    dim: usize,
    blocks: Vec<T>,
}

impl<T> BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    const BLOCK_BITS: usize = mem::size_of::<T>() * 8;

    /// Create an empty `dim`×`dim` board. A zero dimension yields a board with
    /// no cells; use [`BitBoard::try_new`] to reject it.
    pub fn new(dim: usize) -> Self {
        let cells = dim * dim;
        let len = cells.div_ceil(Self::BLOCK_BITS);
        let mut blocks = Vec::with_capacity(len);
        blocks.resize(len, T::zero());
        BitBoard { dim, blocks }
    }

    /// Fallible constructor: returns `Err(EmptyBoard)` for a zero dimension.
    pub fn try_new(dim: usize) -> Result<Self, BitBoardError> {
        if dim == 0 {
            Err(BitBoardError::EmptyBoard)
        } else {
            Ok(Self::new(dim))
        }
    }

    /// Side length of the board.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_zero())
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let (block, bit) = self.locate(row, col)?;
        Ok(((self.blocks[block] >> bit) & T::one()) != T::zero())
    }

    /// Sets the bit at (row, col) to 1.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let (block, bit) = self.locate(row, col)?;
        self.blocks[block] = self.blocks[block] | (T::one() << bit);
        Ok(())
    }

    /// Clears the bit at (row, col) to 0.
    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let (block, bit) = self.locate(row, col)?;
        self.blocks[block] = self.blocks[block] & !(T::one() << bit);
        Ok(())
    }

    /// Toggles the bit at (row, col).
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let (block, bit) = self.locate(row, col)?;
        self.blocks[block] = self.blocks[block] ^ (T::one() << bit);
        Ok(())
    }

    /// Whether `coord` is set. Out-of-bounds coordinates read as unset.
    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord.row, coord.col).unwrap_or(false)
    }

    /// Sets the bit for `coord`.
    #[inline]
    pub fn insert(&mut self, coord: Coord) -> Result<(), BitBoardError> {
        self.set(coord.row, coord.col)
    }

    /// Clears the bit for `coord`.
    #[inline]
    pub fn remove(&mut self, coord: Coord) -> Result<(), BitBoardError> {
        self.clear(coord.row, coord.col)
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        for b in self.blocks.iter_mut() {
            *b = T::zero();
        }
    }

    /// True if any cell is set on both boards.
    pub fn intersects(&self, other: &Self) -> bool {
        self.blocks
            .iter()
            .zip(other.blocks.iter())
            .any(|(a, b)| !(*a & *b).is_zero())
    }

    /// The set cells grown by one step in all eight directions (Chebyshev
    /// distance 1), clipped to the board.
    pub fn dilate(&self) -> Self {
        let mut out = Self::new(self.dim);
        for cell in self.iter_set_bits() {
            for n in cell.surrounding(self.dim) {
                let _ = out.insert(n);
            }
            let _ = out.insert(cell);
        }
        out
    }

    #[inline]
    fn locate(&self, row: usize, col: usize) -> Result<(usize, usize), BitBoardError> {
        if row >= self.dim || col >= self.dim {
            return Err(BitBoardError::IndexOutOfBounds { row, col });
        }
        let idx = row * self.dim + col;
        Ok((idx / Self::BLOCK_BITS, idx % Self::BLOCK_BITS))
    }

    /// Creates a bitboard from an iterator over coordinates.
    pub fn from_iter<I>(dim: usize, iter: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut board = Self::new(dim);
        for c in iter {
            board.insert(c)?;
        }
        Ok(board)
    }

    /// Iterator over the set cells in row-major order.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits {
            board: self,
            idx: 0,
        }
    }

    /// Iterator over the unset cells in row-major order.
    pub fn iter_unset_bits(&self) -> impl Iterator<Item = Coord> + '_ {
        let dim = self.dim;
        (0..dim * dim)
            .map(move |i| Coord::new(i / dim, i % dim))
            .filter(move |c| !self.contains(*c))
    }

    fn zip_with(&self, rhs: &Self, op: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.dim, rhs.dim, "bitboard dimensions differ");
        let blocks = self
            .blocks
            .iter()
            .zip(rhs.blocks.iter())
            .map(|(a, b)| op(*a, *b))
            .collect();
        BitBoard {
            dim: self.dim,
            blocks,
        }
    }

    fn trim(mut self) -> Self {
        // Bits past N*N in the last block must stay zero.
        let cells = self.dim * self.dim;
        let used = cells % Self::BLOCK_BITS;
        if used != 0 {
            if let Some(last) = self.blocks.last_mut() {
                *last = *last & ((T::one() << used) - T::one());
            }
        }
        self
    }
}

impl<T> fmt::Debug for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}x{}>:", self.dim, self.dim)?;
        fmt::Display::fmt(self, f)?;
        writeln!(f)
    }
}

impl<T> fmt::Display for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.dim {
            for c in 0..self.dim {
                let bit = if self.get(r, c).unwrap_or(false) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            if r + 1 < self.dim {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone)]
pub struct SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T>,
    idx: usize,
}

impl<'a, T> Iterator for SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = Coord;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let dim = self.board.dim;
        while self.idx < dim * dim {
            let idx = self.idx;
            self.idx += 1;
            let block = self.board.blocks[idx / BitBoard::<T>::BLOCK_BITS];
            if ((block >> (idx % BitBoard::<T>::BLOCK_BITS)) & T::one()) != T::zero() {
                return Some(Coord::new(idx / dim, idx % dim));
            }
        }
        None
    }
}

/// Bitwise AND for combining two bitboards.
impl<T> BitAnd for &BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitand(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a & b)
    }
}

/// Bitwise OR for combining two bitboards.
impl<T> BitOr for &BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitor(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a | b)
    }
}

/// Bitwise NOT for inverting a bitboard (within board bounds).
impl<T> Not for &BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn not(self) -> BitBoard<T> {
        let blocks = self.blocks.iter().map(|b| !*b).collect();
        BitBoard {
            dim: self.dim,
            blocks,
        }
        .trim()
    }
}
