use std::{
    fmt::{self, Display},
    ops::{AddAssign, Index, IndexMut, MulAssign},
};

// Table layout:
// [row, row, ..]
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T>
where
    T: Copy,
{
    data: Vec<T>,
    side_length: usize,
}

impl<T> SquareMatrix<T>
where
    T: Copy,
{
    pub fn new(side_length: usize, init_value: T) -> SquareMatrix<T> {
        let data = vec![init_value; side_length * side_length];

        SquareMatrix { data, side_length }
    }

    pub fn side_length(&self) -> usize {
        self.side_length
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        &mut self.data[(self.side_length * y)..(self.side_length * (y + 1))]
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[(self.side_length * y)..(self.side_length * (y + 1))]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on 0.
        self.data.chunks_exact(self.side_length.max(1))
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// Sets both `(x, y)` and `(y, x)`.
    pub fn set_symmetric(&mut self, x: usize, y: usize, value: T) {
        self[(x, y)] = value;
        self[(y, x)] = value;
    }
}

impl<T> SquareMatrix<T>
where
    T: Copy + PartialEq,
{
    /// Returns the first `(x, y)` with `self[(x, y)] != self[(y, x)]`.
    pub fn first_asymmetry(&self) -> Option<(usize, usize)> {
        for y in 0..self.side_length {
            for x in 0..y {
                if self[(x, y)] != self[(y, x)] {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn is_symmetric(&self) -> bool {
        self.first_asymmetry().is_none()
    }
}

impl<T> SquareMatrix<T>
where
    T: Copy + MulAssign,
{
    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: T) {
        for elem in self.data.iter_mut() {
            *elem *= factor;
        }
    }
}

impl<T> SquareMatrix<T>
where
    T: Copy + AddAssign,
{
    /// Elementwise `self += other`. Both matrices must have the same side length.
    pub fn add_matrix(&mut self, other: &SquareMatrix<T>) {
        assert_eq!(self.side_length, other.side_length);

        for (elem, &delta) in self.data.iter_mut().zip(other.data.iter()) {
            *elem += delta;
        }
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T>
where
    T: Copy,
{
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.data[self.side_length * y + x]
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T>
where
    T: Copy,
{
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.data[self.side_length * y + x]
    }
}

/// Trait used for matrix display. Although not stated
/// here, types implementing this should also support formatting
/// `{.<number>}`.
pub trait FloatDisplay: Copy + Display {}

impl FloatDisplay for f32 {}
impl FloatDisplay for f64 {}

impl<T: FloatDisplay> Display for SquareMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- SquareMatrix {0}x{0} ---", self.side_length)?;
        for row in self.rows() {
            for elem in row {
                write!(f, "{elem:.4}\t")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
