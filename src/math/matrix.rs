use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{AddAssign, Index, IndexMut};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    /// He initialization: N(0, sqrt(2 / rows)), where `rows` is the fan-in.
    ///
    /// Suits ReLU-family layers, which zero roughly half of their inputs.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / rows.max(1) as f64).sqrt(), rng)
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)), where `rows` is the fan-in.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / rows.max(1) as f64).sqrt(), rng)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Outer product of two vectors: `column`ᵀ · `row`, shape (column.len(), row.len()).
    pub fn outer(column: &[f64], row: &[f64]) -> Matrix {
        let mut res = Matrix::zeros(column.len(), row.len());
        for (i, c) in column.iter().enumerate() {
            for (j, r) in row.iter().enumerate() {
                res[(i, j)] = c * r;
            }
        }
        res
    }

    /// Row-vector times matrix: `v` (1 × rows) · self → 1 × cols.
    pub fn vec_mul(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.rows, "Matrices are of incorrect sizes");
        let mut out = vec![0.0; self.cols];
        for (i, &x) in v.iter().enumerate() {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }

    /// Matrix times column-vector: self · `v` → length rows.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.cols, "Matrices are of incorrect sizes");
        self.data
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }
}

fn assert_same_shape(a: &Matrix, b: &Matrix) {
    if a.rows != b.rows || a.cols != b.cols {
        panic!("Matrices are of incorrect sizes")
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        assert_same_shape(self, rhs);
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn vector_products_follow_row_major_layout() {
        // [[1, 2, 3], [4, 5, 6]]
        let m = Matrix { rows: 2, cols: 3, data: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0] };
        assert_eq!(m.vec_mul(&[1.0, -1.0]), vec![-3.0, -3.0, -3.0]);
        assert_eq!(m.vec_mul(&[2.0, 1.0]), vec![6.0, 9.0, 12.0]);
        assert_eq!(m.mul_vec(&[1.0, 0.0, 1.0]), vec![4.0, 10.0]);
    }

    #[test]
    fn add_assign_and_scale_are_elementwise() {
        let mut a = Matrix { rows: 1, cols: 2, data: vec![1.0, 2.0] };
        a += &Matrix { rows: 1, cols: 2, data: vec![0.5, -1.0] };
        assert_eq!(a.data, vec![1.5, 1.0]);
        assert_eq!(a.scale(2.0).data, vec![3.0, 2.0]);
    }

    #[test]
    fn seeded_init_is_reproducible() {
        let a = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(9));
        let b = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert!(a.data.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn outer_product_shape() {
        let m = Matrix::outer(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
        assert_eq!((m.rows, m.cols), (2, 3));
        assert_eq!(m[(1, 2)], 10.0);
    }
}
