#![no_main]

use libfuzzer_sys::fuzz_target;

use dacviz_core::matrix::Matrix;
use dacviz_core::ops::{multiply_naive_recursive, multiply_strassen, reference_multiply};

/// Two square matrices of size 1, 2, 4 or 8 from raw bytes.
fn matrices(data: &[u8]) -> Option<(Matrix, Matrix)> {
    let (&head, rest) = data.split_first()?;
    let size = 1usize << (head % 4);
    let cells = size * size;
    if rest.len() < 2 * cells {
        return None;
    }
    let entry = |b: &u8| i64::from(*b as i8);
    let rows = |bytes: &[u8]| -> Vec<Vec<i64>> {
        bytes.chunks(size).map(|row| row.iter().map(entry).collect()).collect()
    };
    let a = Matrix::from_rows(rows(&rest[..cells])).ok()?;
    let b = Matrix::from_rows(rows(&rest[cells..2 * cells])).ok()?;
    Some((a, b))
}

fuzz_target!(|data: &[u8]| {
    let Some((a, b)) = matrices(data) else {
        return;
    };
    let expected = reference_multiply(&a, &b).unwrap();
    let naive = multiply_naive_recursive(&a, &b).unwrap();
    let strassen = multiply_strassen(&a, &b).unwrap();
    assert_eq!(naive.value, expected, "naive != reference for {a:?} × {b:?}");
    assert_eq!(strassen.value, expected, "strassen != reference for {a:?} × {b:?}");
});
