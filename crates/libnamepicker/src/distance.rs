/// Levenshtein distance between two strings, counted in chars.
///
/// Builds the full `(len(b) + 1) × (len(a) + 1)` table, where `matrix[i][j]`
/// holds the distance between the first `j` chars of `a` and the first `i`
/// chars of `b`. Comparison is case-sensitive, callers are expected to fold
/// case beforehand.
pub fn levenshtein(a: &str, b: &str) -> usize {
  let a = a.chars().collect::<Vec<_>>();
  let b = b.chars().collect::<Vec<_>>();

  let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];

  for (i, row) in matrix.iter_mut().enumerate() {
    row[0] = i;
  }

  for (j, cell) in matrix[0].iter_mut().enumerate() {
    *cell = j;
  }

  for i in 1..=b.len() {
    for j in 1..=a.len() {
      matrix[i][j] = if b[i - 1] == a[j - 1] {
        matrix[i - 1][j - 1]
      } else {
        1 + matrix[i - 1][j - 1].min(matrix[i][j - 1]).min(matrix[i - 1][j])
      };
    }
  }

  matrix[b.len()][a.len()]
}
