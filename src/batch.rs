use crate::{Error, Result};

/// Largest URL list a single IndexNow request accepts.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Splits `items` into contiguous chunks of at most `size`, preserving order.
pub fn batches<T>(items: &[T], size: usize) -> Result<Vec<&[T]>> {
  if size == 0 || size > MAX_BATCH_SIZE {
    return Err(Error::InvalidBatchSize {
      got: size,
      max: MAX_BATCH_SIZE,
    });
  }
  Ok(items.chunks(size).collect())
}

/// Number of batches `batches` yields for `len` items, i.e. ceil(len / size).
pub fn batch_count(len: usize, size: usize) -> usize {
  if size == 0 {
    0
  } else {
    len.div_ceil(size)
  }
}
