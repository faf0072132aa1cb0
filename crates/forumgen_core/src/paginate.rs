use crate::error::ConvertError;

/// Separator between consecutive post blocks inside one page document.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Join consecutive rendered blocks into page documents of at most
/// `per_page` blocks each, in original order, covering every block once.
pub fn paginate(blocks: &[String], per_page: usize) -> Result<Vec<String>, ConvertError> {
    if per_page == 0 {
        return Err(ConvertError::InvalidPageSize(per_page));
    }
    Ok(blocks
        .chunks(per_page)
        .map(|chunk| chunk.join(BLOCK_SEPARATOR))
        .collect())
}
