use eyre::{ensure, Result};

pub fn id(id: &str) -> Result<()> {
    ensure!(!id.is_empty(), "FASTA ID cannot be empty");
    ensure!(
        !id.contains(char::is_whitespace),
        "Whitespace characters are not allowed in the FASTA ID: {id:?}"
    );
    Ok(())
}

/// Sequences may be empty, but can't contain whitespace or control characters. Whether the symbols
/// are valid nucleotides is decided by the encoder.
pub fn seq(seq: &[u8]) -> Result<()> {
    for (i, &x) in seq.iter().enumerate() {
        ensure!(
            x.is_ascii_graphic(),
            "Unexpected character at index {i} = {:?}",
            char::from(x)
        );
    }
    Ok(())
}
