#![allow(dead_code)]

use listfile_rs::{File, parse, tokenize};

/// Parse `input` and assert the element raw slices tile it exactly.
pub fn roundtrip(input: &str) -> File<'_> {
    let file = parse(input).expect("parse failed");
    let output = file.reconstruct();
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
    file
}

/// Tokenize `input` and assert the token raw slices tile it exactly,
/// with contiguous monotonically increasing offsets.
pub fn assert_token_tiling(input: &str) {
    let tokens = tokenize(input).expect("tokenize failed");
    let mut offset = 0;
    for token in &tokens {
        assert_eq!(
            token.offset, offset,
            "token {token} out of place in {input:?}"
        );
        offset += token.raw.len();
    }
    assert_eq!(offset, input.len(), "tokens do not cover {input:?}");
}
