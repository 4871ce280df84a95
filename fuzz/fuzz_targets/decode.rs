#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtedit::{decode, decode_with_opts, encode, DecodeOpts};

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOpts::new().max_seq_len(100);
    if let Ok(tag) = decode_with_opts(data, opts) {
        // Anything decoded must encode, and be stable from then on. Compare
        // bytes since floats may be NaN.
        let bs = encode(&tag).unwrap();
        let again = encode(&decode(&bs).unwrap()).unwrap();
        assert_eq!(bs, again);
    }
});
