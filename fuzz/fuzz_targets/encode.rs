#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtedit::tree::TreeModel;
use nbtedit::{decode_with_opts, encode, DecodeOpts, NamedTag};

fuzz_target!(|tag: NamedTag| {
    let bs = match encode(&tag) {
        Ok(bs) => bs,
        Err(_) => return,
    };

    // The encoder has no depth limit, so lift the decoder's too.
    let decoded = decode_with_opts(&bs, DecodeOpts::new().max_depth(usize::MAX)).unwrap();
    assert_eq!(encode(&decoded).unwrap(), bs);

    let model = TreeModel::new(decoded);
    let mut stack = vec![model.root()];
    while let Some(id) = stack.pop() {
        model.display_name(id).unwrap();
        model.display_value(id).unwrap();
        stack.extend(model.children(id).unwrap());
    }
    assert_eq!(model.encode().unwrap(), bs);
});
