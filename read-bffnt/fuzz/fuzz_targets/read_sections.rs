#![no_main]
use libfuzzer_sys::fuzz_target;

use read_bffnt::BffntRef;

fuzz_target!(|data: &[u8]| {
    if let Ok(font) = BffntRef::new(data) {
        let _ = font.tglp();
        font.cwdhs().for_each(drop);
        font.cmaps().for_each(drop);
        let _ = font.krng();
        let _ = font.section_records();
    };
});
