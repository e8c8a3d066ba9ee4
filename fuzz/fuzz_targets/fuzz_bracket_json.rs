#![no_main]

use bgrid_core::Bracket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    // Any definition that loads must survive a save and reload unchanged.
    if let Ok(bracket) = Bracket::from_json_str(json) {
        let saved = bracket.to_json().expect("loaded bracket must serialize");
        let reloaded = Bracket::from_json_str(&saved).expect("saved bracket must reload");
        assert_eq!(reloaded, bracket);
    }
});
