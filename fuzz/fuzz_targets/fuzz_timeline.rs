#![no_main]

use libfuzzer_sys::fuzz_target;

use dacviz_core::{Algorithm, Matrix, Options, PlaybackController, Slot, Stage, TermKey};

// Arbitrary navigation and gate actions never panic; filled entries of the
// partial result agree with the final product.
fuzz_target!(|data: &[u8]| {
    let Some((&head, actions)) = data.split_first() else {
        return;
    };
    let size = if head & 1 == 0 { 4 } else { 8 };
    let options = Options {
        seed: Some(u64::from(head)),
        size,
        ..Options::for_algorithm(if head & 2 == 0 {
            Algorithm::Naive
        } else {
            Algorithm::Strassen
        })
    };
    let mut rng = options.rng();
    let Ok(mut root) = PlaybackController::generated(options, &mut rng) else {
        return;
    };
    let slots: Vec<Slot> = root.timeline().slots().to_vec();

    for &byte in actions {
        let slot = slots[usize::from(byte >> 4) % slots.len()];
        let stage = match byte % 3 {
            0 => Stage::Term(TermKey::First),
            1 => Stage::Term(TermKey::Second),
            _ => Stage::Product,
        };
        match (byte >> 2) & 3 {
            0 => {
                root.active_mut().next();
            }
            1 => {
                root.active_mut().prev();
            }
            2 => {
                let _ = root.active_mut().apply(slot, stage, byte & 0x40 != 0);
            }
            _ => {
                let _ = root.close_innermost();
            }
        }
    }

    let expected: &Matrix = root.timeline().result();
    let partial = root.current_result();
    let n = expected.size();
    for i in 0..n {
        for j in 0..n {
            let shown = partial.get(i, j);
            assert!(shown == 0 || shown == expected.get(i, j));
        }
    }
});
