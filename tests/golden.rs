//! Golden file integration tests.
//!
//! Reads tests/testdata/products_golden.json and checks that both
//! recursions, the textbook product and the timelines agree with the
//! recorded products and operation counts.

use std::sync::Arc;

use serde::Deserialize;

use dacviz_core::event::Event;
use dacviz_core::observers::NoOpObserver;
use dacviz_core::ops::{reference_multiply, OpCounts};
use dacviz_core::{multiply, Algorithm, Matrix, Options, PlaybackController, TermKey, Timeline};

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    cases: Vec<GoldenCase>,
}

#[derive(Deserialize)]
struct GoldenCase {
    name: String,
    a: Vec<Vec<i64>>,
    b: Vec<Vec<i64>>,
    product: Vec<Vec<i64>>,
    naive: OpCounts,
    strassen: OpCounts,
    strassen_timeline: OpCounts,
}

impl GoldenCase {
    fn inputs(&self) -> (Matrix, Matrix) {
        (
            Matrix::from_rows(self.a.clone()).unwrap(),
            Matrix::from_rows(self.b.clone()).unwrap(),
        )
    }
}

fn load_golden_data() -> GoldenData {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/testdata/products_golden.json"
    );
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

#[test]
fn golden_file_loads() {
    let data = load_golden_data();
    assert!(!data.cases.is_empty());
    assert!(data.cases.iter().any(|c| c.name == "two_by_two_example"));
}

#[test]
fn golden_reference_products() {
    for case in load_golden_data().cases {
        let (a, b) = case.inputs();
        assert_eq!(
            reference_multiply(&a, &b).unwrap().to_rows(),
            case.product,
            "{}",
            case.name
        );
    }
}

#[test]
fn golden_recursive_products_and_counts() {
    for case in load_golden_data().cases {
        let (a, b) = case.inputs();
        let naive = multiply(&a, &b, Algorithm::Naive).unwrap();
        assert_eq!(naive.value.to_rows(), case.product, "naive {}", case.name);
        assert_eq!(naive.counts, case.naive, "naive counts {}", case.name);

        let strassen = multiply(&a, &b, Algorithm::Strassen).unwrap();
        assert_eq!(strassen.value.to_rows(), case.product, "strassen {}", case.name);
        assert_eq!(strassen.counts, case.strassen, "strassen counts {}", case.name);
    }
}

#[test]
fn golden_timelines() {
    for case in load_golden_data().cases {
        let (a, b) = case.inputs();
        for (alg, counts) in [
            (Algorithm::Naive, case.naive),
            (Algorithm::Strassen, case.strassen_timeline),
        ] {
            let t = Timeline::build(&a, &b, alg).unwrap();
            assert_eq!(t.result().to_rows(), case.product, "{alg} {}", case.name);
            assert_eq!(t.counts(), counts, "{alg} counts {}", case.name);
            let Some(Event::Done { result, .. }) = t.events().last() else {
                panic!("{alg} {} does not end with Done", case.name);
            };
            assert_eq!(result.to_rows(), case.product);
        }
    }
}

#[test]
fn golden_playback_reaches_product() {
    for case in load_golden_data().cases {
        let (a, b) = case.inputs();
        for alg in Algorithm::ALL {
            let mut c = PlaybackController::new(&a, &b, Options::for_algorithm(alg)).unwrap();
            c.subscribe(Arc::new(NoOpObserver::new()));
            while !c.is_done() {
                if let Some(slot) = c.current_slot() {
                    for key in TermKey::ALL {
                        c.compute_term(slot, key).unwrap();
                    }
                    c.compute_product(slot).unwrap();
                }
                assert!(c.next().moved(), "{alg} {} stuck at {}", case.name, c.cursor());
            }
            assert_eq!(c.current_result().to_rows(), case.product, "{alg} {}", case.name);
        }
    }
}
