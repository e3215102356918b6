use chron_bnet::{Arrow, ArrowFrequencies, BayesNet, Dataset, Probability};
use chron_core::{Chronicle, build_libraries};

fn sample_library() -> Vec<Chronicle> {
    [
        &["X2", "O5", "X7", "O1", "X4", "O0", "X8", "O3", "X6"][..],
        &["X2", "O5", "X4", "O3", "X6"],
        &["X7", "O1", "X8", "O3", "X6"],
        &["X2", "O1", "X4", "O0", "X6"],
    ]
    .iter()
    .map(|labels| Chronicle::from_labels(labels.iter().copied()).expect("valid chronicle"))
    .collect()
}

fn approx(p: Probability, expected: f64) -> bool {
    p.value().is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn sample_library_is_one_library() {
    let collection = build_libraries(sample_library());
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.libraries()[0].len(), 4);
    assert_eq!(collection.duplicates(), 0);
}

#[test]
fn high_frequency_arrows_of_sample_library() {
    let frequencies = ArrowFrequencies::from_chronicles(&sample_library(), 2);

    assert_eq!(frequencies.count(&Arrow::new("O3", "X6")), 3);
    assert_eq!(frequencies.count(&Arrow::new("O0", "O3")), 1);

    let kept: Vec<String> = frequencies
        .high_frequency_arrows(2)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        kept,
        [
            "X2 -> O5", "X7 -> O1", "O1 -> X4", "X4 -> O0", "O1 -> O0", "X8 -> O3",
            "O3 -> X6", "X8 -> X6", "X2 -> X4", "X4 -> X6",
        ]
    );
}

#[test]
fn network_fitted_on_sample_library() {
    let library = sample_library();
    let head = library[0].clone();
    let arrows = ArrowFrequencies::from_chronicles(&library, 2).high_frequency_arrows(2);
    let dataset = Dataset::presence(&library, head.frames()).expect("presence");
    let net = BayesNet::fit(arrows, &dataset).expect("fit");

    assert_eq!(
        net.nodes(),
        ["X2", "O5", "X7", "O1", "X4", "O0", "X8", "O3", "X6"]
    );
    assert_eq!(
        net.parents("X6").map(<[String]>::to_vec),
        Some(vec!["O3".to_string(), "X8".to_string(), "X4".to_string()])
    );

    let x2 = net.cpt("X2").expect("X2 table");
    assert_eq!(x2.get(&[]).and_then(|e| e.counts()), Some([1, 3]));

    let o5 = net.cpt("O5").expect("O5 table");
    let [absent, present] = o5.get(&[1]).and_then(|e| e.probabilities()).expect("defined");
    assert!(approx(absent, 1.0 / 3.0));
    assert!(approx(present, 2.0 / 3.0));

    let x6 = net.cpt("X6").expect("X6 table");
    assert_eq!(x6.len(), 8);
    assert_eq!(x6.undefined_states().len(), 4);
    let [_, always] = x6.get(&[1, 1, 1]).and_then(|e| e.probabilities()).expect("row");
    assert!(approx(always, 1.0));

    assert_eq!(net.undefined_entries().len(), 6);
    assert!(net.structure().is_acyclic());
}
