use quantum::{
    circuit::Circuit,
    measurement::{probabilities, sample_counts},
};
use rng::ONDRng;
use std::f64::consts::FRAC_PI_2;
use tn::truncation::Truncation;

/// RY(π/2) on qubit 0 then CX(0, 1) prepares (|00⟩ + |11⟩)/√2.
fn bell_circuit() -> Circuit {
    let mut c = Circuit::new(2);
    c.ry(0).unwrap();
    c.cx(0, 1).unwrap();
    c
}

#[test]
fn bell_state_z_correlation() {
    let psi = bell_circuit()
        .simulate(&[FRAC_PI_2], Truncation::default())
        .unwrap();
    let probs = probabilities(&psi);

    let mut counts = vec![0usize; 4];
    for shot in 0..100 {
        let mut rng = ONDRng::new(format!("seed-{}", shot).as_bytes());
        let c = sample_counts(&probs, &mut rng, 1);
        for (i, n) in c.iter().enumerate() {
            counts[i] += n;
        }
    }

    assert_eq!(counts[0b01], 0, "Found |01> in Bell state");
    assert_eq!(counts[0b10], 0, "Found |10> in Bell state");
    assert!(counts[0b00] > 0, "Never observed |00>, counts = {:?}", counts);
    assert!(counts[0b11] > 0, "Never observed |11>, counts = {:?}", counts);
    assert_eq!(counts.iter().sum::<usize>(), 100);
}

#[test]
fn sampling_is_reproducible_per_seed() {
    let psi = bell_circuit()
        .simulate(&[FRAC_PI_2], Truncation::default())
        .unwrap();
    let probs = probabilities(&psi);

    let a = sample_counts(&probs, &mut ONDRng::new(b"28"), 2048);
    let b = sample_counts(&probs, &mut ONDRng::new(b"28"), 2048);
    assert_eq!(a, b);
}

#[test]
fn zero_shots_yield_no_counts() {
    let probs = [0.5, 0.0, 0.0, 0.5];
    let counts = sample_counts(&probs, &mut ONDRng::new(b"none"), 0);
    assert_eq!(counts, vec![0; 4]);
}
