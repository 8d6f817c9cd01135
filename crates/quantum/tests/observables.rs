use quantum::{
    circuit::Circuit,
    energy::expectation,
    pauli::PauliString,
};
use std::f64::consts::FRAC_PI_2;
use tn::truncation::Truncation;

fn bell_state() -> Vec<tn::mps::C64> {
    let mut c = Circuit::new(2);
    c.ry(0).unwrap();
    c.cx(0, 1).unwrap();
    c.simulate(&[FRAC_PI_2], Truncation::default())
        .unwrap()
        .to_statevector()
}

fn expect(state: &[tn::mps::C64], label: &str) -> f64 {
    let p: PauliString = label.parse().unwrap();
    let v = expectation(state, &p);
    assert!(v.im.abs() < 1e-12, "<{}> has imaginary part {}", label, v.im);
    v.re
}

#[test]
fn bell_observables() {
    let psi = bell_state();

    assert!(expect(&psi, "IZ").abs() < 1e-12);
    assert!(expect(&psi, "ZI").abs() < 1e-12);
    assert!((expect(&psi, "ZZ") - 1.0).abs() < 1e-12);
    assert!((expect(&psi, "II") - 1.0).abs() < 1e-12);
}

#[test]
fn bell_two_qubit_parities() {
    let psi = bell_state();

    let xx = expect(&psi, "XX");
    let yy = expect(&psi, "YY");
    let zz = expect(&psi, "ZZ");

    assert!((xx - 1.0).abs() < 1e-12, "XX = {}", xx);
    assert!((yy + 1.0).abs() < 1e-12, "YY = {}", yy);
    assert!((zz - 1.0).abs() < 1e-12, "ZZ = {}", zz);
}
