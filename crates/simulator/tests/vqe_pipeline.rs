use approx::assert_abs_diff_eq;
use quantum::{ansatz::EfficientSu2, hamiltonian::Hamiltonian, pauli::SparsePauliOp};
use simulator::{
    vqe::random_initial_point, Cobyla, ElementTable, Estimator, NelderMead, Vqe,
};
use rng::ONDRng;

fn model() -> (Hamiltonian, SparsePauliOp) {
    let h = Hamiltonian::two_qubit_model();
    let op = SparsePauliOp::from_matrix(&h).unwrap();
    (h, op)
}

fn pipeline_ansatz() -> quantum::circuit::Circuit {
    EfficientSu2::new(2, 5)
        .skip_final_rotation_layer(true)
        .build()
        .unwrap()
}

#[test]
fn exact_run_is_variational_and_improves() {
    let (h, op) = model();
    let ground = h.ground_energy().unwrap();

    let x0 = random_initial_point(20, &mut ONDRng::new(b"pipeline"));
    let res = Vqe::new(Estimator::exact(), pipeline_ansatz(), Cobyla::new(300))
        .with_initial_point(x0)
        .compute_minimum_eigenvalue(&op)
        .unwrap();

    assert!(res.eigenvalue >= ground - 1e-9, "E = {}", res.eigenvalue);
    assert!(res.eigenvalue <= res.history[0]);
    assert!(res.cost_function_evals <= 300);
    assert_abs_diff_eq!(
        res.eigenvalue,
        res.history.iter().copied().fold(f64::INFINITY, f64::min),
        epsilon = 1e-12
    );
    assert_eq!(
        ElementTable::reference().nearest(res.eigenvalue).unwrap().label,
        "H2"
    );
}

#[test]
fn sampled_run_stays_near_the_spectrum() {
    let (h, op) = model();
    let spectrum = h.eigenvalues().unwrap();
    let (lo, hi) = (spectrum[0], spectrum[spectrum.len() - 1]);

    let res = Vqe::new(Estimator::default(), pipeline_ansatz(), Cobyla::new(200))
        .with_init_seed("pipeline")
        .compute_minimum_eigenvalue(&op)
        .unwrap();

    assert!(res.eigenvalue > lo - 0.15 && res.eigenvalue < hi + 0.15, "E = {}", res.eigenvalue);
    assert_eq!(res.history.len(), res.cost_function_evals);
    assert_eq!(
        ElementTable::reference().nearest(res.eigenvalue).unwrap().label,
        "H2"
    );
}

#[test]
fn sampled_run_replays_with_same_seeds() {
    let (_, op) = model();
    let run = || {
        Vqe::new(Estimator::sampled(128, 28), pipeline_ansatz(), NelderMead::new(60))
            .with_init_seed("replay")
            .compute_minimum_eigenvalue(&op)
            .unwrap()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.history, b.history);
    assert_eq!(a.optimal_parameters, b.optimal_parameters);
}
