use std::path::PathBuf;
use std::process::{Command, Output};

fn tmp(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ground-state-{}-{}", std::process::id(), name))
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ground_state"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn energy_line(stdout: &str) -> f64 {
    let line = stdout.lines().next().unwrap();
    line.strip_prefix("Minimum energy: ").unwrap().parse().unwrap()
}

#[test]
fn prints_three_lines_and_writes_diagram() {
    let png = tmp("circuit.png");
    let csv = tmp("history.csv");
    let out = run(&[
        "--maxiter",
        "80",
        "--shots",
        "256",
        "--init-seed",
        "cli",
        "--circuit-png",
        png.to_str().unwrap(),
        "--history-csv",
        csv.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{}", stdout);

    let e = energy_line(&stdout);
    assert!(e > -1.857275 - 0.3 && e < -0.224911 + 0.3, "E = {}", e);
    assert_eq!(lines[1], "Closest element: H2");
    assert!(lines[2].starts_with("SparsePauliOp(['II', 'IZ', 'XX', 'ZI', 'ZZ'], coeffs=["));

    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let history = std::fs::read_to_string(&csv).unwrap();
    assert!(history.starts_with("evaluation,energy\n1,"));
    let rows = history.lines().count() - 1;
    assert!((1..=80).contains(&rows), "{} evaluations", rows);

    std::fs::remove_file(&png).ok();
    std::fs::remove_file(&csv).ok();
}

#[test]
fn custom_hamiltonian_with_exact_estimator() {
    let json = tmp("z.json");
    let png = tmp("z.png");
    std::fs::write(&json, "[[1, 0], [0, -1]]").unwrap();

    let out = run(&[
        "--hamiltonian",
        json.to_str().unwrap(),
        "--exact",
        "--reps",
        "1",
        "--maxiter",
        "200",
        "--optimizer",
        "nelder-mead",
        "--init-seed",
        "z",
        "--circuit-png",
        png.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let e = energy_line(&stdout);
    assert!((-1.0 - 1e-9..=1.0).contains(&e), "E = {}", e);
    assert!(stdout.lines().nth(2).unwrap().starts_with("SparsePauliOp(['Z']"));

    std::fs::remove_file(&json).ok();
    std::fs::remove_file(&png).ok();
}

#[test]
fn non_hermitian_input_fails() {
    let json = tmp("bad.json");
    std::fs::write(&json, "[[0, 1], [0, 0]]").unwrap();
    let out = run(&["--hamiltonian", json.to_str().unwrap(), "--maxiter", "5"]);
    std::fs::remove_file(&json).ok();

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Pauli decomposition failed"));
}

#[test]
fn zero_evaluation_budget_is_rejected() {
    let png = tmp("zero.png");
    let out = run(&["--maxiter", "0", "--circuit-png", png.to_str().unwrap()]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--maxiter"));
    assert!(!png.exists());
}

#[test]
fn unwritable_diagram_fails_before_any_result() {
    let dir = tmp("missing-dir");
    let png = dir.join("circuit.png");
    let out = run(&[
        "--maxiter",
        "30",
        "--init-seed",
        "bad-path",
        "--circuit-png",
        png.to_str().unwrap(),
    ]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty(), "{}", String::from_utf8_lossy(&out.stdout));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("writing"), "{}", stderr);
    assert!(!stderr.contains("starting VQE"), "{}", stderr);
}

#[test]
fn reverse_linear_entanglement_runs() {
    let png = tmp("reverse.png");
    let out = run(&[
        "--entanglement",
        "reverse-linear",
        "--exact",
        "--maxiter",
        "40",
        "--init-seed",
        "reverse",
        "--circuit-png",
        png.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let e = energy_line(&stdout);
    assert!(e >= -1.857275 - 1e-6 && e <= -0.224911 + 1e-6, "E = {}", e);
    assert!(png.exists());
    std::fs::remove_file(&png).ok();
}
