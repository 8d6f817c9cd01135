use anyhow::{Context, Result};
use clap::{builder::RangedU64ValueParser, Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quantum::{
    ansatz::{EfficientSu2, Entanglement},
    hamiltonian::Hamiltonian,
    pauli::SparsePauliOp,
};
use simulator::{
    draw::render_circuit_png, output::write_history_csv, AnyOptimizer, Cobyla, ElementTable,
    Estimator, NelderMead, Vqe,
};

/// Ground-state energy of a small Hamiltonian by VQE, matched against
/// reference element energies.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the Hamiltonian as an array of real rows (default: built-in 2-qubit model)
    #[arg(long)]
    hamiltonian: Option<PathBuf>,

    /// EfficientSU2 repetitions
    #[arg(long, default_value_t = 5)]
    reps: usize,

    /// CX pattern between rotation layers
    #[arg(long, value_enum, default_value_t = EntanglementKind::Linear)]
    entanglement: EntanglementKind,

    /// Shots per measurement group
    #[arg(long, default_value_t = 2048)]
    shots: usize,

    /// Exact expectation values instead of sampling
    #[arg(long)]
    exact: bool,

    /// Estimator seed
    #[arg(long, default_value_t = 28)]
    seed: u64,

    /// Objective evaluation cap
    #[arg(long, default_value_t = 1500, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    maxiter: usize,

    #[arg(long, value_enum, default_value_t = OptimizerKind::Cobyla)]
    optimizer: OptimizerKind,

    /// Seed for the random initial point (default: fresh entropy, logged)
    #[arg(long)]
    init_seed: Option<String>,

    /// Where to save the ansatz diagram
    #[arg(long, default_value = "vqe_ansatz_circuit.png")]
    circuit_png: PathBuf,

    /// Write the per-evaluation energy trace as CSV
    #[arg(long)]
    history_csv: Option<PathBuf>,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EntanglementKind {
    Linear,
    ReverseLinear,
}

impl From<EntanglementKind> for Entanglement {
    fn from(kind: EntanglementKind) -> Self {
        match kind {
            EntanglementKind::Linear => Entanglement::Linear,
            EntanglementKind::ReverseLinear => Entanglement::ReverseLinear,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OptimizerKind {
    Cobyla,
    NelderMead,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to build Rayon thread pool")?;
    }

    let h = match &args.hamiltonian {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Hamiltonian::from_json(&text)
                .with_context(|| format!("parsing Hamiltonian from {}", path.display()))?
        }
        None => Hamiltonian::two_qubit_model(),
    };

    let op = SparsePauliOp::from_matrix(&h).context("Pauli decomposition failed")?;
    info!(qubits = op.num_qubits(), terms = op.len(), "decomposed Hamiltonian");

    let ansatz = EfficientSu2::new(op.num_qubits(), args.reps)
        .with_entanglement(args.entanglement.into())
        .skip_final_rotation_layer(true)
        .build()?;

    let mut diagram = ansatz.clone();
    diagram.measure_all();
    render_circuit_png(&diagram, &args.circuit_png)
        .with_context(|| format!("writing {}", args.circuit_png.display()))?;

    let estimator = if args.exact {
        Estimator::exact()
    } else {
        Estimator::sampled(args.shots, args.seed)
    };
    let optimizer = match args.optimizer {
        OptimizerKind::Cobyla => AnyOptimizer::Cobyla(Cobyla::new(args.maxiter)),
        OptimizerKind::NelderMead => AnyOptimizer::NelderMead(NelderMead::new(args.maxiter)),
    };

    let mut vqe = Vqe::new(estimator, ansatz, optimizer);
    if let Some(seed) = &args.init_seed {
        vqe = vqe.with_init_seed(seed.as_str());
    }
    let result = vqe.compute_minimum_eigenvalue(&op)?;

    let table = ElementTable::reference();
    let closest = table
        .nearest(result.eigenvalue)
        .with_context(|| format!("no reference element near energy {}", result.eigenvalue))?;

    if let Some(path) = &args.history_csv {
        write_history_csv(path, &result.history)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote optimization history");
    }

    println!("Minimum energy: {}", result.eigenvalue);
    println!("Closest element: {}", closest.label);
    println!("{}", op);

    Ok(())
}
