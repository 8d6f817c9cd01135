//! Pauli strings and weighted sums of them.
//!
//! Labels follow the usual little-endian convention: the rightmost character
//! acts on qubit 0, so `"IZ"` is `Z` on qubit 0.

use crate::error::{QuantumError, Result};
use crate::hamiltonian::{Hamiltonian, HERMITIAN_TOL};
use std::fmt;
use std::str::FromStr;
use tn::mps::C64;

/// Coefficients at or below this magnitude are dropped by the decomposition.
pub const DECOMPOSITION_ATOL: f64 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    pub fn symbol(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// Tensor product of single-qubit Paulis; `paulis[q]` acts on qubit `q`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    pub fn new(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    pub fn identity(num_qubits: usize) -> Self {
        Self::new(vec![Pauli::I; num_qubits])
    }

    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    pub fn get(&self, qubit: usize) -> Pauli {
        self.paulis[qubit]
    }

    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|&p| p == Pauli::I)
    }

    /// Bits set where the string flips the basis state (X or Y).
    pub fn x_mask(&self) -> usize {
        self.mask(|p| matches!(p, Pauli::X | Pauli::Y))
    }

    /// Bits set where the string is not the identity.
    pub fn support_mask(&self) -> usize {
        self.mask(|p| p != Pauli::I)
    }

    fn mask(&self, pred: impl Fn(Pauli) -> bool) -> usize {
        self.paulis
            .iter()
            .enumerate()
            .filter(|(_, p)| pred(**p))
            .fold(0, |m, (q, _)| m | (1 << q))
    }

    /// `P|index⟩ = phase · |index'⟩`.
    pub fn apply_to_basis(&self, index: usize) -> (usize, C64) {
        let mut phase = C64::new(1.0, 0.0);
        for (q, &p) in self.paulis.iter().enumerate() {
            let bit = (index >> q) & 1;
            match p {
                Pauli::I | Pauli::X => {}
                Pauli::Y => {
                    phase *= if bit == 0 {
                        C64::new(0.0, 1.0)
                    } else {
                        C64::new(0.0, -1.0)
                    };
                }
                Pauli::Z => {
                    if bit == 1 {
                        phase = -phase;
                    }
                }
            }
        }
        (index ^ self.x_mask(), phase)
    }

    /// Qubit-wise commutation: on every qubit the two factors are equal or one
    /// of them is the identity. Such strings share a measurement basis.
    pub fn qubitwise_commutes(&self, other: &PauliString) -> bool {
        self.paulis
            .iter()
            .zip(&other.paulis)
            .all(|(&a, &b)| a == Pauli::I || b == Pauli::I || a == b)
    }

    /// Dense `2^n × 2^n` matrix.
    pub fn to_matrix(&self) -> Hamiltonian {
        let dim = 1usize << self.num_qubits();
        let mut data = vec![C64::new(0.0, 0.0); dim * dim];
        for col in 0..dim {
            let (row, phase) = self.apply_to_basis(col);
            data[row * dim + col] = phase;
        }
        Hamiltonian::from_complex(dim, data)
    }

    /// Every string on `num_qubits` qubits, ordered by label with `I < X < Y < Z`.
    fn all(num_qubits: usize) -> impl Iterator<Item = PauliString> {
        (0..1usize << (2 * num_qubits)).map(move |code| {
            // The most significant base-4 digit is the leftmost label character,
            // i.e. the highest qubit.
            let paulis = (0..num_qubits)
                .map(|q| Pauli::ALL[(code >> (2 * q)) & 3])
                .collect();
            PauliString::new(paulis)
        })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.paulis.iter().rev() {
            write!(f, "{}", p.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for PauliString {
    type Err = QuantumError;

    fn from_str(label: &str) -> Result<Self> {
        let paulis = label
            .chars()
            .rev()
            .map(|c| match c {
                'I' => Ok(Pauli::I),
                'X' => Ok(Pauli::X),
                'Y' => Ok(Pauli::Y),
                'Z' => Ok(Pauli::Z),
                _ => Err(QuantumError::InvalidLabel(label.to_string())),
            })
            .collect::<Result<Vec<_>>>()?;
        if paulis.is_empty() {
            return Err(QuantumError::InvalidLabel(label.to_string()));
        }
        Ok(Self::new(paulis))
    }
}

/// Weighted sum of Pauli strings on a fixed number of qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<(PauliString, C64)>,
}

impl SparsePauliOp {
    pub fn new(num_qubits: usize, terms: Vec<(PauliString, C64)>) -> Result<Self> {
        if let Some((p, _)) = terms.iter().find(|(p, _)| p.num_qubits() != num_qubits) {
            return Err(QuantumError::QubitMismatch {
                operator: num_qubits,
                state: p.num_qubits(),
            });
        }
        Ok(Self { num_qubits, terms })
    }

    /// Build from `(label, real coefficient)` pairs.
    pub fn from_labels(terms: &[(&str, f64)]) -> Result<Self> {
        let parsed = terms
            .iter()
            .map(|(label, c)| Ok((label.parse::<PauliString>()?, C64::new(*c, 0.0))))
            .collect::<Result<Vec<_>>>()?;
        let num_qubits = parsed.first().map_or(0, |(p, _)| p.num_qubits());
        Self::new(num_qubits, parsed)
    }

    /// Exact decomposition `H = Σ c_P · P` with `c_P = Tr(P·H) / 2^n`.
    pub fn from_matrix(h: &Hamiltonian) -> Result<Self> {
        if let Some((row, col)) = h.hermitian_violation(HERMITIAN_TOL) {
            return Err(QuantumError::NotHermitian { row, col });
        }

        let n = h.num_qubits();
        let dim = h.dim();
        let mut terms = Vec::new();

        for p in PauliString::all(n) {
            // Tr(P H) = Tr(H P) = Σ_k phase(k) · H[k][k ^ x]
            let mut trace = C64::new(0.0, 0.0);
            for k in 0..dim {
                let (j, phase) = p.apply_to_basis(k);
                trace += phase * h.get(k, j);
            }
            let coeff = trace / dim as f64;
            if coeff.norm() > DECOMPOSITION_ATOL {
                terms.push((p, coeff));
            }
        }

        Ok(Self { num_qubits: n, terms })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(PauliString, C64)] {
        &self.terms
    }

    pub fn coeff(&self, label: &str) -> Option<C64> {
        self.terms
            .iter()
            .find(|(p, _)| p.to_string() == label)
            .map(|(_, c)| *c)
    }

    /// Re-expand into a dense matrix.
    pub fn to_matrix(&self) -> Hamiltonian {
        let dim = 1usize << self.num_qubits;
        let mut data = vec![C64::new(0.0, 0.0); dim * dim];
        for (p, c) in &self.terms {
            for col in 0..dim {
                let (row, phase) = p.apply_to_basis(col);
                data[row * dim + col] += c * phase;
            }
        }
        Hamiltonian::from_complex(dim, data)
    }

    /// Greedy partition into qubit-wise-commuting groups, first fit in term
    /// order. Each group can be read from a single measurement basis.
    pub fn qubitwise_groups(&self) -> Vec<MeasurementGroup> {
        let mut groups: Vec<MeasurementGroup> = Vec::new();
        for (p, c) in &self.terms {
            match groups.iter_mut().find(|g| g.accepts(p)) {
                Some(g) => g.push(p.clone(), *c),
                None => {
                    let mut g = MeasurementGroup::new(self.num_qubits);
                    g.push(p.clone(), *c);
                    groups.push(g);
                }
            }
        }
        groups
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.terms.iter().map(|(p, _)| format!("'{}'", p)).collect();
        let coeffs: Vec<String> = self
            .terms
            .iter()
            .map(|(_, c)| {
                let sign = if c.im < 0.0 { '-' } else { '+' };
                format!("{:.8}{}{}j", c.re, sign, fmt_imag(c.im.abs()))
            })
            .collect();
        write!(
            f,
            "SparsePauliOp([{}], coeffs=[{}])",
            labels.join(", "),
            coeffs.join(", ")
        )
    }
}

fn fmt_imag(im: f64) -> String {
    if im == 0.0 {
        "0.".to_string()
    } else {
        format!("{:.8}", im)
    }
}

/// Terms sharing one measurement basis.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementGroup {
    basis: Vec<Pauli>,
    terms: Vec<(PauliString, C64)>,
}

impl MeasurementGroup {
    fn new(num_qubits: usize) -> Self {
        Self {
            basis: vec![Pauli::I; num_qubits],
            terms: Vec::new(),
        }
    }

    fn accepts(&self, p: &PauliString) -> bool {
        PauliString::new(self.basis.clone()).qubitwise_commutes(p)
    }

    fn push(&mut self, p: PauliString, c: C64) {
        for (q, &pq) in p.paulis().iter().enumerate() {
            if pq != Pauli::I {
                self.basis[q] = pq;
            }
        }
        self.terms.push((p, c));
    }

    /// Per-qubit measurement basis; `I` means the qubit is read in Z.
    pub fn basis(&self) -> &[Pauli] {
        &self.basis
    }

    pub fn terms(&self) -> &[(PauliString, C64)] {
        &self.terms
    }
}
