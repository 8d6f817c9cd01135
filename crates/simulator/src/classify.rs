/// Known ground-state energy of an element or molecule.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementEnergy {
    pub label: String,
    pub energy: f64,
}

/// Ordered lookup table. Order decides ties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementTable {
    entries: Vec<ElementEnergy>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, energy: f64) -> Self {
        self.entries.push(ElementEnergy {
            label: label.into(),
            energy,
        });
        self
    }

    /// The four reference energies the pipeline classifies against.
    pub fn reference() -> Self {
        Self::new()
            .with("H2", -1.9)
            .with("Be", -14.7)
            .with("He", -2.9)
            .with("Li", -7.3)
    }

    pub fn entries(&self) -> &[ElementEnergy] {
        &self.entries
    }

    /// Entry with the smallest `|energy - e|`; the first one wins a tie.
    /// Non-finite energies have no nearest entry.
    pub fn nearest(&self, e: f64) -> Option<&ElementEnergy> {
        if !e.is_finite() {
            return None;
        }
        let mut best: Option<(&ElementEnergy, f64)> = None;
        for entry in &self.entries {
            let d = (entry.energy - e).abs();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((entry, d)),
            }
        }
        best.map(|(entry, _)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::ElementTable;

    fn label(e: f64) -> Option<String> {
        ElementTable::reference().nearest(e).map(|x| x.label.clone())
    }

    #[test]
    fn picks_closest_label() {
        assert_eq!(label(-2.0).as_deref(), Some("H2"));
        assert_eq!(label(-1.857).as_deref(), Some("H2"));
        assert_eq!(label(-2.5).as_deref(), Some("He"));
        assert_eq!(label(-6.0).as_deref(), Some("Li"));
        assert_eq!(label(-100.0).as_deref(), Some("Be"));
        assert_eq!(label(10.0).as_deref(), Some("H2"));
    }

    #[test]
    fn sweep_across_midpoints() {
        // Sorted by energy: Be -14.7, Li -7.3, He -2.9, H2 -1.9.
        let cases = [
            (-11.0 - 1e-6, "Be"),
            (-11.0 + 1e-6, "Li"),
            (-5.1 - 1e-6, "Li"),
            (-5.1 + 1e-6, "He"),
            (-2.4 - 1e-6, "He"),
            (-2.4 + 1e-6, "H2"),
        ];
        for (e, want) in cases {
            assert_eq!(label(e).as_deref(), Some(want), "e = {}", e);
        }
    }

    #[test]
    fn ties_go_to_first_entry() {
        let t = ElementTable::new().with("A", -1.0).with("B", 1.0);
        assert_eq!(t.nearest(0.0).unwrap().label, "A");
    }

    #[test]
    fn empty_table_or_non_finite_has_no_answer() {
        assert!(ElementTable::new().nearest(0.0).is_none());
        assert!(ElementTable::reference().nearest(f64::NAN).is_none());
        assert!(ElementTable::reference().nearest(f64::INFINITY).is_none());
        assert!(ElementTable::reference().nearest(f64::NEG_INFINITY).is_none());
    }
}
