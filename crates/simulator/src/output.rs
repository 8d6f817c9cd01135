use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Objective value per evaluation, in evaluation order.
pub fn write_history_csv(path: &Path, history: &[f64]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "evaluation,energy")?;
    for (i, energy) in history.iter().enumerate() {
        writeln!(f, "{},{}", i + 1, energy)?;
    }
    f.flush()
}

#[cfg(test)]
mod tests {
    use super::write_history_csv;

    #[test]
    fn history_csv_has_header_and_rows() {
        let path = std::env::temp_dir().join(format!("history-{}.csv", std::process::id()));
        write_history_csv(&path, &[-1.0, -1.5]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, "evaluation,energy\n1,-1\n2,-1.5\n");
    }
}
