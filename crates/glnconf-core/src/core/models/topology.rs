use std::fmt;

/// One atom record of a structure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyAtom {
    /// The serial number as written in the file (not necessarily contiguous).
    pub serial: usize,
    /// The atom name (e.g., "NE2", "OE1").
    pub name: String,
    /// The three-letter residue name (e.g., "GLN", "FMN").
    pub residue_name: String,
    /// The residue sequence number.
    pub residue_number: isize,
    /// The chain identifier, `' '` when the file leaves it blank.
    pub chain_id: char,
}

impl fmt::Display for TopologyAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", self.residue_name, self.residue_number, self.name)?;
        if self.chain_id != ' ' {
            write!(f, "@{}", self.chain_id)?;
        }
        Ok(())
    }
}

/// The atom table shared by all frames of a trajectory.
///
/// Atom `i` of the topology is atom `i` of every frame, which is what gives the
/// 0-based indices in index files their meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    atoms: Vec<TopologyAtom>,
}

impl Topology {
    pub fn new(atoms: Vec<TopologyAtom>) -> Self {
        Self { atoms }
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom(&self, index: usize) -> Option<&TopologyAtom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[TopologyAtom] {
        &self.atoms
    }

    /// Human-readable label for a 0-based index, e.g. `GLN99:NE2@A`.
    pub fn describe(&self, index: usize) -> String {
        match self.atom(index) {
            Some(atom) => atom.to_string(),
            None => format!("<atom {} not in topology>", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, residue_name: &str, residue_number: isize, chain_id: char) -> TopologyAtom {
        TopologyAtom {
            serial: 1,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            residue_number,
            chain_id,
        }
    }

    #[test]
    fn describe_includes_residue_and_chain() {
        let topology = Topology::new(vec![atom("NE2", "GLN", 99, 'A'), atom("O4", "FMN", 201, ' ')]);

        assert_eq!(topology.describe(0), "GLN99:NE2@A");
        assert_eq!(topology.describe(1), "FMN201:O4");
    }

    #[test]
    fn describe_out_of_range_index_does_not_panic() {
        let topology = Topology::default();
        assert_eq!(topology.describe(5), "<atom 5 not in topology>");
    }
}
