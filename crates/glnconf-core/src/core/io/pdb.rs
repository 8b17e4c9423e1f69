use super::traits::TopologyFile;
use crate::core::models::topology::{Topology, TopologyAtom};
use pdbtbx::{
    ContainsAtomConformer, ContainsAtomConformerResidue, ContainsAtomConformerResidueChain,
    Format, ReadOptions, StrictnessLevel,
};
use std::collections::HashSet;
use std::io::{self, BufRead, BufReader};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No ATOM or HETATM records found")]
    NoAtoms,
}

fn join_messages<E: ToString>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct PdbFile;

impl TopologyFile for PdbFile {
    type Error = PdbError;

    /// Reads the atom table of the first model; later models are ignored.
    ///
    /// Atoms come back in serial-number order, which is file order for any
    /// topology written by an MD engine. If serials repeat (wrapped columns in
    /// very large systems), the chain/residue order of the parse is kept.
    fn read_from(reader: &mut impl BufRead) -> Result<Topology, Self::Error> {
        let (pdb, warnings) = ReadOptions::new()
            .set_format(Format::Pdb)
            .set_level(StrictnessLevel::Loose)
            .read_raw(BufReader::new(reader))
            .map_err(|errors| PdbError::Parse(join_messages(errors.as_slice())))?;
        if !warnings.is_empty() {
            debug!(
                count = warnings.len(),
                warnings = %join_messages(warnings.as_slice()),
                "PDB topology parsed with warnings."
            );
        }

        let model = pdb.models().next().ok_or(PdbError::NoAtoms)?;
        let mut atoms: Vec<TopologyAtom> = model
            .atoms_with_hierarchy()
            .map(|hier| TopologyAtom {
                serial: hier.atom().serial_number(),
                name: hier.atom().name().to_string(),
                residue_name: hier.conformer().name().to_string(),
                residue_number: hier.residue().serial_number(),
                chain_id: hier.chain().id().chars().next().unwrap_or(' '),
            })
            .collect();
        if atoms.is_empty() {
            return Err(PdbError::NoAtoms);
        }

        let distinct_serials: HashSet<usize> = atoms.iter().map(|atom| atom.serial).collect();
        if distinct_serials.len() == atoms.len() {
            atoms.sort_by_key(|atom| atom.serial);
        } else {
            warn!(
                atoms = atoms.len(),
                distinct_serials = distinct_serials.len(),
                "Duplicate atom serials in PDB topology; keeping chain order."
            );
        }
        Ok(Topology::new(atoms))
    }
}
