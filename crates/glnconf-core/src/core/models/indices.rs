use std::fmt;

/// Names the part an atom index plays in a monitored interaction.
///
/// Used when validating index sets against a trajectory so that an offending
/// index can be reported together with what it was supposed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomRole {
    /// The heavy atom carrying the hydrogen.
    Donor,
    /// The hydrogen shared between donor and acceptor.
    Hydrogen,
    /// The heavy atom receiving the hydrogen bond.
    Acceptor,
    /// The atom covalently bound to the acceptor, defining its orientation.
    PreAcceptor,
    /// The n-th (0-based) atom of the glutamine dihedral or angle definition.
    Gln(usize),
}

impl fmt::Display for AtomRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomRole::Donor => f.write_str("donor"),
            AtomRole::Hydrogen => f.write_str("hydrogen"),
            AtomRole::Acceptor => f.write_str("acceptor"),
            AtomRole::PreAcceptor => f.write_str("pre-acceptor"),
            AtomRole::Gln(position) => write!(f, "Gln atom #{}", position + 1),
        }
    }
}

/// The four atoms defining one donor–hydrogen···acceptor hydrogen bond.
///
/// Indices are 0-based positions in the trajectory's atom table. An
/// `AtomIndexSet` is immutable; one instance exists per tracked glutamine copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomIndexSet {
    donor: usize,
    hydrogen: usize,
    acceptor: usize,
    pre_acceptor: usize,
}

impl AtomIndexSet {
    pub fn new(donor: usize, hydrogen: usize, acceptor: usize, pre_acceptor: usize) -> Self {
        Self {
            donor,
            hydrogen,
            acceptor,
            pre_acceptor,
        }
    }

    pub fn donor(&self) -> usize {
        self.donor
    }

    pub fn hydrogen(&self) -> usize {
        self.hydrogen
    }

    pub fn acceptor(&self) -> usize {
        self.acceptor
    }

    pub fn pre_acceptor(&self) -> usize {
        self.pre_acceptor
    }

    pub fn donor_acceptor(&self) -> [usize; 2] {
        [self.donor, self.acceptor]
    }

    pub fn hydrogen_acceptor(&self) -> [usize; 2] {
        [self.hydrogen, self.acceptor]
    }

    pub fn donor_hydrogen_acceptor(&self) -> [usize; 3] {
        [self.donor, self.hydrogen, self.acceptor]
    }

    pub fn pre_acceptor_acceptor_donor(&self) -> [usize; 3] {
        [self.pre_acceptor, self.acceptor, self.donor]
    }

    pub fn pre_acceptor_acceptor_hydrogen(&self) -> [usize; 3] {
        [self.pre_acceptor, self.acceptor, self.hydrogen]
    }

    /// Every index paired with the role it plays, in donor, hydrogen, acceptor,
    /// pre-acceptor order.
    pub fn roles(&self) -> [(AtomRole, usize); 4] {
        [
            (AtomRole::Donor, self.donor),
            (AtomRole::Hydrogen, self.hydrogen),
            (AtomRole::Acceptor, self.acceptor),
            (AtomRole::PreAcceptor, self.pre_acceptor),
        ]
    }
}

/// The glutamine atoms whose geometry decides the side-chain conformation.
///
/// The dark state is described by a four-atom dihedral, the light state by a
/// three-atom bond angle. Which variant is valid is fixed by the analysed
/// state, never by the number of columns in an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlnIndexSet {
    Dihedral([usize; 4]),
    Angle([usize; 3]),
}

impl GlnIndexSet {
    pub fn atoms(&self) -> &[usize] {
        match self {
            GlnIndexSet::Dihedral(atoms) => atoms,
            GlnIndexSet::Angle(atoms) => atoms,
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = (AtomRole, usize)> + '_ {
        self.atoms()
            .iter()
            .enumerate()
            .map(|(position, &index)| (AtomRole::Gln(position), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_tuples_follow_the_criterion_atom_order() {
        let set = AtomIndexSet::new(10, 11, 20, 21);

        assert_eq!(set.donor_acceptor(), [10, 20]);
        assert_eq!(set.hydrogen_acceptor(), [11, 20]);
        assert_eq!(set.donor_hydrogen_acceptor(), [10, 11, 20]);
        assert_eq!(set.pre_acceptor_acceptor_donor(), [21, 20, 10]);
        assert_eq!(set.pre_acceptor_acceptor_hydrogen(), [21, 20, 11]);
    }

    #[test]
    fn roles_enumerate_every_index_once() {
        let set = AtomIndexSet::new(1, 2, 3, 4);
        let roles = set.roles();

        assert_eq!(roles[0], (AtomRole::Donor, 1));
        assert_eq!(roles[3], (AtomRole::PreAcceptor, 4));
    }

    #[test]
    fn gln_roles_are_numbered_by_position() {
        let gln = GlnIndexSet::Angle([7, 8, 9]);
        let roles: Vec<_> = gln.roles().collect();

        assert_eq!(
            roles,
            vec![
                (AtomRole::Gln(0), 7),
                (AtomRole::Gln(1), 8),
                (AtomRole::Gln(2), 9)
            ]
        );
        assert_eq!(AtomRole::Gln(2).to_string(), "Gln atom #3");
    }
}
