/// One captured RNA molecule: reads sharing cell barcode, corrected UMI and gene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoleculeKey {
    pub cell_barcode: String,
    pub umi: String,
    pub gene: String,
}

impl MoleculeKey {
    pub fn new(
        cell_barcode: impl Into<String>,
        umi: impl Into<String>,
        gene: impl Into<String>,
    ) -> Self {
        Self {
            cell_barcode: cell_barcode.into(),
            umi: umi.into(),
            gene: gene.into(),
        }
    }
}

/// A molecule refined by alignment position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentKey {
    pub molecule: MoleculeKey,
    pub position: i64,
}

impl FragmentKey {
    pub fn new(molecule: MoleculeKey, position: i64) -> Self {
        Self { molecule, position }
    }
}
