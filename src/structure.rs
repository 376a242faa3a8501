//! Structure tags, their implication lattice, and band intervals.
//!
//! A structure describes which part of a matrix is semantically stored and
//! which coordinates are structural zeros. The `is_a` relation is the
//! flattened closure of each tag's super-concepts: `UpperTriangular`
//! implies `UpperTrapezoidal`, `Square` and `General`; `Identity` implies
//! both triangular families. Band intervals are half-open ranges of
//! diagonal indices `d = j - i` that may hold non-zeros; everything
//! outside every interval reads as the additive identity and rejects
//! writes.

use crate::imf::Imf;

/// Structure tag of a matrix or vector container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    General,
    Square,
    Symmetric,
    Hermitian,
    UpperTriangular,
    LowerTriangular,
    UpperTrapezoidal,
    LowerTrapezoidal,
    SymmetricPositiveDefinite,
    HermitianPositiveDefinite,
    SymmetricTridiagonal,
    HermitianTridiagonal,
    Orthogonal,
    RectangularUpperBidiagonal,
    Identity,
    Zero,
}

/// A half-open interval `[lo, hi)` of diagonal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub lo: isize,
    pub hi: isize,
}

impl Band {
    pub fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }

    pub fn contains(&self, d: isize) -> bool {
        self.lo <= d && d < self.hi
    }
}

impl Structure {
    /// The tag's super-concepts, flattened, including the tag itself.
    pub fn inferred(self) -> &'static [Structure] {
        use Structure::*;
        match self {
            General => &[General],
            Square => &[Square, General],
            Symmetric => &[Symmetric, Square, General],
            Hermitian => &[Hermitian, Square, General],
            UpperTrapezoidal => &[UpperTrapezoidal, General],
            LowerTrapezoidal => &[LowerTrapezoidal, General],
            UpperTriangular => &[UpperTriangular, UpperTrapezoidal, Square, General],
            LowerTriangular => &[LowerTriangular, LowerTrapezoidal, Square, General],
            SymmetricPositiveDefinite => {
                &[SymmetricPositiveDefinite, Symmetric, Square, General]
            }
            HermitianPositiveDefinite => {
                &[HermitianPositiveDefinite, Hermitian, Square, General]
            }
            SymmetricTridiagonal => &[SymmetricTridiagonal, Symmetric, Square, General],
            HermitianTridiagonal => &[HermitianTridiagonal, Hermitian, Square, General],
            Orthogonal => &[Orthogonal, Square, General],
            RectangularUpperBidiagonal => &[RectangularUpperBidiagonal, General],
            Identity => &[
                Identity,
                UpperTriangular,
                LowerTriangular,
                UpperTrapezoidal,
                LowerTrapezoidal,
                Square,
                General,
            ],
            Zero => &[Zero, General],
        }
    }

    /// `true` iff `other` is inferred by `self`.
    pub fn is_a(self, other: Structure) -> bool {
        self.inferred().contains(&other)
    }

    /// Declared band intervals, unclamped.
    fn declared_bands(self) -> &'static [(isize, isize)] {
        use Structure::*;
        match self {
            Zero => &[],
            Identity => &[(0, 1)],
            SymmetricTridiagonal | HermitianTridiagonal => &[(-1, 2)],
            RectangularUpperBidiagonal => &[(0, 2)],
            UpperTriangular | UpperTrapezoidal => &[(0, isize::MAX)],
            LowerTriangular | LowerTrapezoidal => &[(isize::MIN, 1)],
            _ => &[(isize::MIN, isize::MAX)],
        }
    }

    /// Band intervals for `rows x cols` dimensions, clamped to the
    /// representable diagonal range `[1-rows, cols)`. Empty intervals
    /// are dropped, so a zero-sized matrix has no bands.
    pub fn bands(self, rows: usize, cols: usize) -> Vec<Band> {
        if rows == 0 || cols == 0 {
            return Vec::new();
        }
        let full_lo = 1 - rows as isize;
        let full_hi = cols as isize;
        self.declared_bands()
            .iter()
            .map(|&(lo, hi)| Band { lo: lo.max(full_lo), hi: hi.min(full_hi) })
            .filter(|b| !b.is_empty())
            .collect()
    }

    /// Whether diagonal `d = j - i` may hold non-zeros on `rows x cols`.
    /// Allocation-free counterpart of [`Structure::bands`] for the access
    /// path.
    #[inline]
    pub fn on_band(self, rows: usize, cols: usize, d: isize) -> bool {
        if rows == 0 || cols == 0 || d < 1 - rows as isize || d >= cols as isize {
            return false;
        }
        self.declared_bands().iter().any(|&(lo, hi)| lo <= d && d < hi)
    }

    /// Whether the tag only makes sense on square dimensions.
    pub fn requires_square(self) -> bool {
        self.is_a(Structure::Square)
    }

    /// Symmetric family: reads below the diagonal mirror the upper half.
    pub fn is_symmetric(self) -> bool {
        self.is_a(Structure::Symmetric)
    }

    /// Hermitian family: mirrored reads additionally conjugate.
    pub fn is_hermitian(self) -> bool {
        self.is_a(Structure::Hermitian)
    }

    /// Whether off-triangle reads are answered from the other triangle.
    pub fn mirrors(self) -> bool {
        self.is_symmetric() || self.is_hermitian()
    }

    /// The structure tag of the transposed object.
    pub fn transposed(self) -> Structure {
        use Structure::*;
        match self {
            UpperTriangular => LowerTriangular,
            LowerTriangular => UpperTriangular,
            UpperTrapezoidal => LowerTrapezoidal,
            LowerTrapezoidal => UpperTrapezoidal,
            // no lower-bidiagonal tag exists, so the transpose decays
            RectangularUpperBidiagonal => General,
            other => other,
        }
    }
}

/// Whether a view of a `source`-structured object through the given IMFs
/// may claim `target` structure.
///
/// Generalizing casts follow the implication lattice; a handful of
/// same-structure and specializing casts are admitted when the IMFs
/// guarantee the claim is shape-coherent (principal selections for the
/// mirror family, blocks inside the stored triangle for triangular
/// sources viewed as `General`). Everything else is rejected and
/// surfaces as an unsupported-cast error at view construction.
pub fn view_instantiable(
    source: Structure,
    target: Structure,
    imf_r: &Imf,
    imf_c: &Imf,
) -> bool {
    use Structure::*;
    let principal = imf_r.same_mapping(imf_c);
    let monotone = monotone_imf(imf_r) && monotone_imf(imf_c);
    match (source, target) {
        // a zero block is a zero block under any selection
        (Zero, _) => target.bands(imf_r.n(), imf_c.n()).is_empty() || target == General,
        (s, General) => generalizes_to_full(s, imf_r, imf_c),
        (s, Square) => imf_r.n() == imf_c.n() && generalizes_to_full(s, imf_r, imf_c),
        // principal permutations fix the identity matrix
        (Identity, Identity) => principal,
        (Symmetric, Symmetric)
        | (Hermitian, Hermitian)
        | (SymmetricPositiveDefinite, SymmetricPositiveDefinite)
        | (HermitianPositiveDefinite, HermitianPositiveDefinite) => principal,
        (UpperTriangular, UpperTriangular)
        | (LowerTriangular, LowerTriangular)
        | (UpperTrapezoidal, UpperTrapezoidal)
        | (LowerTrapezoidal, LowerTrapezoidal) => principal && monotone,
        // user-asserted specializations of a full block; the IMFs must at
        // least make the claim square and principal
        (General, Symmetric)
        | (General, Hermitian)
        | (General, SymmetricPositiveDefinite)
        | (General, HermitianPositiveDefinite) => principal && imf_r.n() == imf_c.n(),
        // pure re-tags along the lattice
        (s, t) if s.is_a(t) => {
            matches!(imf_r, Imf::Id { .. }) && matches!(imf_c, Imf::Id { .. })
        }
        _ => false,
    }
}

/// Whether every coordinate the IMFs expose is readable in `source`, so
/// the view may present itself as a full (`General`) block.
fn generalizes_to_full(source: Structure, imf_r: &Imf, imf_c: &Imf) -> bool {
    use Structure::*;
    if imf_r.n() == 0 || imf_c.n() == 0 {
        return true;
    }
    match source {
        // every coordinate of these is stored or mirror-readable
        General | Square | Orthogonal | Zero | Symmetric | Hermitian
        | SymmetricPositiveDefinite | HermitianPositiveDefinite => true,
        // block must sit inside the stored triangle
        UpperTriangular | UpperTrapezoidal => {
            imf_r.map(imf_r.n() - 1) <= imf_c.map(0)
        }
        LowerTriangular | LowerTrapezoidal => {
            imf_c.map(imf_c.n() - 1) <= imf_r.map(0)
        }
        // banded storage holds too few coordinates for an arbitrary block
        SymmetricTridiagonal | HermitianTridiagonal | RectangularUpperBidiagonal
        | Identity => {
            matches!(imf_r, Imf::Id { .. }) && matches!(imf_c, Imf::Id { .. })
        }
    }
}

fn monotone_imf(imf: &Imf) -> bool {
    match imf {
        Imf::Id { .. } | Imf::Zero { .. } => true,
        Imf::Strided { .. } => true,
        Imf::Select { idxs, .. } => idxs.windows(2).all(|w| w[0] <= w[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Structure::*;

    #[test]
    fn lattice_implications() {
        assert!(UpperTriangular.is_a(UpperTrapezoidal));
        assert!(UpperTriangular.is_a(Square));
        assert!(UpperTriangular.is_a(General));
        assert!(!UpperTriangular.is_a(LowerTriangular));
        assert!(Identity.is_a(UpperTriangular));
        assert!(Identity.is_a(LowerTriangular));
        assert!(SymmetricPositiveDefinite.is_a(Symmetric));
        assert!(Zero.is_a(General));
        assert!(!General.is_a(Square));
        assert!(!Symmetric.is_a(Hermitian));
    }

    #[test]
    fn band_intervals_by_structure() {
        assert_eq!(General.bands(4, 6), vec![Band { lo: -3, hi: 6 }]);
        assert_eq!(UpperTriangular.bands(4, 4), vec![Band { lo: 0, hi: 4 }]);
        assert_eq!(LowerTriangular.bands(4, 4), vec![Band { lo: -3, hi: 1 }]);
        assert_eq!(SymmetricTridiagonal.bands(5, 5), vec![Band { lo: -1, hi: 2 }]);
        assert_eq!(Identity.bands(3, 3), vec![Band { lo: 0, hi: 1 }]);
        assert_eq!(RectangularUpperBidiagonal.bands(3, 4), vec![Band { lo: 0, hi: 2 }]);
        assert!(Zero.bands(3, 3).is_empty());
        assert!(General.bands(0, 4).is_empty());
        assert!(General.bands(4, 0).is_empty());
        assert!(!General.on_band(0, 4, 2));
        assert!(!General.on_band(4, 0, -2));
        assert!(General.on_band(4, 4, 2));
    }

    #[test]
    fn transposed_tags() {
        assert_eq!(UpperTriangular.transposed(), LowerTriangular);
        assert_eq!(LowerTrapezoidal.transposed(), UpperTrapezoidal);
        assert_eq!(Symmetric.transposed(), Symmetric);
        assert_eq!(General.transposed(), General);
        assert_eq!(RectangularUpperBidiagonal.transposed(), General);
    }

    #[test]
    fn mirror_predicates() {
        assert!(Symmetric.mirrors());
        assert!(HermitianTridiagonal.mirrors());
        assert!(HermitianTridiagonal.is_hermitian());
        assert!(!HermitianTridiagonal.is_symmetric());
        assert!(!UpperTriangular.mirrors());
    }

    #[test]
    fn instantiable_principal_symmetric_gather() {
        let rows = Imf::select(6, vec![0, 2, 5]);
        let cols = Imf::select(6, vec![0, 2, 5]);
        assert!(view_instantiable(Symmetric, Symmetric, &rows, &cols));
        let other = Imf::select(6, vec![0, 2, 4]);
        assert!(!view_instantiable(Symmetric, Symmetric, &rows, &other));
    }

    #[test]
    fn instantiable_block_inside_triangle() {
        // rows 0..2, cols 2..5 of an upper triangular 6x6: fully stored.
        let rows = Imf::strided(2, 6, 0, 1);
        let cols = Imf::strided(3, 6, 2, 1);
        assert!(view_instantiable(UpperTriangular, General, &rows, &cols));
        // rows 3..5 against cols 0..2 dips below the diagonal.
        let low_rows = Imf::strided(2, 6, 3, 1);
        let low_cols = Imf::strided(2, 6, 0, 1);
        assert!(!view_instantiable(UpperTriangular, General, &low_rows, &low_cols));
    }

    #[test]
    fn instantiable_specializing_casts() {
        let id4 = Imf::id(4);
        assert!(view_instantiable(General, Symmetric, &id4, &id4));
        assert!(view_instantiable(General, Square, &id4, &id4));
        let id3 = Imf::id(3);
        assert!(!view_instantiable(General, Symmetric, &id4, &id3));
        assert!(!view_instantiable(General, UpperTriangular, &id4, &id4));
    }
}
