//! Index-mapping functions.
//!
//! An IMF carries a domain size `n`, a codomain bound `N`, and a map
//! `f: [0,n) -> [0,N)`. Views stack these on top of containers: taking a
//! transpose, a strided range, or a gather of an existing view composes a
//! fresh IMF onto the old one. Composition always canonicalizes, so an
//! arbitrarily deep stack of views still resolves indices through exactly
//! one enum variant, with no chain to walk on the access path.
//!
//! The affine variants fuse algebraically: composing
//! `f(k) = b_f + s_f*k` after `g(k) = b_g + s_g*k` yields
//! `k -> (b_f + s_f*b_g) + (s_f*s_g)*k`. Anything involving a `Select`
//! tabulates into a new `Select`.

/// A one-dimensional index transform with declared domain and codomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imf {
    /// `f(k) = k` over `[0, n)`.
    Id { n: usize },
    /// `f(k) = 0`; the codomain is the single index `{0}`.
    Zero { n: usize },
    /// `f(k) = start + k*stride`, mapping `[0, count)` into `[0, origin)`.
    Strided { count: usize, origin: usize, start: usize, stride: usize },
    /// `f(k) = idxs[k]`, mapping into `[0, origin)`.
    Select { origin: usize, idxs: Vec<usize> },
}

impl Imf {
    pub fn id(n: usize) -> Self {
        Imf::Id { n }
    }

    pub fn zero(n: usize) -> Self {
        Imf::Zero { n }
    }

    /// Builds a strided map, collapsing to [`Imf::Id`] or [`Imf::Zero`]
    /// when the parameters describe one.
    pub fn strided(count: usize, origin: usize, start: usize, stride: usize) -> Self {
        if start == 0 && stride == 1 && count == origin {
            Imf::Id { n: count }
        } else if start == 0 && stride == 0 && origin == 1 {
            Imf::Zero { n: count }
        } else {
            Imf::Strided { count, origin, start, stride }
        }
    }

    /// Builds a gather/permutation map. Entries must already lie in
    /// `[0, origin)`; callers validate user-supplied index lists.
    pub fn select(origin: usize, idxs: Vec<usize>) -> Self {
        debug_assert!(idxs.iter().all(|&i| i < origin));
        Imf::Select { origin, idxs }
    }

    /// Domain size `n`.
    pub fn n(&self) -> usize {
        match self {
            Imf::Id { n } | Imf::Zero { n } => *n,
            Imf::Strided { count, .. } => *count,
            Imf::Select { idxs, .. } => idxs.len(),
        }
    }

    /// Codomain bound `N`.
    pub fn codomain(&self) -> usize {
        match self {
            Imf::Id { n } => *n,
            Imf::Zero { .. } => 1,
            Imf::Strided { origin, .. } | Imf::Select { origin, .. } => *origin,
        }
    }

    /// Applies the map to one index.
    #[inline]
    pub fn map(&self, k: usize) -> usize {
        debug_assert!(k < self.n());
        match self {
            Imf::Id { .. } => k,
            Imf::Zero { .. } => 0,
            Imf::Strided { start, stride, .. } => start + k * stride,
            Imf::Select { idxs, .. } => idxs[k],
        }
    }

    /// `(start, stride)` when the map is affine, `None` for gathers.
    fn affine(&self) -> Option<(usize, usize)> {
        match self {
            Imf::Id { .. } => Some((0, 1)),
            Imf::Zero { .. } => Some((0, 0)),
            Imf::Strided { start, stride, .. } => Some((*start, *stride)),
            Imf::Select { .. } => None,
        }
    }

    /// Canonical composition `k -> outer(inner(k))`.
    ///
    /// Two affine maps fuse into one strided map; an identity on either
    /// side yields a clone of the other side; any gather in the chain
    /// tabulates the whole composition into a fresh gather.
    pub fn compose(outer: &Imf, inner: &Imf) -> Imf {
        debug_assert!(inner.codomain() <= outer.n() || inner.n() == 0);
        if let Imf::Id { .. } = outer {
            return inner.clone();
        }
        if let Imf::Id { .. } = inner {
            return outer.clone();
        }
        if let (Some((b_f, s_f)), Some((b_g, s_g))) = (outer.affine(), inner.affine()) {
            return Imf::strided(inner.n(), outer.codomain(), b_f + s_f * b_g, s_f * s_g);
        }
        let idxs = (0..inner.n()).map(|k| outer.map(inner.map(k))).collect();
        Imf::select(outer.codomain(), idxs)
    }

    /// Whether two maps agree pointwise over their (equal-size) domains.
    pub fn same_mapping(&self, other: &Imf) -> bool {
        if self.n() != other.n() {
            return false;
        }
        if let (Some((b0, s0)), Some((b1, s1))) = (self.affine(), other.affine()) {
            return match self.n() {
                0 => true,
                1 => b0 == b1,
                _ => b0 == b1 && s0 == s1,
            };
        }
        (0..self.n()).all(|k| self.map(k) == other.map(k))
    }
}
