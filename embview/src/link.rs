//! Attribute propagation between views of different cardinality.

use crate::error::LinkError;
use crate::model::ViewId;
use crate::points::{Attribute, PointSet};
use serde::{Deserialize, Serialize};

/// Directed `(source view, attribute) -> (target view, attribute)` binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBinding {
    pub source: ViewId,
    pub source_attr: Attribute,
    pub target: ViewId,
    pub target_attr: Attribute,
}

impl LinkBinding {
    /// Bind the same attribute on both sides.
    pub fn same(source: ViewId, target: ViewId, attr: Attribute) -> Self {
        LinkBinding {
            source,
            source_attr: attr,
            target,
            target_attr: attr,
        }
    }
}

/// How target indices are drawn from source indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mapping {
    Copy,
    /// Each source point fills `ratio` consecutive target points.
    Broadcast { ratio: usize },
    /// Target point `i` takes source point `i * ratio`.
    Stride { ratio: usize },
}

/// Resolve the mapping for point counts `ns -> nt`.
pub fn mapping(ns: usize, nt: usize) -> Result<Mapping, LinkError> {
    if ns == 0 || nt == 0 {
        return Err(LinkError::Empty);
    }
    let mismatch = LinkError::CardinalityMismatch {
        source_count: ns,
        target_count: nt,
    };
    if ns == nt {
        Ok(Mapping::Copy)
    } else if nt > ns {
        if nt % ns != 0 {
            return Err(mismatch);
        }
        Ok(Mapping::Broadcast { ratio: nt / ns })
    } else {
        if ns % nt != 0 {
            return Err(mismatch);
        }
        Ok(Mapping::Stride { ratio: ns / nt })
    }
}

/// Remap a flat attribute array onto `target`, point by point.
///
/// On error `target` is left untouched.
pub fn remap(
    source: &[f32],
    source_components: usize,
    target: &mut [f32],
    target_components: usize,
) -> Result<Mapping, LinkError> {
    if source_components != target_components || source_components == 0 {
        return Err(LinkError::ComponentMismatch {
            source_components,
            target_components,
        });
    }
    let c = source_components;
    if source.len() % c != 0 || target.len() % c != 0 {
        return Err(LinkError::ComponentMismatch {
            source_components,
            target_components,
        });
    }
    let (ns, nt) = (source.len() / c, target.len() / c);
    let m = mapping(ns, nt)?;
    match m {
        Mapping::Copy => target.copy_from_slice(source),
        Mapping::Broadcast { ratio } => {
            for (j, dst) in target.chunks_exact_mut(c).enumerate() {
                let i = j / ratio;
                dst.copy_from_slice(&source[i * c..(i + 1) * c]);
            }
        }
        Mapping::Stride { ratio } => {
            for (i, dst) in target.chunks_exact_mut(c).enumerate() {
                let k = i * ratio;
                dst.copy_from_slice(&source[k * c..(k + 1) * c]);
            }
        }
    }
    Ok(m)
}

/// The link bindings of a session, fixed when the session is built.
#[derive(Clone, Debug, Default)]
pub struct Synchronizer {
    bindings: Vec<LinkBinding>,
}

impl Synchronizer {
    pub fn new(bindings: Vec<LinkBinding>) -> Self {
        Synchronizer { bindings }
    }

    pub fn bindings(&self) -> &[LinkBinding] {
        &self.bindings
    }

    pub fn outgoing(&self, source: ViewId) -> impl Iterator<Item = &LinkBinding> {
        self.bindings.iter().filter(move |b| b.source == source)
    }

    /// Distinct targets linked from `source`, in binding order.
    pub fn targets(&self, source: ViewId) -> Vec<ViewId> {
        let mut out: Vec<ViewId> = Vec::new();
        for b in self.outgoing(source) {
            if !out.contains(&b.target) {
                out.push(b.target);
            }
        }
        out
    }

    /// Check a binding against the point counts it will connect.
    pub fn validate(
        binding: &LinkBinding,
        source: &PointSet,
        target: &PointSet,
    ) -> Result<Mapping, LinkError> {
        let (sc, tc) = (binding.source_attr.components(), binding.target_attr.components());
        if sc != tc {
            return Err(LinkError::ComponentMismatch {
                source_components: sc,
                target_components: tc,
            });
        }
        mapping(source.len(), target.len())
    }

    /// Apply one binding. The source is only read.
    pub fn propagate(
        binding: &LinkBinding,
        source: &PointSet,
        target: &mut PointSet,
    ) -> Result<Mapping, LinkError> {
        remap(
            source.attribute(binding.source_attr),
            binding.source_attr.components(),
            target.attribute_mut(binding.target_attr),
            binding.target_attr.components(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_counts_copy() {
        let src = [1.0, 2.0, 3.0];
        let mut dst = [0.0; 3];
        assert_eq!(remap(&src, 1, &mut dst, 1), Ok(Mapping::Copy));
        assert_eq!(dst, src);
    }

    #[test]
    fn broadcast_is_per_point_for_wide_attributes() {
        let src = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
        let mut dst = [0.0; 12];
        assert_eq!(remap(&src, 3, &mut dst, 3), Ok(Mapping::Broadcast { ratio: 2 }));
        assert_eq!(&dst[..6], &[1.0; 6]);
        assert_eq!(&dst[6..], &[2.0; 6]);
    }

    #[test]
    fn stride_samples_every_ratio_th_point() {
        let src: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let mut dst = [0.0; 2];
        assert_eq!(remap(&src, 1, &mut dst, 1), Ok(Mapping::Stride { ratio: 3 }));
        assert_eq!(dst, [0.0, 3.0]);
    }

    #[test]
    fn non_integer_ratio_leaves_target_untouched() {
        let src = [1.0; 3];
        let mut dst = [7.0; 5];
        assert_eq!(
            remap(&src, 1, &mut dst, 1),
            Err(LinkError::CardinalityMismatch {
                source_count: 3,
                target_count: 5
            })
        );
        assert_eq!(dst, [7.0; 5]);
    }

    #[test]
    fn empty_and_width_mismatch_are_rejected() {
        let mut dst = [0.0; 3];
        assert_eq!(remap(&[], 1, &mut dst, 1), Err(LinkError::Empty));
        assert!(matches!(
            remap(&[1.0; 3], 3, &mut dst, 1),
            Err(LinkError::ComponentMismatch { .. })
        ));
        assert!(matches!(
            remap(&[1.0; 4], 3, &mut [0.0; 6], 3),
            Err(LinkError::ComponentMismatch { .. })
        ));
    }

    #[test]
    fn targets_are_deduplicated() {
        let (a, b) = (ViewId(0), ViewId(1));
        let sync = Synchronizer::new(vec![
            LinkBinding::same(a, b, Attribute::Colors),
            LinkBinding::same(a, b, Attribute::Opacities),
            LinkBinding::same(b, a, Attribute::Colors),
        ]);
        assert_eq!(sync.targets(a), vec![b]);
        assert_eq!(sync.outgoing(a).count(), 2);
    }
}
